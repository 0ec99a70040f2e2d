mod cli;
mod context;
mod definition;
mod init;
mod preview;
mod types;

pub mod prelude {
    pub use crate::cli::RampScenarioCli;
    pub use crate::context::{AgentContext, HttpSession, RunnerContext, UserValuesConstraint};
    pub use crate::definition::{HookResult, ScenarioDefinition, ScenarioDefinitionBuilder};
    pub use crate::init::init;
    pub use crate::preview::preview;
    pub use crate::types::RampResult;
    pub use ramp_shape::prelude::*;
}
