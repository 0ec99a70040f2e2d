use crate::cli::RampScenarioCli;
use clap::Parser;

/// Initialise the CLI and logging for a ramp scenario.
pub fn init() -> RampScenarioCli {
    env_logger::init();

    RampScenarioCli::parse()
}
