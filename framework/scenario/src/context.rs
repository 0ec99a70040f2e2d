use std::{fmt::Debug, sync::Arc};

use crate::definition::HookResult;

pub trait UserValuesConstraint: Default + Debug + Send + Sync + 'static {}

impl UserValuesConstraint for () {}

/// The HTTP session that the load engine hands to each simulated user.
///
/// Paths are relative to the base URL the engine was launched with. Request execution, timing,
/// retries and failure recording all live on the engine's side of this trait; behaviour hooks
/// only decide which requests to make.
pub trait HttpSession: Send {
    fn get(&mut self, path: &str) -> HookResult;
}

/// Values shared by every agent in a run.
#[derive(Debug)]
pub struct RunnerContext<RV: UserValuesConstraint> {
    connection_string: String,
    value: RV,
}

impl<RV: UserValuesConstraint> RunnerContext<RV> {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            value: Default::default(),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn get_mut(&mut self) -> &mut RV {
        &mut self.value
    }

    pub fn get(&self) -> &RV {
        &self.value
    }
}

/// The context given to each invocation of an agent hook.
///
/// The engine constructs one per simulated user, with a live [HttpSession] attached.
pub struct AgentContext<RV: UserValuesConstraint, V: UserValuesConstraint> {
    agent_id: String,
    runner_context: Arc<RunnerContext<RV>>,
    session: Box<dyn HttpSession>,
    value: V,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> AgentContext<RV, V> {
    pub fn new(
        agent_id: impl Into<String>,
        runner_context: Arc<RunnerContext<RV>>,
        session: Box<dyn HttpSession>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            runner_context,
            session,
            value: Default::default(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn runner_context(&self) -> &Arc<RunnerContext<RV>> {
        &self.runner_context
    }

    pub fn session(&mut self) -> &mut dyn HttpSession {
        self.session.as_mut()
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn get(&self) -> &V {
        &self.value
    }
}
