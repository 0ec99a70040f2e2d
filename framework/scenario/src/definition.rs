use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use ramp_shape::prelude::StagedShape;
use url::Url;

use crate::cli::RampScenarioCli;
use crate::context::{AgentContext, RunnerContext, UserValuesConstraint};
use crate::types::RampResult;

pub type HookResult = anyhow::Result<()>;

pub type GlobalHookMut<RV> = fn(&mut RunnerContext<RV>) -> HookResult;
pub type GlobalHook<RV> = fn(Arc<RunnerContext<RV>>) -> HookResult;
pub type AgentHookMut<RV, V> = fn(&mut AgentContext<RV, V>) -> HookResult;

/// The builder for a scenario definition.
///
/// This must be used at the start of a scenario to define the behaviour and load shape that the
/// engine should run.
pub struct ScenarioDefinitionBuilder<RV: UserValuesConstraint, V: UserValuesConstraint> {
    /// The name of the scenario, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    /// This value is initialised for you and you cannot change it.
    #[doc(hidden)]
    cli: RampScenarioCli,
    /// The think-time between consecutive invocations of an agent's behaviour.
    wait_time: Duration,
    /// The load shape that the engine's control loop should tick.
    shape: Option<StagedShape>,
    /// Global setup hook for this scenario. It will be run once, before any agents are started.
    setup_fn: Option<GlobalHookMut<RV>>,
    /// Setup hook for an agent, which will be run once for each agent as it starts.
    setup_agent_fn: Option<AgentHookMut<RV, V>>,
    /// The weighted agent behaviours for this scenario.
    ///
    /// With a single behaviour registered through
    /// [ScenarioDefinitionBuilder::use_agent_behaviour], every agent runs that behaviour. With
    /// several, the engine schedules each behaviour in proportion to its weight.
    agent_behaviour: HashMap<String, (u32, AgentHookMut<RV, V>)>,
    /// Teardown hook for an agent, run once for each agent when it stops.
    teardown_agent_fn: Option<AgentHookMut<RV, V>>,
    /// Global teardown hook, run once after all agents have stopped. Best effort.
    teardown_fn: Option<GlobalHook<RV>>,
}

/// A validated scenario, ready to be handed to the engine or previewed.
#[derive(Debug)]
pub struct ScenarioDefinition<RV: UserValuesConstraint, V: UserValuesConstraint> {
    pub name: String,
    pub cli: RampScenarioCli,
    pub connection_string: Url,
    pub wait_time: Duration,
    pub shape: StagedShape,
    pub setup_fn: Option<GlobalHookMut<RV>>,
    pub setup_agent_fn: Option<AgentHookMut<RV, V>>,
    pub agent_behaviour: HashMap<String, (u32, AgentHookMut<RV, V>)>,
    pub teardown_agent_fn: Option<AgentHookMut<RV, V>>,
    pub teardown_fn: Option<GlobalHook<RV>>,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> ScenarioDefinitionBuilder<RV, V> {
    /// Initialise a new scenario definition from the scenario name and command line arguments.
    /// See [ScenarioDefinitionBuilder::name] for more information about the name.
    pub fn new(name: &str, cli: RampScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            wait_time: Duration::ZERO,
            shape: None,
            setup_fn: None,
            setup_agent_fn: None,
            agent_behaviour: HashMap::new(),
            teardown_agent_fn: None,
            teardown_fn: None,
        }
    }

    /// Set the think-time between consecutive invocations of an agent's behaviour.
    ///
    /// The default is zero, meaning agents issue their next request as soon as the previous one
    /// completes.
    pub fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// Attach the load shape that the engine should tick while this scenario runs.
    ///
    /// A `--shape-file` passed on the command line takes precedence over the shape given here.
    pub fn with_load_shape(mut self, shape: StagedShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the global setup hook [ScenarioDefinitionBuilder::setup_fn] for this scenario.
    pub fn use_setup(mut self, setup_fn: GlobalHookMut<RV>) -> Self {
        self.setup_fn = Some(setup_fn);
        self
    }

    /// Set the agent setup hook [ScenarioDefinitionBuilder::setup_agent_fn] for this scenario.
    pub fn use_agent_setup(mut self, setup_agent_fn: AgentHookMut<RV, V>) -> Self {
        self.setup_agent_fn = Some(setup_agent_fn);
        self
    }

    /// Set the default agent behaviour for this scenario, with weight 1.
    pub fn use_agent_behaviour(self, behaviour: AgentHookMut<RV, V>) -> Self {
        self.use_weighted_agent_behaviour("default", 1, behaviour)
    }

    /// Register a named agent behaviour with a scheduling weight.
    pub fn use_weighted_agent_behaviour(
        mut self,
        name: &str,
        weight: u32,
        behaviour: AgentHookMut<RV, V>,
    ) -> Self {
        let previous = self
            .agent_behaviour
            .insert(name.to_string(), (weight, behaviour));

        if previous.is_some() {
            panic!("Behaviour [{}] is already defined", name);
        }

        self
    }

    /// Set the agent teardown hook [ScenarioDefinitionBuilder::teardown_agent_fn] for this scenario.
    pub fn use_agent_teardown(mut self, teardown_agent_fn: AgentHookMut<RV, V>) -> Self {
        self.teardown_agent_fn = Some(teardown_agent_fn);
        self
    }

    /// Set the global teardown hook [ScenarioDefinitionBuilder::teardown_fn] for this scenario.
    pub fn use_teardown(mut self, teardown_fn: GlobalHook<RV>) -> Self {
        self.teardown_fn = Some(teardown_fn);
        self
    }

    /// Validate the configuration and produce the definition the engine consumes.
    pub fn build(self) -> RampResult<ScenarioDefinition<RV, V>> {
        let connection_string = Url::parse(&self.cli.connection_string).with_context(|| {
            format!(
                "Connection string [{}] is not a valid base URL",
                self.cli.connection_string
            )
        })?;

        if self.agent_behaviour.is_empty() {
            anyhow::bail!("Scenario [{}] registers no agent behaviour", self.name);
        }

        for (name, (weight, _)) in &self.agent_behaviour {
            if *weight == 0 {
                anyhow::bail!("Behaviour [{}] has a zero weight and would never run", name);
            }
        }

        let shape = match &self.cli.shape_file {
            Some(path) => StagedShape::load(path)
                .with_context(|| format!("Failed to load shape file [{}]", path.display()))?,
            None => self.shape.ok_or_else(|| {
                anyhow::anyhow!("Scenario [{}] has no load shape attached", self.name)
            })?,
        };

        Ok(ScenarioDefinition {
            name: self.name,
            cli: self.cli,
            connection_string,
            wait_time: self.wait_time,
            shape,
            setup_fn: self.setup_fn,
            setup_agent_fn: self.setup_agent_fn,
            agent_behaviour: self.agent_behaviour,
            teardown_agent_fn: self.teardown_agent_fn,
            teardown_fn: self.teardown_fn,
        })
    }
}
