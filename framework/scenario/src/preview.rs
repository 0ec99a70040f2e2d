use std::collections::BTreeMap;

use ramp_shape::prelude::{LoadShape, Stage};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::context::UserValuesConstraint;
use crate::definition::{ScenarioDefinition, ScenarioDefinitionBuilder};
use crate::types::RampResult;

/// Resolve a scenario and present its plan without running it.
///
/// This is the entry point for a scenario binary. The engine that actually spawns simulated
/// users lives in the load fleet; what a scenario crate can do locally is validate its
/// configuration, show the staged plan (or emit it as JSON with `--json` for fleet tooling)
/// and evaluate `--probe` points through the same lookup the engine's control loop uses.
pub fn preview<RV: UserValuesConstraint, V: UserValuesConstraint>(
    builder: ScenarioDefinitionBuilder<RV, V>,
) -> RampResult<()> {
    let definition = builder.build()?;

    log::info!("Resolved scenario: {}", definition.name);

    if definition.cli.json {
        println!("{}", serde_json::to_string_pretty(&record(&definition))?);
    } else {
        println!(
            "Scenario [{}] against [{}]: {} stages over {}s",
            definition.name,
            definition.connection_string,
            definition.shape.stages().len(),
            definition.shape.total_duration(),
        );

        let mut table = Table::new(stage_rows(definition.shape.stages()));
        table.with(Style::modern());
        println!("{table}");
    }

    for run_time in &definition.cli.probe {
        match definition.shape.tick(*run_time) {
            Some(tick) => println!(
                "t={}s users={} spawn_rate={}",
                run_time, tick.users, tick.spawn_rate
            ),
            None => println!("t={}s end of shape", run_time),
        }
    }

    Ok(())
}

#[derive(Tabled)]
struct StageRow {
    stage: usize,
    window: String,
    users: u32,
    spawn_rate: u32,
    stop: bool,
}

fn stage_rows(stages: &[Stage]) -> Vec<StageRow> {
    let mut window_start = 0;

    stages
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let row = StageRow {
                stage: index,
                window: format!("{}s..{}s", window_start, stage.duration),
                users: stage.users,
                spawn_rate: stage.spawn_rate,
                stop: stage.stop,
            };
            window_start = stage.duration;
            row
        })
        .collect()
}

/// The machine-readable form of a scenario, for tooling that assigns scenarios to load
/// generator nodes.
#[derive(Debug, Serialize)]
struct ScenarioRecord<'a> {
    name: &'a str,
    connection_string: &'a str,
    wait_time_s: f64,
    behaviours: BTreeMap<&'a str, u32>,
    stop_at_end: bool,
    stages: &'a [Stage],
}

fn record<RV: UserValuesConstraint, V: UserValuesConstraint>(
    definition: &ScenarioDefinition<RV, V>,
) -> ScenarioRecord<'_> {
    ScenarioRecord {
        name: &definition.name,
        connection_string: definition.connection_string.as_str(),
        wait_time_s: definition.wait_time.as_secs_f64(),
        behaviours: definition
            .agent_behaviour
            .iter()
            .map(|(name, (weight, _))| (name.as_str(), *weight))
            .collect(),
        stop_at_end: definition.shape.stop_at_end(),
        stages: definition.shape.stages(),
    }
}
