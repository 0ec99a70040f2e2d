use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The load target that a shape hands back to the load engine on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickData {
    /// Total number of simulated users that should be running.
    pub users: u32,
    /// Number of users to start or stop per second while moving towards [TickData::users].
    pub spawn_rate: u32,
}

/// One step of a staged ramp.
///
/// The `duration` is the cumulative elapsed-seconds threshold at which this stage's window
/// ends, not the length of the stage. A table of `[60, 120, 180]` describes three windows of
/// one minute each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub duration: u64,
    pub users: u32,
    pub spawn_rate: u32,
    /// Ask the engine to stop the run as soon as this stage becomes current.
    #[serde(default)]
    pub stop: bool,
}

impl Stage {
    pub fn new(duration: u64, users: u32, spawn_rate: u32) -> Self {
        Self {
            duration,
            users,
            spawn_rate,
            stop: false,
        }
    }
}

/// The contract between a scenario and the load engine's control loop.
///
/// The engine calls [LoadShape::tick] on a fixed interval, passing the elapsed run time.
/// Returning `None` tells the engine to stop ramping and end the run.
pub trait LoadShape: Send + Sync {
    fn tick(&self, run_time: u64) -> Option<TickData>;
}

/// A load shape made of an ordered table of [Stage]s.
///
/// The table is validated when the shape is constructed and immutable afterwards. Scenarios
/// should build one per run and inject it into their definition rather than sharing it through
/// globals, so a different table can be swapped in per test without touching the scenario code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedShape {
    stages: Vec<Stage>,
    stop_at_end: bool,
}

/// Errors produced while constructing or loading a [StagedShape].
///
/// A bad table is a configuration mistake, so it is rejected up front instead of being left to
/// produce a silently wrong ramp at run time.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("stage table is empty")]
    Empty,
    #[error(
        "stage {index} ends at {threshold}s which is not after the previous stage's {previous}s"
    )]
    NonMonotonic {
        index: usize,
        threshold: u64,
        previous: u64,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl StagedShape {
    /// Build a shape from an ordered stage table.
    ///
    /// The table must be non-empty and its thresholds must be strictly increasing.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ShapeError> {
        if stages.is_empty() {
            return Err(ShapeError::Empty);
        }

        for (index, (previous, stage)) in stages.iter().tuple_windows().enumerate() {
            if stage.duration <= previous.duration {
                return Err(ShapeError::NonMonotonic {
                    index: index + 1,
                    threshold: stage.duration,
                    previous: previous.duration,
                });
            }
        }

        Ok(Self {
            stages,
            stop_at_end: true,
        })
    }

    /// Choose what happens once the final stage's window has passed.
    ///
    /// The default, `true`, ends the run. Setting `false` holds the final stage's target
    /// indefinitely, for soak-style runs that should keep the last load level until stopped
    /// externally.
    pub fn with_stop_at_end(mut self, stop_at_end: bool) -> Self {
        self.stop_at_end = stop_at_end;
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stop_at_end(&self) -> bool {
        self.stop_at_end
    }

    /// The threshold at which the final stage's window ends.
    pub fn total_duration(&self) -> u64 {
        // The table is never empty once constructed.
        self.stages.last().map(|stage| stage.duration).unwrap_or(0)
    }
}

impl LoadShape for StagedShape {
    /// Scan the table from the start and return the target of the first stage whose window has
    /// not yet expired.
    ///
    /// The comparison is strict, so a `run_time` exactly on a threshold belongs to the next
    /// stage. The scan is repeated on every call rather than keeping a cursor, which keeps the
    /// lookup idempotent even if the engine ever calls it out of time order.
    fn tick(&self, run_time: u64) -> Option<TickData> {
        for stage in &self.stages {
            if run_time < stage.duration {
                if stage.stop {
                    return None;
                }
                return Some(TickData {
                    users: stage.users,
                    spawn_rate: stage.spawn_rate,
                });
            }
        }

        let last = self.stages.last()?;
        if self.stop_at_end || last.stop {
            None
        } else {
            Some(TickData {
                users: last.users,
                spawn_rate: last.spawn_rate,
            })
        }
    }
}
