use std::time::Duration;

use ramp_scenario::prelude::*;

/// The staged ramp for this scenario: twenty one-minute windows covering a twenty minute run.
/// Each threshold is the cumulative elapsed time at which its window ends.
fn stages() -> Vec<Stage> {
    vec![
        Stage::new(60, 19, 19),
        Stage::new(120, 28, 28),
        Stage::new(180, 70, 70),
        Stage::new(240, 30, 30),
        Stage::new(300, 27, 27),
        Stage::new(360, 78, 78),
        Stage::new(420, 55, 55),
        Stage::new(480, 47, 47),
        Stage::new(540, 44, 44),
        Stage::new(600, 33, 33),
        Stage::new(660, 34, 34),
        Stage::new(720, 50, 50),
        Stage::new(780, 66, 66),
        Stage::new(840, 66, 66),
        Stage::new(900, 69, 69),
        Stage::new(960, 94, 94),
        Stage::new(1020, 53, 53),
        Stage::new(1080, 56, 56),
        Stage::new(1140, 86, 86),
        Stage::new(1200, 100, 100),
    ]
}

fn agent_behaviour(ctx: &mut AgentContext<(), ()>) -> HookResult {
    ctx.session().get("/test")?;

    Ok(())
}

fn main() -> RampResult<()> {
    let builder = ScenarioDefinitionBuilder::<(), ()>::new(env!("CARGO_PKG_NAME"), init())
        .with_wait_time(Duration::ZERO)
        .with_load_shape(StagedShape::new(stages())?)
        .use_agent_behaviour(agent_behaviour);

    preview(builder)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn shape() -> StagedShape {
        StagedShape::new(stages()).unwrap()
    }

    fn target(users: u32) -> Option<TickData> {
        Some(TickData {
            users,
            spawn_rate: users,
        })
    }

    #[test]
    fn the_table_has_twenty_minute_steps() {
        let stages = stages();

        assert_eq!(20, stages.len());
        for (index, stage) in stages.iter().enumerate() {
            assert_eq!((index as u64 + 1) * 60, stage.duration);
            assert_eq!(stage.users, stage.spawn_rate);
            assert!(!stage.stop);
        }
    }

    #[test]
    fn the_first_minute_runs_nineteen_users() {
        let shape = shape();

        for run_time in [0, 1, 30, 59] {
            assert_eq!(target(19), shape.tick(run_time));
        }
    }

    #[test]
    fn a_threshold_belongs_to_the_next_stage() {
        let shape = shape();

        assert_eq!(target(19), shape.tick(59));
        assert_eq!(target(28), shape.tick(60));
    }

    #[test]
    fn the_final_minute_runs_one_hundred_users() {
        let shape = shape();

        assert_eq!(target(100), shape.tick(1140));
        assert_eq!(target(100), shape.tick(1199));
    }

    #[test]
    fn the_run_ends_after_twenty_minutes() {
        let shape = shape();

        assert_eq!(None, shape.tick(1200));
        assert_eq!(None, shape.tick(5000));
    }

    #[test]
    fn the_ramp_timeline_matches_the_captured_run() {
        let shape = shape();

        let samples = [0, 59, 60, 1199, 1200, 5000].map(|run_time| shape.tick(run_time));

        assert_eq!(
            [
                target(19),
                target(19),
                target(28),
                target(100),
                None,
                None
            ],
            samples
        );
    }

    #[test]
    fn repeated_lookups_agree() {
        let shape = shape();

        assert_eq!(shape.tick(750), shape.tick(750));
        let late = shape.tick(1100);
        let early = shape.tick(5);
        assert_eq!(late, shape.tick(1100));
        assert_eq!(early, shape.tick(5));
    }

    struct RecordingSession(Arc<Mutex<Vec<String>>>);

    impl HttpSession for RecordingSession {
        fn get(&mut self, path: &str) -> HookResult {
            self.0.lock().unwrap().push(path.to_string());
            Ok(())
        }
    }

    #[test]
    fn the_behaviour_issues_one_get_against_the_test_endpoint() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let runner_context = Arc::new(RunnerContext::<()>::new("http://localhost:8080"));
        let mut ctx = AgentContext::new(
            "agent-0",
            runner_context,
            Box::new(RecordingSession(requests.clone())),
        );

        agent_behaviour(&mut ctx).unwrap();
        agent_behaviour(&mut ctx).unwrap();

        assert_eq!(
            vec!["/test".to_string(), "/test".to_string()],
            *requests.lock().unwrap()
        );
    }
}
