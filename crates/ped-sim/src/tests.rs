//! Integration tests for ped-sim.

use std::sync::Arc;

use ped_calib::Pedestrian;
use ped_core::{Blockage, BlockageRegistry, CoreError, NodeId, RouteId, SimParams};
use ped_demand::Group;
use ped_network::{NetworkBuilder, NetworkError, PedNetwork, PotentialField, Route};

use crate::{FlowModel, NoopFlow, NoopObserver, ScenarioBuilder, ScenarioObserver, ScenarioOutcome, SimError, SimResult};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn params(total_intervals: u32) -> SimParams {
    SimParams { total_intervals, ..SimParams::default() }
}

/// A ──2.0── B ──1.0── C with walkways both ways.  R1 ends at C, R2 at A.
/// Both routes are 30 m with zero critical velocity, so route choice is even.
fn line_network() -> PedNetwork {
    let mut b = NetworkBuilder::new();
    let a = b.add_node();
    let bb = b.add_node();
    let c = b.add_node();
    b.add_walkway(a, bb, 2.0, "ab");
    b.add_walkway(bb, c, 1.0, "bc");

    let zones = |z: &[&str]| z.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut r1 = Route::new("R1", zones(&["za", "zc"]), 30.0).unwrap();
    let mut r2 = Route::new("R2", zones(&["zc", "za"]), 30.0).unwrap();
    for n in [a, bb, c] {
        r1.add_route_node(n);
        r2.add_route_node(n);
    }
    r1.set_destination_node(c);
    r2.set_destination_node(a);
    b.add_route(r1).unwrap();
    b.add_route(r2).unwrap();
    b.build().unwrap()
}

fn two_options() -> Arc<[String]> {
    Arc::from(vec!["R1".to_owned(), "R2".to_owned()])
}

fn ped(route: &str, dep_time: f64, tt_obs: f64) -> Pedestrian {
    Pedestrian::new(route, dep_time, tt_obs, [String::new(), String::new()])
}

/// Everyone in a group arrives `delay` intervals after departing.
struct FixedDelayFlow {
    delay: i32,
}

impl FlowModel for FixedDelayFlow {
    fn advance(&mut self, step: i32, _: &PedNetwork, _: &PotentialField, groups: &mut [Group]) -> SimResult<()> {
        for g in groups.iter_mut().filter(|g| g.dep_time() + self.delay == step) {
            let n = g.num_people();
            g.add_travel_time(step, n);
        }
        Ok(())
    }
}

/// Fails at `fail_at`, if set.
struct FailingFlow {
    fail_at: Option<i32>,
}

impl FlowModel for FailingFlow {
    fn advance(&mut self, step: i32, _: &PedNetwork, _: &PotentialField, _: &mut [Group]) -> SimResult<()> {
        match self.fail_at {
            Some(s) if s == step => Err(SimError::Flow { step, reason: "cell overflow".into() }),
            _ => Ok(()),
        }
    }
}

/// Records the potential of node A for route R1 at every step.
#[derive(Default)]
struct Recorder {
    starts:    Vec<i32>,
    ends:      Vec<i32>,
    potential: Vec<f64>,
    finished:  Vec<ScenarioOutcome>,
}

impl ScenarioObserver for Recorder {
    fn on_step_start(&mut self, step: i32) {
        self.starts.push(step);
    }

    fn on_potentials_settled(&mut self, _step: i32, _network: &PedNetwork, field: &PotentialField) {
        self.potential.push(field.get(RouteId(0), NodeId(0)));
    }

    fn on_step_end(&mut self, step: i32) {
        self.ends.push(step);
    }

    fn on_scenario_end(&mut self, outcome: &ScenarioOutcome) {
        self.finished.push(outcome.clone());
    }
}

// ── ScenarioBuilder validation ────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let s = ScenarioBuilder::new("base", params(10), line_network()).build().unwrap();
        assert_eq!(s.name, "base");
        assert!(s.groups.is_empty());
        assert!(s.blockages.is_empty());
        assert_eq!(s.field.route_count(), 2);
        assert_eq!(s.field.node_count(), 3);
        assert!(!s.is_started());
        assert!(!s.is_completed());
    }

    #[test]
    fn invalid_params_rejected() {
        let bad = SimParams { delta_t: 0.0, ..SimParams::default() };
        let err = ScenarioBuilder::new("bad", bad, line_network()).build().err().unwrap();
        assert!(matches!(err, SimError::Core(CoreError::Config(_))));
    }

    #[test]
    fn group_on_unknown_route_rejected() {
        let err = ScenarioBuilder::new("s", params(10), line_network())
            .groups(vec![Group::new("R9", 0, 5.0)])
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Network(NetworkError::UnknownRoute(ref r)) if r == "R9"));
    }

    #[test]
    fn route_choice_splits_at_build() {
        let demand = vec![Group::with_options("R1", 3, 100.0, two_options())];
        let s = ScenarioBuilder::new("s", params(10), line_network())
            .groups(demand)
            .route_choice(true)
            .build()
            .unwrap();
        assert_eq!(s.groups.len(), 2);
        assert_eq!(s.groups[0].route_name(), "R1");
        assert_eq!(s.groups[1].route_name(), "R2");
        assert!((s.groups[0].num_people() - 50.0).abs() < 1e-12);
        assert!((s.groups[1].num_people() - 50.0).abs() < 1e-12);
        assert!(Arc::ptr_eq(s.groups[0].route_options(), s.groups[1].route_options()));
    }

    #[test]
    fn route_choice_off_keeps_groups() {
        let demand = vec![Group::with_options("R1", 3, 100.0, two_options())];
        let s = ScenarioBuilder::new("s", params(10), line_network())
            .groups(demand)
            .build()
            .unwrap();
        assert_eq!(s.groups.len(), 1);
        assert_eq!(s.groups[0].num_people(), 100.0);
    }
}

// ── Step loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use ped_network::ProportionalCost;

    use super::*;

    #[test]
    fn observer_sees_every_step() {
        init_logging();
        let mut s = ScenarioBuilder::new("s", params(4), line_network())
            .groups(vec![Group::new("R1", 0, 10.0)])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let outcome = s.run(&mut NoopFlow, &mut rec).unwrap();

        assert_eq!(rec.starts, vec![0, 1, 2, 3]);
        assert_eq!(rec.ends, vec![0, 1, 2, 3]);
        assert_eq!(rec.potential, vec![3.0; 4]);
        assert_eq!(rec.finished, vec![outcome.clone()]);
        assert_eq!(outcome.steps, 4);
        assert_eq!(outcome.groups, 1);
        assert_eq!(outcome.degenerate_groups, 1);
        assert_eq!(outcome.calibration, None);
        assert!(s.is_completed());
    }

    #[test]
    fn zero_horizon_runs_no_steps() {
        let mut s = ScenarioBuilder::new("s", params(0), line_network()).build().unwrap();
        let mut rec = Recorder::default();
        let outcome = s.run(&mut NoopFlow, &mut rec).unwrap();
        assert!(rec.starts.is_empty());
        assert_eq!(outcome.steps, 0);
        assert_eq!(rec.finished.len(), 1);
    }

    #[test]
    fn blockage_switches_potentials_on_and_off() {
        let blockages: BlockageRegistry =
            [Blockage::new("ab", 2, 3, 50.0).unwrap()].into_iter().collect();
        let mut s = ScenarioBuilder::new("s", params(5), line_network())
            .blockages(blockages)
            .blockage_cost(ProportionalCost)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        s.run(&mut NoopFlow, &mut rec).unwrap();

        // B and A both read cell "ab" through their first outgoing link.
        assert_eq!(rec.potential, vec![3.0, 3.0, 5.25, 5.25, 3.0]);
    }

    #[test]
    fn arrivals_feed_statistics_and_calibration() {
        let mut s = ScenarioBuilder::new("s", params(30), line_network())
            .groups(vec![Group::new("R1", 5, 10.0), Group::new("R2", 5, 4.0)])
            .pedestrians(vec![ped("R1", 10.5, 24.0), ped("R2", 11.0, 30.0)])
            .build()
            .unwrap();
        let mut flow = FixedDelayFlow { delay: 12 };
        let outcome = s.run(&mut flow, &mut NoopObserver).unwrap();

        // Arrival at 17, corrected travel time 10 intervals = 20 s.
        assert_eq!(s.groups[0].mean_tt_simulated(), 20.0);
        assert_eq!(s.groups[0].rel_loss(), 1.0);
        assert_eq!(outcome.degenerate_groups, 0);

        let cal = outcome.calibration.unwrap();
        assert_eq!(cal.pedestrians, 2);
        assert_eq!(cal.used, 2);
        assert!((cal.sum_squared_error - (16.0 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn records_after_run() {
        let mut s = ScenarioBuilder::new("s", params(30), line_network())
            .groups(vec![Group::new("R1", 5, 10.0)])
            .pedestrians(vec![ped("R1", 10.5, 24.0)])
            .build()
            .unwrap();
        s.run(&mut FixedDelayFlow { delay: 12 }, &mut NoopObserver).unwrap();

        assert_eq!(s.aggregated_records(), vec!["R1, 5, 10.0, 20.0".to_owned()]);
        assert_eq!(s.disaggregate_records().unwrap(), vec!["R1, 10.5, 24.0, 20.0".to_owned()]);
    }

    #[test]
    fn unmatched_pedestrian_fails_run() {
        let mut s = ScenarioBuilder::new("s", params(3), line_network())
            .groups(vec![Group::new("R1", 0, 1.0)])
            .pedestrians(vec![ped("R2", 0.0, 5.0)])
            .build()
            .unwrap();
        let err = s.run(&mut NoopFlow, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Calib(ped_calib::CalibError::NoCorrespondingGroup { .. })));
    }

    #[test]
    fn flow_error_stops_the_loop() {
        let mut s = ScenarioBuilder::new("s", params(10), line_network()).build().unwrap();
        let mut rec = Recorder::default();
        let err = s.run(&mut FailingFlow { fail_at: Some(3) }, &mut rec).unwrap_err();

        assert!(matches!(err, SimError::Flow { step: 3, .. }));
        assert_eq!(rec.starts, vec![0, 1, 2, 3]);
        assert_eq!(rec.ends, vec![0, 1, 2]);
        assert!(rec.finished.is_empty());
    }

    #[test]
    fn second_run_rejected() {
        let mut s = ScenarioBuilder::new("s", params(2), line_network()).build().unwrap();
        s.run(&mut NoopFlow, &mut NoopObserver).unwrap();
        let err = s.run(&mut NoopFlow, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn rerun_after_failure_rejected() {
        let mut s = ScenarioBuilder::new("s", params(10), line_network())
            .groups(vec![Group::new("R1", 0, 10.0)])
            .build()
            .unwrap();

        // Everyone arrives at step 5, then the flow fails at step 6.
        struct ArriveThenFail;
        impl FlowModel for ArriveThenFail {
            fn advance(&mut self, step: i32, n: &PedNetwork, f: &PotentialField, groups: &mut [Group]) -> SimResult<()> {
                FixedDelayFlow { delay: 5 }.advance(step, n, f, groups)?;
                FailingFlow { fail_at: Some(6) }.advance(step, n, f, groups)
            }
        }
        assert!(s.run(&mut ArriveThenFail, &mut NoopObserver).is_err());
        assert!(s.is_started());
        assert!(!s.is_completed());
        assert_eq!(s.groups[0].survivors(), 10.0);

        let err = s.run(&mut FixedDelayFlow { delay: 5 }, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
        assert_eq!(s.groups[0].survivors(), 10.0);
    }
}

// ── Batch runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod batch_tests {
    use super::*;
    use crate::run_batch;

    #[test]
    fn failure_is_isolated() {
        init_logging();
        let mut scenarios: Vec<_> = ["ok-1", "broken", "ok-2"]
            .into_iter()
            .map(|name| {
                ScenarioBuilder::new(name, params(5), line_network())
                    .groups(vec![Group::new("R1", 0, 1.0)])
                    .build()
                    .unwrap()
            })
            .collect();

        let results = run_batch(&mut scenarios, |s| FailingFlow {
            fail_at: (s.name == "broken").then_some(1),
        });

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().name, "ok-1");
        assert!(matches!(results[1], Err(SimError::Flow { step: 1, .. })));
        assert_eq!(results[2].as_ref().unwrap().name, "ok-2");
        assert!(scenarios[0].is_completed());
        assert!(scenarios[1].is_started());
        assert!(!scenarios[1].is_completed());
        assert!(scenarios[2].is_completed());
    }

    #[test]
    fn batch_matches_sequential_run() {
        let build = || {
            ScenarioBuilder::new("s", params(20), line_network())
                .groups(vec![Group::new("R1", 2, 7.0)])
                .build()
                .unwrap()
        };
        let mut single = build();
        let expected = single.run(&mut FixedDelayFlow { delay: 6 }, &mut NoopObserver).unwrap();

        let mut batch = vec![build(), build()];
        let results = run_batch(&mut batch, |_| FixedDelayFlow { delay: 6 });
        for r in results {
            assert_eq!(r.unwrap(), expected);
        }
        assert_eq!(batch[1].groups[0].mean_tt_simulated(), single.groups[0].mean_tt_simulated());
    }
}
