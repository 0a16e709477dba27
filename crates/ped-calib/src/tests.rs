//! Unit tests for ped-calib.

#[cfg(test)]
mod helpers {
    use ped_demand::Group;

    use crate::Pedestrian;

    pub fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    pub fn ped(route: &str, dep_time: f64, tt_obs: f64) -> Pedestrian {
        Pedestrian::new(route, dep_time, tt_obs, ["alt1".into(), "alt2".into()])
    }

    /// R1 departing at interval 5 with 10 people: 6 take 10 intervals (20 s),
    /// 4 take 12 intervals (24 s).  Mean 21.6 s.
    pub fn r1_group() -> Group {
        let mut g = Group::new("R1", 5, 10.0);
        g.add_travel_time(5 + 2 + 10, 6.0);
        g.add_travel_time(5 + 2 + 12, 4.0);
        g.compute_travel_time_stats(2.0);
        g
    }

    /// R2 at interval 5 with nobody arriving.
    pub fn r2_degenerate() -> Group {
        let mut g = Group::new("R2", 5, 8.0);
        g.compute_travel_time_stats(2.0);
        g
    }
}

// ── Group matching ────────────────────────────────────────────────────────────

#[cfg(test)]
mod matching {
    use ped_core::{GroupId, SimParams};

    use super::helpers::{ped, r1_group, r2_degenerate};
    use crate::{CalibError, GroupIndex};

    #[test]
    fn unique_match_by_route_and_interval() {
        let groups = vec![r2_degenerate(), r1_group()];
        let index = GroupIndex::build(&groups);
        let params = SimParams::default();

        let p = ped("R1", 10.5, 24.0);
        assert_eq!(p.dep_interval(&params), 5);
        let g = p.corresponding_group(&groups, &index, &params).unwrap();
        assert_eq!(g.route_name(), "R1");
        assert_eq!(index.find("R1", 5, 10.5).unwrap(), GroupId(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn interval_boundary_is_floor() {
        let groups = vec![r1_group()];
        let index = GroupIndex::build(&groups);
        let params = SimParams::default();

        // 9.99 s is interval 4, 11.99 s is still interval 5.
        assert!(ped("R1", 11.99, 20.0).corresponding_group(&groups, &index, &params).is_ok());
        let err = ped("R1", 9.99, 20.0)
            .corresponding_group(&groups, &index, &params)
            .unwrap_err();
        assert!(matches!(err, CalibError::NoCorrespondingGroup { .. }));
    }

    #[test]
    fn unknown_route_is_an_error() {
        let groups = vec![r1_group()];
        let index = GroupIndex::build(&groups);
        let err = ped("R3", 10.0, 20.0)
            .corresponding_group(&groups, &index, &SimParams::default())
            .unwrap_err();
        match err {
            CalibError::NoCorrespondingGroup { route, dep_time } => {
                assert_eq!(route, "R3");
                assert_eq!(dep_time, 10.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn duplicate_groups_are_ambiguous() {
        let groups = vec![r1_group(), r1_group()];
        let index = GroupIndex::build(&groups);
        let err = ped("R1", 10.0, 20.0)
            .corresponding_group(&groups, &index, &SimParams::default())
            .unwrap_err();
        assert!(matches!(err, CalibError::AmbiguousGroup { count: 2, interval: 5, .. }));
    }

    #[test]
    fn stale_index_reports_missing_group() {
        let groups = vec![r2_degenerate(), r1_group()];
        let index = GroupIndex::build(&groups);
        let err = ped("R1", 10.0, 20.0)
            .corresponding_group(&groups[..1], &index, &SimParams::default())
            .unwrap_err();
        assert!(matches!(err, CalibError::GroupNotFound(GroupId(1))));
    }
}

// ── Per-pedestrian error terms ────────────────────────────────────────────────

#[cfg(test)]
mod error_terms {
    use ped_core::SimParams;
    use ped_demand::NEGLIGIBLE_PROBABILITY;

    use super::helpers::{ped, r1_group, r2_degenerate};
    use crate::GroupIndex;

    #[test]
    fn mean_std_and_squared_error() {
        let groups = vec![r1_group()];
        let index = GroupIndex::build(&groups);
        let params = SimParams::default();
        let p = ped("R1", 10.5, 24.0);

        assert!((p.mean_travel_time_sim(&groups, &index, &params).unwrap() - 21.6).abs() < 1e-12);
        // Var = 0.6 * 1.6² + 0.4 * 2.4² = 3.84
        let sd = p.std_dev_travel_time_sim(&groups, &index, &params).unwrap();
        assert!((sd - 3.84_f64.sqrt()).abs() < 1e-9);
        let sq = p.squared_error(&groups, &index, &params).unwrap();
        assert!((sq - 5.76).abs() < 1e-9);
    }

    #[test]
    fn observed_probability_uses_histogram_share() {
        let groups = vec![r1_group()];
        let index = GroupIndex::build(&groups);
        let params = SimParams::default();

        let hit = ped("R1", 10.5, 25.0); // interval 12
        assert_eq!(hit.travel_time_obs_probability(&groups, &index, &params).unwrap(), 0.4);
        let miss = ped("R1", 10.5, 30.0);
        assert_eq!(
            miss.travel_time_obs_probability(&groups, &index, &params).unwrap(),
            NEGLIGIBLE_PROBABILITY
        );
    }

    #[test]
    fn degenerate_group_gives_nan_error() {
        let groups = vec![r2_degenerate()];
        let index = GroupIndex::build(&groups);
        let sq = ped("R2", 10.0, 30.0)
            .squared_error(&groups, &index, &SimParams::default())
            .unwrap();
        assert!(sq.is_nan());
    }

    #[test]
    fn disaggregate_record_format() {
        let groups = vec![r1_group()];
        let index = GroupIndex::build(&groups);
        let rec = ped("R1", 10.5, 24.0)
            .disaggregate_record(&groups, &index, &SimParams::default())
            .unwrap();
        assert_eq!(rec, "R1, 10.5, 24.0, 21.6");
    }

    #[test]
    fn alternates_are_kept() {
        let p = ped("R1", 0.0, 1.0);
        assert_eq!(p.route_alternates(), &["alt1".to_owned(), "alt2".to_owned()]);
    }
}

// ── Calibration summary ───────────────────────────────────────────────────────

#[cfg(test)]
mod summary {
    use ped_core::SimParams;
    use ped_demand::Group;

    use super::helpers::{init_logging, ped, r1_group, r2_degenerate};
    use crate::{CalibError, aggregate_observed, calibrate};

    #[test]
    fn degenerate_groups_are_excluded() {
        init_logging();
        let groups = vec![r1_group(), r2_degenerate()];
        let peds = vec![
            ped("R1", 10.5, 24.0),  // err 2.4, p 0.4
            ped("R1", 11.9, 20.0),  // err -1.6, p 0.6
            ped("R2", 10.0, 30.0),
        ];
        let s = calibrate(&peds, &groups, &SimParams::default()).unwrap();

        assert_eq!(s.pedestrians, 3);
        assert_eq!(s.used, 2);
        assert_eq!(s.excluded_degenerate, 1);
        assert!((s.sum_squared_error - 8.32).abs() < 1e-9);
        assert!((s.log_likelihood - (0.4_f64.ln() + 0.6_f64.ln())).abs() < 1e-12);
        assert!((s.rmse() - 4.16_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn groups_without_stats_count_as_degenerate() {
        let mut g = Group::new("R1", 5, 10.0);
        g.add_travel_time(17, 10.0);
        let s = calibrate(&[ped("R1", 10.0, 20.0)], &[g], &SimParams::default()).unwrap();
        assert_eq!(s.used, 0);
        assert_eq!(s.excluded_degenerate, 1);
        assert!(s.rmse().is_nan());
    }

    #[test]
    fn missing_group_aborts() {
        let groups = vec![r1_group()];
        let peds = vec![ped("R1", 10.0, 20.0), ped("R9", 10.0, 20.0)];
        let err = calibrate(&peds, &groups, &SimParams::default()).unwrap_err();
        assert!(matches!(err, CalibError::NoCorrespondingGroup { .. }));
    }

    #[test]
    fn observed_aggregates_by_route_and_period() {
        let params = SimParams::default(); // 60 s periods
        let peds = vec![
            ped("R1", 10.5, 24.0),
            ped("R1", 59.9, 20.0),
            ped("R1", 70.0, 30.0),
            ped("R2", 5.0, 40.0),
        ];
        let agg = aggregate_observed(&peds, &params);

        assert_eq!(agg.len(), 3);
        let r1_0 = agg[&("R1".to_owned(), 0)];
        assert_eq!(r1_0.count, 2);
        assert_eq!(r1_0.mean_tt, 22.0);
        assert_eq!(agg[&("R1".to_owned(), 1)].mean_tt, 30.0);
        assert_eq!(agg[&("R2".to_owned(), 0)].count, 1);
    }
}
