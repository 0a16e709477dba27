//! Demand groups and their simulated travel-time distribution.
//!
//! # Histogram
//!
//! `travel_times` maps a travel time in whole intervals to the number of
//! people that needed that long.  Travel time is measured from the departure
//! interval to the arrival interval minus [`GATE_CELL_INTERVALS`], the time
//! spent in the entry and exit gate cells.
//!
//! Mass in the histogram never exceeds `num_people`; people still walking at
//! the end of the horizon are simply missing from it.  `rel_loss` is the
//! fraction that *did* arrive.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Intervals spent in the two gate cells, excluded from travel times.
pub const GATE_CELL_INTERVALS: i32 = 2;

/// Probability reported for travel times absent from the histogram.  Keeps
/// log-likelihoods finite.
pub const NEGLIGIBLE_PROBABILITY: f64 = f64::MIN_POSITIVE;

/// Relative slack allowed on `Σ travel_times <= num_people` for rounding in
/// the flow model's fractional arrivals.
pub const MASS_TOLERANCE: f64 = 1e-9;

// ── TravelTimeStats ───────────────────────────────────────────────────────────

/// Summary of a group's travel-time histogram, in seconds.
///
/// A group with no arrivals has `mean` and `std_dev` set to NaN; check
/// [`is_degenerate`](Self::is_degenerate) before using them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TravelTimeStats {
    pub mean:     f64,
    pub std_dev:  f64,
    /// Arrived / departed, in `[0, 1]` up to [`MASS_TOLERANCE`].
    pub rel_loss: f64,
}

impl TravelTimeStats {
    pub fn is_degenerate(&self) -> bool {
        self.mean.is_nan()
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// A homogeneous slice of demand: one route, one departure interval.
#[derive(Clone, Debug)]
pub struct Group {
    route_name:    String,
    dep_time:      i32,
    num_people:    f64,
    /// Shared by every group produced from the same route-choice split.
    route_options: Arc<[String]>,
    travel_times:  BTreeMap<i32, f64>,
    stats:         Option<TravelTimeStats>,
}

impl Group {
    /// A group whose only route option is its own route.
    pub fn new(route_name: impl Into<String>, dep_time: i32, num_people: f64) -> Self {
        let route_name = route_name.into();
        let options: Arc<[String]> = Arc::from(vec![route_name.clone()]);
        Self::with_options(route_name, dep_time, num_people, options)
    }

    pub fn with_options(
        route_name:    impl Into<String>,
        dep_time:      i32,
        num_people:    f64,
        route_options: Arc<[String]>,
    ) -> Self {
        Self {
            route_name: route_name.into(),
            dep_time,
            num_people,
            route_options,
            travel_times: BTreeMap::new(),
            stats: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// Departure interval.
    pub fn dep_time(&self) -> i32 {
        self.dep_time
    }

    pub fn num_people(&self) -> f64 {
        self.num_people
    }

    pub fn set_num_people(&mut self, num_people: f64) {
        self.num_people = num_people;
    }

    /// Add one person to the group (used while counting demand records).
    pub fn increment(&mut self) {
        self.num_people += 1.0;
    }

    pub fn route_options(&self) -> &Arc<[String]> {
        &self.route_options
    }

    pub fn travel_times(&self) -> &BTreeMap<i32, f64> {
        &self.travel_times
    }

    /// People that reached the destination so far.
    pub fn survivors(&self) -> f64 {
        self.travel_times.values().sum()
    }

    /// Statistics from the last [`compute_travel_time_stats`](Self::compute_travel_time_stats).
    pub fn stats(&self) -> Option<&TravelTimeStats> {
        self.stats.as_ref()
    }

    /// Simulated mean travel time (s); NaN before stats are computed or when
    /// nobody arrived.
    pub fn mean_tt_simulated(&self) -> f64 {
        self.stats.map_or(f64::NAN, |s| s.mean)
    }

    pub fn std_dev_tt_simulated(&self) -> f64 {
        self.stats.map_or(f64::NAN, |s| s.std_dev)
    }

    pub fn rel_loss(&self) -> f64 {
        self.stats.map_or(0.0, |s| s.rel_loss)
    }

    // ── Simulation updates ────────────────────────────────────────────────

    /// Record that `fraction` people arrived at interval `arrival_time`.
    ///
    /// Invalid input (negative corrected travel time, non-positive or
    /// non-finite fraction, or a fraction that would push the arrived mass
    /// above `num_people`) is logged and ignored.  Returns whether the
    /// fragment was recorded.
    pub fn add_travel_time(&mut self, arrival_time: i32, fraction: f64) -> bool {
        let travel_time = arrival_time - self.dep_time - GATE_CELL_INTERVALS;

        if travel_time < 0 || !(fraction.is_finite() && fraction > 0.0) {
            log::warn!(
                "ignoring arrival on route {} (dep {}): travel time {} intervals, fraction {}",
                self.route_name, self.dep_time, travel_time, fraction
            );
            return false;
        }
        let survivors = self.survivors();
        if survivors + fraction > self.num_people * (1.0 + MASS_TOLERANCE) {
            log::warn!(
                "ignoring arrival on route {} (dep {}): {} arrived + {} exceeds {} people",
                self.route_name, self.dep_time, survivors, fraction, self.num_people
            );
            return false;
        }
        *self.travel_times.entry(travel_time).or_insert(0.0) += fraction;
        true
    }

    /// Condense the histogram into mean, standard deviation (seconds) and
    /// relative loss.  `delta_t` is the interval length in seconds.
    pub fn compute_travel_time_stats(&mut self, delta_t: f64) -> TravelTimeStats {
        let mut survived = 0.0;
        let mut cum_tt = 0.0;
        let mut cum_tt_sq = 0.0;

        for (&interval, &mass) in &self.travel_times {
            let tt = interval as f64 * delta_t;
            cum_tt += mass * tt;
            cum_tt_sq += mass * tt * tt;
            survived += mass;
        }

        let (mean, std_dev) = if survived > 0.0 {
            let mean = cum_tt / survived;
            // Rounding can push the variance slightly below zero.
            let variance = (cum_tt_sq / survived - mean * mean).max(0.0);
            (mean, variance.sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };

        let rel_loss = if self.num_people > 0.0 {
            survived / self.num_people
        } else {
            0.0
        };

        let stats = TravelTimeStats { mean, std_dev, rel_loss };
        self.stats = Some(stats);
        stats
    }

    /// Share of the group whose travel time falls in the same interval as
    /// `observed` (seconds).
    pub fn travel_time_probability(&self, observed: f64, delta_t: f64) -> f64 {
        if !(observed.is_finite() && delta_t.is_finite() && delta_t > 0.0) {
            return NEGLIGIBLE_PROBABILITY;
        }
        let interval = (observed / delta_t).floor() as i32;
        match self.travel_times.get(&interval) {
            Some(&mass) if self.num_people > 0.0 => mass / self.num_people,
            _ => NEGLIGIBLE_PROBABILITY,
        }
    }

    // ── Records ───────────────────────────────────────────────────────────

    /// One line of a demand file: `route, depTime, numPeople`.
    pub fn demand_record(&self) -> String {
        format!("{}, {}, {:?}", self.route_name, self.dep_time, self.num_people)
    }

    /// One line of the aggregated travel-time table:
    /// `route, depTime, numPeople, meanTTSimulated`.
    pub fn aggregated_record(&self) -> String {
        format!(
            "{}, {}, {:?}, {:?}",
            self.route_name,
            self.dep_time,
            self.num_people,
            self.mean_tt_simulated()
        )
    }
}
