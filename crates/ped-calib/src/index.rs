//! Lookup from `(route, departure interval)` to simulated group.

use rustc_hash::FxHashMap;

use ped_core::GroupId;
use ped_demand::Group;

use crate::{CalibError, CalibResult};

/// Index over a slice of groups, keyed by route name and departure interval.
///
/// Built once after simulation; groups are addressed by their position in the
/// slice the index was built from.
#[derive(Debug, Default)]
pub struct GroupIndex {
    by_key: FxHashMap<(String, i32), Vec<GroupId>>,
}

impl GroupIndex {
    pub fn build(groups: &[Group]) -> Self {
        let mut by_key: FxHashMap<(String, i32), Vec<GroupId>> = FxHashMap::default();
        for (i, g) in groups.iter().enumerate() {
            by_key
                .entry((g.route_name().to_owned(), g.dep_time()))
                .or_default()
                .push(GroupId(i as u32));
        }
        Self { by_key }
    }

    /// The unique group on `route` departing at `interval`.
    ///
    /// `dep_time` is only used for the error message.
    pub fn find(&self, route: &str, interval: i32, dep_time: f64) -> CalibResult<GroupId> {
        match self.by_key.get(&(route.to_owned(), interval)).map(Vec::as_slice) {
            None | Some([]) => Err(CalibError::NoCorrespondingGroup {
                route: route.to_owned(),
                dep_time,
            }),
            Some([id]) => Ok(*id),
            Some(ids) => Err(CalibError::AmbiguousGroup {
                route: route.to_owned(),
                interval,
                count: ids.len(),
            }),
        }
    }

    /// Number of distinct `(route, interval)` keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
