//! Independent runs of many scenarios.

use ped_network::BlockageCost;

use crate::{FlowModel, NoopObserver, Scenario, ScenarioOutcome, SimResult};

/// Run every scenario with a fresh flow model from `make_flow`.
///
/// Results are returned in input order.  A failing scenario is logged and
/// leaves its siblings untouched.  With the `parallel` feature scenarios run
/// on Rayon's thread pool.
pub fn run_batch<C, F, M>(scenarios: &mut [Scenario<C>], make_flow: M) -> Vec<SimResult<ScenarioOutcome>>
where
    C: BlockageCost + Send,
    F: FlowModel,
    M: Fn(&Scenario<C>) -> F + Sync,
{
    #[cfg(not(feature = "parallel"))]
    {
        scenarios.iter_mut().map(|s| run_one(s, &make_flow)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        scenarios.par_iter_mut().map(|s| run_one(s, &make_flow)).collect()
    }
}

fn run_one<C, F, M>(scenario: &mut Scenario<C>, make_flow: &M) -> SimResult<ScenarioOutcome>
where
    C: BlockageCost,
    F: FlowModel,
    M: Fn(&Scenario<C>) -> F,
{
    let mut flow = make_flow(scenario);
    let result = scenario.run(&mut flow, &mut NoopObserver);
    if let Err(e) = &result {
        log::error!("scenario {} failed: {e}", scenario.name);
    }
    result
}
