//! Fluent builder for constructing a [`Scenario`].

use ped_calib::Pedestrian;
use ped_core::{BlockageRegistry, SimParams};
use ped_demand::{Group, split_demand};
use ped_network::{BlockageCost, IdentityCost, NetworkError, PedNetwork, PotentialEngine, PotentialField};

use crate::{Scenario, SimResult};

/// Fluent builder for [`Scenario<C>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                        |
/// |------------------------|--------------------------------|
/// | `.blockages(r)`        | empty registry                 |
/// | `.groups(v)`           | no demand                      |
/// | `.pedestrians(v)`      | no observations, no calibration |
/// | `.route_choice(true)`  | off: groups keep their route   |
/// | `.blockage_cost(c)`    | [`IdentityCost`]               |
///
/// # Example
///
/// ```rust,ignore
/// let mut scenario = ScenarioBuilder::new("morning", params, network)
///     .blockages(blockages)
///     .groups(demand)
///     .pedestrians(observed)
///     .route_choice(true)
///     .build()?;
/// let outcome = scenario.run(&mut flow, &mut NoopObserver)?;
/// ```
pub struct ScenarioBuilder<C: BlockageCost = IdentityCost> {
    name:         String,
    params:       SimParams,
    network:      PedNetwork,
    blockages:    BlockageRegistry,
    groups:       Vec<Group>,
    pedestrians:  Vec<Pedestrian>,
    route_choice: bool,
    cost:         C,
}

impl ScenarioBuilder<IdentityCost> {
    pub fn new(name: impl Into<String>, params: SimParams, network: PedNetwork) -> Self {
        Self {
            name: name.into(),
            params,
            network,
            blockages:    BlockageRegistry::default(),
            groups:       Vec::new(),
            pedestrians:  Vec::new(),
            route_choice: false,
            cost:         IdentityCost,
        }
    }
}

impl<C: BlockageCost> ScenarioBuilder<C> {
    pub fn blockages(mut self, blockages: BlockageRegistry) -> Self {
        self.blockages = blockages;
        self
    }

    pub fn groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn pedestrians(mut self, pedestrians: Vec<Pedestrian>) -> Self {
        self.pedestrians = pedestrians;
        self
    }

    /// Split every multi-option group over its route options at build time.
    pub fn route_choice(mut self, enabled: bool) -> Self {
        self.route_choice = enabled;
        self
    }

    /// Replace the blockage cost modifier used by the potential engine.
    pub fn blockage_cost<C2: BlockageCost>(self, cost: C2) -> ScenarioBuilder<C2> {
        ScenarioBuilder {
            name:         self.name,
            params:       self.params,
            network:      self.network,
            blockages:    self.blockages,
            groups:       self.groups,
            pedestrians:  self.pedestrians,
            route_choice: self.route_choice,
            cost,
        }
    }

    /// Validate inputs, apply route choice and return a ready-to-run
    /// [`Scenario`].
    pub fn build(self) -> SimResult<Scenario<C>> {
        self.params.validate()?;

        let groups = if self.route_choice {
            split_demand(self.groups, &self.network, &self.params.route_choice)?
        } else {
            self.groups
        };

        if let Some(g) = groups.iter().find(|g| self.network.route_id(g.route_name()).is_none()) {
            return Err(NetworkError::UnknownRoute(g.route_name().to_owned()).into());
        }

        let field = PotentialField::for_network(&self.network);
        let engine = PotentialEngine::with_cost(self.cost, self.params.blockage_window);

        Ok(Scenario {
            name:        self.name,
            params:      self.params,
            network:     self.network,
            blockages:   self.blockages,
            groups,
            pedestrians: self.pedestrians,
            field,
            engine,
            started:     false,
            completed:   false,
        })
    }
}
