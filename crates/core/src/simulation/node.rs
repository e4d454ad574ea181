//! Perimeter nodes
//!
//! A [`FireNode`] is a burning cell on the fire's edge. Its spread rates are
//! fixed when it is created. Each step it pushes a front out along every
//! direction still spreading; once a front has crossed a whole cell step, the
//! direction is discharged and the node asks for a child in the cell reached.
//!
//! A node is contained once it has no direction left spreading or a control
//! line has stopped one of its fronts. A node with nothing left to spread
//! stays on the perimeter for the step in which it last discharged, then
//! leaves.

use crate::core_types::position::{WorldPoint, WorldPoint3};
use crate::core_types::spatial::{Direction, GridCoordinate};
use crate::core_types::units::{Meters, MetersPerMinute, Minutes};
use crate::grid::environment::TerrainSample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a node still has fronts moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Spreading,
    Exhausted,
}

/// What happened to a discharged or dead direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeOutcome {
    /// A child was ignited
    Spread,
    /// The target cell had already burned or been claimed
    Merged,
    /// A control line lies across the path
    Blocked,
    /// The target fuel is configured non-burnable
    Barrier,
    /// The target is outside the modelled world or its data failed
    Boundary,
    /// Nothing to burn this way: zero rate here or fuel that cannot carry fire
    Extinct,
}

/// A front that crossed into another cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// Index of the requesting node in the perimeter
    pub parent: usize,
    pub direction: Direction,
    pub target: GridCoordinate,
    /// Distance beyond the last whole step, handed to the child
    pub residual: Meters,
}

/// A burning cell on the perimeter
#[derive(Debug, Clone)]
pub struct FireNode {
    center: GridCoordinate,
    position: WorldPoint,
    terrain: TerrainSample,
    fuel_code: String,
    /// Directions not yet discharged
    spread_rates: BTreeMap<Direction, MetersPerMinute>,
    distance_travelled: BTreeMap<Direction, Meters>,
    outcomes: BTreeMap<Direction, EdgeOutcome>,
    contained: bool,
    /// Whether the last call to `advance` discharged any direction
    discharged: bool,
}

impl FireNode {
    /// Node with the given per-direction rates
    ///
    /// Directions with no positive rate are recorded as extinct straight
    /// away. `seed` starts one direction's front part-way across the cell.
    pub fn new(
        center: GridCoordinate,
        position: WorldPoint,
        terrain: TerrainSample,
        fuel_code: String,
        rates: BTreeMap<Direction, MetersPerMinute>,
        seed: Option<(Direction, Meters)>,
    ) -> Self {
        let mut spread_rates = BTreeMap::new();
        let mut distance_travelled = BTreeMap::new();
        let mut outcomes = BTreeMap::new();

        for (direction, rate) in rates {
            if *rate > 0.0 && rate.is_finite() {
                spread_rates.insert(direction, rate);
                distance_travelled.insert(direction, Meters::new(0.0));
            } else {
                outcomes.insert(direction, EdgeOutcome::Extinct);
            }
        }

        if let Some((direction, residual)) = seed {
            if let Some(distance) = distance_travelled.get_mut(&direction) {
                *distance = residual;
            }
        }

        let mut node = Self {
            center,
            position,
            terrain,
            fuel_code,
            spread_rates,
            distance_travelled,
            outcomes,
            contained: false,
            discharged: false,
        };
        node.refresh_containment();
        node
    }

    /// Push every live front forward by `dt` and collect the cells reached
    ///
    /// A front that has covered at least one step leaps `floor(d / step)`
    /// cells; its direction is discharged and the remainder is carried in
    /// the request.
    pub fn advance(&mut self, index: usize, dt: Minutes, cell_size: Meters) -> Vec<SpawnRequest> {
        let center = self.center;
        let distance_travelled = &mut self.distance_travelled;
        let mut requests = Vec::new();

        self.spread_rates.retain(|&direction, rate| {
            let Some(distance) = distance_travelled.get_mut(&direction) else {
                return false;
            };
            *distance += rate.distance_over(dt);

            let step = *direction.step_length(cell_size);
            if **distance < step {
                return true;
            }

            let leaps = (**distance / step).floor();
            requests.push(SpawnRequest {
                parent: index,
                direction,
                target: center.step(direction, leaps as i64),
                residual: Meters::new((**distance - leaps * step).max(0.0)),
            });
            false
        });

        self.discharged = !requests.is_empty();
        requests
    }

    /// Record how a discharged direction ended
    pub fn record_outcome(&mut self, direction: Direction, outcome: EdgeOutcome) {
        self.outcomes.insert(direction, outcome);
        self.refresh_containment();
    }

    /// Containment is sticky
    fn refresh_containment(&mut self) {
        self.contained = self.contained
            || self.spread_rates.is_empty()
            || self.outcomes.values().any(|&outcome| outcome == EdgeOutcome::Blocked);
    }

    pub fn state(&self) -> NodeState {
        if self.spread_rates.is_empty() {
            NodeState::Exhausted
        } else {
            NodeState::Spreading
        }
    }

    /// Whether this node belongs on the next perimeter
    ///
    /// Exhausted nodes are kept only through the step that discharged them.
    pub fn is_retained(&self) -> bool {
        self.discharged || self.state() == NodeState::Spreading
    }

    pub fn center(&self) -> GridCoordinate {
        self.center
    }

    /// World position of the cell centre
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// Cell centre with elevation
    pub fn position_3d(&self) -> WorldPoint3 {
        WorldPoint3::new(self.position.x, self.position.y, self.terrain.elevation)
    }

    pub fn terrain(&self) -> &TerrainSample {
        &self.terrain
    }

    pub fn fuel_code(&self) -> &str {
        &self.fuel_code
    }

    pub fn is_contained(&self) -> bool {
        self.contained
    }

    /// Rates of the directions still spreading
    pub fn spread_rates(&self) -> &BTreeMap<Direction, MetersPerMinute> {
        &self.spread_rates
    }

    pub fn distance_travelled(&self, direction: Direction) -> Option<Meters> {
        self.distance_travelled.get(&direction).copied()
    }

    pub fn outcome(&self, direction: Direction) -> Option<EdgeOutcome> {
        self.outcomes.get(&direction).copied()
    }
}
