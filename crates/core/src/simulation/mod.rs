//! Fire perimeter growth over a cell grid
//!
//! `FireSimulation` keeps the burning edge of one fire as a flat list of
//! [`FireNode`]s. Each call to [`FireSimulation::advance`] runs one step in
//! three phases:
//!
//! 1. Every node pushes its fronts forward and reports the cells it reached
//!    (rayon fan-out, no shared state touched).
//! 2. Spawn requests are resolved one at a time in node order, then direction
//!    order: cells already claimed merge, paths across a control line are
//!    blocked, everything else claims its cell in the [`VisitedSet`].
//! 3. Children for the claimed cells are built from environment lookups
//!    (rayon again) and appended in request order; exhausted nodes that
//!    discharged nothing this step leave the perimeter.
//!
//! Wind is read once at ignition and frozen for the life of the simulation.
//!
//! The contained fraction of a growing fire falls whenever a step adds fresh
//! children, so the simulation also keeps its peak, which never decreases.

pub mod config;
pub mod control_lines;
pub mod node;
pub mod sink;
pub mod visited;

pub use config::SimulationConfig;
pub use control_lines::{ControlLine, ControlLineRegistry};
pub use node::{EdgeOutcome, FireNode, NodeState, SpawnRequest};
pub use sink::{PerimeterPoint, PerimeterSink, PerimeterSnapshot, TracingSink};
pub use visited::VisitedSet;

use crate::core_types::fuel::FuelModel;
use crate::core_types::position::{WorldPoint, WorldPoint3};
use crate::core_types::spatial::{Direction, GridCoordinate, GridGeometry};
use crate::core_types::units::{Fraction, Minutes};
use crate::core_types::weather::WeatherSnapshot;
use crate::error::{EnvironmentError, SimulationError};
use crate::grid::environment::{EnvironmentQuery, TerrainSample};
use crate::physics::{spread_rates, SpreadInputs, SpreadRates};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

static NEXT_SIMULATION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique simulation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimulationId(u64);

impl SimulationId {
    /// Allocate an id no other simulation in this process has
    pub fn fresh() -> Self {
        SimulationId(NEXT_SIMULATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sim-{}", self.0)
    }
}

/// Statistics for the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub elapsed: Minutes,
    pub perimeter_nodes: usize,
    pub contained_nodes: usize,
    /// Highest contained fraction seen so far
    pub peak_contained: f64,
    /// Cells claimed so far, barrier and out-of-world targets included
    pub cells_burned: usize,
    pub control_lines: usize,
    pub active: bool,
}

/// Why a claimed cell did not produce a child
#[derive(Debug)]
enum ChildRejection {
    NonBurnable,
    CannotSpread,
    Environment(EnvironmentError),
}

impl From<EnvironmentError> for ChildRejection {
    fn from(err: EnvironmentError) -> Self {
        ChildRejection::Environment(err)
    }
}

/// Everything needed to build a node, shareable across rayon workers
struct NodeFactory<'a> {
    environment: &'a dyn EnvironmentQuery,
    geometry: GridGeometry,
    weather: WeatherSnapshot,
    config: &'a SimulationConfig,
}

impl NodeFactory<'_> {
    fn build(&self, request: &SpawnRequest) -> Result<FireNode, ChildRejection> {
        let position = self.geometry.cell_center(request.target);

        let fuel = self.environment.fuel_model(position)?;
        if self.config.is_non_burnable(&fuel.code) {
            return Err(ChildRejection::NonBurnable);
        }
        let moisture = self.environment.fuel_moisture(position)?;
        let terrain = self.environment.terrain(position)?;

        let rates = cell_spread_rates(&fuel, moisture, &self.weather, &terrain, self.config);
        if !rates.can_spread() {
            return Err(ChildRejection::CannotSpread);
        }

        Ok(FireNode::new(
            request.target,
            position,
            terrain,
            fuel.code,
            rates.metric(),
            Some((request.direction, request.residual)),
        ))
    }
}

fn cell_spread_rates(
    fuel: &FuelModel,
    moisture: Fraction,
    weather: &WeatherSnapshot,
    terrain: &TerrainSample,
    config: &SimulationConfig,
) -> SpreadRates {
    let inputs = SpreadInputs {
        fuel,
        moisture,
        weather,
        slope: terrain.slope,
    };
    spread_rates(&inputs, config.spread_pattern.directions())
}

/// One growing fire
pub struct FireSimulation {
    id: SimulationId,
    config: SimulationConfig,
    environment: Arc<dyn EnvironmentQuery>,
    geometry: GridGeometry,
    weather: WeatherSnapshot,

    perimeter: Vec<FireNode>,
    visited: VisitedSet,
    control_lines: Arc<ControlLineRegistry>,

    elapsed: Minutes,
    active: bool,
    peak_contained: f64,
    sink: Option<Box<dyn PerimeterSink>>,
}

impl FireSimulation {
    /// Start a fire at `ignition` with its own control-line registry
    ///
    /// # Errors
    /// [`SimulationError::InvalidConfig`] for a bad configuration, and
    /// [`SimulationError::Ignition`] when the environment cannot describe the
    /// ignition point.
    pub fn ignite(
        environment: Arc<dyn EnvironmentQuery>,
        ignition: WorldPoint,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        Self::ignite_with_registry(
            environment,
            ignition,
            config,
            Arc::new(ControlLineRegistry::new()),
        )
    }

    /// Start a fire whose control lines live in a shared registry
    ///
    /// The ignition cell is claimed immediately. If its fuel is non-burnable
    /// or cannot spread in any direction the simulation is returned inactive
    /// with an empty perimeter.
    ///
    /// # Errors
    /// Same as [`FireSimulation::ignite`].
    pub fn ignite_with_registry(
        environment: Arc<dyn EnvironmentQuery>,
        ignition: WorldPoint,
        config: SimulationConfig,
        control_lines: Arc<ControlLineRegistry>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let weather = environment.wind(ignition)?;
        let fuel = environment.fuel_model(ignition)?;
        let moisture = environment.fuel_moisture(ignition)?;
        let terrain = environment.terrain(ignition)?;

        let mut visited = VisitedSet::new();
        visited.insert(GridCoordinate::ORIGIN);

        let mut simulation = FireSimulation {
            id: SimulationId::fresh(),
            geometry: GridGeometry::new(ignition, config.cell_size),
            config,
            environment,
            weather,
            perimeter: Vec::new(),
            visited,
            control_lines,
            elapsed: Minutes::ZERO,
            active: false,
            peak_contained: 0.0,
            sink: None,
        };

        if simulation.config.is_non_burnable(&fuel.code) {
            info!(
                "{} ignition at ({:.1}, {:.1}) is on non-burnable fuel {}, fire does not start",
                simulation.id, ignition.x, ignition.y, fuel.code
            );
            return Ok(simulation);
        }

        let rates = cell_spread_rates(&fuel, moisture, &weather, &terrain, &simulation.config);
        if !rates.can_spread() {
            info!(
                "{} fuel {} at ({:.1}, {:.1}) cannot carry fire at {:.1}% moisture",
                simulation.id,
                fuel.code,
                ignition.x,
                ignition.y,
                moisture.as_percent()
            );
            return Ok(simulation);
        }

        info!(
            "{} ignited at ({:.1}, {:.1}) in {} ({}), head fire {} toward {}, wind {} toward {}",
            simulation.id,
            ignition.x,
            ignition.y,
            fuel.code,
            fuel.name,
            rates.maximum.rate.to_meters_per_minute(),
            rates.maximum.bearing,
            weather.wind_speed,
            weather.wind_bearing
        );

        simulation.perimeter.push(FireNode::new(
            GridCoordinate::ORIGIN,
            ignition,
            terrain,
            fuel.code,
            rates.metric(),
            None,
        ));
        simulation.active = true;
        Ok(simulation)
    }

    /// Advance the fire by `dt` of simulated time
    ///
    /// Does nothing once the simulation is inactive, or for a step that is
    /// negative or not finite.
    pub fn advance(&mut self, dt: Minutes) {
        if !self.active {
            return;
        }
        if !dt.is_finite() || *dt < 0.0 {
            warn!("{} ignored a step of {}", self.id, dt);
            return;
        }
        self.elapsed += dt;

        // Phase 1: fronts move, no shared state
        let cell_size = self.config.cell_size;
        let requests: Vec<SpawnRequest> = if self.config.parallel {
            self.perimeter
                .par_iter_mut()
                .enumerate()
                .flat_map_iter(|(index, node)| node.advance(index, dt, cell_size))
                .collect()
        } else {
            self.perimeter
                .iter_mut()
                .enumerate()
                .flat_map(|(index, node)| node.advance(index, dt, cell_size))
                .collect()
        };

        // Phase 2: claim cells in node order, then direction order
        let lines = self.control_lines.lines_for(self.id);
        let mut accepted = Vec::with_capacity(requests.len());
        for request in &requests {
            let outcome = if self.visited.contains(request.target) {
                Some(EdgeOutcome::Merged)
            } else {
                let from = self.perimeter[request.parent].position();
                let to = self.geometry.cell_center(request.target);
                if lines.iter().any(|line| line.intersects_segment(from, to)) {
                    debug!(
                        "{} spread {:?} from {} to {} blocked by control line",
                        self.id,
                        request.direction,
                        self.perimeter[request.parent].center(),
                        request.target
                    );
                    Some(EdgeOutcome::Blocked)
                } else {
                    self.visited.insert(request.target);
                    accepted.push(*request);
                    None
                }
            };

            if let Some(outcome) = outcome {
                self.perimeter[request.parent].record_outcome(request.direction, outcome);
            }
        }

        // Phase 3: build children for claimed cells
        let factory = NodeFactory {
            environment: self.environment.as_ref(),
            geometry: self.geometry,
            weather: self.weather,
            config: &self.config,
        };
        let children: Vec<Result<FireNode, ChildRejection>> = if self.config.parallel {
            accepted.par_iter().map(|request| factory.build(request)).collect()
        } else {
            accepted.iter().map(|request| factory.build(request)).collect()
        };

        let mut spawned = Vec::with_capacity(children.len());
        for (request, child) in accepted.iter().zip(children) {
            let outcome = match child {
                Ok(node) => {
                    spawned.push(node);
                    EdgeOutcome::Spread
                }
                Err(ChildRejection::NonBurnable) => EdgeOutcome::Barrier,
                Err(ChildRejection::CannotSpread) => EdgeOutcome::Extinct,
                Err(ChildRejection::Environment(err)) => {
                    if err.is_boundary() {
                        debug!("{} reached the edge of the world at {}: {}", self.id, request.target, err);
                    } else {
                        warn!("{} discarded spread into {}: {}", self.id, request.target, err);
                    }
                    EdgeOutcome::Boundary
                }
            };
            self.perimeter[request.parent].record_outcome(request.direction, outcome);
        }

        let before = self.perimeter.len();
        self.perimeter.retain(FireNode::is_retained);
        let dropped = before - self.perimeter.len();
        let children_added = spawned.len();
        self.perimeter.extend(spawned);
        self.peak_contained = self.peak_contained.max(self.contained_percentage());

        debug!(
            "{} t={}: {} requests, {} children, {} dropped, perimeter {} ({:.1}% contained)",
            self.id,
            self.elapsed,
            requests.len(),
            children_added,
            dropped,
            self.perimeter.len(),
            self.contained_percentage() * 100.0
        );

        if self.perimeter.is_empty() {
            self.active = false;
            info!("{} burned out after {}", self.id, self.elapsed);
        }

        self.publish();
    }

    fn publish(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let snapshot = self.perimeter_snapshot();
        if let Some(sink) = self.sink.as_mut() {
            sink.perimeter_updated(&snapshot);
        }
    }

    /// Fraction of perimeter nodes that are contained, 0.0 to 1.0
    ///
    /// 0 for an empty perimeter.
    pub fn contained_percentage(&self) -> f64 {
        if self.perimeter.is_empty() {
            return 0.0;
        }
        let contained = self.perimeter.iter().filter(|node| node.is_contained()).count();
        contained as f64 / self.perimeter.len() as f64
    }

    /// Highest [`FireSimulation::contained_percentage`] after any step so far
    ///
    /// Unlike the current fraction this never decreases, including after the
    /// fire burns out.
    pub fn peak_contained_percentage(&self) -> f64 {
        self.peak_contained
    }

    /// Place a firebreak spanning the rectangle between two corners
    pub fn register_control_line(&self, a: WorldPoint, b: WorldPoint) {
        let line = ControlLine::new(a, b);
        self.control_lines.register(self.id, line);
        info!(
            "{} control line from ({:.1}, {:.1}) to ({:.1}, {:.1})",
            self.id,
            line.min().x,
            line.min().y,
            line.max().x,
            line.max().y
        );
    }

    /// Remove this simulation's firebreaks, returning how many there were
    pub fn clear_control_lines(&self) -> usize {
        let removed = self.control_lines.clear(self.id);
        info!("{} cleared {} control lines", self.id, removed);
        removed
    }

    pub fn control_lines(&self) -> Vec<ControlLine> {
        self.control_lines.lines_for(self.id)
    }

    /// Shared registry holding this simulation's control lines
    pub fn control_line_registry(&self) -> &Arc<ControlLineRegistry> {
        &self.control_lines
    }

    /// Halt the fire; later calls to `advance` do nothing
    pub fn stop(&mut self) {
        if self.active {
            info!("{} stopped at {}", self.id, self.elapsed);
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether any perimeter node still has a moving front
    pub fn is_spreading(&self) -> bool {
        self.perimeter
            .iter()
            .any(|node| node.state() == NodeState::Spreading)
    }

    pub fn elapsed(&self) -> Minutes {
        self.elapsed
    }

    pub fn id(&self) -> SimulationId {
        self.id
    }

    /// Wind frozen at ignition
    pub fn weather(&self) -> WeatherSnapshot {
        self.weather
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn ignition_point(&self) -> WorldPoint {
        self.geometry.origin
    }

    /// Current perimeter in node-creation order
    pub fn perimeter(&self) -> &[FireNode] {
        &self.perimeter
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Direction set nodes spread in
    pub fn directions(&self) -> &'static [Direction] {
        self.config.spread_pattern.directions()
    }

    pub fn perimeter_snapshot(&self) -> PerimeterSnapshot {
        PerimeterSnapshot {
            simulation: self.id,
            elapsed: self.elapsed,
            points: self
                .perimeter
                .iter()
                .map(|node| PerimeterPoint {
                    cell: node.center(),
                    position: node.position_3d(),
                    contained: node.is_contained(),
                })
                .collect(),
            contained_percentage: self.contained_percentage(),
        }
    }

    /// Perimeter node centre nearest to `position`, with elevation
    pub fn closest_perimeter_point(&self, position: WorldPoint) -> Option<WorldPoint3> {
        self.perimeter
            .iter()
            .map(|node| (nalgebra::distance_squared(&node.position(), &position), node))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, node)| node.position_3d())
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            elapsed: self.elapsed,
            perimeter_nodes: self.perimeter.len(),
            contained_nodes: self.perimeter.iter().filter(|node| node.is_contained()).count(),
            peak_contained: self.peak_contained,
            cells_burned: self.visited.len(),
            control_lines: self.control_lines.count(self.id),
            active: self.active,
        }
    }

    /// Send a snapshot to `sink` after every step
    pub fn attach_sink(&mut self, sink: impl PerimeterSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn detach_sink(&mut self) {
        self.sink = None;
    }
}

impl Drop for FireSimulation {
    fn drop(&mut self) {
        self.control_lines.clear(self.id);
    }
}
