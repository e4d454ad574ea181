//! Perimeter output for display
//!
//! After every step the simulation hands a [`PerimeterSnapshot`] to its
//! attached [`PerimeterSink`], if any. Sinks only observe; nothing they do
//! feeds back into the spread.

use crate::core_types::position::WorldPoint3;
use crate::core_types::spatial::GridCoordinate;
use crate::core_types::units::Minutes;
use crate::simulation::SimulationId;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use tracing::debug;

/// One perimeter node as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerimeterPoint {
    pub cell: GridCoordinate,
    /// East, north, elevation in metres
    pub position: WorldPoint3,
    pub contained: bool,
}

/// The perimeter after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterSnapshot {
    pub simulation: SimulationId,
    pub elapsed: Minutes,
    pub points: Vec<PerimeterPoint>,
    pub contained_percentage: f64,
}

/// Receiver of perimeter updates
pub trait PerimeterSink: Send {
    fn perimeter_updated(&mut self, snapshot: &PerimeterSnapshot);
}

/// Logs a one-line summary of every update
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl PerimeterSink for TracingSink {
    fn perimeter_updated(&mut self, snapshot: &PerimeterSnapshot) {
        debug!(
            "{} perimeter at {}: {} nodes, {:.1}% contained",
            snapshot.simulation,
            snapshot.elapsed,
            snapshot.points.len(),
            snapshot.contained_percentage * 100.0
        );
    }
}

/// Forwards snapshots over a channel; a dropped receiver is ignored
impl PerimeterSink for Sender<PerimeterSnapshot> {
    fn perimeter_updated(&mut self, snapshot: &PerimeterSnapshot) {
        // Display consumers may go away at any time
        let _ = self.send(snapshot.clone());
    }
}
