//! Operator-placed firebreaks
//!
//! A control line is a closed axis-aligned rectangle in world space; a
//! degenerate rectangle (zero width or height) is a straight segment. Spread
//! from one cell centre to another is suppressed when the straight path
//! between the two centres touches any registered line.
//!
//! Lines are kept per simulation id in a [`ControlLineRegistry`] that several
//! simulations may share.

use crate::core_types::position::WorldPoint;
use crate::simulation::SimulationId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// Closed axis-aligned rectangle that fire cannot cross
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLine {
    min: WorldPoint,
    max: WorldPoint,
}

impl ControlLine {
    /// Line spanning the rectangle between two opposite corners, in any order
    pub fn new(a: WorldPoint, b: WorldPoint) -> Self {
        Self {
            min: WorldPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: WorldPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn min(&self) -> WorldPoint {
        self.min
    }

    pub fn max(&self) -> WorldPoint {
        self.max
    }

    /// Whether a point lies inside or on the edge
    pub fn contains(&self, point: WorldPoint) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Whether the segment `from → to` touches the rectangle
    ///
    /// Liang–Barsky clipping of the segment against the four edges; touching
    /// a corner or an edge counts as crossing.
    pub fn intersects_segment(&self, from: WorldPoint, to: WorldPoint) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;

        for (p, q) in [
            (-dx, from.x - self.min.x),
            (dx, self.max.x - from.x),
            (-dy, from.y - self.min.y),
            (dy, self.max.y - from.y),
        ] {
            if p == 0.0 {
                // Parallel to this edge: outside it means no hit at all
                if q < 0.0 {
                    return false;
                }
                continue;
            }

            let t = q / p;
            if p < 0.0 {
                if t > t_exit {
                    return false;
                }
                t_enter = t_enter.max(t);
            } else {
                if t < t_enter {
                    return false;
                }
                t_exit = t_exit.min(t);
            }
        }

        t_enter <= t_exit
    }
}

/// Control lines grouped by the simulation they belong to
#[derive(Debug, Default)]
pub struct ControlLineRegistry {
    lines: RwLock<FxHashMap<SimulationId, Vec<ControlLine>>>,
}

impl ControlLineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, simulation: SimulationId, line: ControlLine) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(simulation)
            .or_default()
            .push(line);
    }

    /// Remove every line of one simulation, returning how many there were
    pub fn clear(&self, simulation: SimulationId) -> usize {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&simulation)
            .as_ref()
            .map_or(0, Vec::len)
    }

    /// Remove the lines of every simulation
    pub fn clear_all(&self) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn lines_for(&self, simulation: SimulationId) -> Vec<ControlLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&simulation)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, simulation: SimulationId) -> usize {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&simulation)
            .map_or(0, Vec::len)
    }
}
