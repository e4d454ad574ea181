//! Point and vector aliases for world-space (east, north) positions.

use nalgebra::{Point2, Point3, Vector2};

/// World position in metres: `x` = east, `y` = north.
///
/// This is a simple alias for `nalgebra::Point2<f64>`. Elevation is never part
/// of a 2-D position; it is looked up from terrain when needed.
pub type WorldPoint = Point2<f64>;

/// World displacement or unit direction in metres (east, north).
pub type Vec2 = Vector2<f64>;

/// World position with elevation: `x` = east, `y` = north, `z` = elevation.
pub type WorldPoint3 = Point3<f64>;
