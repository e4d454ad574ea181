use crate::core_types::position::{Vec2, WorldPoint};
use crate::core_types::units::{Degrees, Meters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer cell index on the fire grid (east, north)
///
/// Cell (0, 0) is the ignition cell. Keys are integers so that floating point
/// noise in world positions or elevation can never produce two keys for the
/// same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub east: i64,
    pub north: i64,
}

impl GridCoordinate {
    /// The ignition cell
    pub const ORIGIN: GridCoordinate = GridCoordinate { east: 0, north: 0 };

    pub const fn new(east: i64, north: i64) -> Self {
        GridCoordinate { east, north }
    }

    /// Cell reached by stepping `leaps` cells along `direction`
    ///
    /// Saturates at the edge of the index range.
    pub fn step(self, direction: Direction, leaps: i64) -> Self {
        let (de, dn) = direction.offset();
        GridCoordinate {
            east: self.east.saturating_add(de.saturating_mul(leaps)),
            north: self.north.saturating_add(dn.saturating_mul(leaps)),
        }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.east, self.north)
    }
}

/// Compass direction a node can spread in
///
/// Ordered clockwise from north; the derived `Ord` is the iteration order used
/// everywhere a deterministic direction order is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// The four cardinal directions
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// All eight compass directions
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Compass bearing of this direction
    pub fn bearing(self) -> Degrees {
        match self {
            Direction::North => Degrees::new(0.0),
            Direction::NorthEast => Degrees::new(45.0),
            Direction::East => Degrees::new(90.0),
            Direction::SouthEast => Degrees::new(135.0),
            Direction::South => Degrees::new(180.0),
            Direction::SouthWest => Degrees::new(225.0),
            Direction::West => Degrees::new(270.0),
            Direction::NorthWest => Degrees::new(315.0),
        }
    }

    /// Cell offset (east, north) of one step in this direction
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Whether a step crosses a cell corner rather than an edge
    pub fn is_diagonal(self) -> bool {
        let (de, dn) = self.offset();
        de != 0 && dn != 0
    }

    /// Distance between the centres of two cells one step apart
    pub fn step_length(self, cell_size: Meters) -> Meters {
        if self.is_diagonal() {
            cell_size * std::f64::consts::SQRT_2
        } else {
            cell_size
        }
    }

    /// Unit vector (east, north) pointing along this direction
    pub fn unit_vector(self) -> Vec2 {
        let (de, dn) = self.offset();
        Vec2::new(de as f64, dn as f64).normalize()
    }
}

/// Set of directions each node spreads in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpreadPattern {
    /// North, east, south, west
    #[default]
    Cardinal,
    /// Cardinal directions plus the four diagonals
    Octal,
}

impl SpreadPattern {
    pub fn directions(self) -> &'static [Direction] {
        match self {
            SpreadPattern::Cardinal => &Direction::CARDINAL,
            SpreadPattern::Octal => &Direction::ALL,
        }
    }
}

/// Regular square grid anchored at a world position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// World position of the centre of cell (0, 0)
    pub origin: WorldPoint,
    /// Cell edge length
    pub cell_size: Meters,
}

impl GridGeometry {
    pub fn new(origin: WorldPoint, cell_size: Meters) -> Self {
        Self { origin, cell_size }
    }

    /// Exact world-space centre of a cell
    pub fn cell_center(&self, cell: GridCoordinate) -> WorldPoint {
        let size = *self.cell_size;
        WorldPoint::new(
            self.origin.x + cell.east as f64 * size,
            self.origin.y + cell.north as f64 * size,
        )
    }

    /// Cell containing a world position
    pub fn cell_at(&self, point: WorldPoint) -> GridCoordinate {
        let size = *self.cell_size;
        GridCoordinate {
            east: ((point.x - self.origin.x) / size).round() as i64,
            north: ((point.y - self.origin.y) / size).round() as i64,
        }
    }
}
