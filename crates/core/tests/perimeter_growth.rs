//! Perimeter Growth Test Suite
//!
//! Whole-simulation behaviour of the cell-spawning perimeter: shape under
//! calm and windy conditions, determinism of the parallel step, barriers
//! and the edge of the modelled world.
//!
//! Run tests with: cargo test --test `perimeter_growth`

use perimeter_sim_core::{
    core_types::units::Fraction, Degrees, EnvironmentQuery, FireNode, FireSimulation,
    FuelCatalog, FuelModel, GridCoordinate, Meters, MetersPerSecond, Minutes, Raster,
    RasterEnvironment, SimulationConfig, SpreadPattern, TerrainData, UniformEnvironment,
    WeatherSnapshot, WorldPoint,
};
use std::collections::BTreeSet;
use std::sync::Arc;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn grass(weather: WeatherSnapshot) -> UniformEnvironment {
    UniformEnvironment::new(FuelModel::short_grass(), Fraction::new(0.06), weather)
}

fn ignite(env: impl EnvironmentQuery + 'static, at: WorldPoint, config: SimulationConfig) -> FireSimulation {
    FireSimulation::ignite(Arc::new(env), at, config).expect("ignition should succeed")
}

/// Step until no front is moving, bounded so a regression cannot hang the suite
fn run_until_settled(sim: &mut FireSimulation, dt: Minutes, max_steps: usize) {
    for _ in 0..max_steps {
        if !sim.is_active() || !sim.is_spreading() {
            return;
        }
        sim.advance(dt);
    }
    panic!("fire still spreading after {max_steps} steps");
}

fn visited_cells(sim: &FireSimulation) -> BTreeSet<GridCoordinate> {
    sim.visited().iter().collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shape
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_calm_fire_grows_symmetrically() {
    let mut sim = ignite(
        grass(WeatherSnapshot::calm()),
        WorldPoint::origin(),
        SimulationConfig::default(),
    );

    for _ in 0..40 {
        sim.advance(Minutes::new(15.0));
    }

    let cells = visited_cells(&sim);
    assert!(cells.len() > 5, "fire should have spread beyond the first ring");
    for cell in &cells {
        assert!(cells.contains(&GridCoordinate::new(-cell.east, cell.north)), "missing mirror of {cell}");
        assert!(cells.contains(&GridCoordinate::new(cell.east, -cell.north)), "missing mirror of {cell}");
        assert!(cells.contains(&GridCoordinate::new(cell.north, cell.east)), "missing transpose of {cell}");
    }
}

#[test]
fn test_calm_extent_matches_distance_travelled() {
    let mut sim = ignite(
        grass(WeatherSnapshot::calm()),
        WorldPoint::origin(),
        SimulationConfig::default(),
    );
    let rate = *sim.perimeter()[0].spread_rates()[&perimeter_sim_core::Direction::East];

    // 3.5 cells of travel, split into seven steps so residuals carry over
    for _ in 0..7 {
        sim.advance(Minutes::new(50.0 / rate));
    }

    let cells = visited_cells(&sim);
    assert_eq!(cells.iter().map(|c| c.east).max(), Some(3));
    assert_eq!(cells.iter().map(|c| c.east).min(), Some(-3));
    assert_eq!(cells.iter().map(|c| c.north).max(), Some(3));
    assert_eq!(cells.iter().map(|c| c.north).min(), Some(-3));
    assert!(cells.iter().all(|c| c.east.abs() + c.north.abs() <= 3));
}

#[test]
fn test_wind_elongates_downwind() {
    let weather = WeatherSnapshot::new(MetersPerSecond::new(5.0), Degrees::EAST);
    let mut sim = ignite(grass(weather), WorldPoint::origin(), SimulationConfig::default());

    for _ in 0..20 {
        sim.advance(Minutes::new(5.0));
    }

    let cells = visited_cells(&sim);
    let east = cells.iter().map(|c| c.east).max().unwrap_or(0);
    let west = cells.iter().map(|c| c.east).min().unwrap_or(0);
    assert!(east > 0);
    assert!(east > west.abs(), "head run {east} should outpace backing run {}", west.abs());
}

#[test]
fn test_octal_pattern_reaches_diagonals() {
    let config = SimulationConfig {
        spread_pattern: SpreadPattern::Octal,
        ..SimulationConfig::default()
    };
    let mut sim = ignite(grass(WeatherSnapshot::calm()), WorldPoint::origin(), config);
    let rate = **sim.perimeter()[0].spread_rates().values().next().expect("root spreads");

    // Long enough for the diagonal step of 100·√2 m
    sim.advance(Minutes::new(150.0 / rate));

    let cells = visited_cells(&sim);
    assert_eq!(cells.len(), 9);
    assert!(cells.contains(&GridCoordinate::new(1, 1)));
    assert!(cells.contains(&GridCoordinate::new(-1, -1)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Invariants across steps
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_cell_ignited_twice() {
    let weather = WeatherSnapshot::new(MetersPerSecond::new(3.0), Degrees::new(30.0));
    let mut sim = ignite(grass(weather), WorldPoint::origin(), SimulationConfig::default());
    let mut burned = sim.visited().len();

    for _ in 0..30 {
        sim.advance(Minutes::new(10.0));

        let centers: Vec<GridCoordinate> = sim.perimeter().iter().map(FireNode::center).collect();
        let unique: BTreeSet<GridCoordinate> = centers.iter().copied().collect();
        assert_eq!(unique.len(), centers.len(), "perimeter holds a cell twice");
        assert!(centers.iter().all(|c| sim.visited().contains(*c)));

        assert!(sim.visited().len() >= burned);
        burned = sim.visited().len();
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let weather = WeatherSnapshot::new(MetersPerSecond::new(4.0), Degrees::new(200.0));
    let run = |parallel: bool| {
        let config = SimulationConfig {
            parallel,
            spread_pattern: SpreadPattern::Octal,
            ..SimulationConfig::default()
        };
        let mut sim = ignite(grass(weather), WorldPoint::new(1000.0, 1000.0), config);
        for _ in 0..25 {
            sim.advance(Minutes::new(7.5));
        }
        (
            sim.perimeter().iter().map(FireNode::center).collect::<Vec<_>>(),
            sim.stats().cells_burned,
        )
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn test_burned_out_nodes_count_as_contained() {
    let config = SimulationConfig {
        parallel: false,
        ..SimulationConfig::default()
    };
    let mut sim = ignite(grass(WeatherSnapshot::calm()), WorldPoint::origin(), config);
    let rate = *sim.perimeter()[0].spread_rates()[&perimeter_sim_core::Direction::North];
    let dt = Minutes::new(101.0 / rate);

    sim.advance(dt);
    assert!(sim.perimeter().iter().any(|node| node.center() == GridCoordinate::ORIGIN));

    for _ in 0..6 {
        assert!(sim.contained_percentage() > 0.0);
        // Every node that has stopped spreading is contained
        assert!(sim
            .perimeter()
            .iter()
            .filter(|node| node.spread_rates().is_empty())
            .all(FireNode::is_contained));
        sim.advance(dt);
    }
    assert!(sim.perimeter().iter().all(|node| node.center() != GridCoordinate::ORIGIN));
}

#[test]
fn test_peak_containment_never_falls() {
    let weather = WeatherSnapshot::new(MetersPerSecond::new(2.0), Degrees::new(60.0));
    let mut sim = ignite(grass(weather), WorldPoint::origin(), SimulationConfig::default());

    let mut previous_peak = 0.0;
    for _ in 0..60 {
        sim.advance(Minutes::new(6.0));
        let peak = sim.peak_contained_percentage();
        assert!(peak >= previous_peak, "peak fell from {previous_peak} to {peak}");
        assert!(peak >= sim.contained_percentage());
        previous_peak = peak;
    }
    assert!(previous_peak > 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Barriers and world edge
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fire_burns_out_at_world_edge() {
    let env = grass(WeatherSnapshot::calm())
        .with_bounds(WorldPoint::new(0.0, 0.0), WorldPoint::new(500.0, 500.0));
    let mut sim = ignite(env, WorldPoint::new(250.0, 250.0), SimulationConfig::default());

    run_until_settled(&mut sim, Minutes::new(30.0), 2000);

    // The last nodes to discharge stay for one step, all of them burned out
    assert!(sim.is_active());
    assert!(!sim.perimeter().is_empty());
    assert_eq!(sim.contained_percentage(), 1.0);

    sim.advance(Minutes::new(30.0));
    assert!(!sim.is_active());
    assert!(sim.perimeter().is_empty());
    assert_eq!(sim.contained_percentage(), 0.0);
    assert_eq!(sim.peak_contained_percentage(), 1.0);
    // 5x5 cells inside plus the 20 out-of-world cells the edge nodes reached for
    assert_eq!(sim.stats().cells_burned, 45);
}

#[test]
fn test_water_column_holds_the_fire() {
    let terrain = TerrainData::flat(1000.0, 1000.0, 100.0, 0.0).expect("valid grid");
    let mut fuel = Raster::filled(10, 10, 100.0, 1_u16);
    for row in 0..10 {
        fuel.set(7, row, 98);
    }
    let moisture = Raster::filled(10, 10, 100.0, 6.0);
    let env = RasterEnvironment::new(
        terrain,
        fuel,
        moisture,
        FuelCatalog::standard(),
        WeatherSnapshot::calm(),
    );

    let mut sim = ignite(env, WorldPoint::new(250.0, 550.0), SimulationConfig::default());
    run_until_settled(&mut sim, Minutes::new(30.0), 4000);

    let cells = visited_cells(&sim);
    // Water cells are claimed but never burn through
    assert_eq!(cells.iter().filter(|c| c.east == 5).count(), 10);
    assert!(cells.iter().all(|c| c.east <= 5));
    // 70 burned, 10 water, 24 outside the raster on the other three sides
    assert_eq!(cells.len(), 104);
    assert!(sim.perimeter().iter().all(|node| node.center().east <= 4));
    assert_eq!(sim.contained_percentage(), 1.0);

    sim.advance(Minutes::new(30.0));
    assert!(!sim.is_active());
    assert_eq!(sim.visited().len(), 104);
}

#[test]
fn test_stats_track_growth() {
    let mut sim = ignite(
        grass(WeatherSnapshot::calm()),
        WorldPoint::origin(),
        SimulationConfig {
            cell_size: Meters::new(50.0),
            ..SimulationConfig::default()
        },
    );

    for _ in 0..10 {
        sim.advance(Minutes::new(20.0));
    }

    let stats = sim.stats();
    assert_eq!(stats.elapsed, Minutes::new(200.0));
    assert_eq!(stats.perimeter_nodes, sim.perimeter().len());
    assert_eq!(
        stats.contained_nodes,
        sim.perimeter().iter().filter(|node| node.is_contained()).count()
    );
    assert!(stats.peak_contained > 0.0);
    assert!(stats.peak_contained >= sim.contained_percentage());
    assert_eq!(stats.control_lines, 0);
    assert!(stats.active);
    assert!(stats.cells_burned > 5);
}
