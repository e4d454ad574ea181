//! Control Line Test Suite
//!
//! Firebreaks placed between cell centres: blocking, containment of a boxed-in
//! fire, and isolation between simulations sharing one registry.
//!
//! Run tests with: cargo test --test `control_lines`

use perimeter_sim_core::{
    core_types::units::Fraction, ControlLineRegistry, Direction, FireSimulation, FuelModel,
    GridCoordinate, Minutes, SimulationConfig, UniformEnvironment, WeatherSnapshot, WorldPoint,
};
use perimeter_sim_core::simulation::EdgeOutcome;
use std::collections::BTreeSet;
use std::sync::Arc;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn calm_grass() -> Arc<UniformEnvironment> {
    Arc::new(UniformEnvironment::new(
        FuelModel::short_grass(),
        Fraction::new(0.06),
        WeatherSnapshot::calm(),
    ))
}

fn ignite_at_origin() -> FireSimulation {
    FireSimulation::ignite(calm_grass(), WorldPoint::origin(), SimulationConfig::default())
        .expect("ignition should succeed")
}

/// Time for a calm front to just pass one 100 m cell
fn one_cell(sim: &FireSimulation) -> Minutes {
    let rate = *sim.perimeter()[0].spread_rates()[&Direction::North];
    Minutes::new(101.0 / rate)
}

fn p(x: f64, y: f64) -> WorldPoint {
    WorldPoint::new(x, y)
}

#[test]
fn test_blocked_cell_is_not_claimed() {
    let mut sim = ignite_at_origin();
    sim.register_control_line(p(50.0, -10.0), p(50.0, 10.0));
    let dt = one_cell(&sim);

    sim.advance(dt);

    assert!(!sim.visited().contains(GridCoordinate::new(1, 0)));
    let root = &sim.perimeter()[0];
    assert_eq!(root.center(), GridCoordinate::ORIGIN);
    assert_eq!(root.outcome(Direction::East), Some(EdgeOutcome::Blocked));
    assert!(root.is_contained());
    assert_eq!(sim.perimeter().len(), 4);
    assert_eq!(sim.contained_percentage(), 0.25);

    // The short line only covers the direct path; neighbours go around it
    for _ in 0..4 {
        sim.advance(dt);
    }
    assert!(sim.visited().contains(GridCoordinate::new(1, 0)));
}

#[test]
fn test_boxed_fire_becomes_fully_contained() {
    let mut sim = ignite_at_origin();
    sim.register_control_line(p(250.0, -300.0), p(250.0, 300.0));
    sim.register_control_line(p(-250.0, -300.0), p(-250.0, 300.0));
    sim.register_control_line(p(-300.0, 250.0), p(300.0, 250.0));
    sim.register_control_line(p(-300.0, -250.0), p(300.0, -250.0));
    assert_eq!(sim.stats().control_lines, 4);

    let mut peaks = Vec::new();
    for _ in 0..2000 {
        if !sim.is_spreading() {
            break;
        }
        sim.advance(Minutes::new(30.0));
        peaks.push(sim.peak_contained_percentage());
    }

    assert!(!sim.is_spreading(), "boxed fire should stop moving");
    assert!(sim.is_active());
    assert_eq!(sim.stats().cells_burned, 25);
    assert!(sim
        .perimeter()
        .iter()
        .all(|node| node.center().east.abs() <= 2 && node.center().north.abs() <= 2));
    assert_eq!(sim.contained_percentage(), 1.0);
    for window in peaks.windows(2) {
        assert!(window[1] >= window[0], "peak containment fell from {} to {}", window[0], window[1]);
    }

    // Burned out inside the box
    sim.advance(Minutes::new(30.0));
    assert!(!sim.is_active());
    assert_eq!(sim.stats().cells_burned, 25);
    assert_eq!(sim.peak_contained_percentage(), 1.0);
}

#[test]
fn test_peak_containment_never_falls_around_a_short_line() {
    let mut sim = ignite_at_origin();
    sim.register_control_line(p(50.0, -10.0), p(50.0, 10.0));
    let dt = one_cell(&sim);

    let mut history = Vec::new();
    for _ in 0..8 {
        sim.advance(dt);
        history.push((sim.contained_percentage(), sim.peak_contained_percentage()));
    }

    assert_eq!(history[0], (0.25, 0.25));
    for window in history.windows(2) {
        assert!(window[1].1 >= window[0].1, "peak fell from {} to {}", window[0].1, window[1].1);
    }
    for &(current, peak) in &history {
        assert!(current <= peak);
        assert!(current > 0.0, "burned-out nodes should count as contained");
    }
    let highest = history.iter().map(|&(current, _)| current).fold(0.0, f64::max);
    assert_eq!(history[7].1, highest);
}

#[test]
fn test_lines_are_per_simulation() {
    let registry = Arc::new(ControlLineRegistry::new());
    let config = SimulationConfig::default();
    let mut blocked = FireSimulation::ignite_with_registry(
        calm_grass(),
        WorldPoint::origin(),
        config.clone(),
        Arc::clone(&registry),
    )
    .expect("ignition should succeed");
    let mut open =
        FireSimulation::ignite_with_registry(calm_grass(), WorldPoint::origin(), config, Arc::clone(&registry))
            .expect("ignition should succeed");

    blocked.register_control_line(p(50.0, -10.0), p(50.0, 10.0));
    let dt = one_cell(&blocked);
    blocked.advance(dt);
    open.advance(dt);

    assert!(!blocked.visited().contains(GridCoordinate::new(1, 0)));
    assert!(open.visited().contains(GridCoordinate::new(1, 0)));
    assert_eq!(registry.count(open.id()), 0);

    let blocked_id = blocked.id();
    drop(blocked);
    assert_eq!(registry.count(blocked_id), 0);
}

#[test]
fn test_clear_control_lines() {
    let mut sim = ignite_at_origin();
    sim.register_control_line(p(50.0, -10.0), p(50.0, 10.0));
    sim.register_control_line(p(-50.0, -10.0), p(-50.0, 10.0));

    assert_eq!(sim.clear_control_lines(), 2);
    assert!(sim.control_lines().is_empty());
    assert_eq!(sim.stats().control_lines, 0);

    let dt = one_cell(&sim);
    sim.advance(dt);
    assert_eq!(sim.visited().len(), 5);
}

#[test]
fn test_tangent_line_leaves_far_side_unchanged() {
    let mut blocked = ignite_at_origin();
    let mut open = ignite_at_origin();
    blocked.register_control_line(p(150.0, -100_000.0), p(150.0, 100_000.0));
    let dt = one_cell(&open);

    for _ in 0..6 {
        blocked.advance(dt);
        open.advance(dt);
    }

    let west_half = |sim: &FireSimulation| -> BTreeSet<GridCoordinate> {
        sim.visited().iter().filter(|c| c.east <= 0).collect()
    };
    assert!(open.visited().iter().any(|c| c.east >= 2), "open fire should pass x = 150");
    assert!(blocked.visited().iter().all(|c| c.east <= 1));
    assert_eq!(west_half(&blocked), west_half(&open));

    let held_by_line = |sim: &FireSimulation| {
        sim.perimeter()
            .iter()
            .any(|node| node.outcome(Direction::East) == Some(EdgeOutcome::Blocked))
    };
    assert!(held_by_line(&blocked));
    assert!(!held_by_line(&open));
}
