use clap::{Parser, ValueEnum};
use perimeter_sim_core::{
    Degrees, EnvironmentQuery, FireSimulation, FuelCatalog, Meters, MetersPerSecond, Minutes,
    Raster, RasterEnvironment, SimulationConfig, SpreadPattern, TerrainData, TracingSink,
    WeatherSnapshot, WorldPoint,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Fuel number the barrier patches are painted with (NB3 agricultural)
const PATCH_FUEL_NUMBER: u16 = 93;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TerrainKind {
    /// Level ground
    Flat,
    /// A single Gaussian hill in the middle of the map
    Hill,
}

/// Headless wildfire perimeter growth demo
#[derive(Parser, Debug)]
#[command(name = "perimeter-sim-demo")]
#[command(about = "Grow a fire perimeter over a synthetic landscape", long_about = None)]
struct Args {
    /// Map size in meters (square map)
    #[arg(long, default_value_t = 5000.0)]
    map_size: f64,

    /// Fire grid cell size in meters
    #[arg(long, default_value_t = 100.0)]
    cell_size: f64,

    /// Terrain shape
    #[arg(long, value_enum, default_value_t = TerrainKind::Flat)]
    terrain: TerrainKind,

    /// Hill height in meters (hill terrain only)
    #[arg(long, default_value_t = 300.0)]
    hill_height: f64,

    /// Fuel model code covering the map (FM1, FM3 or any Scott & Burgan code such as GR2, TL1)
    #[arg(short, long, default_value = "FM1")]
    fuel: String,

    /// Dead fuel moisture in %
    #[arg(short, long, default_value_t = 6.0)]
    moisture: f64,

    /// Midflame wind speed in m/s
    #[arg(short, long, default_value_t = 3.0)]
    wind_speed: f64,

    /// Bearing the wind blows towards in degrees (0=North, 90=East)
    #[arg(long, default_value_t = 90.0)]
    wind_direction: f64,

    /// Place a north-south control line this many meters east of the ignition
    #[arg(short, long)]
    control_line: Option<f64>,

    /// Number of random non-burnable patches to scatter
    #[arg(long, default_value_t = 0)]
    patches: u32,

    /// Seed for patch placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Spread along diagonals as well as the cardinal directions
    #[arg(long)]
    octal: bool,

    /// Advance perimeter nodes on one thread
    #[arg(long)]
    sequential: bool,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 60)]
    steps: u32,

    /// Step length in minutes
    #[arg(long, default_value_t = 5.0)]
    step_minutes: f64,

    /// Report every N steps
    #[arg(short, long, default_value_t = 6)]
    report_interval: u32,
}

fn build_environment(args: &Args) -> Result<RasterEnvironment, String> {
    let fits = args.cell_size > 0.0 && args.map_size >= args.cell_size;
    if !fits {
        return Err(format!(
            "map size {} must be at least one cell of {} meters",
            args.map_size, args.cell_size
        ));
    }

    let catalog = FuelCatalog::standard();
    let fuel_number = catalog
        .by_code(&args.fuel)
        .map(|model| model.number)
        .ok_or_else(|| format!("unknown fuel model code '{}'", args.fuel))?;

    let terrain = match args.terrain {
        TerrainKind::Flat => TerrainData::flat(args.map_size, args.map_size, args.cell_size, 0.0),
        TerrainKind::Hill => TerrainData::single_hill(
            args.map_size,
            args.map_size,
            args.cell_size / 4.0,
            0.0,
            args.hill_height,
            args.map_size / 6.0,
        ),
    }
    .map_err(|err| format!("cannot build terrain: {err}"))?;

    let cells = (args.map_size / args.cell_size).ceil() as usize;
    let mut fuel = Raster::filled(cells, cells, args.cell_size, fuel_number);
    let mut rng = StdRng::seed_from_u64(args.seed);
    for _ in 0..args.patches {
        let col = rng.random_range(0..cells);
        let row = rng.random_range(0..cells);
        for (dc, dr) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            fuel.set(col + dc, row + dr, PATCH_FUEL_NUMBER);
        }
    }
    let moisture = Raster::filled(cells, cells, args.cell_size, args.moisture);

    let weather = WeatherSnapshot::new(
        MetersPerSecond::new(args.wind_speed.max(0.0)),
        Degrees::new(args.wind_direction),
    );

    Ok(RasterEnvironment::new(terrain, fuel, moisture, catalog, weather))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("=== Fire Perimeter Demo ===\n");

    let environment = match build_environment(&args) {
        Ok(environment) => environment,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let ignition = WorldPoint::new(args.map_size / 2.0, args.map_size / 2.0);
    match environment.terrain(ignition) {
        Ok(sample) => println!(
            "Ignition at ({:.0}, {:.0}), elevation {:.1}m, slope {} facing {}",
            ignition.x,
            ignition.y,
            sample.elevation,
            sample.slope_angle(),
            sample.slope_bearing()
        ),
        Err(err) => {
            error!("cannot sample ignition terrain: {}", err);
            return ExitCode::FAILURE;
        }
    }

    let config = SimulationConfig {
        cell_size: Meters::new(args.cell_size.max(0.0)),
        spread_pattern: if args.octal {
            SpreadPattern::Octal
        } else {
            SpreadPattern::Cardinal
        },
        parallel: !args.sequential,
        ..SimulationConfig::default()
    };

    let mut sim = match FireSimulation::ignite(Arc::new(environment), ignition, config) {
        Ok(sim) => sim,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    sim.attach_sink(TracingSink);

    if let Some(offset) = args.control_line {
        let x = ignition.x + offset;
        sim.register_control_line(WorldPoint::new(x, 0.0), WorldPoint::new(x, args.map_size));
    }

    let weather = sim.weather();
    println!(
        "Fuel: {}, moisture {:.1}%, wind {} toward {}\n",
        args.fuel, args.moisture, weather.wind_speed, weather.wind_bearing
    );

    if !sim.is_active() {
        println!("Fire did not start.");
        return ExitCode::SUCCESS;
    }

    let dt = Minutes::new(args.step_minutes.max(0.0));
    let interval = args.report_interval.max(1);
    for step in 1..=args.steps {
        sim.advance(dt);

        if step % interval == 0 || step == args.steps || !sim.is_active() {
            let stats = sim.stats();
            println!(
                "t={:>8} | perimeter {:>5} | contained {:>5.1}% | cells {:>6}",
                stats.elapsed.to_string(),
                stats.perimeter_nodes,
                sim.contained_percentage() * 100.0,
                stats.cells_burned
            );
        }

        if !sim.is_active() {
            break;
        }
    }

    let stats = sim.stats();
    info!(
        "Finished after {}: {} perimeter nodes, {} contained, {} cells claimed, {} control lines",
        stats.elapsed, stats.perimeter_nodes, stats.contained_nodes, stats.cells_burned, stats.control_lines
    );

    let area_hectares = stats.cells_burned as f64 * args.cell_size * args.cell_size / 10_000.0;
    println!("\n=== Summary ===");
    println!("Elapsed:          {}", stats.elapsed);
    println!("Cells claimed:    {} (~{:.1} ha)", stats.cells_burned, area_hectares);
    println!("Perimeter nodes:  {}", stats.perimeter_nodes);
    println!("Contained:        {:.1}%", sim.contained_percentage() * 100.0);
    println!("Peak contained:   {:.1}%", stats.peak_contained * 100.0);
    println!("Still spreading:  {}", sim.is_spreading());

    ExitCode::SUCCESS
}
