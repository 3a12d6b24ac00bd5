use clap::Parser;
use ember_sim_core::{BurnableObject, CoverageMask, FireSim, SimulationConfig, Vec2};

/// Headless fire/smoke solver demo: ignites fuel at the grid center and
/// prints ASCII frames of the temperature and smoke fields.
#[derive(Parser, Debug)]
#[command(name = "ember-sim-demo")]
#[command(about = "Interactive fluid/combustion solver demo", long_about = None)]
struct Args {
    /// Grid resolution (cells per side)
    #[arg(short, long, default_value_t = 48)]
    grid_size: usize,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Amount of fuel injected at the center
    #[arg(long, default_value_t = 4.0)]
    fuel: f32,

    /// Injection radius in normalized space
    #[arg(long, default_value_t = 0.15)]
    radius: f32,

    /// Print a frame every N ticks (0 = final frame only)
    #[arg(short, long, default_value_t = 60)]
    report_interval: u32,

    /// Register a burnable block that feeds the fuel field
    #[arg(long)]
    burnable: bool,

    /// Vorticity confinement strength (0 = off)
    #[arg(long, default_value_t = 0.0)]
    vorticity: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = SimulationConfig {
        vorticity_strength: args.vorticity,
        ..SimulationConfig::default()
    };
    let mut sim = FireSim::new(args.grid_size, config);

    println!(
        "=== Ember Simulation Demo ({}x{} grid, {} ticks) ===\n",
        args.grid_size, args.grid_size, args.ticks
    );

    // Seed the fire: fuel plus a hot spot at the center.
    let center = Vec2::new(0.5, 0.5);
    sim.add_fuel(center, args.fuel, args.radius);
    sim.add_temperature(center, 1.0, args.radius);

    for tick in 1..=args.ticks {
        if args.burnable {
            sim.register_burnable(BurnableObject {
                id: 1,
                position: Vec2::new(0.3, 0.7),
                mask: CoverageMask::disc(args.grid_size / 8),
                burn_progress: 0.0,
            });
        }

        sim.update(args.dt);

        if args.report_interval > 0 && tick % args.report_interval == 0 {
            print_frame(&sim, tick);
        }
    }

    print_frame(&sim, args.ticks);
    print_summary(&sim, args.burnable);
}

/// Render temperature (flames) over smoke as an ASCII frame.
fn print_frame(sim: &FireSim, tick: u32) {
    let n = sim.grid_size();
    let temperature = sim.temperature();
    let smoke = sim.smoke();

    println!("--- tick {tick} (t = {:.2}s) ---", sim.time());
    for y in 0..n {
        let mut row = String::with_capacity(n);
        for x in 0..n {
            let t = temperature.get(x, y);
            let s = smoke.get(x, y);
            row.push(cell_glyph(t, s, sim.config().ignition_temperature));
        }
        println!("{row}");
    }
    println!();
}

fn cell_glyph(temperature: f32, smoke: f32, ignition: f32) -> char {
    if temperature >= ignition * 10.0 {
        '#'
    } else if temperature >= ignition {
        '*'
    } else if smoke > 1.0 {
        '%'
    } else if smoke > 0.05 {
        '.'
    } else {
        ' '
    }
}

fn print_summary(sim: &FireSim, burnable: bool) {
    let total_fuel: f32 = sim.fuel().iter().sum();
    let total_smoke: f32 = sim.smoke().iter().sum();
    let peak_temperature = sim.temperature().iter().fold(0.0_f32, |a, &b| a.max(b));
    let burning_cells = sim
        .temperature()
        .iter()
        .filter(|&&t| t >= sim.config().ignition_temperature)
        .count();

    println!("=== Summary ===");
    println!("Simulated time:   {:.2}s ({} ticks)", sim.time(), sim.tick());
    println!("Remaining fuel:   {total_fuel:.2}");
    println!("Airborne smoke:   {total_smoke:.2}");
    println!("Peak temperature: {peak_temperature:.2}");
    println!("Burning cells:    {burning_cells}");
    if burnable {
        println!("Burnable object:  {}", if sim.is_burning(1) { "burning" } else { "intact" });
    }
}
