use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nalgebra::Vector3;

use hoverboard_sim::gnc::FlightController;
use hoverboard_sim::input::{ButtonId, TriggerId};
use hoverboard_sim::io::{csv, json};
use hoverboard_sim::physics::terrain::{Surface, Terrain};
use hoverboard_sim::sim::event::{ApexDetector, GroundContactDetector, SimEvent};
use hoverboard_sim::sim::Simulation;
use hoverboard_sim::types::{BodyState, Craft, GamepadInput, SimConfig};
use hoverboard_sim::vehicle::presets;
use hoverboard_sim::CraftConfig;

/// Fly a hoverboard over a test course and report what the controllers did.
#[derive(Debug, Parser)]
#[command(name = "hoverboard-sim", version)]
struct Args {
    /// Craft TOML; the built-in Citycruiser preset when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated time, s
    #[arg(short, long, default_value_t = 12.0)]
    duration: f64,

    /// Fixed step, s
    #[arg(long, default_value_t = 0.02)]
    dt: f64,

    /// Pull the jump trigger and hold the South button for 0.6 s starting
    /// at this time
    #[arg(long)]
    jump_at: Option<f64>,

    /// Forward lean on the left stick, -1..1
    #[arg(long, default_value_t = 0.0)]
    lean: f64,

    /// Write per-step telemetry CSV here
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the JSON flight summary here
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the preset craft config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn course() -> Terrain {
    Terrain::flat(0.0, "street")
        .with_surface(Surface::pad(
            nalgebra::Point3::new(0.0, 0.0, 25.0),
            Vector3::new(0.0, 1.0, -0.35),
            8.0,
            "ramp",
        ))
        .with_surface(Surface::pad(nalgebra::Point3::new(0.0, 3.0, 45.0), Vector3::y(), 6.0, "rooftop"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.dump_config {
        print!("{}", presets::citycruiser().to_toml_string()?);
        return Ok(());
    }

    let craft_config = match &args.config {
        Some(path) => CraftConfig::from_file(path)
            .with_context(|| format!("loading craft config {}", path.display()))?,
        None => presets::citycruiser(),
    };
    let craft = Craft::from_config(&craft_config)?;
    let mut controller = FlightController::from_config(&craft_config)?;
    let config = SimConfig { dt: args.dt, max_time: args.duration };
    anyhow::ensure!(config.dt > 0.0, "dt must be positive");
    let terrain = course();

    let jump_at = args.jump_at;
    let lean = args.lean.clamp(-1.0, 1.0);
    let mut pilot = move |t: f64| {
        let mut input = GamepadInput::default();
        input.left_stick.y = lean;
        if let Some(start) = jump_at {
            if (start..start + 0.6).contains(&t) {
                input = input.with_trigger(TriggerId::Right, 1.0);
                input.press(ButtonId::South);
            }
        }
        input
    };

    let mut event_log: Vec<String> = Vec::new();
    let start = BodyState::at_rest(Vector3::new(0.0, craft_config.hover_height, 0.0));
    let (telemetry, events) = {
        let mut sim = Simulation::new(&craft, &config, &terrain)
            .detect(GroundContactDetector::new(2.0 * craft_config.hover_height))
            .detect(ApexDetector { min_height: 2.0 * craft_config.hover_height })
            .subscribe(|e: &SimEvent| {
                event_log.push(format!(
                    "  {:<10} t={:>6.2}s   pos=({:>6.2}, {:>6.2}, {:>6.2})",
                    format!("{:?}", e.kind),
                    e.time,
                    e.state.pos.x,
                    e.state.pos.y,
                    e.state.pos.z
                ))
            });
        sim.run(start, &mut controller, &mut pilot)
    };

    let summary = json::FlightSummary::from_telemetry(&telemetry, &events);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  HOVERBOARD FLIGHT — {}", craft_config.name);
    println!("====================================================================");
    println!();
    println!("  Craft");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Hover height: {:>8.2} m",
        craft.mass, craft_config.hover_height
    );
    println!(
        "  Height PID:    kp={:<7.1} kd={:<7.1}   Actuators:  {:>3}",
        craft_config.height.kp,
        craft_config.height.kd,
        craft_config.actuators.len()
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if event_log.is_empty() {
        println!("  (none)");
    }
    for line in &event_log {
        println!("{line}");
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max height:    {:>8.2} m at t={:.2}s", summary.max_height, summary.max_height_time);
    println!("  Final height:  {:>8.2} m", summary.final_height);
    println!("  Max speed:     {:>8.2} m/s", summary.max_speed);
    println!("  Max tilt:      {:>8.2} deg", summary.max_tilt_deg);
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>9}  {:>9}  {:>8}",
        "t (s)", "fwd (m)", "gnd (m)", "thrust", "speed", "surface"
    );
    println!("  {}", "─".repeat(60));
    let sample_interval = (telemetry.len() / 30).max(1);
    for (i, f) in telemetry.iter().enumerate() {
        if i % sample_interval != 0 && i != telemetry.len() - 1 {
            continue;
        }
        let surface = if f.output.ground.hit { f.output.ground.tag.as_str() } else { "-" };
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.3}  {:>9.1}  {:>9.2}  {:>8}",
            f.state.time,
            f.state.pos.z,
            f.output.ground.distance.min(999.0),
            f.output.total_throttle(),
            f.state.vel.norm(),
            surface
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={} s", telemetry.len(), config.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_telemetry_file(&path.to_string_lossy(), &telemetry)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("telemetry written to {}", path.display());
    }
    if let Some(path) = &args.json {
        json::write_summary_file(&path.to_string_lossy(), &craft_config.name, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("summary written to {}", path.display());
    }

    Ok(())
}
