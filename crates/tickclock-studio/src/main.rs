mod app;
mod script;

use std::io::Read;

use anyhow::{Context, Result};

use tickclock_engine::clock::ClockEngine;
use tickclock_engine::config::EngineConfig;
use tickclock_engine::convert::TickRateConverter;
use tickclock_engine::format::format_clock;
use tickclock_engine::logging::{init_logging, LoggingConfig};
use tickclock_engine::player::SimulatedPlayer;
use tickclock_engine::session::{Runtime, RuntimeConfig};
use tickclock_engine::time::Pacing;

use app::StudioApp;
use script::parse_script;

/// Length of the simulated video, in seconds.
const ENV_DURATION: &str = "TICKCLOCK_DURATION_SECS";
/// Any non-empty value other than "0" paces frames in real time.
const ENV_REALTIME: &str = "TICKCLOCK_REALTIME";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::from_env()?;
    let duration = match std::env::var(ENV_DURATION) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{ENV_DURATION}={raw:?} is not a number"))?,
        Err(_) => 600.0,
    };
    let realtime = std::env::var(ENV_REALTIME).is_ok_and(|v| !v.is_empty() && v != "0");

    let src = read_script()?;
    let steps = parse_script(&src).context("failed to parse session script")?;

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║           TICKCLOCK STUDIO v0.1        ║");
    println!("  ╠════════════════════════════════════════╣");
    println!("  ║  applied rate {:>8.2} Hz               ║", config.default_rate);
    println!("  ║  base rate    {:>8.2} Hz               ║", config.base_rate);
    println!("  ║  video        {:>8}                  ║", format_clock(duration * 1000.0));
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let player = SimulatedPlayer::new(duration);
    let engine = ClockEngine::new(config).with_player(player.clone());
    let base = TickRateConverter::new(engine.base_rate())?;
    let mut app = StudioApp::new(steps, player.clone(), base);

    let runtime = RuntimeConfig {
        pacing: if realtime { Pacing::realtime_hz(60.0) } else { Pacing::fixed_hz(60.0) },
        ..RuntimeConfig::default()
    };
    let engine = Runtime::run(runtime, engine, &mut app).context("session runtime failed")?;

    let rendered = app.lines().len();
    log::debug!("rendered {rendered} clock lines");
    println!();
    println!(
        "  session over: {} ticks at {} Hz, player at {:.3}s",
        engine.tick_count(),
        engine.applied_rate(),
        player.position()
    );
    Ok(())
}

/// Reads the script from the first argument, or stdin when absent or "-".
fn read_script() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read script {path}"))
        }
        _ => {
            let mut src = String::new();
            std::io::stdin()
                .read_to_string(&mut src)
                .context("failed to read script from stdin")?;
            Ok(src)
        }
    }
}
