#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Rampart session.
//!
//! Drives the simulation with synthetic 16 ms frames, places a fixed tower
//! loadout, and narrates wave, economy, and phase transitions from the event
//! stream. Useful for balance experiments without a rendering front end.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use glam::Vec2;

use rampart_core::{Event, GamePhase, SpeedMultiplier, TowerKind};
use rampart_session::{Config, Session};
use rampart_system_input::Viewport;
use rampart_system_wave_scheduling as waves;

const FRAME: Duration = Duration::from_millis(16);

/// One field unit per pixel, so pointer coordinates equal field coordinates.
const HEADLESS_VIEWPORT: Viewport = Viewport::new(100.0, 100.0);

/// Headless Rampart tower-defense session.
#[derive(Debug, Parser)]
#[command(name = "rampart")]
struct Args {
    /// Number of waves before the session is won.
    #[arg(long, default_value_t = 5)]
    waves: u32,

    /// Speed multiplier applied to the clock (1, 2, or 4).
    #[arg(long, default_value_t = 1)]
    speed: u32,

    /// Wall-clock seconds to simulate before giving up.
    #[arg(long, default_value_t = 600)]
    seconds: u64,

    /// Seed for the deterministic particle scatter.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_speed(raw: u32) -> Result<SpeedMultiplier> {
    match raw {
        1 => Ok(SpeedMultiplier::Normal),
        2 => Ok(SpeedMultiplier::Double),
        4 => Ok(SpeedMultiplier::Quadruple),
        other => bail!("speed must be 1, 2, or 4, got {other}"),
    }
}

fn place(session: &mut Session, kind: TowerKind, x: f32, y: f32) {
    session.arm_tower(kind);
    session.pointer_click(Vec2::new(x, y), HEADLESS_VIEWPORT);
    session.disarm_tower();
}

fn narrate(events: &[Event]) {
    for event in events {
        match event {
            Event::WaveStarted { wave } => println!("wave {wave} incoming"),
            Event::EnemyExited {
                lives_remaining, ..
            } => println!("breach! {lives_remaining} lives left"),
            Event::PhaseChanged { phase } => match phase {
                GamePhase::Lost => println!("the wall has fallen"),
                GamePhase::Won => println!("all waves repelled"),
                _ => {}
            },
            _ => {}
        }
    }
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let speed = parse_speed(args.speed)?;

    let mut world_config = rampart_world::Config::default();
    if let Some(seed) = args.seed {
        world_config.particle_seed = seed;
    }
    let config = Config {
        world: world_config,
        waves: waves::Config::new(
            Duration::from_millis(900),
            Duration::from_secs(4),
            args.waves,
        ),
    };

    let mut session = Session::new(config)?;
    place(&mut session, TowerKind::Sniper, 50.0, 35.0);
    place(&mut session, TowerKind::Rapid, 40.0, 60.0);
    session.start();
    session.set_speed(speed);

    let base = Instant::now();
    let mut now = base;
    let _ = session.tick(now);
    let frames = args.seconds * 1000 / FRAME.as_millis() as u64;
    for _ in 0..frames {
        now += FRAME;
        narrate(session.tick(now));
        if session.phase().is_terminal() {
            break;
        }
    }

    let hud = session.hud();
    println!(
        "finished: phase {:?}, wave {}, {} gold, {} lives",
        hud.phase, hud.wave, hud.money, hud.lives
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_speed;
    use rampart_core::SpeedMultiplier;

    #[test]
    fn accepts_only_supported_speed_factors() {
        assert_eq!(parse_speed(1).expect("valid"), SpeedMultiplier::Normal);
        assert_eq!(parse_speed(2).expect("valid"), SpeedMultiplier::Double);
        assert_eq!(parse_speed(4).expect("valid"), SpeedMultiplier::Quadruple);
        assert!(parse_speed(3).is_err());
    }
}
