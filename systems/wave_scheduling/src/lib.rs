#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler that releases enemies in discrete batches.
//!
//! The scheduler is a two-state machine. While **Spawning** it releases one
//! enemy from the wave's composition queue every spawn interval. Once the
//! queue is drained it waits for the field to empty before entering
//! **Resting**, which guarantees wave N+1 never starts while an enemy from
//! wave N is still alive. After the rest delay it advances the wave number
//! and re-enters Spawning, or declares victory when the final wave has been
//! cleared.
//!
//! All timing uses accumulated simulated-time budgets rather than wall-clock
//! timestamps, so pausing the clock can never corrupt a pending timer.

use std::{collections::VecDeque, time::Duration};

use rampart_core::{Command, EnemyKind, GamePhase};

const BASE_WAVE_SIZE: u32 = 5;
const EXTRA_PER_WAVE: u32 = 2;
const BRUTE_WAVE_THRESHOLD: u32 = 3;

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rest_delay: Duration,
    final_wave: u32,
}

impl Config {
    /// Creates a new configuration from explicit cadence parameters.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rest_delay: Duration, final_wave: u32) -> Self {
        Self {
            spawn_interval,
            rest_delay,
            final_wave,
        }
    }

    /// Number of the last wave before the session is won.
    #[must_use]
    pub const fn final_wave(&self) -> u32 {
        self.final_wave
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(900),
            rest_delay: Duration::from_secs(4),
            final_wave: 10,
        }
    }
}

/// Ordered enemy composition of the provided wave.
///
/// The progression rule is a tunable balance parameter, documented here so
/// tests stay deterministic: wave `w` contains `5 + 2 × (w − 1)` enemies;
/// spawn index `i` is a [`EnemyKind::Brute`] when `w ≥ 3` and `i % 4 == 3`,
/// otherwise a [`EnemyKind::Runner`] when `i % 3 == 2`, otherwise a
/// [`EnemyKind::Soldier`]. Wave size grows linearly, so later waves are
/// strictly larger.
#[must_use]
pub fn wave_composition(wave: u32) -> Vec<EnemyKind> {
    let count = BASE_WAVE_SIZE + EXTRA_PER_WAVE * wave.saturating_sub(1);
    (0..count)
        .map(|index| {
            if wave >= BRUTE_WAVE_THRESHOLD && index % 4 == 3 {
                EnemyKind::Brute
            } else if index % 3 == 2 {
                EnemyKind::Runner
            } else {
                EnemyKind::Soldier
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Spawning,
    Resting,
}

/// Pure system that emits wave and spawn commands on a simulated-time budget.
#[derive(Debug)]
pub struct WaveScheduling {
    config: Config,
    stage: Stage,
    wave: u32,
    queue: VecDeque<EnemyKind>,
    timer: Duration,
    started: bool,
}

impl WaveScheduling {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stage: Stage::Spawning,
            wave: 0,
            queue: VecDeque::new(),
            timer: Duration::ZERO,
            started: false,
        }
    }

    /// One-based number of the wave currently being scheduled, zero before
    /// the first wave begins.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.wave
    }

    /// Returns the scheduler to its pre-session state.
    pub fn reset(&mut self) {
        self.stage = Stage::Spawning;
        self.wave = 0;
        self.queue.clear();
        self.timer = Duration::ZERO;
        self.started = false;
    }

    /// Advances the scheduler by the provided speed-scaled delta.
    ///
    /// `enemies_alive` is the registry's live-enemy count at the start of the
    /// frame; the rest transition requires it to be zero, not merely an empty
    /// composition queue.
    pub fn handle(
        &mut self,
        dt: Duration,
        phase: GamePhase,
        enemies_alive: usize,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Running {
            return;
        }

        if !self.started {
            self.started = true;
            self.begin_wave(1, out);
        }

        match self.stage {
            Stage::Spawning => {
                self.timer = self.timer.saturating_add(dt);
                let mut released = 0_usize;
                while self.timer >= self.config.spawn_interval {
                    let Some(kind) = self.queue.pop_front() else {
                        break;
                    };
                    self.timer -= self.config.spawn_interval;
                    out.push(Command::SpawnEnemy {
                        kind,
                        wave: self.wave,
                    });
                    released += 1;
                }

                if self.queue.is_empty() && released == 0 && enemies_alive == 0 {
                    if self.wave >= self.config.final_wave {
                        out.push(Command::DeclareVictory);
                    } else {
                        self.stage = Stage::Resting;
                        self.timer = Duration::ZERO;
                    }
                }
            }
            Stage::Resting => {
                self.timer = self.timer.saturating_add(dt);
                if self.timer >= self.config.rest_delay {
                    let next = self.wave + 1;
                    self.begin_wave(next, out);
                }
            }
        }
    }

    fn begin_wave(&mut self, wave: u32, out: &mut Vec<Command>) {
        self.wave = wave;
        self.queue = wave_composition(wave).into();
        self.stage = Stage::Spawning;
        self.timer = Duration::ZERO;
        out.push(Command::BeginWave { wave });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);
    const REST: Duration = Duration::from_secs(2);

    fn scheduler(final_wave: u32) -> WaveScheduling {
        WaveScheduling::new(Config::new(INTERVAL, REST, final_wave))
    }

    fn spawns(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
            .count()
    }

    #[test]
    fn composition_grows_strictly_with_wave_number() {
        for wave in 1..12 {
            assert!(wave_composition(wave + 1).len() > wave_composition(wave).len());
        }
    }

    #[test]
    fn composition_mixes_heavies_only_past_the_threshold() {
        assert!(!wave_composition(1).contains(&EnemyKind::Brute));
        assert!(!wave_composition(2).contains(&EnemyKind::Brute));
        assert!(wave_composition(3).contains(&EnemyKind::Brute));
    }

    #[test]
    fn first_running_frame_begins_wave_one() {
        let mut system = scheduler(10);
        let mut out = Vec::new();
        system.handle(Duration::ZERO, GamePhase::Running, 0, &mut out);
        assert_eq!(out, vec![Command::BeginWave { wave: 1 }]);
        assert_eq!(system.current_wave(), 1);
    }

    #[test]
    fn emits_one_spawn_per_elapsed_interval() {
        let mut system = scheduler(10);
        let mut out = Vec::new();
        system.handle(Duration::from_secs(2), GamePhase::Running, 0, &mut out);
        // BeginWave plus 2s / 500ms spawns.
        assert_eq!(spawns(&out), 4);
    }

    #[test]
    fn non_running_phases_are_silent() {
        let mut system = scheduler(10);
        let mut out = Vec::new();
        for phase in [
            GamePhase::NotStarted,
            GamePhase::Paused,
            GamePhase::Lost,
            GamePhase::Won,
        ] {
            system.handle(Duration::from_secs(5), phase, 0, &mut out);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn rest_waits_for_the_field_to_empty() {
        let mut system = scheduler(10);
        let mut out = Vec::new();
        // Drain the entire wave-1 queue (5 enemies at 500ms).
        system.handle(Duration::from_secs(3), GamePhase::Running, 0, &mut out);
        assert_eq!(spawns(&out), 5);

        // Queue is empty but enemies remain alive: no rest, no next wave.
        out.clear();
        system.handle(Duration::from_secs(10), GamePhase::Running, 3, &mut out);
        assert!(out.is_empty());
        assert_eq!(system.current_wave(), 1);

        // Field cleared: the scheduler rests, then starts wave 2.
        system.handle(Duration::ZERO, GamePhase::Running, 0, &mut out);
        assert!(out.is_empty());
        system.handle(REST, GamePhase::Running, 0, &mut out);
        assert_eq!(out, vec![Command::BeginWave { wave: 2 }]);
    }

    #[test]
    fn clearing_the_final_wave_declares_victory() {
        let mut system = scheduler(1);
        let mut out = Vec::new();
        system.handle(Duration::from_secs(3), GamePhase::Running, 0, &mut out);
        assert_eq!(spawns(&out), 5);

        out.clear();
        system.handle(Duration::ZERO, GamePhase::Running, 0, &mut out);
        assert_eq!(out, vec![Command::DeclareVictory]);
    }

    #[test]
    fn reset_returns_to_the_pre_session_state() {
        let mut system = scheduler(10);
        let mut out = Vec::new();
        system.handle(Duration::from_secs(2), GamePhase::Running, 0, &mut out);
        system.reset();
        assert_eq!(system.current_wave(), 0);

        out.clear();
        system.handle(Duration::ZERO, GamePhase::Running, 0, &mut out);
        assert_eq!(out, vec![Command::BeginWave { wave: 1 }]);
    }
}
