#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven orchestrator that owns the world and its systems.
//!
//! A [`Session`] is the single mutation point for a running game: the host
//! calls [`Session::tick`] once per rendering callback and routes player
//! actions through the action methods, which apply atomically between ticks.
//! Each tick computes the wall-clock delta, scales it by the active speed
//! multiplier, and advances the subsystems in a fixed order: wave scheduling,
//! then enemy movement and life loss, then tower fire, then visual decay.
//! Dropping the session releases everything; no callbacks outlive it.

use std::time::{Duration, Instant};

use glam::Vec2;

use rampart_core::{
    Command, EnemyView, Event, FloatingTextSnapshot, GamePhase, HudSnapshot, ParticleSnapshot,
    ProjectileSnapshot, SpeedMultiplier, TowerId, TowerKind, TowerView,
};
use rampart_system_combat::Combat;
use rampart_system_input::{InputProjector, Viewport};
use rampart_system_wave_scheduling::WaveScheduling;
use rampart_world::{self as world, path::PathError, query, World};

/// Wall-clock deltas above this threshold indicate a stalled clock (for
/// example a backgrounded tab); the tick is skipped rather than simulated as
/// one enormous catch-up jump.
pub const STALL_THRESHOLD: Duration = Duration::from_millis(1500);

/// Configuration parameters required to construct a session.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// World configuration: path, starting economy, particle seed.
    pub world: world::Config,
    /// Wave cadence configuration: spawn interval, rest delay, wave cap.
    pub waves: rampart_system_wave_scheduling::Config,
}

/// Per-frame driver owning the authoritative world and all pure systems.
#[derive(Debug)]
pub struct Session {
    world: World,
    scheduler: WaveScheduling,
    combat: Combat,
    input: InputProjector,
    speed: SpeedMultiplier,
    last_tick: Option<Instant>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    /// Creates a new session, failing fast on a degenerate path.
    pub fn new(config: Config) -> Result<Self, PathError> {
        Ok(Self {
            world: World::new(config.world)?,
            scheduler: WaveScheduling::new(config.waves),
            combat: Combat::new(),
            input: InputProjector::new(),
            speed: SpeedMultiplier::Normal,
            last_tick: None,
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Advances the session by one frame.
    ///
    /// When the session is not running the clock reference is still rebased
    /// so that resuming never simulates the idle gap. Returns the events the
    /// frame produced.
    pub fn tick(&mut self, now: Instant) -> &[Event] {
        self.events.clear();

        let Some(last) = self.last_tick.replace(now) else {
            return &self.events;
        };

        if query::phase(&self.world) != GamePhase::Running {
            return &self.events;
        }

        let delta = now.saturating_duration_since(last);
        if delta.is_zero() || delta > STALL_THRESHOLD {
            return &self.events;
        }

        let dt = self.speed.scale(delta);
        let mut pending = std::mem::take(&mut self.commands);

        self.scheduler.handle(
            dt,
            query::phase(&self.world),
            query::enemies_alive(&self.world),
            &mut pending,
        );
        for command in pending.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.combat.handle(
            query::phase(&self.world),
            &towers,
            &enemies,
            &mut pending,
        );
        for command in pending.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        self.commands = pending;
        self.input.handle(&self.events);
        &self.events
    }

    /// Starts a session that has never run.
    pub fn start(&mut self) {
        self.apply_now(Command::Start);
    }

    /// Holds a running session without dropping any pending timers.
    pub fn pause(&mut self) {
        self.apply_now(Command::Pause);
    }

    /// Releases a paused session, rebasing the clock reference so the pause
    /// duration never leaks into the next delta.
    pub fn resume(&mut self) {
        self.apply_now(Command::Resume);
        self.last_tick = None;
    }

    /// Resets the session to its initial state at 1× speed.
    pub fn restart(&mut self) {
        self.apply_now(Command::Restart);
        self.scheduler.reset();
        self.speed = SpeedMultiplier::Normal;
        self.last_tick = None;
    }

    /// Sets the player-selected speed multiplier.
    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        self.speed = speed;
    }

    /// Currently active speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    /// Arms a tower kind for placement on the next field click.
    pub fn arm_tower(&mut self, kind: TowerKind) {
        self.input.arm(kind);
    }

    /// Clears the armed tower kind.
    pub fn disarm_tower(&mut self) {
        self.input.disarm();
    }

    /// Tower currently selected by the player, if any.
    #[must_use]
    pub fn selected_tower(&self) -> Option<TowerId> {
        self.input.selected()
    }

    /// Routes a pointer click through the input projector.
    pub fn pointer_click(&mut self, pointer: Vec2, viewport: Viewport) {
        let point = viewport.project(pointer);
        let towers = query::tower_view(&self.world);
        let money = query::hud(&self.world).money;
        let mut pending = std::mem::take(&mut self.commands);
        self.input.click(point, &towers, money, &mut pending);
        let watermark = self.events.len();
        for command in pending.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.commands = pending;
        self.input.handle(&self.events[watermark..]);
    }

    /// Upgrades the selected tower, if any.
    pub fn upgrade_selected(&mut self) {
        let mut pending = std::mem::take(&mut self.commands);
        self.input.upgrade_selected(&mut pending);
        for command in pending.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.commands = pending;
    }

    /// Sells the selected tower, if any.
    pub fn sell_selected(&mut self) {
        let mut pending = std::mem::take(&mut self.commands);
        self.input.sell_selected(&mut pending);
        let watermark = self.events.len();
        for command in pending.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.commands = pending;
        self.input.handle(&self.events[watermark..]);
    }

    /// Events produced since the start of the current frame, including any
    /// actions applied after it.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Scalar HUD state for the view layer.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        query::hud(&self.world)
    }

    /// Read-only snapshot of the live enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Read-only snapshot of the placed towers.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Snapshots of the live projectile streaks.
    #[must_use]
    pub fn projectiles(&self) -> Vec<ProjectileSnapshot> {
        query::projectiles(&self.world)
    }

    /// Snapshots of the live particles.
    #[must_use]
    pub fn particles(&self) -> Vec<ParticleSnapshot> {
        query::particles(&self.world)
    }

    /// Snapshots of the live floating combat text.
    #[must_use]
    pub fn floating_texts(&self) -> Vec<FloatingTextSnapshot> {
        query::floating_texts(&self.world)
    }

    fn apply_now(&mut self, command: Command) {
        let watermark = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        self.input.handle(&self.events[watermark..]);
    }
}
