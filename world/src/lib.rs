#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the Rampart tower-defense engine.
//!
//! The [`World`] owns every entity collection exclusively: enemies, towers,
//! projectiles, particles, and floating combat text. Adapters and systems
//! never mutate it directly; all mutations route through [`apply`] and all
//! reads route through the [`query`] module.

pub mod ledger;
pub mod path;

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rampart_core::{
    base_hp_for_wave, enemy_speed_for_wave, Command, EnemyId, EnemyKind, Event, FieldPoint,
    FieldVector, GamePhase, PlacementError, Tint, TowerId, TowerKind, UpgradeError,
};

use ledger::Ledger;
use path::{PathError, PathModel};

/// Minimum distance a tower center must keep from every path waypoint and
/// every other tower, in field units.
pub const TOWER_CLEARANCE: f32 = 6.0;

const PROJECTILE_LIFETIME: Duration = Duration::from_millis(120);
const PARTICLE_DECAY_PER_SECOND: f32 = 2.2;
const TEXT_DECAY_PER_SECOND: f32 = 1.1;
const TEXT_RISE_SPEED: f32 = 7.0;
const HIT_PARTICLE_COUNT: usize = 4;
const KILL_PARTICLE_COUNT: usize = 10;
const SELL_PARTICLE_COUNT: usize = 8;

const REWARD_TEXT_TINT: Tint = Tint::from_rgb(0xff, 0xd5, 0x4f);
const LEVEL_TEXT_TINT: Tint = Tint::from_rgb(0x7d, 0xd8, 0x5c);

const DEFAULT_STARTING_MONEY: u32 = 250;
const DEFAULT_STARTING_LIVES: u32 = 10;
const DEFAULT_PARTICLE_SEED: u64 = 0x5eed_0f_7a_11;

/// Waypoints of the default S-shaped course across the field.
#[must_use]
pub fn default_waypoints() -> Vec<FieldPoint> {
    vec![
        FieldPoint::new(0.0, 20.0),
        FieldPoint::new(70.0, 20.0),
        FieldPoint::new(70.0, 50.0),
        FieldPoint::new(25.0, 50.0),
        FieldPoint::new(25.0, 80.0),
        FieldPoint::new(100.0, 80.0),
    ]
}

/// Configuration parameters required to construct a world.
#[derive(Clone, Debug)]
pub struct Config {
    /// Ordered waypoints the path is built from.
    pub waypoints: Vec<FieldPoint>,
    /// Currency balance at session start.
    pub starting_money: u32,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Seed for the deterministic particle scatter.
    pub particle_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            waypoints: default_waypoints(),
            starting_money: DEFAULT_STARTING_MONEY,
            starting_lives: DEFAULT_STARTING_LIVES,
            particle_seed: DEFAULT_PARTICLE_SEED,
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    wave: u32,
    distance: f32,
    position: FieldPoint,
    hp: f32,
    max_hp: f32,
    speed: f32,
}

#[derive(Clone, Debug)]
struct Tower {
    id: TowerId,
    kind: TowerKind,
    position: FieldPoint,
    level: u32,
    cooldown_remaining: Duration,
    facing: f32,
    damage_dealt: f32,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    from: FieldPoint,
    to: FieldPoint,
    tint: Tint,
    remaining: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    position: FieldPoint,
    velocity: FieldVector,
    life: f32,
    tint: Tint,
}

#[derive(Clone, Debug)]
struct FloatingText {
    position: FieldPoint,
    text: String,
    life: f32,
    tint: Tint,
}

/// Represents the authoritative Rampart session state.
#[derive(Debug)]
pub struct World {
    config: Config,
    path: PathModel,
    ledger: Ledger,
    phase: GamePhase,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    texts: Vec<FloatingText>,
    next_enemy_id: u32,
    next_tower_id: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new session from the provided configuration.
    ///
    /// Fails fast when the configured waypoints do not form a valid path;
    /// every other aspect of the configuration is usable as-is.
    pub fn new(config: Config) -> Result<Self, PathError> {
        let path = PathModel::new(config.waypoints.clone())?;
        let ledger = Ledger::new(config.starting_money, config.starting_lives);
        let rng = ChaCha8Rng::seed_from_u64(config.particle_seed);
        Ok(Self {
            config,
            path,
            ledger,
            phase: GamePhase::NotStarted,
            enemies: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            next_enemy_id: 0,
            next_tower_id: 0,
            rng,
        })
    }

    fn reset(&mut self) {
        self.ledger = Ledger::new(self.config.starting_money, self.config.starting_lives);
        self.phase = GamePhase::NotStarted;
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.texts.clear();
        self.next_enemy_id = 0;
        self.next_tower_id = 0;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.particle_seed);
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_tower_id(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        id
    }

    fn tower_index(&self, tower: TowerId) -> Option<usize> {
        self.towers.iter().position(|candidate| candidate.id == tower)
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn scatter_particles(&mut self, origin: FieldPoint, tint: Tint, count: usize) {
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(4.0..12.0_f32);
            self.particles.push(Particle {
                position: origin,
                velocity: FieldVector::new(angle.cos() * speed, angle.sin() * speed),
                life: 1.0,
                tint,
            });
        }
    }

    fn push_text(&mut self, position: FieldPoint, text: String, tint: Tint) {
        self.texts.push(FloatingText {
            position,
            text,
            life: 1.0,
            tint,
        });
    }

    fn placement_obstruction(&self, position: FieldPoint) -> Option<PlacementError> {
        if !position.in_bounds() {
            return Some(PlacementError::OutOfBounds);
        }
        if self
            .path
            .waypoints()
            .iter()
            .any(|waypoint| waypoint.distance_to(position) < TOWER_CLEARANCE)
        {
            return Some(PlacementError::BlockedByPath);
        }
        if self
            .towers
            .iter()
            .any(|tower| tower.position.distance_to(position) < TOWER_CLEARANCE)
        {
            return Some(PlacementError::BlockedByTower);
        }
        None
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let total_length = self.path.total_length();
        let mut exited: Vec<EnemyId> = Vec::new();

        for enemy in self.enemies.iter_mut() {
            enemy.distance += enemy.speed * seconds;
            if enemy.distance >= total_length {
                exited.push(enemy.id);
            } else {
                enemy.position = self.path.position_at(enemy.distance);
            }
        }

        if exited.is_empty() {
            return;
        }

        self.enemies.retain(|enemy| !exited.contains(&enemy.id));
        let escaped = exited.len() as u32;
        let lives_remaining = self.ledger.lose_lives(escaped);
        for enemy in exited {
            out_events.push(Event::EnemyExited {
                enemy,
                lives_remaining,
            });
        }

        if lives_remaining == 0 {
            self.phase = GamePhase::Lost;
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Lost,
            });
        }
    }

    fn decay_visuals(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();

        for projectile in self.projectiles.iter_mut() {
            projectile.remaining = projectile.remaining.saturating_sub(dt);
        }
        self.projectiles
            .retain(|projectile| !projectile.remaining.is_zero());

        for particle in self.particles.iter_mut() {
            particle.life -= seconds * PARTICLE_DECAY_PER_SECOND;
            particle.position = FieldPoint::new(
                particle.position.x() + particle.velocity.dx() * seconds,
                particle.position.y() + particle.velocity.dy() * seconds,
            );
        }
        self.particles.retain(|particle| particle.life > 0.0);

        for text in self.texts.iter_mut() {
            text.life -= seconds * TEXT_DECAY_PER_SECOND;
            text.position = FieldPoint::new(
                text.position.x(),
                text.position.y() - TEXT_RISE_SPEED * seconds,
            );
        }
        self.texts.retain(|text| text.life > 0.0);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid actions are rejected no-ops: they emit a rejection event where one
/// exists and never mutate state or panic.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.phase != GamePhase::Running {
                return;
            }
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_enemies(dt, out_events);
            for tower in world.towers.iter_mut() {
                tower.cooldown_remaining = tower.cooldown_remaining.saturating_sub(dt);
            }
            world.decay_visuals(dt);
        }
        Command::SpawnEnemy { kind, wave } => {
            if world.phase != GamePhase::Running {
                return;
            }
            let id = world.allocate_enemy_id();
            let hp = base_hp_for_wave(wave) * kind.hp_multiplier();
            let speed = enemy_speed_for_wave(kind, wave);
            let position = world.path.position_at(0.0);
            world.enemies.push(Enemy {
                id,
                kind,
                wave,
                distance: 0.0,
                position,
                hp,
                max_hp: hp,
                speed,
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                wave,
            });
        }
        Command::BeginWave { wave } => {
            if world.phase != GamePhase::Running {
                return;
            }
            world.ledger.set_wave(wave);
            out_events.push(Event::WaveStarted { wave });
        }
        Command::DeclareVictory => {
            if world.phase != GamePhase::Running || !world.enemies.is_empty() {
                return;
            }
            world.phase = GamePhase::Won;
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Won,
            });
        }
        Command::FireAtEnemy { tower, enemy } => {
            fire_at_enemy(world, tower, enemy, out_events);
        }
        Command::PlaceTower { kind, position } => {
            place_tower(world, kind, position, out_events);
        }
        Command::UpgradeTower { tower } => {
            upgrade_tower(world, tower, out_events);
        }
        Command::SellTower { tower } => {
            sell_tower(world, tower, out_events);
        }
        Command::Start => {
            if world.phase == GamePhase::NotStarted {
                world.phase = GamePhase::Running;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Running,
                });
            }
        }
        Command::Pause => {
            if world.phase == GamePhase::Running {
                world.phase = GamePhase::Paused;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Paused,
                });
            }
        }
        Command::Resume => {
            if world.phase == GamePhase::Paused {
                world.phase = GamePhase::Running;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Running,
                });
            }
        }
        Command::Restart => {
            world.reset();
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::NotStarted,
            });
        }
    }
}

fn fire_at_enemy(world: &mut World, tower: TowerId, enemy: EnemyId, out_events: &mut Vec<Event>) {
    if world.phase != GamePhase::Running {
        return;
    }
    let Some(tower_index) = world.tower_index(tower) else {
        return;
    };
    let Some(enemy_index) = world.enemy_index(enemy) else {
        return;
    };

    let (kind, level, muzzle) = {
        let tower = &world.towers[tower_index];
        (tower.kind, tower.level, tower.position)
    };
    let target = world.enemies[enemy_index].position;

    if !world.towers[tower_index].cooldown_remaining.is_zero() {
        return;
    }
    if muzzle.distance_to(target) > kind.range_at(level) {
        return;
    }

    let damage = kind.damage_at(level);
    {
        let tower = &mut world.towers[tower_index];
        tower.facing = (target.y() - muzzle.y()).atan2(target.x() - muzzle.x());
        tower.damage_dealt += damage;
        tower.cooldown_remaining = kind.cooldown_at(level);
    }

    let killed = {
        let struck = &mut world.enemies[enemy_index];
        struck.hp -= damage;
        struck.hp <= 0.0
    };

    world.projectiles.push(Projectile {
        from: muzzle,
        to: target,
        tint: kind.tint(),
        remaining: PROJECTILE_LIFETIME,
    });
    world.scatter_particles(target, kind.tint(), HIT_PARTICLE_COUNT);
    out_events.push(Event::TowerFired {
        tower,
        enemy,
        damage,
    });

    if killed {
        let reward = world.enemies[enemy_index].kind.reward();
        let _ = world.enemies.remove(enemy_index);
        world.ledger.credit(reward);
        world.push_text(target, format!("+{reward}"), REWARD_TEXT_TINT);
        world.scatter_particles(target, REWARD_TEXT_TINT, KILL_PARTICLE_COUNT);
        out_events.push(Event::EnemyKilled { enemy, reward });
    }
}

fn place_tower(
    world: &mut World,
    kind: TowerKind,
    position: FieldPoint,
    out_events: &mut Vec<Event>,
) {
    let reject = |reason| Event::TowerPlacementRejected {
        kind,
        position,
        reason,
    };

    if world.phase.is_terminal() {
        out_events.push(reject(PlacementError::SessionOver));
        return;
    }
    if world.ledger.money() < kind.cost() {
        out_events.push(reject(PlacementError::InsufficientFunds));
        return;
    }
    if let Some(reason) = world.placement_obstruction(position) {
        out_events.push(reject(reason));
        return;
    }
    if !world.ledger.try_debit(kind.cost()) {
        out_events.push(reject(PlacementError::InsufficientFunds));
        return;
    }

    let id = world.allocate_tower_id();
    world.towers.push(Tower {
        id,
        kind,
        position,
        level: 1,
        cooldown_remaining: Duration::ZERO,
        facing: 0.0,
        damage_dealt: 0.0,
    });
    out_events.push(Event::TowerPlaced {
        tower: id,
        kind,
        position,
    });
}

fn upgrade_tower(world: &mut World, tower: TowerId, out_events: &mut Vec<Event>) {
    let Some(index) = world.tower_index(tower) else {
        out_events.push(Event::TowerUpgradeRejected {
            tower,
            reason: UpgradeError::MissingTower,
        });
        return;
    };

    let (kind, level, position) = {
        let tower = &world.towers[index];
        (tower.kind, tower.level, tower.position)
    };
    if !world.ledger.try_debit(kind.upgrade_cost(level)) {
        out_events.push(Event::TowerUpgradeRejected {
            tower,
            reason: UpgradeError::InsufficientFunds,
        });
        return;
    }

    let new_level = level + 1;
    world.towers[index].level = new_level;
    world.push_text(position, format!("LVL {new_level}"), LEVEL_TEXT_TINT);
    out_events.push(Event::TowerUpgraded {
        tower,
        level: new_level,
    });
}

fn sell_tower(world: &mut World, tower: TowerId, out_events: &mut Vec<Event>) {
    let Some(index) = world.tower_index(tower) else {
        out_events.push(Event::TowerSaleRejected { tower });
        return;
    };

    let removed = world.towers.remove(index);
    let refund = removed.kind.sell_refund(removed.level);
    world.ledger.credit(refund);
    world.scatter_particles(removed.position, removed.kind.tint(), SELL_PARTICLE_COUNT);
    out_events.push(Event::TowerSold { tower, refund });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rampart_core::{
        EnemySnapshot, EnemyView, FloatingTextSnapshot, GamePhase, HudSnapshot, ParticleSnapshot,
        ProjectileSnapshot, TowerSnapshot, TowerView,
    };

    use super::{PathModel, World, PROJECTILE_LIFETIME};

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Scalar HUD state republished to the view layer every tick.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            money: world.ledger.money(),
            lives: world.ledger.lives(),
            wave: world.ledger.wave(),
            phase: world.phase,
        }
    }

    /// Provides read-only access to the path enemies travel along.
    #[must_use]
    pub fn path(world: &World) -> &PathModel {
        &world.path
    }

    /// Number of live enemies currently on the field.
    #[must_use]
    pub fn enemies_alive(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the live enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    wave: enemy.wave,
                    distance: enemy.distance,
                    position: enemy.position,
                    hp: enemy.hp,
                    max_hp: enemy.max_hp,
                    speed: enemy.speed,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    position: tower.position,
                    level: tower.level,
                    cooldown_remaining: tower.cooldown_remaining,
                    facing: tower.facing,
                    damage_dealt: tower.damage_dealt,
                })
                .collect(),
        )
    }

    /// Snapshots of the live projectile streaks.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                from: projectile.from,
                to: projectile.to,
                tint: projectile.tint,
                remaining: projectile.remaining.as_secs_f32() / PROJECTILE_LIFETIME.as_secs_f32(),
            })
            .collect()
    }

    /// Snapshots of the live particles.
    #[must_use]
    pub fn particles(world: &World) -> Vec<ParticleSnapshot> {
        world
            .particles
            .iter()
            .map(|particle| ParticleSnapshot {
                position: particle.position,
                velocity: particle.velocity,
                life: particle.life,
                tint: particle.tint,
            })
            .collect()
    }

    /// Snapshots of the live floating combat text.
    #[must_use]
    pub fn floating_texts(world: &World) -> Vec<FloatingTextSnapshot> {
        world
            .texts
            .iter()
            .map(|text| FloatingTextSnapshot {
                position: text.position,
                text: text.text.clone(),
                life: text.life,
                tint: text.tint,
            })
            .collect()
    }
}
