#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Side length of the square playing field in normalized field units.
///
/// Every simulation position lives inside `[0, 100] × [0, 100]`; adapters are
/// responsible for projecting device coordinates into this space.
pub const FIELD_EXTENT: f32 = 100.0;

/// Baseline enemy speed in field units per second before variant and wave
/// scaling are applied.
pub const BASE_ENEMY_SPEED: f32 = 6.0;

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated monotonically by the world, so ordering by id is
/// ordering by spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position on the normalized playing field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    x: f32,
    y: f32,
}

impl FieldPoint {
    /// Creates a new field point from normalized coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in field units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in field units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Straight-line distance to another field point.
    #[must_use]
    pub fn distance_to(&self, other: FieldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Reports whether the point lies inside the playing field.
    #[must_use]
    pub fn in_bounds(&self) -> bool {
        self.x >= 0.0 && self.x <= FIELD_EXTENT && self.y >= 0.0 && self.y <= FIELD_EXTENT
    }
}

/// Displacement applied to drifting visual entities, in field units per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldVector {
    dx: f32,
    dy: f32,
}

impl FieldVector {
    /// Creates a new displacement vector.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the vector.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component of the vector.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }
}

/// Visual color applied to projectiles, particles, and floating text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Types of towers that can be purchased and placed on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap tower with a short cooldown and modest damage.
    Rapid,
    /// Mid-priced tower trading rate of fire for heavy single hits.
    Cannon,
    /// Expensive long-range tower with the highest per-shot damage.
    Sniper,
}

impl TowerKind {
    /// Purchase price of the tower at level 1.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Rapid => 75,
            Self::Cannon => 110,
            Self::Sniper => 150,
        }
    }

    /// Damage dealt per shot at level 1.
    #[must_use]
    pub const fn base_damage(self) -> f32 {
        match self {
            Self::Rapid => 12.0,
            Self::Cannon => 40.0,
            Self::Sniper => 70.0,
        }
    }

    /// Targeting radius at level 1, measured in field units.
    #[must_use]
    pub const fn base_range(self) -> f32 {
        match self {
            Self::Rapid => 18.0,
            Self::Cannon => 16.0,
            Self::Sniper => 30.0,
        }
    }

    /// Minimum interval between shots at level 1.
    #[must_use]
    pub const fn base_cooldown(self) -> Duration {
        match self {
            Self::Rapid => Duration::from_millis(400),
            Self::Cannon => Duration::from_millis(1100),
            Self::Sniper => Duration::from_millis(1800),
        }
    }

    /// Tint applied to the tower's projectiles and hit particles.
    #[must_use]
    pub const fn tint(self) -> Tint {
        match self {
            Self::Rapid => Tint::from_rgb(0x4f, 0xc3, 0xf7),
            Self::Cannon => Tint::from_rgb(0xff, 0x8a, 0x3d),
            Self::Sniper => Tint::from_rgb(0xba, 0x68, 0xc8),
        }
    }

    /// Damage per shot at the provided upgrade level.
    ///
    /// Levels start at 1 and scale damage by 20% of the base per level, so
    /// damage increases strictly with level.
    #[must_use]
    pub fn damage_at(self, level: u32) -> f32 {
        self.base_damage() * (1.0 + 0.2 * level.saturating_sub(1) as f32)
    }

    /// Targeting radius at the provided upgrade level.
    ///
    /// Range grows by 5% of the base per level.
    #[must_use]
    pub fn range_at(self, level: u32) -> f32 {
        self.base_range() * (1.0 + 0.05 * level.saturating_sub(1) as f32)
    }

    /// Minimum interval between shots at the provided upgrade level.
    ///
    /// Each level multiplies the base cooldown by 0.9, so the effective fire
    /// interval decreases strictly with level.
    #[must_use]
    pub fn cooldown_at(self, level: u32) -> Duration {
        let factor = 0.9_f32.powi(level.saturating_sub(1) as i32);
        self.base_cooldown().mul_f32(factor)
    }

    /// Price of upgrading a tower currently at the provided level.
    ///
    /// The result is `⌊cost × 0.8 × level⌋`.
    #[must_use]
    pub fn upgrade_cost(self, level: u32) -> u32 {
        (self.cost() as f32 * 0.8 * level as f32) as u32
    }

    /// Currency refunded when selling a tower at the provided level.
    ///
    /// The result is `⌊cost × 0.5 + cost × 0.4 × (level − 1)⌋`, returning
    /// half of the purchase price plus most of the upgrade investment.
    #[must_use]
    pub fn sell_refund(self, level: u32) -> u32 {
        let base = self.cost() as f32;
        (base * 0.5 + base * 0.4 * level.saturating_sub(1) as f32) as u32
    }
}

/// Types of enemies that march along the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast but fragile enemy.
    Runner,
    /// Baseline enemy with balanced stats.
    Soldier,
    /// Slow, heavily armored enemy worth the largest reward.
    Brute,
}

impl EnemyKind {
    /// Multiplier applied to the baseline enemy speed.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Runner => 1.6,
            Self::Soldier => 1.0,
            Self::Brute => 0.6,
        }
    }

    /// Multiplier applied to the wave's baseline hit points.
    #[must_use]
    pub const fn hp_multiplier(self) -> f32 {
        match self {
            Self::Runner => 0.6,
            Self::Soldier => 1.0,
            Self::Brute => 2.8,
        }
    }

    /// Currency credited when the enemy is destroyed.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Runner => 8,
            Self::Soldier => 12,
            Self::Brute => 25,
        }
    }

    /// Visual radius in field units, also used for pointer picking.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Runner => 1.6,
            Self::Soldier => 2.0,
            Self::Brute => 2.6,
        }
    }
}

/// Baseline hit points for enemies spawned during the provided wave.
///
/// Linear in wave number so later waves are strictly harder.
#[must_use]
pub fn base_hp_for_wave(wave: u32) -> f32 {
    50.0 + 12.0 * wave.saturating_sub(1) as f32
}

/// Additive speed bonus granted to enemies of the provided wave.
///
/// Linear in wave number so later waves are strictly faster.
#[must_use]
pub fn wave_speed_bonus(wave: u32) -> f32 {
    0.25 * wave.saturating_sub(1) as f32
}

/// Movement speed of an enemy variant spawned during the provided wave, in
/// field units per second.
#[must_use]
pub fn enemy_speed_for_wave(kind: EnemyKind, wave: u32) -> f32 {
    BASE_ENEMY_SPEED * kind.speed_multiplier() + wave_speed_bonus(wave)
}

/// Lifecycle states of a simulation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// The session exists but the clock has never advanced.
    NotStarted,
    /// The clock is advancing and entities mutate every tick.
    Running,
    /// The clock is held; no simulation work occurs until resume.
    Paused,
    /// Terminal state entered when the last life is lost.
    Lost,
    /// Terminal state entered when the final wave is cleared.
    Won,
}

impl GamePhase {
    /// Reports whether the session has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

/// Player-selectable speed applied uniformly to all time-dependent
/// simulation quantities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedMultiplier {
    /// Real-time simulation speed.
    Normal,
    /// Twice real-time.
    Double,
    /// Four times real-time.
    Quadruple,
}

impl SpeedMultiplier {
    /// Numeric factor applied to elapsed wall-clock time.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
            Self::Quadruple => 4,
        }
    }

    /// Scales a wall-clock delta into simulated time.
    #[must_use]
    pub fn scale(self, dt: Duration) -> Duration {
        dt.saturating_mul(self.factor())
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The ledger balance cannot cover the tower's purchase price.
    InsufficientFunds,
    /// The candidate position lies outside the playing field.
    OutOfBounds,
    /// The candidate position sits too close to a path waypoint.
    BlockedByPath,
    /// The candidate position sits too close to an existing tower.
    BlockedByTower,
    /// The session already reached a terminal state.
    SessionOver,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The ledger balance cannot cover the upgrade price.
    InsufficientFunds,
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    ///
    /// The delta is expected to already carry the active speed multiplier;
    /// the world never rescales it.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new enemy enter the path at distance zero.
    SpawnEnemy {
        /// Variant of enemy to create.
        kind: EnemyKind,
        /// Wave the enemy belongs to, driving its hit points and speed.
        wave: u32,
    },
    /// Announces that a new wave has begun.
    BeginWave {
        /// One-based number of the wave that is starting.
        wave: u32,
    },
    /// Requests the session transition to won once the field is clear.
    DeclareVictory,
    /// Requests that a tower fire a single instantaneous shot at an enemy.
    FireAtEnemy {
        /// Tower performing the shot.
        tower: TowerId,
        /// Enemy receiving the damage.
        enemy: EnemyId,
    },
    /// Requests placement of a new level-1 tower at the provided position.
    PlaceTower {
        /// Variant of tower to purchase.
        kind: TowerKind,
        /// Center of the tower on the field.
        position: FieldPoint,
    },
    /// Requests that an existing tower advance one upgrade level.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that an existing tower be sold for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Starts a session that has never run.
    Start,
    /// Holds a running session.
    Pause,
    /// Releases a paused session.
    Resume,
    /// Resets the session to its initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new lifecycle phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
    /// Announces that a new wave has begun spawning.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Variant of the spawned enemy.
        kind: EnemyKind,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// Confirms that an enemy was destroyed by tower fire.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Currency credited to the ledger.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyExited {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives remaining after the deduction.
        lives_remaining: u32,
    },
    /// Confirms that a tower fired a shot.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage applied by the shot.
        damage: f32,
    },
    /// Confirms that a tower was purchased and placed.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Variant of tower that was placed.
        kind: TowerKind,
        /// Center of the tower on the field.
        position: FieldPoint,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Variant of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the placement request.
        position: FieldPoint,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced one upgrade level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower now holds.
        level: u32,
    },
    /// Reports that a tower upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Currency credited to the ledger.
        refund: u32,
    },
    /// Reports that a sale request referenced a nonexistent tower.
    TowerSaleRejected {
        /// Identifier provided in the sale request.
        tower: TowerId,
    },
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Wave the enemy belongs to.
    pub wave: u32,
    /// Arc-length distance traveled along the path.
    pub distance: f32,
    /// Position derived from the traveled distance.
    pub position: FieldPoint,
    /// Current hit points.
    pub hp: f32,
    /// Hit points the enemy spawned with.
    pub max_hp: f32,
    /// Movement speed in field units per second.
    pub speed: f32,
}

/// Read-only snapshot describing all live enemies.
///
/// Iteration order is spawn order, which is the registry order that targeting
/// depends on.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Variant of the tower.
    pub kind: TowerKind,
    /// Fixed center of the tower on the field.
    pub position: FieldPoint,
    /// Current upgrade level, starting at 1.
    pub level: u32,
    /// Time remaining until the tower may fire again.
    pub cooldown_remaining: Duration,
    /// Facing angle in radians toward the last target.
    pub facing: f32,
    /// Cumulative damage dealt over the tower's lifetime.
    pub damage_dealt: f32,
}

impl TowerSnapshot {
    /// Reports whether the tower's cooldown has fully elapsed.
    #[must_use]
    pub fn ready_to_fire(&self) -> bool {
        self.cooldown_remaining.is_zero()
    }
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the provided tower identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Snapshot of a purely visual projectile streak.
///
/// Damage is applied instantaneously at fire time; the projectile only
/// records the shot for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Muzzle position the shot originated from.
    pub from: FieldPoint,
    /// Enemy position captured when the shot was fired.
    pub to: FieldPoint,
    /// Color of the streak.
    pub tint: Tint,
    /// Remaining fraction of the visual lifetime in `[0, 1]`.
    pub remaining: f32,
}

/// Snapshot of an ephemeral particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Current position of the particle.
    pub position: FieldPoint,
    /// Drift applied each second.
    pub velocity: FieldVector,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
    /// Color of the particle.
    pub tint: Tint,
}

/// Snapshot of a floating combat-text entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingTextSnapshot {
    /// Current position of the text anchor.
    pub position: FieldPoint,
    /// Text displayed to the player.
    pub text: String,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
    /// Color of the text.
    pub tint: Tint,
}

/// Scalar HUD state republished to the view layer every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Current currency balance.
    pub money: u32,
    /// Lives remaining before the session is lost.
    pub lives: u32,
    /// One-based number of the current wave.
    pub wave: u32,
    /// Lifecycle phase of the session.
    pub phase: GamePhase,
}
