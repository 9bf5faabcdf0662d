#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projects raw pointer input into simulation intents.
//!
//! The host view reports pointer positions in device pixels. This system maps
//! them into the normalized field space, resolves clicks into select or
//! place intents, and turns upgrade/sell requests for the current selection
//! into commands. Funds and collision are pre-checked only as a courtesy to
//! the UI; the world re-validates every command defensively.

use glam::Vec2;
use rampart_core::{
    Command, Event, FieldPoint, GamePhase, TowerId, TowerKind, TowerView, FIELD_EXTENT,
};

/// Radius around a tower center within which a click selects it, in field
/// units.
pub const SELECT_RADIUS: f32 = 4.0;

/// Dimensions of the host view in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a viewport description from pixel dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Maps a pointer position in device pixels onto the normalized field.
    ///
    /// Results are clamped to the field bounds, so clicks on the chrome
    /// around the playing area resolve to the nearest edge.
    #[must_use]
    pub fn project(&self, pointer: Vec2) -> FieldPoint {
        let x = if self.width > 0.0 {
            (pointer.x / self.width * FIELD_EXTENT).clamp(0.0, FIELD_EXTENT)
        } else {
            0.0
        };
        let y = if self.height > 0.0 {
            (pointer.y / self.height * FIELD_EXTENT).clamp(0.0, FIELD_EXTENT)
        } else {
            0.0
        };
        FieldPoint::new(x, y)
    }
}

/// Stateful projector that resolves pointer activity into commands.
#[derive(Debug, Default)]
pub struct InputProjector {
    armed: Option<TowerKind>,
    selected: Option<TowerId>,
}

impl InputProjector {
    /// Creates a projector with nothing armed or selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a tower kind for placement on the next field click.
    pub fn arm(&mut self, kind: TowerKind) {
        self.armed = Some(kind);
    }

    /// Clears the armed tower kind.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Tower kind currently armed for placement, if any.
    #[must_use]
    pub const fn armed(&self) -> Option<TowerKind> {
        self.armed
    }

    /// Tower currently selected, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerId> {
        self.selected
    }

    /// Reacts to world events, dropping selection state that went stale.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerSold { tower, .. } => {
                    if self.selected == Some(*tower) {
                        self.selected = None;
                    }
                }
                Event::PhaseChanged {
                    phase: GamePhase::NotStarted,
                } => {
                    self.selected = None;
                    self.armed = None;
                }
                _ => {}
            }
        }
    }

    /// Resolves a click on the field into a select or place intent.
    ///
    /// Clicking a tower selects it and emits nothing. Clicking open ground
    /// with a kind armed emits a placement command when the balance covers
    /// the price. Clicking open ground otherwise clears the selection.
    pub fn click(
        &mut self,
        point: FieldPoint,
        towers: &TowerView,
        money: u32,
        out: &mut Vec<Command>,
    ) {
        if let Some(hit) = towers
            .iter()
            .find(|tower| tower.position.distance_to(point) <= SELECT_RADIUS)
        {
            self.selected = Some(hit.id);
            return;
        }

        if let Some(kind) = self.armed {
            if money >= kind.cost() {
                out.push(Command::PlaceTower {
                    kind,
                    position: point,
                });
            }
            return;
        }

        self.selected = None;
    }

    /// Emits an upgrade command for the current selection, if any.
    pub fn upgrade_selected(&self, out: &mut Vec<Command>) {
        if let Some(tower) = self.selected {
            out.push(Command::UpgradeTower { tower });
        }
    }

    /// Emits a sell command for the current selection, if any.
    ///
    /// The selection is dropped once the world confirms the sale through
    /// [`InputProjector::handle`].
    pub fn sell_selected(&self, out: &mut Vec<Command>) {
        if let Some(tower) = self.selected {
            out.push(Command::SellTower { tower });
        }
    }
}
