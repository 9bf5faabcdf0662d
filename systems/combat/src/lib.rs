#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects targets and queues firing commands.
//!
//! Target selection is first-match in registry order: each ready tower scans
//! live enemies in spawn order and fires at the first one inside its
//! level-scaled range. This is deliberately not nearest-match; the enemy that
//! entered the field earliest soaks fire first whenever several are in range,
//! and the behavior is part of the engine's documented contract.

use rampart_core::{Command, EnemyView, GamePhase, TowerView};

/// Combat system that queues one firing command per ready tower with a
/// target in range.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireAtEnemy` entries for towers ready to fire.
    pub fn handle(
        &mut self,
        phase: GamePhase,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Running {
            return;
        }

        if enemies.is_empty() {
            return;
        }

        self.scratch.clear();

        for tower in towers.iter() {
            if !tower.ready_to_fire() {
                continue;
            }

            let range = tower.kind.range_at(tower.level);
            let target = enemies
                .iter()
                .find(|enemy| tower.position.distance_to(enemy.position) <= range);

            if let Some(enemy) = target {
                self.scratch.push(Command::FireAtEnemy {
                    tower: tower.id,
                    enemy: enemy.id,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{
        EnemyId, EnemyKind, EnemySnapshot, FieldPoint, TowerId, TowerKind, TowerSnapshot,
    };
    use std::time::Duration;

    fn tower(id: u32, kind: TowerKind, position: FieldPoint, ready: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            position,
            level: 1,
            cooldown_remaining: if ready {
                Duration::ZERO
            } else {
                Duration::from_millis(300)
            },
            facing: 0.0,
            damage_dealt: 0.0,
        }
    }

    fn enemy(id: u32, position: FieldPoint) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Soldier,
            wave: 1,
            distance: 0.0,
            position,
            hp: 50.0,
            max_hp: 50.0,
            speed: 6.0,
        }
    }

    #[test]
    fn paused_sessions_are_silent() {
        let mut system = Combat::new();
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            TowerKind::Rapid,
            FieldPoint::new(50.0, 50.0),
            true,
        )]);
        let enemies = EnemyView::from_snapshots(vec![enemy(0, FieldPoint::new(52.0, 50.0))]);
        let mut out = Vec::new();

        system.handle(GamePhase::Paused, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn first_enemy_in_spawn_order_is_targeted() {
        let mut system = Combat::new();
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            TowerKind::Rapid,
            FieldPoint::new(50.0, 50.0),
            true,
        )]);
        // Enemy 7 spawned earlier than enemy 9 but sits farther away; both
        // are in range, so the earlier spawn is chosen.
        let enemies = EnemyView::from_snapshots(vec![
            enemy(9, FieldPoint::new(51.0, 50.0)),
            enemy(7, FieldPoint::new(60.0, 50.0)),
        ]);
        let mut out = Vec::new();

        system.handle(GamePhase::Running, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::FireAtEnemy {
                tower: TowerId::new(0),
                enemy: EnemyId::new(7),
            }],
        );
    }

    #[test]
    fn cooling_towers_and_distant_enemies_are_skipped() {
        let mut system = Combat::new();
        let towers = TowerView::from_snapshots(vec![
            tower(0, TowerKind::Rapid, FieldPoint::new(10.0, 10.0), false),
            tower(1, TowerKind::Rapid, FieldPoint::new(50.0, 50.0), true),
            tower(2, TowerKind::Rapid, FieldPoint::new(90.0, 90.0), true),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(4, FieldPoint::new(55.0, 50.0))]);
        let mut out = Vec::new();

        system.handle(GamePhase::Running, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::FireAtEnemy {
                tower: TowerId::new(1),
                enemy: EnemyId::new(4),
            }],
        );
    }

    #[test]
    fn upgraded_towers_reach_farther() {
        let mut system = Combat::new();
        let mut upgraded = tower(0, TowerKind::Rapid, FieldPoint::new(50.0, 50.0), true);
        upgraded.level = 5;
        let towers = TowerView::from_snapshots(vec![upgraded]);
        // Outside the level-1 radius of 18 but inside the level-5 radius.
        let enemies = EnemyView::from_snapshots(vec![enemy(0, FieldPoint::new(70.0, 50.0))]);
        let mut out = Vec::new();

        system.handle(GamePhase::Running, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }
}
