use std::time::Duration;

use rampart_core::{Command, EnemyId, EnemyKind, Event, FieldPoint, TowerKind};
use rampart_system_combat::Combat;
use rampart_world::{self as world, query, World};

fn armed_world() -> (World, Vec<Event>) {
    let mut w = World::new(world::Config::default()).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut w, Command::Start, &mut events);
    world::apply(
        &mut w,
        Command::PlaceTower {
            kind: TowerKind::Cannon,
            position: FieldPoint::new(10.0, 30.0),
        },
        &mut events,
    );
    (w, events)
}

fn fire_once(w: &mut World, combat: &mut Combat, events: &mut Vec<Event>) -> Vec<Command> {
    let towers = query::tower_view(w);
    let enemies = query::enemy_view(w);
    let mut commands = Vec::new();
    combat.handle(query::phase(w), &towers, &enemies, &mut commands);
    for command in commands.iter().cloned() {
        world::apply(w, command, events);
    }
    commands
}

#[test]
fn the_earliest_spawn_soaks_fire_first() {
    let (mut w, mut events) = armed_world();
    for _ in 0..2 {
        world::apply(
            &mut w,
            Command::SpawnEnemy {
                kind: EnemyKind::Soldier,
                wave: 1,
            },
            &mut events,
        );
    }

    let mut combat = Combat::new();
    let commands = fire_once(&mut w, &mut combat, &mut events);
    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        Command::FireAtEnemy { enemy, .. } if enemy == EnemyId::new(0)
    ));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::TowerFired { enemy, .. } if *enemy == EnemyId::new(0)
    )));
}

#[test]
fn firing_starts_the_cooldown_and_resumes_after_it() {
    let (mut w, mut events) = armed_world();
    world::apply(
        &mut w,
        Command::SpawnEnemy {
            kind: EnemyKind::Brute,
            wave: 1,
        },
        &mut events,
    );

    let mut combat = Combat::new();
    assert_eq!(fire_once(&mut w, &mut combat, &mut events).len(), 1);

    // The tower is now cooling; the next pass queues nothing.
    assert!(fire_once(&mut w, &mut combat, &mut events).is_empty());

    // After the cooldown elapses the tower fires again.
    world::apply(
        &mut w,
        Command::Tick {
            dt: Duration::from_millis(1200),
        },
        &mut events,
    );
    assert_eq!(fire_once(&mut w, &mut combat, &mut events).len(), 1);
}

#[test]
fn damage_accumulates_on_the_tower_snapshot() {
    let (mut w, mut events) = armed_world();
    world::apply(
        &mut w,
        Command::SpawnEnemy {
            kind: EnemyKind::Brute,
            wave: 1,
        },
        &mut events,
    );

    let mut combat = Combat::new();
    let _ = fire_once(&mut w, &mut combat, &mut events);

    let view = query::tower_view(&w);
    let tower = view.iter().next().expect("tower placed");
    assert!((tower.damage_dealt - TowerKind::Cannon.base_damage()).abs() < f32::EPSILON);
    assert!(!tower.ready_to_fire());
}
