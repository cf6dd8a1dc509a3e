use std::time::Duration;

use glam::Vec2;
use raycrawl_core::{
    Ability, CellCoord, Command, Event, GameMode, MonsterId, MonsterKind, Upgrade,
};
use raycrawl_system_combat::Combat;
use raycrawl_world::{self as world, query, Campaign, LevelDefinition, Rules, World};

fn range() -> World {
    let rows = [
        "1111111111111111",
        "1000000000000001",
        "1000000000000001",
        "1000000000000001",
        "1111111111111111",
    ];
    let level = LevelDefinition::from_digit_rows(
        &rows,
        64.0,
        CellCoord::new(1, 2),
        Duration::from_secs(300),
        20,
    )
    .expect("valid level");
    World::with_campaign(
        Campaign::new(vec![level]).expect("campaign"),
        Rules::default(),
    )
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn spawn(world: &mut World, kind: MonsterKind, position: Vec2) -> MonsterId {
    match apply(world, Command::SpawnMonster { kind, position }).as_slice() {
        [Event::MonsterSpawned { monster, .. }] => *monster,
        other => panic!("spawn rejected: {other:?}"),
    }
}

/// Runs one frame of the fire pipeline and returns the resulting events.
fn fire(world: &mut World, combat: &mut Combat) -> Vec<Event> {
    let mut commands = Vec::new();
    combat.handle(
        query::game_mode(world),
        true,
        &query::player(world),
        &query::monster_view(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn cool_down(world: &mut World) {
    let _ = apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
    );
}

#[test]
fn five_base_shots_kill_a_normal_monster() {
    let mut world = range();
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(500.0, 160.0));
    let mut combat = Combat::default();

    let mut experience_grants = 0;
    for shot in 1..=5 {
        let events = fire(&mut world, &mut combat);
        assert!(events.contains(&Event::WeaponFired { heading: 0.0 }));
        let killed = events
            .iter()
            .filter(|event| matches!(event, Event::MonsterKilled { .. }))
            .count();
        experience_grants += killed;
        assert_eq!(killed, usize::from(shot == 5), "shot {shot}");
        cool_down(&mut world);
    }

    assert_eq!(experience_grants, 1);
    assert_eq!(query::kills(&world), 1);
    assert_eq!(query::player(&world).experience, 10);
    assert!(query::monster_view(&world).get(monster).is_none());
}

#[test]
fn shots_inside_the_cooldown_are_dropped() {
    let mut world = range();
    let _ = spawn(&mut world, MonsterKind::Normal, Vec2::new(500.0, 160.0));
    let mut combat = Combat::default();

    assert!(!fire(&mut world, &mut combat).is_empty());
    assert!(fire(&mut world, &mut combat).is_empty());
    let _ = apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(50),
        },
    );
    assert!(fire(&mut world, &mut combat).is_empty());
    cool_down(&mut world);
    assert!(!fire(&mut world, &mut combat).is_empty());
}

#[test]
fn missed_shot_still_fires() {
    let mut world = range();
    let _ = spawn(&mut world, MonsterKind::Normal, Vec2::new(500.0, 96.0));
    let mut combat = Combat::default();

    let events = fire(&mut world, &mut combat);
    assert_eq!(events, vec![Event::WeaponFired { heading: 0.0 }]);
}

#[test]
fn explosive_shots_splash_neighbours() {
    let mut world = range();
    unlock(&mut world, Ability::ExplosiveShot);

    let primary = spawn(&mut world, MonsterKind::Elite, Vec2::new(400.0, 160.0));
    let near = spawn(&mut world, MonsterKind::Elite, Vec2::new(420.0, 230.0));
    let far = spawn(&mut world, MonsterKind::Elite, Vec2::new(700.0, 96.0));
    let mut combat = Combat::default();

    let events = fire(&mut world, &mut combat);
    let damaged: Vec<(MonsterId, f32)> = events
        .iter()
        .filter_map(|event| match event {
            Event::MonsterDamaged { monster, amount, .. } => Some((*monster, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(damaged, vec![(primary, 10.0), (near, 5.0)]);
    assert!(!damaged.iter().any(|(monster, _)| *monster == far));
}

/// Earns upgrade points by killing bosses far down the range, then buys the
/// ability.
fn unlock(world: &mut World, ability: Ability) {
    loop {
        if query::game_mode(world) == GameMode::Upgrade {
            if query::player(world).upgrade_points >= ability.unlock_cost() {
                let _ = apply(
                    world,
                    Command::PurchaseUpgrade {
                        upgrade: Upgrade::Unlock(ability),
                    },
                );
                let _ = apply(
                    world,
                    Command::SetGameMode {
                        mode: GameMode::Running,
                    },
                );
                return;
            }
            let _ = apply(
                world,
                Command::SetGameMode {
                    mode: GameMode::Running,
                },
            );
        }

        let target = spawn(world, MonsterKind::Boss, Vec2::new(900.0, 224.0));
        let _ = apply(
            world,
            Command::DamageMonster {
                monster: target,
                amount: 1_000.0,
            },
        );
    }
}
