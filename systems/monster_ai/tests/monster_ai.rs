use std::time::Duration;

use glam::Vec2;
use raycrawl_core::{Ability, CellCoord, Command, Event, GameMode, MonsterId, MonsterKind, Upgrade};
use raycrawl_system_monster_ai::{BehaviorState, Config, MonsterAi};
use raycrawl_world::{self as world, query, Campaign, LevelDefinition, Rules, World};

const ROWS: [&str; 7] = [
    "1111111111111111111111111",
    "1000000000000000000000001",
    "1000000000000000000000001",
    "1000000000100000000000001",
    "1000000000000000000000001",
    "1000000000000000000000001",
    "1111111111111111111111111",
];

fn hall() -> World {
    let level = LevelDefinition::from_digit_rows(
        &ROWS,
        64.0,
        CellCoord::new(1, 3),
        Duration::from_secs(300),
        10,
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
    let events = apply(world, Command::SpawnMonster { kind, position });
    match events.as_slice() {
        [Event::MonsterSpawned { monster, .. }] => *monster,
        other => panic!("spawn rejected: {other:?}"),
    }
}

fn think(world: &mut World, ai: &mut MonsterAi, dt: Duration) -> Vec<Command> {
    let events = apply(world, Command::Tick { dt });
    let mut commands = Vec::new();
    ai.handle(
        &events,
        query::map(world),
        &query::player(world),
        &query::monster_view(world),
        &mut commands,
    );
    commands
}

#[test]
fn detected_monster_closes_in() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(224.0, 224.0));
    let mut ai = MonsterAi::default();

    let commands = think(&mut world, &mut ai, Duration::from_millis(500));
    assert_eq!(
        commands,
        vec![Command::MoveMonster {
            monster,
            to: Vec2::new(164.0, 224.0),
        }]
    );
    assert_eq!(ai.state(monster), Some(BehaviorState::Pursuing));
}

#[test]
fn distant_monster_idles() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(1_200.0, 224.0));
    let mut ai = MonsterAi::default();

    assert!(think(&mut world, &mut ai, Duration::from_millis(100)).is_empty());
    assert_eq!(ai.state(monster), Some(BehaviorState::OutOfRange));
}

#[test]
fn wall_blocks_the_step() {
    let mut world = hall();
    let _ = apply(
        &mut world,
        Command::MovePlayer {
            delta: Vec2::new(512.0, 0.0),
        },
    );
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(736.0, 224.0));
    let mut ai = MonsterAi::default();

    let commands = think(&mut world, &mut ai, Duration::from_millis(500));
    assert!(commands.is_empty(), "step into the pillar must be held");
    assert_eq!(ai.state(monster), Some(BehaviorState::Pursuing));
}

#[test]
fn monster_in_reach_attacks_once_per_cooldown() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(120.0, 224.0));
    let mut ai = MonsterAi::default();

    let commands = think(&mut world, &mut ai, Duration::from_millis(16));
    assert_eq!(commands, vec![Command::MonsterAttack { monster }]);
    let _ = apply(&mut world, Command::MonsterAttack { monster });
    assert_eq!(ai.state(monster), Some(BehaviorState::Attacking));

    assert!(think(&mut world, &mut ai, Duration::from_millis(16)).is_empty());
    assert!((query::player(&world).health - 90.0).abs() < f32::EPSILON);
}

#[test]
fn far_monsters_despawn_without_yield() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Elite, Vec2::new(1_500.0, 224.0));
    let mut ai = MonsterAi::new(Config::new(0).with_despawn_distance(1_000.0));

    let commands = think(&mut world, &mut ai, Duration::from_millis(16));
    assert_eq!(commands, vec![Command::DespawnMonster { monster }]);
    let events = apply(&mut world, Command::DespawnMonster { monster });
    assert_eq!(events, vec![Event::MonsterDespawned { monster }]);
    assert_eq!(query::player(&world).experience, 0);
    assert_eq!(ai.state(monster), None);
}

#[test]
fn slow_time_halves_monster_steps() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Normal, Vec2::new(224.0, 224.0));
    let mut ai = MonsterAi::default();

    force_unlock(&mut world, Ability::SlowTime);
    let activated = apply(
        &mut world,
        Command::ActivateAbility {
            ability: Ability::SlowTime,
        },
    );
    assert_eq!(
        activated,
        vec![Event::AbilityActivated {
            ability: Ability::SlowTime,
        }]
    );

    let commands = think(&mut world, &mut ai, Duration::from_millis(500));
    assert_eq!(
        commands,
        vec![Command::MoveMonster {
            monster,
            to: Vec2::new(194.0, 224.0),
        }]
    );
}

#[test]
fn eager_boss_rages() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Boss, Vec2::new(352.0, 224.0));
    let mut ai = MonsterAi::new(Config::new(4).with_boss_ability_rate(1_000.0));

    let commands = think(&mut world, &mut ai, Duration::from_millis(100));
    assert_eq!(
        commands.first(),
        Some(&Command::ActivateMonsterAbility { monster })
    );
    assert_eq!(ai.state(monster), Some(BehaviorState::SpecialAbility));
}

#[test]
fn boss_rages_beyond_detection_range() {
    let mut world = hall();
    let monster = spawn(&mut world, MonsterKind::Boss, Vec2::new(1_200.0, 224.0));
    let mut ai = MonsterAi::new(Config::new(4).with_boss_ability_rate(1_000.0));

    let commands = think(&mut world, &mut ai, Duration::from_millis(100));
    assert_eq!(commands, vec![Command::ActivateMonsterAbility { monster }]);
    assert_eq!(ai.state(monster), Some(BehaviorState::SpecialAbility));
}

/// Earns upgrade points by killing bosses, then buys the ability.
fn force_unlock(world: &mut World, ability: Ability) {
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

        let target = spawn(world, MonsterKind::Boss, Vec2::new(1_000.0, 96.0));
        let _ = apply(
            world,
            Command::DamageMonster {
                monster: target,
                amount: 1_000.0,
            },
        );
    }
}
