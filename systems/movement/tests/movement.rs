use std::{f32::consts::FRAC_PI_4, time::Duration};

use glam::Vec2;
use raycrawl_core::{CellCoord, Command, ControlState, Event};
use raycrawl_system_movement::Movement;
use raycrawl_world::{self as world, query, Campaign, LevelDefinition, Rules, World};

fn corridor() -> World {
    let rows = ["11111", "10001", "10001", "11111"];
    let level = LevelDefinition::from_digit_rows(
        &rows,
        64.0,
        CellCoord::new(1, 1),
        Duration::from_secs(60),
        4,
    )
    .expect("valid level");
    World::with_campaign(
        Campaign::new(vec![level]).expect("campaign"),
        Rules::default(),
    )
}

fn frame(world: &mut World, movement: &mut Movement, controls: ControlState, dt: Duration) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    movement.handle(&events, &controls, &query::player(world), &mut commands);
    for command in commands {
        let mut generated = Vec::new();
        world::apply(world, command, &mut generated);
    }
}

#[test]
fn blocked_direction_is_dropped_while_the_open_one_applies() {
    let mut world = corridor();
    let mut movement = Movement::default();
    let controls = ControlState {
        forward: true,
        strafe_left: true,
        ..ControlState::default()
    };

    frame(&mut world, &mut movement, controls, Duration::from_millis(500));

    let position = query::player(&world).position;
    assert!(position.abs_diff_eq(Vec2::new(216.0, 96.0), 1e-3), "{position:?}");
}

#[test]
fn single_direction_into_a_wall_is_rejected_whole() {
    let mut world = corridor();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RotatePlayer {
            radians: -3.0 * FRAC_PI_4,
        },
        &mut events,
    );
    let mut movement = Movement::default();
    let controls = ControlState {
        forward: true,
        ..ControlState::default()
    };

    frame(&mut world, &mut movement, controls, Duration::from_millis(500));
    assert_eq!(query::player(&world).position, Vec2::new(96.0, 96.0));
}

#[test]
fn paused_world_keeps_the_player_still() {
    let mut world = corridor();
    let mut movement = Movement::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetGameMode {
            mode: raycrawl_core::GameMode::Paused,
        },
        &mut events,
    );
    assert!(matches!(events.as_slice(), [Event::GameModeChanged { .. }]));

    let controls = ControlState {
        forward: true,
        ..ControlState::default()
    };
    frame(&mut world, &mut movement, controls, Duration::from_millis(100));
    assert_eq!(query::player(&world).position, Vec2::new(96.0, 96.0));
}
