use glam::Vec2;
use raycrawl_core::{
    GridMap, MonsterId, MonsterKind, MonsterSnapshot, MonsterView, PickupId, PickupSnapshot,
    PickupView,
};
use raycrawl_system_raycast::{self as raycast, Projection};
use raycrawl_system_sprites::{Compositor, Config, SpriteSubject};

const COLUMNS: usize = 8;
const HEIGHT: f32 = 600.0;

/// Twelve by five room with a single pillar three cells ahead of the viewer.
fn pillar_room() -> GridMap {
    let mut rows = vec![vec![1_u8; 12]];
    for row in 1..4 {
        let mut cells = vec![0_u8; 12];
        cells[0] = 1;
        cells[11] = 1;
        if row == 2 {
            cells[5] = 1;
        }
        rows.push(cells);
    }
    rows.push(vec![1; 12]);
    GridMap::from_rows(&rows, 64.0).expect("valid grid")
}

fn monster(id: u32, position: Vec2) -> MonsterSnapshot {
    MonsterSnapshot {
        id: MonsterId::new(id),
        kind: MonsterKind::Normal,
        position,
        health: 50.0,
        max_health: 50.0,
        speed: 60.0,
        damage: 10.0,
        attack_range: 50.0,
        detection_range: 300.0,
        size: 20.0,
        attack_ready: true,
        ability_active: false,
        ability_ready: false,
        hit_flash: false,
    }
}

fn pickup(id: u32, position: Vec2) -> PickupSnapshot {
    PickupSnapshot {
        id: PickupId::new(id),
        position,
        pulse_phase: 0.0,
    }
}

fn project(map: &GridMap, origin: Vec2) -> Projection {
    let mut projection = Projection::new(raycast::Config::new(COLUMNS, HEIGHT));
    projection.project(map, origin, 0.0);
    projection
}

#[test]
fn walls_hide_sprites_behind_them() {
    let map = pillar_room();
    let origin = Vec2::new(96.0, 160.0);
    let projection = project(&map, origin);
    let mut compositor = Compositor::new(Config::new(COLUMNS, HEIGHT));

    let monsters = MonsterView::from_snapshots(vec![
        monster(1, Vec2::new(256.0, 160.0)),
        monster(2, Vec2::new(448.0, 160.0)),
    ]);
    let sprites = compositor.compose(
        origin,
        0.0,
        projection.depth_buffer(),
        &monsters,
        &PickupView::default(),
    );

    assert_eq!(sprites.len(), 1);
    let sprite = sprites[0];
    assert_eq!(sprite.column, COLUMNS / 2);
    assert!((sprite.distance - 160.0).abs() < 1e-4);
    assert!((sprite.size - 240.0).abs() < 1e-3);
    assert!((sprite.top - 180.0).abs() < 1e-3);
    assert!(matches!(
        sprite.subject,
        SpriteSubject::Monster { id, .. } if id == MonsterId::new(1)
    ));
}

#[test]
fn sprites_are_ordered_farthest_first() {
    let map = pillar_room();
    let origin = Vec2::new(96.0, 160.0);
    let projection = project(&map, origin);
    let mut compositor = Compositor::new(Config::new(COLUMNS, HEIGHT));

    let monsters = MonsterView::from_snapshots(vec![monster(1, Vec2::new(256.0, 160.0))]);
    let pickups = PickupView::from_snapshots(vec![pickup(1, Vec2::new(200.0, 180.0))]);
    let sprites = compositor.compose(origin, 0.0, projection.depth_buffer(), &monsters, &pickups);

    assert_eq!(sprites.len(), 2);
    assert!(sprites[0].distance > sprites[1].distance);
    assert!(matches!(sprites[0].subject, SpriteSubject::Monster { .. }));
    assert!(matches!(
        sprites[1].subject,
        SpriteSubject::Pickup { pulse_scale, .. } if (pulse_scale - 1.0).abs() < f32::EPSILON
    ));
    assert_eq!(sprites[1].column, 5);
}

#[test]
fn sprites_outside_the_view_cone_are_dropped() {
    let map = pillar_room();
    let origin = Vec2::new(96.0, 160.0);
    let projection = project(&map, origin);
    let mut compositor = Compositor::new(Config::new(COLUMNS, HEIGHT));

    let monsters = MonsterView::from_snapshots(vec![
        monster(1, Vec2::new(96.0, 220.0)),
        monster(2, Vec2::new(70.0, 160.0)),
    ]);
    let sprites = compositor.compose(
        origin,
        0.0,
        projection.depth_buffer(),
        &monsters,
        &PickupView::default(),
    );
    assert!(sprites.is_empty());
}

#[test]
fn distant_sprites_fade_out_before_max_depth() {
    let map = GridMap::bordered(16, 5, 64.0);
    let origin = Vec2::new(96.0, 160.0);
    let projection = project(&map, origin);
    assert_eq!(projection.depth_buffer().get(COLUMNS / 2), Some(800.0));

    let mut compositor = Compositor::new(Config::new(COLUMNS, HEIGHT));
    let monsters = MonsterView::from_snapshots(vec![
        monster(1, Vec2::new(696.0, 160.0)),
        monster(2, Vec2::new(796.0, 160.0)),
    ]);
    let sprites = compositor.compose(
        origin,
        0.0,
        projection.depth_buffer(),
        &monsters,
        &PickupView::default(),
    );

    assert_eq!(sprites.len(), 1);
    assert!((sprites[0].distance - 600.0).abs() < 1e-3);
    assert!((sprites[0].size - 64.0).abs() < 1e-3);
}
