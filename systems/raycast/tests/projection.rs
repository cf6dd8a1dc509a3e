use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use raycrawl_core::GridMap;
use raycrawl_system_raycast::{slice_height, Config, Projection};

fn room() -> GridMap {
    GridMap::bordered(5, 5, 64.0)
}

fn long_hall() -> GridMap {
    let mut rows = vec![vec![1_u8; 16]];
    rows.push(std::iter::once(1).chain(vec![0; 14]).chain(std::iter::once(1)).collect());
    rows.push(vec![1; 16]);
    GridMap::from_rows(&rows, 64.0).expect("valid grid")
}

#[test]
fn facing_wall_projects_expected_slice() {
    let map = room();
    let mut projection = Projection::new(Config::new(9, 600.0));
    projection.project(&map, Vec2::new(160.0, 160.0), 0.0);

    let center = projection.columns()[4];
    let hit = center.hit.expect("wall ahead");
    assert_eq!(hit.raw_distance, 96.0);
    assert!((hit.distance - 96.0).abs() < 1e-4);
    assert!((center.height - 400.0).abs() < 1e-3);
    assert!((center.top - 100.0).abs() < 1e-3);
    assert!((center.brightness - 0.904).abs() < 1e-4);
}

#[test]
fn depth_buffer_matches_columns_and_bounds() {
    let map = room();
    let config = Config::new(64, 480.0);
    let mut projection = Projection::new(config);

    for step in 0..16 {
        let angle = step as f32 * FRAC_PI_2 / 4.0;
        projection.project(&map, Vec2::new(150.0, 170.0), angle);

        let depth = projection.depth_buffer();
        assert_eq!(depth.len(), config.columns());
        for column in projection.columns() {
            let stored = depth.get(column.column).expect("column in range");
            assert!((0.0..=config.max_depth()).contains(&stored));
            if let Some(hit) = column.hit {
                assert!((stored - hit.distance).abs() < 1e-4);
                let expected = slice_height(hit.distance, 480.0, map.cell_size());
                assert!((column.height - expected).abs() < 1e-3);
                assert!(column.height <= 480.0);
            }
        }
    }
}

#[test]
fn rays_past_max_depth_draw_nothing() {
    let map = long_hall();
    let config = Config::new(1, 600.0);
    let mut projection = Projection::new(config);
    projection.project(&map, Vec2::new(96.0, 96.0), 0.0);

    let column = projection.columns()[0];
    assert!(column.hit.is_none());
    assert_eq!(column.height, 0.0);
    assert_eq!(
        projection.depth_buffer().get(0),
        Some(config.max_depth())
    );
}

#[test]
fn rays_along_grid_lines_still_resolve() {
    let map = room();
    let mut projection = Projection::new(Config::new(1, 600.0));
    projection.project(&map, Vec2::new(128.0, 128.0), FRAC_PI_2);

    let hit = projection.columns()[0].hit.expect("wall below");
    assert!(hit.point.y >= 256.0);
}
