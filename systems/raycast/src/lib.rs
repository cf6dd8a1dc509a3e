#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Column projection engine for the first-person view.
//!
//! One ray is cast per screen column. Each ray marches through the grid in
//! unit steps until it meets a wall or the maximum depth. Hits are corrected
//! for fisheye distortion, turned into a wall slice height and shade, and
//! recorded in a [`DepthBuffer`] that the sprite compositor tests against.

mod shading;

use std::f32::consts::FRAC_PI_3;

use glam::Vec2;
use raycrawl_core::{DepthBuffer, GridMap, RayMarch};

pub use shading::{WallSurface, PATTERN_SIZE, WALL_PATTERN};

/// Configuration parameters required to construct the projection engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    columns: usize,
    screen_height: f32,
    field_of_view: f32,
    max_depth: f32,
    falloff: f32,
    min_brightness: f32,
}

impl Config {
    /// Creates a configuration for a viewport of `columns` by `screen_height`.
    #[must_use]
    pub const fn new(columns: usize, screen_height: f32) -> Self {
        Self {
            columns,
            screen_height,
            field_of_view: FRAC_PI_3,
            max_depth: 800.0,
            falloff: 0.001,
            min_brightness: 0.2,
        }
    }

    /// Overrides the horizontal field of view in radians.
    #[must_use]
    pub const fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Overrides the distance beyond which rays stop.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Overrides the linear distance falloff and the brightness floor.
    #[must_use]
    pub const fn with_shading(mut self, falloff: f32, min_brightness: f32) -> Self {
        self.falloff = falloff;
        self.min_brightness = min_brightness;
        self
    }

    /// Number of columns cast per frame.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn screen_height(&self) -> f32 {
        self.screen_height
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub const fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Distance beyond which rays stop.
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(800, 600.0)
    }
}

/// Wall struck by a column's ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    /// Fisheye-corrected distance to the wall.
    pub distance: f32,
    /// Distance travelled along the ray.
    pub raw_distance: f32,
    /// World-space sample that entered the wall.
    pub point: Vec2,
    /// Texel class under the hit point.
    pub surface: WallSurface,
}

/// Projected wall slice for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Screen column index.
    pub column: usize,
    /// Wall struck by the ray, if any within the maximum depth.
    pub hit: Option<WallHit>,
    /// Height of the slice in pixels; zero without a hit.
    pub height: f32,
    /// Top edge of the slice in pixels.
    pub top: f32,
    /// Distance shade in `[min_brightness, 1]`; zero without a hit.
    pub brightness: f32,
}

/// Angle of the ray cast through the provided screen column.
#[must_use]
pub fn ray_angle(view_angle: f32, column: usize, columns: usize, field_of_view: f32) -> f32 {
    if columns == 0 {
        return view_angle;
    }
    let centered = column as f32 - (columns / 2) as f32;
    view_angle + centered * (field_of_view / columns as f32)
}

/// Projection engine that reuses its column and depth buffers across frames.
#[derive(Debug)]
pub struct Projection {
    config: Config,
    depth: DepthBuffer,
    columns: Vec<WallColumn>,
}

impl Projection {
    /// Creates a projection engine using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            depth: DepthBuffer::new(config.columns, config.max_depth),
            columns: Vec::with_capacity(config.columns),
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Casts every column from the viewpoint and refreshes both buffers.
    pub fn project(&mut self, map: &GridMap, origin: Vec2, view_angle: f32) {
        let config = self.config;
        self.depth.reset(config.columns, config.max_depth);
        self.columns.clear();

        for column in 0..config.columns {
            let angle = ray_angle(view_angle, column, config.columns, config.field_of_view);
            let slice = match RayMarch::new(origin, angle, config.max_depth).find_wall(map) {
                Some(sample) => {
                    let distance = sample.distance * (angle - view_angle).cos();
                    self.depth.set(column, distance);
                    let height = slice_height(distance, config.screen_height, map.cell_size());
                    WallColumn {
                        column,
                        hit: Some(WallHit {
                            distance,
                            raw_distance: sample.distance,
                            point: sample.point,
                            surface: WallSurface::sample(sample.point, map.cell_size()),
                        }),
                        height,
                        top: (config.screen_height - height) / 2.0,
                        brightness: (1.0 - distance * config.falloff)
                            .clamp(config.min_brightness, 1.0),
                    }
                }
                None => WallColumn {
                    column,
                    hit: None,
                    height: 0.0,
                    top: config.screen_height / 2.0,
                    brightness: 0.0,
                },
            };
            self.columns.push(slice);
        }
    }

    /// Wall slices of the latest projection, one per column.
    #[must_use]
    pub fn columns(&self) -> &[WallColumn] {
        &self.columns
    }

    /// Depth buffer of the latest projection.
    #[must_use]
    pub const fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }
}

/// On-screen height of a wall or sprite at the provided distance.
#[must_use]
pub fn slice_height(distance: f32, screen_height: f32, cell_size: f32) -> f32 {
    if distance <= 0.0 || !distance.is_finite() {
        return screen_height;
    }
    (screen_height / distance * cell_size).min(screen_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_column_looks_straight_ahead() {
        assert_eq!(ray_angle(1.0, 400, 800, FRAC_PI_3), 1.0);
        assert!(ray_angle(0.0, 0, 800, FRAC_PI_3) < 0.0);
    }

    #[test]
    fn odd_column_counts_use_integer_halves() {
        let step = FRAC_PI_3 / 5.0;
        assert!((ray_angle(0.0, 2, 5, FRAC_PI_3)).abs() < f32::EPSILON);
        assert!((ray_angle(0.0, 4, 5, FRAC_PI_3) - 2.0 * step).abs() < 1e-6);
    }

    #[test]
    fn close_walls_fill_the_screen() {
        assert_eq!(slice_height(10.0, 600.0, 64.0), 600.0);
        assert_eq!(slice_height(128.0, 600.0, 64.0), 300.0);
    }
}
