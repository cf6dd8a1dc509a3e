#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sprite compositor placing monsters and pickups into the projected view.
//!
//! Sprites are billboards: each is reduced to a screen column, a distance and
//! a size. A sprite is kept only when it lies inside the field of view, in
//! front of the wall recorded for its column, and within the draw cutoff. The
//! survivors are returned farthest first so that drawing them in order lets
//! nearer sprites cover farther ones.

use std::f32::consts::{FRAC_PI_3, PI, TAU};

use glam::Vec2;
use raycrawl_core::{
    DepthBuffer, MonsterId, MonsterKind, MonsterView, PickupId, PickupView, DEFAULT_CELL_SIZE,
};

/// Configuration parameters required to construct the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    columns: usize,
    screen_height: f32,
    field_of_view: f32,
    max_depth: f32,
    cell_size: f32,
    cutoff: f32,
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
            cell_size: DEFAULT_CELL_SIZE,
            cutoff: 0.8,
        }
    }

    /// Overrides the horizontal field of view in radians.
    #[must_use]
    pub const fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Overrides the maximum view depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Overrides the world size that maps to a full-height sprite at unit
    /// distance.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(800, 600.0)
    }
}

/// Entity a projected sprite represents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteSubject {
    /// A live monster.
    Monster {
        /// Identifier of the monster.
        id: MonsterId,
        /// Kind of the monster.
        kind: MonsterKind,
        /// Remaining health as a fraction of the maximum.
        health_fraction: f32,
        /// Whether the monster was hit recently.
        hit_flash: bool,
        /// Whether a boss ability is active.
        raging: bool,
    },
    /// An uncollected health pickup.
    Pickup {
        /// Identifier of the pickup.
        id: PickupId,
        /// Pulse animation scale.
        pulse_scale: f32,
    },
}

/// Sprite placed on screen by the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedSprite {
    /// Entity the sprite represents.
    pub subject: SpriteSubject,
    /// Euclidean distance from the viewer.
    pub distance: f32,
    /// Signed angle between the view direction and the sprite in `(-π, π]`.
    pub bearing: f32,
    /// Screen column the sprite is centred on.
    pub column: usize,
    /// Full on-screen height of the sprite in pixels.
    pub size: f32,
    /// Top edge of the sprite in pixels.
    pub top: f32,
}

/// Normalizes an angle difference into `(-π, π]`.
#[must_use]
pub fn normalize_bearing(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Compositor that reuses its sprite buffer across frames.
#[derive(Debug)]
pub struct Compositor {
    config: Config,
    sprites: Vec<ProjectedSprite>,
}

impl Compositor {
    /// Creates a compositor using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sprites: Vec::new(),
        }
    }

    /// Projects every visible monster and pickup, farthest first.
    pub fn compose(
        &mut self,
        origin: Vec2,
        view_angle: f32,
        depth: &DepthBuffer,
        monsters: &MonsterView,
        pickups: &PickupView,
    ) -> &[ProjectedSprite] {
        self.sprites.clear();

        for monster in monsters.iter() {
            let subject = SpriteSubject::Monster {
                id: monster.id,
                kind: monster.kind,
                health_fraction: if monster.max_health > 0.0 {
                    (monster.health / monster.max_health).clamp(0.0, 1.0)
                } else {
                    0.0
                },
                hit_flash: monster.hit_flash,
                raging: monster.ability_active,
            };
            if let Some(sprite) = self.project(origin, view_angle, depth, monster.position, subject)
            {
                self.sprites.push(sprite);
            }
        }

        for pickup in pickups.iter() {
            let subject = SpriteSubject::Pickup {
                id: pickup.id,
                pulse_scale: pickup.pulse_scale(),
            };
            if let Some(sprite) = self.project(origin, view_angle, depth, pickup.position, subject) {
                self.sprites.push(sprite);
            }
        }

        self.sprites
            .sort_by(|left, right| right.distance.total_cmp(&left.distance));
        &self.sprites
    }

    fn project(
        &self,
        origin: Vec2,
        view_angle: f32,
        depth: &DepthBuffer,
        position: Vec2,
        subject: SpriteSubject,
    ) -> Option<ProjectedSprite> {
        let config = &self.config;
        if config.columns == 0 {
            return None;
        }

        let offset = position - origin;
        let bearing = normalize_bearing(offset.y.atan2(offset.x) - view_angle);
        if bearing.abs() >= config.field_of_view / 2.0 {
            return None;
        }

        let screen_x = ((0.5 + bearing / config.field_of_view) * config.columns as f32).round();
        let column = (screen_x.max(0.0) as usize).min(config.columns - 1);

        let distance = offset.length();
        let wall = depth.get(column).unwrap_or(config.max_depth);
        if distance >= wall || distance >= config.cutoff * config.max_depth {
            return None;
        }

        let size = if distance > 0.0 {
            (config.screen_height / distance * config.cell_size).min(config.screen_height)
        } else {
            config.screen_height
        };

        Some(ProjectedSprite {
            subject,
            distance,
            bearing,
            column,
            size,
            top: (config.screen_height - size) / 2.0,
        })
    }
}
