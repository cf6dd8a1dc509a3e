//! Tuning and level configuration loaded from an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use raycrawl_core::{CellCoord, DEFAULT_CELL_SIZE};
use raycrawl_system_combat as combat;
use raycrawl_system_monster_ai as monster_ai;
use raycrawl_system_movement as movement;
use raycrawl_system_raycast as raycast;
use raycrawl_system_spawning as spawning;
use raycrawl_system_sprites as sprites;
use raycrawl_world::{Campaign, LevelDefinition, LevelError, Rules};
use serde::Deserialize;
use thiserror::Error;

/// Longest ray, in world units, a level may be projected or shot across.
const MAX_DEPTH_LIMIT: f32 = 16_384.0;
/// Longest spawn timer accepted, one day of play.
const MAX_INTERVAL_SECS: f32 = 86_400.0;

/// Reasons the configuration file is rejected.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the schema.
    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),
    /// A `[[levels]]` entry failed validation.
    #[error("level {index} is invalid")]
    Level {
        /// One-based position of the level in the file.
        index: usize,
        /// Validation failure.
        #[source]
        source: LevelError,
    },
    /// A tuning value is outside its allowed range.
    #[error("{field} must be {requirement}")]
    OutOfRange {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Human readable constraint.
        requirement: &'static str,
    },
}

/// `[projection]` table: viewport and window geometry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProjectionConfig {
    pub(crate) columns: usize,
    pub(crate) view_height: f32,
    pub(crate) field_of_view_degrees: f32,
    pub(crate) max_depth: f32,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            columns: 400,
            view_height: 600.0,
            field_of_view_degrees: 60.0,
            max_depth: 800.0,
            window_width: 1024,
            window_height: 720,
        }
    }
}

/// `[player]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerConfig {
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) mouse_sensitivity: f32,
    pub(crate) invulnerability_ms: u64,
    pub(crate) shot_cooldown_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            max_health: rules.player_max_health,
            speed: rules.player_speed,
            damage: rules.player_damage,
            mouse_sensitivity: movement::Config::default().mouse_sensitivity(),
            invulnerability_ms: rules.invulnerability.as_millis() as u64,
            shot_cooldown_ms: rules.shot_cooldown.as_millis() as u64,
        }
    }
}

/// `[spawning]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SpawningConfig {
    pub(crate) trickle_interval_secs: f32,
    pub(crate) wave_interval_secs: f32,
    pub(crate) wave_size: usize,
    pub(crate) min_player_distance: f32,
    /// Spacing between spawned entities; the level's cell size when absent.
    pub(crate) min_entity_distance: Option<f32>,
    pub(crate) kind_weights: [u32; 3],
    pub(crate) boss_wave_every: u32,
    pub(crate) heart_interval_secs: f32,
    pub(crate) max_hearts: usize,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            trickle_interval_secs: 5.0,
            wave_interval_secs: 30.0,
            wave_size: 3,
            min_player_distance: 200.0,
            min_entity_distance: None,
            kind_weights: [75, 20, 5],
            boss_wave_every: 3,
            heart_interval_secs: 5.0,
            max_hearts: 5,
        }
    }
}

/// `[combat]` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CombatConfig {
    pub(crate) splash_radius: f32,
    pub(crate) splash_factor: f32,
    pub(crate) despawn_distance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            splash_radius: 100.0,
            splash_factor: 0.5,
            despawn_distance: 1_280.0,
        }
    }
}

/// One `[[levels]]` entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelConfig {
    pub(crate) rows: Vec<String>,
    pub(crate) spawn: [u32; 2],
    #[serde(default = "default_time_limit")]
    pub(crate) time_limit_secs: u64,
    #[serde(default = "default_monster_cap")]
    pub(crate) monster_cap: usize,
    #[serde(default = "default_cell_size")]
    pub(crate) cell_size: f32,
}

fn default_time_limit() -> u64 {
    300
}

fn default_monster_cap() -> usize {
    20
}

fn default_cell_size() -> f32 {
    DEFAULT_CELL_SIZE
}

/// Complete configuration; every table is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) projection: ProjectionConfig,
    pub(crate) player: PlayerConfig,
    pub(crate) spawning: SpawningConfig,
    pub(crate) combat: CombatConfig,
    pub(crate) levels: Vec<LevelConfig>,
}

impl GameConfig {
    /// Loads the file at `path`, or the built-in defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!(
            "loaded configuration from {} ({} custom levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    /// Parses and validates a configuration document.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let projection = &self.projection;
        let player = &self.player;
        let spawning = &self.spawning;
        let combat = &self.combat;
        let checks = [
            (projection.columns > 0, "projection.columns", "positive"),
            (
                positive(projection.view_height),
                "projection.view_height",
                "positive and finite",
            ),
            (
                projection.field_of_view_degrees > 0.0 && projection.field_of_view_degrees < 180.0,
                "projection.field_of_view_degrees",
                "between 0 and 180",
            ),
            (
                projection.max_depth > 0.0 && projection.max_depth <= MAX_DEPTH_LIMIT,
                "projection.max_depth",
                "within 0..=16384",
            ),
            (
                projection.window_width > 0 && projection.window_height > 0,
                "projection.window_width/window_height",
                "positive",
            ),
            (positive(player.max_health), "player.max_health", "positive and finite"),
            (non_negative(player.speed), "player.speed", "non-negative and finite"),
            (non_negative(player.damage), "player.damage", "non-negative and finite"),
            (
                player.mouse_sensitivity.is_finite(),
                "player.mouse_sensitivity",
                "finite",
            ),
            (
                interval(spawning.trickle_interval_secs)
                    && interval(spawning.wave_interval_secs)
                    && interval(spawning.heart_interval_secs),
                "spawning intervals",
                "within 0..=86400 seconds",
            ),
            (
                non_negative(spawning.min_player_distance),
                "spawning.min_player_distance",
                "non-negative and finite",
            ),
            (
                spawning.min_entity_distance.map_or(true, non_negative),
                "spawning.min_entity_distance",
                "non-negative and finite",
            ),
            (
                spawning.kind_weights.iter().any(|weight| *weight > 0),
                "spawning.kind_weights",
                "not all zero",
            ),
            (
                non_negative(combat.splash_radius),
                "combat.splash_radius",
                "non-negative and finite",
            ),
            (
                (0.0..=1.0).contains(&combat.splash_factor),
                "combat.splash_factor",
                "within 0..=1",
            ),
            (
                positive(combat.despawn_distance),
                "combat.despawn_distance",
                "positive and finite",
            ),
        ];
        for (valid, field, requirement) in checks {
            if !valid {
                return Err(ConfigError::OutOfRange { field, requirement });
            }
        }
        Ok(())
    }

    /// Campaign described by `[[levels]]`, or the built-in one when empty.
    pub(crate) fn campaign(&self) -> Result<Campaign, ConfigError> {
        if self.levels.is_empty() {
            return Ok(Campaign::builtin());
        }

        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                LevelDefinition::from_digit_rows(
                    &level.rows,
                    level.cell_size,
                    CellCoord::new(level.spawn[0], level.spawn[1]),
                    Duration::from_secs(level.time_limit_secs),
                    level.monster_cap,
                )
                .map_err(|source| ConfigError::Level {
                    index: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Campaign::new(levels).map_err(|source| ConfigError::Level { index: 0, source })
    }

    /// World rules with the `[player]` overrides applied.
    pub(crate) fn rules(&self) -> Rules {
        Rules {
            player_max_health: self.player.max_health,
            player_speed: self.player.speed,
            player_damage: self.player.damage,
            invulnerability: Duration::from_millis(self.player.invulnerability_ms),
            shot_cooldown: Duration::from_millis(self.player.shot_cooldown_ms),
            ..Rules::default()
        }
    }

    pub(crate) fn movement(&self) -> movement::Config {
        movement::Config::new(self.player.mouse_sensitivity)
    }

    pub(crate) fn spawning(&self, seed: u64) -> spawning::Config {
        let tuning = &self.spawning;
        let [normal, elite, boss] = tuning.kind_weights;
        let config = spawning::Config::new(seed)
            .with_timers(
                Duration::from_secs_f32(tuning.trickle_interval_secs),
                Duration::from_secs_f32(tuning.wave_interval_secs),
            )
            .with_wave_size(tuning.wave_size)
            .with_min_player_distance(tuning.min_player_distance)
            .with_kind_weights(normal, elite, boss)
            .with_boss_wave_every(tuning.boss_wave_every)
            .with_hearts(
                Duration::from_secs_f32(tuning.heart_interval_secs),
                tuning.max_hearts,
            );
        match tuning.min_entity_distance {
            Some(distance) => config.with_min_entity_distance(distance),
            None => config,
        }
    }

    pub(crate) fn monster_ai(&self, seed: u64) -> monster_ai::Config {
        monster_ai::Config::new(seed).with_despawn_distance(self.combat.despawn_distance)
    }

    pub(crate) fn combat(&self) -> combat::Config {
        combat::Config::new(self.projection.max_depth)
            .with_splash(self.combat.splash_radius, self.combat.splash_factor)
    }

    pub(crate) fn projection(&self) -> raycast::Config {
        raycast::Config::new(self.projection.columns, self.projection.view_height)
            .with_field_of_view(self.projection.field_of_view_degrees.to_radians())
            .with_max_depth(self.projection.max_depth)
    }

    pub(crate) fn compositor(&self, cell_size: f32) -> sprites::Config {
        sprites::Config::new(self.projection.columns, self.projection.view_height)
            .with_field_of_view(self.projection.field_of_view_degrees.to_radians())
            .with_max_depth(self.projection.max_depth)
            .with_cell_size(cell_size)
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn interval(seconds: f32) -> bool {
    seconds > 0.0 && seconds <= MAX_INTERVAL_SECS
}
