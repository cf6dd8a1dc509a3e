use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Byte RGB triple describing the tint associated with a monster kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Kinds of monsters that inhabit the dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Common monster with baseline statistics.
    Normal,
    /// Tougher, faster variant.
    Elite,
    /// Slow, heavily armoured monster with a timed rage ability.
    Boss,
}

impl MonsterKind {
    /// Every monster kind in spawn-weight order.
    pub const ALL: [MonsterKind; 3] = [Self::Normal, Self::Elite, Self::Boss];

    /// Base statistics for the kind on the first dungeon level.
    #[must_use]
    pub const fn template(self) -> MonsterTemplate {
        match self {
            Self::Normal => MonsterTemplate {
                max_health: 50.0,
                speed: 120.0,
                damage: 10.0,
                attack_range: 40.0,
                detection_range: 200.0,
                size: 15.0,
                experience: 10,
                attack_cooldown: Duration::from_secs(1),
                sprite_scale: 1.0,
                color: Rgb::new(255, 0, 0),
            },
            Self::Elite => MonsterTemplate {
                max_health: 100.0,
                speed: 150.0,
                damage: 15.0,
                attack_range: 50.0,
                detection_range: 250.0,
                size: 20.0,
                experience: 25,
                attack_cooldown: Duration::from_secs(1),
                sprite_scale: 1.5,
                color: Rgb::new(255, 165, 0),
            },
            Self::Boss => MonsterTemplate {
                max_health: 200.0,
                speed: 90.0,
                damage: 25.0,
                attack_range: 60.0,
                detection_range: 300.0,
                size: 30.0,
                experience: 50,
                attack_cooldown: Duration::from_secs(1),
                sprite_scale: 2.25,
                color: Rgb::new(255, 0, 128),
            },
        }
    }

    /// Statistics for the kind scaled to the provided one-based dungeon level.
    #[must_use]
    pub fn template_for_level(self, dungeon_level: u32) -> MonsterTemplate {
        self.template().scaled_for_level(dungeon_level)
    }
}

/// Fixed statistics shared by every monster of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    /// Health the monster spawns with.
    pub max_health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt by a single attack.
    pub damage: f32,
    /// Distance within which the monster may attack.
    pub attack_range: f32,
    /// Distance within which the monster notices the player.
    pub detection_range: f32,
    /// Collision radius used by hit-scan shots.
    pub size: f32,
    /// Experience granted to the player on a kill.
    pub experience: u32,
    /// Delay between two attacks of the same monster.
    pub attack_cooldown: Duration,
    /// Relative sprite scale used by presenters.
    pub sprite_scale: f32,
    /// Tint used by presenters and the procedural fallback shape.
    pub color: Rgb,
}

impl MonsterTemplate {
    /// Applies per-level multiplicative scaling.
    ///
    /// Health grows by 20% and damage by 10% per level beyond the first, while
    /// experience is multiplied by the level itself.
    #[must_use]
    pub fn scaled_for_level(self, dungeon_level: u32) -> Self {
        let level = dungeon_level.max(1);
        let steps = (level - 1) as f32;
        Self {
            max_health: self.max_health * (1.0 + 0.2 * steps),
            damage: self.damage * (1.0 + 0.1 * steps),
            experience: self.experience.saturating_mul(level),
            ..self
        }
    }
}
