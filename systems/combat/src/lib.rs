#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system resolving player shots into monster damage commands.
//!
//! A shot marches along the player's heading in unit steps and strikes the
//! first monster whose collision radius contains a sample. Walls do not stop
//! the march. Kill bookkeeping happens in the world when the damage lands.

use std::collections::BTreeMap;

use glam::Vec2;
use raycrawl_core::{
    Ability, Command, GameMode, MonsterId, MonsterSnapshot, MonsterView, PlayerSnapshot, RayMarch,
};

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    max_depth: f32,
    splash_radius: f32,
    splash_factor: f32,
    double_shot_spread: f32,
}

impl Config {
    /// Creates a configuration with the provided shot range.
    #[must_use]
    pub const fn new(max_depth: f32) -> Self {
        Self {
            max_depth,
            splash_radius: 100.0,
            splash_factor: 0.5,
            double_shot_spread: 0.1,
        }
    }

    /// Overrides the explosive splash radius and damage factor.
    #[must_use]
    pub const fn with_splash(mut self, radius: f32, factor: f32) -> Self {
        self.splash_radius = radius;
        self.splash_factor = factor;
        self
    }

    /// Maximum distance a shot travels.
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(800.0)
    }
}

/// Combat system that turns a fire request into hit-scan damage.
#[derive(Debug, Default)]
pub struct Combat {
    config: Config,
    predicted_health: BTreeMap<MonsterId, f32>,
}

impl Combat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            predicted_health: BTreeMap::new(),
        }
    }

    /// Emits `Command::FireWeapon` followed by the damage it deals when the
    /// fire control is held and the weapon is off cooldown.
    pub fn handle(
        &mut self,
        mode: GameMode,
        fire: bool,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        out: &mut Vec<Command>,
    ) {
        if !mode.is_running() || !fire || !player.weapon_ready_in.is_zero() {
            return;
        }

        out.push(Command::FireWeapon {
            heading: player.angle,
        });

        self.predicted_health.clear();
        self.predicted_health
            .extend(monsters.iter().map(|monster| (monster.id, monster.health)));

        let spread = self.config.double_shot_spread;
        let offsets = if player.abilities.is_active(Ability::DoubleShot) {
            vec![-spread, spread]
        } else {
            vec![0.0]
        };
        let explosive = player.abilities.is_active(Ability::ExplosiveShot);

        for offset in offsets {
            let heading = player.angle + offset;
            let Some(target) = self.trace(player.position, heading, monsters) else {
                continue;
            };
            self.strike(target.id, player.damage, out);

            if explosive {
                let splash = player.damage * self.config.splash_factor;
                let center = target.position;
                for nearby in monsters.iter() {
                    if nearby.id != target.id
                        && nearby.position.distance(center) < self.config.splash_radius
                    {
                        self.strike(nearby.id, splash, out);
                    }
                }
            }
        }
    }

    /// Finds the first monster still predicted alive along the heading.
    fn trace<'a>(
        &self,
        origin: Vec2,
        heading: f32,
        monsters: &'a MonsterView,
    ) -> Option<&'a MonsterSnapshot> {
        trace_shot(origin, heading, self.config.max_depth, monsters, |monster| {
            self.predicted_health
                .get(&monster)
                .map_or(false, |health| *health > 0.0)
        })
    }

    fn strike(&mut self, monster: MonsterId, amount: f32, out: &mut Vec<Command>) {
        let Some(health) = self.predicted_health.get_mut(&monster) else {
            return;
        };
        if *health <= 0.0 {
            return;
        }
        *health -= amount;
        out.push(Command::DamageMonster { monster, amount });
    }
}

/// Marches a shot from `origin` and returns the first monster struck.
///
/// A monster is struck when a sample lies strictly inside its collision
/// radius. Ties within one sample go to the lowest identifier.
pub fn trace_shot<'a, F>(
    origin: Vec2,
    heading: f32,
    max_depth: f32,
    monsters: &'a MonsterView,
    is_target: F,
) -> Option<&'a MonsterSnapshot>
where
    F: Fn(MonsterId) -> bool,
{
    RayMarch::new(origin, heading, max_depth).find_map(|sample| {
        monsters.iter().find(|monster| {
            is_target(monster.id) && sample.point.distance(monster.position) < monster.size
        })
    })
}
