#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster behaviour system driving detection, pursuit, attacks and the boss
//! rage ability.
//!
//! The system never mutates monsters directly. It reads the monster view,
//! decides a [`BehaviorState`] per monster and proposes commands; the world
//! validates positions against the grid and gates attacks on cooldowns and the
//! player's invulnerability window.

use std::{collections::BTreeMap, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycrawl_core::{
    Ability, Command, Event, GridMap, MonsterId, MonsterSnapshot, MonsterView, PlayerSnapshot,
};

/// Behaviour a monster settled on during the most recent update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    /// The player is beyond detection range; the monster idles.
    OutOfRange,
    /// The player is detected but out of reach; the monster closes in.
    Pursuing,
    /// The player is within attack range.
    Attacking,
    /// A boss is raging with boosted speed and damage.
    SpecialAbility,
}

/// Configuration parameters required to construct the monster AI system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    despawn_distance: f32,
    boss_ability_rate: f32,
    slow_time_factor: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration using the provided seed and default tuning.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            despawn_distance: 1_280.0,
            boss_ability_rate: 0.6,
            slow_time_factor: 0.5,
            rng_seed,
        }
    }

    /// Overrides the distance beyond which monsters are removed without yield.
    #[must_use]
    pub const fn with_despawn_distance(mut self, distance: f32) -> Self {
        self.despawn_distance = distance;
        self
    }

    /// Overrides the expected number of boss ability activations per second
    /// of eligibility.
    #[must_use]
    pub const fn with_boss_ability_rate(mut self, rate: f32) -> Self {
        self.boss_ability_rate = rate;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pure system that proposes monster movement, attacks and ability use.
#[derive(Debug)]
pub struct MonsterAi {
    config: Config,
    rng: ChaCha8Rng,
    states: BTreeMap<MonsterId, BehaviorState>,
}

impl MonsterAi {
    /// Creates a new monster AI system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            states: BTreeMap::new(),
        }
    }

    /// Behaviour chosen for the monster in the most recent update.
    #[must_use]
    pub fn state(&self, monster: MonsterId) -> Option<BehaviorState> {
        self.states.get(&monster).copied()
    }

    /// Consumes world events and immutable views to emit monster commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        map: &GridMap,
        player: &PlayerSnapshot,
        monsters: &MonsterView,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::LevelStarted { .. } => self.states.clear(),
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                _ => {}
            }
        }

        self.states
            .retain(|id, _| monsters.get(*id).is_some());
        if dt.is_zero() {
            return;
        }

        let mut seconds = dt.as_secs_f32();
        if player.abilities.is_active(Ability::SlowTime) {
            seconds *= self.config.slow_time_factor;
        }

        for monster in monsters.iter() {
            let state = self.update_monster(monster, seconds, map, player, out);
            match state {
                Some(state) => {
                    let _ = self.states.insert(monster.id, state);
                }
                None => {
                    let _ = self.states.remove(&monster.id);
                }
            }
        }
    }

    /// Returns `None` when the monster was despawned.
    fn update_monster(
        &mut self,
        monster: &MonsterSnapshot,
        seconds: f32,
        map: &GridMap,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) -> Option<BehaviorState> {
        let offset = player.position - monster.position;
        let distance = offset.length();

        if distance > self.config.despawn_distance {
            out.push(Command::DespawnMonster {
                monster: monster.id,
            });
            return None;
        }

        let mut raging = monster.ability_active;
        if monster.ability_ready && self.roll_ability(seconds) {
            out.push(Command::ActivateMonsterAbility {
                monster: monster.id,
            });
            raging = true;
        }

        if distance > monster.detection_range {
            return Some(if raging {
                BehaviorState::SpecialAbility
            } else {
                BehaviorState::OutOfRange
            });
        }

        let state = if distance <= monster.attack_range {
            if monster.attack_ready {
                out.push(Command::MonsterAttack {
                    monster: monster.id,
                });
            }
            BehaviorState::Attacking
        } else {
            let to = monster.position + offset.normalize_or_zero() * monster.speed * seconds;
            if to != monster.position && map.is_walkable_position(to) {
                out.push(Command::MoveMonster {
                    monster: monster.id,
                    to,
                });
            }
            BehaviorState::Pursuing
        };

        if raging {
            Some(BehaviorState::SpecialAbility)
        } else {
            Some(state)
        }
    }

    /// Poisson roll so the activation chance does not depend on frame rate.
    fn roll_ability(&mut self, seconds: f32) -> bool {
        let rate = self.config.boss_ability_rate;
        if rate <= 0.0 {
            return false;
        }
        let chance = 1.0 - (-rate * seconds).exp();
        self.rng.gen::<f32>() < chance
    }
}

impl Default for MonsterAi {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_rate_never_rolls() {
        let mut ai = MonsterAi::new(Config::new(1).with_boss_ability_rate(0.0));
        assert!((0..100).all(|_| !ai.roll_ability(10.0)));
    }

    #[test]
    fn long_exposure_almost_always_rolls() {
        let mut ai = MonsterAi::new(Config::new(2).with_boss_ability_rate(50.0));
        assert!((0..100).all(|_| ai.roll_ability(1.0)));
    }
}
