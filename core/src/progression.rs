use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Special abilities the player may unlock with upgrade points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    /// Fires two diverging shots while active.
    DoubleShot,
    /// Passively regenerates health once unlocked.
    HealthRegen,
    /// Halves the simulation rate of monsters while active.
    SlowTime,
    /// Passively makes shots splash nearby monsters once unlocked.
    ExplosiveShot,
}

impl Ability {
    /// Every ability in roster order.
    pub const ALL: [Ability; 4] = [
        Self::DoubleShot,
        Self::HealthRegen,
        Self::SlowTime,
        Self::ExplosiveShot,
    ];

    /// Upgrade points required to unlock the ability.
    #[must_use]
    pub const fn unlock_cost(self) -> u32 {
        match self {
            Self::DoubleShot => 3,
            Self::HealthRegen => 2,
            Self::SlowTime => 4,
            Self::ExplosiveShot => 3,
        }
    }

    /// Reports whether the ability must be activated and then cools down,
    /// as opposed to applying permanently once unlocked.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::DoubleShot | Self::SlowTime)
    }

    const fn index(self) -> usize {
        match self {
            Self::DoubleShot => 0,
            Self::HealthRegen => 1,
            Self::SlowTime => 2,
            Self::ExplosiveShot => 3,
        }
    }
}

/// Upgrades purchasable while the game is in upgrade mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    /// Raises shot damage.
    Damage,
    /// Raises maximum health and heals by the same amount.
    Health,
    /// Raises movement speed.
    Speed,
    /// Unlocks a special ability.
    Unlock(Ability),
}

impl Upgrade {
    /// Upgrade points required to purchase the upgrade.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Damage | Self::Health | Self::Speed => 1,
            Self::Unlock(ability) => ability.unlock_cost(),
        }
    }
}

/// Unlock and timer state for a single ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AbilityStatus {
    /// Whether the ability has been purchased.
    pub unlocked: bool,
    /// Remaining active time for timed abilities.
    pub active_remaining: Duration,
    /// Remaining cooldown before a timed ability may be activated again.
    pub cooldown_remaining: Duration,
}

impl AbilityStatus {
    /// Reports whether the ability currently affects gameplay.
    ///
    /// Passive abilities are active as soon as they are unlocked.
    #[must_use]
    pub fn is_active(&self, ability: Ability) -> bool {
        if !self.unlocked {
            return false;
        }
        if ability.is_timed() {
            !self.active_remaining.is_zero()
        } else {
            true
        }
    }

    /// Reports whether a timed ability may be activated right now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.unlocked && self.active_remaining.is_zero() && self.cooldown_remaining.is_zero()
    }
}

/// Status of every ability indexed by [`Ability`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AbilityRoster {
    statuses: [AbilityStatus; 4],
}

impl AbilityRoster {
    /// Status of the provided ability.
    #[must_use]
    pub const fn get(&self, ability: Ability) -> AbilityStatus {
        self.statuses[ability.index()]
    }

    /// Mutable status of the provided ability.
    pub fn get_mut(&mut self, ability: Ability) -> &mut AbilityStatus {
        &mut self.statuses[ability.index()]
    }

    /// Reports whether the ability currently affects gameplay.
    #[must_use]
    pub fn is_active(&self, ability: Ability) -> bool {
        self.get(ability).is_active(ability)
    }

    /// Iterator over every ability with its status.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, AbilityStatus)> + '_ {
        Ability::ALL
            .into_iter()
            .map(|ability| (ability, self.get(ability)))
    }
}
