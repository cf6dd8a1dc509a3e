#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Raycrawl engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The grid map, the uniform-step [`RayMarch`] and the [`DepthBuffer`] also
//! live here because both the projection and the combat systems march rays
//! through the same map.

mod bestiary;
mod grid;
mod progression;
mod ray;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use bestiary::{MonsterKind, MonsterTemplate, Rgb};
pub use grid::{CellCoord, GridCell, GridMap, GridMapError, SpecialArea, DEFAULT_CELL_SIZE};
pub use progression::{Ability, AbilityRoster, AbilityStatus, Upgrade};
pub use ray::{DepthBuffer, RayMarch, RaySample, RAY_STEP};

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// The simulation advances every tick.
    Running,
    /// The player paused the game; time is frozen.
    Paused,
    /// The player levelled up and is choosing upgrades; time is frozen.
    Upgrade,
    /// The player died or ran out of time.
    GameOver,
    /// The player left the final level through its exit.
    Completed,
}

impl GameMode {
    /// Reports whether the mode advances simulation time.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Reports whether the campaign has ended and only a restart is accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Completed)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided game mode.
    SetGameMode {
        /// Mode the world should activate.
        mode: GameMode,
    },
    /// Discards all progress and restarts from the first level.
    RestartCampaign,
    /// Requests that the player move by the provided world-space offset.
    MovePlayer {
        /// Offset applied to the player position if the destination is open.
        delta: Vec2,
    },
    /// Requests that the player turn by the provided angle.
    RotatePlayer {
        /// Signed rotation in radians; positive turns clockwise on screen.
        radians: f32,
    },
    /// Requests that the player's weapon fire along the provided heading.
    FireWeapon {
        /// Heading of the primary shot in radians.
        heading: f32,
    },
    /// Requests that a monster of the given kind appear at a position.
    SpawnMonster {
        /// Kind of monster to create.
        kind: MonsterKind,
        /// World-space spawn position.
        position: Vec2,
    },
    /// Requests that a health pickup appear at a position.
    SpawnPickup {
        /// World-space spawn position.
        position: Vec2,
    },
    /// Requests that a monster move to a new position.
    MoveMonster {
        /// Identifier of the monster attempting to move.
        monster: MonsterId,
        /// Destination position.
        to: Vec2,
    },
    /// Requests that a monster strike the player.
    MonsterAttack {
        /// Identifier of the attacking monster.
        monster: MonsterId,
    },
    /// Requests that a boss enter its timed special ability.
    ActivateMonsterAbility {
        /// Identifier of the boss.
        monster: MonsterId,
    },
    /// Removes a monster without granting experience.
    DespawnMonster {
        /// Identifier of the monster to remove.
        monster: MonsterId,
    },
    /// Applies damage to a monster.
    DamageMonster {
        /// Identifier of the monster that was hit.
        monster: MonsterId,
        /// Amount of health to remove.
        amount: f32,
    },
    /// Spends upgrade points while in upgrade mode.
    PurchaseUpgrade {
        /// Upgrade to purchase.
        upgrade: Upgrade,
    },
    /// Activates a timed ability.
    ActivateAbility {
        /// Ability to activate.
        ability: Ability,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a level was loaded and its entities cleared.
    LevelStarted {
        /// One-based index of the level.
        level: u32,
        /// Position the player starts from.
        spawn: Vec2,
    },
    /// Announces that the simulation entered a new game mode.
    GameModeChanged {
        /// Mode that became active.
        mode: GameMode,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
    },
    /// Announces that the player walked into a special area from outside it.
    SpecialAreaEntered {
        /// Kind of special area that was entered.
        area: SpecialArea,
        /// Cell that triggered the effect.
        cell: CellCoord,
        /// Player position at the moment of entry.
        position: Vec2,
    },
    /// Confirms that the player's weapon fired.
    WeaponFired {
        /// Heading of the primary shot in radians.
        heading: f32,
    },
    /// Reports damage applied to the player.
    PlayerDamaged {
        /// Health removed by the hit.
        amount: f32,
        /// Remaining health after the hit.
        health: f32,
    },
    /// Reports healing applied by a pickup or upgrade.
    PlayerHealed {
        /// Health restored.
        amount: f32,
        /// Health after healing.
        health: f32,
    },
    /// Announces that the player reached a new experience level.
    PlayerLeveledUp {
        /// New player level.
        level: u32,
        /// Upgrade points available after the level-up.
        upgrade_points: u32,
    },
    /// Confirms that a monster was created.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        monster: MonsterId,
        /// Kind of monster that was created.
        kind: MonsterKind,
        /// Spawn position.
        position: Vec2,
    },
    /// Confirms that a monster moved.
    MonsterMoved {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
    },
    /// Announces that a boss entered its special ability.
    MonsterAbilityActivated {
        /// Identifier of the boss.
        monster: MonsterId,
    },
    /// Announces that a boss's special ability wore off.
    MonsterAbilityExpired {
        /// Identifier of the boss.
        monster: MonsterId,
    },
    /// Reports damage applied to a monster.
    MonsterDamaged {
        /// Identifier of the monster.
        monster: MonsterId,
        /// Health removed.
        amount: f32,
        /// Health remaining.
        health: f32,
    },
    /// Announces that a monster's health reached zero.
    MonsterKilled {
        /// Identifier of the destroyed monster.
        monster: MonsterId,
        /// Kind of the destroyed monster.
        kind: MonsterKind,
        /// Experience granted for the kill.
        experience: u32,
    },
    /// Announces that a monster was removed without a kill.
    MonsterDespawned {
        /// Identifier of the removed monster.
        monster: MonsterId,
    },
    /// Confirms that a health pickup was created.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Spawn position.
        position: Vec2,
    },
    /// Announces that the player collected a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
    },
    /// Confirms that an upgrade was purchased.
    UpgradePurchased {
        /// Purchased upgrade.
        upgrade: Upgrade,
        /// Upgrade points left afterwards.
        remaining_points: u32,
    },
    /// Announces that a timed ability became active.
    AbilityActivated {
        /// Activated ability.
        ability: Ability,
    },
    /// Announces that a timed ability ran out and began cooling down.
    AbilityExpired {
        /// Expired ability.
        ability: Ability,
    },
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a health pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Per-frame control state distilled from the raw input snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    /// Move along the facing direction.
    pub forward: bool,
    /// Move against the facing direction.
    pub backward: bool,
    /// Sidestep to the left of the facing direction.
    pub strafe_left: bool,
    /// Sidestep to the right of the facing direction.
    pub strafe_right: bool,
    /// Horizontal mouse movement in pixels since the previous frame.
    pub turn: f32,
    /// Whether the fire button is held.
    pub fire: bool,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World-space position.
    pub position: Vec2,
    /// Facing angle in radians within `[0, 2π)`.
    pub angle: f32,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Damage dealt by a single shot.
    pub damage: f32,
    /// Experience level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_threshold: u32,
    /// Unspent upgrade points.
    pub upgrade_points: u32,
    /// Time until the weapon may fire again.
    pub weapon_ready_in: Duration,
    /// Time since the weapon last fired, if it has fired this campaign.
    pub since_last_shot: Option<Duration>,
    /// Remaining invulnerability after the last hit.
    pub invulnerable_for: Duration,
    /// Unlock and timer state of every ability.
    pub abilities: AbilityRoster,
}

/// Immutable representation of a single monster used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSnapshot {
    /// Identifier allocated to the monster by the world.
    pub id: MonsterId,
    /// Kind of the monster.
    pub kind: MonsterKind,
    /// World-space position.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Health the monster spawned with.
    pub max_health: f32,
    /// Effective movement speed, including any active ability multiplier.
    pub speed: f32,
    /// Effective attack damage, including any active ability multiplier.
    pub damage: f32,
    /// Distance within which the monster may attack.
    pub attack_range: f32,
    /// Distance within which the monster notices the player.
    pub detection_range: f32,
    /// Collision radius.
    pub size: f32,
    /// Whether the attack cooldown has elapsed.
    pub attack_ready: bool,
    /// Whether the special ability is currently active.
    pub ability_active: bool,
    /// Whether the special ability may be activated.
    pub ability_ready: bool,
    /// Whether the monster was hit recently enough to flash.
    pub hit_flash: bool,
}

/// Read-only snapshot describing all monsters within the level.
#[derive(Clone, Debug, Default)]
pub struct MonsterView {
    snapshots: Vec<MonsterSnapshot>,
}

impl MonsterView {
    /// Creates a new monster view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MonsterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured monster snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single monster.
    #[must_use]
    pub fn get(&self, monster: MonsterId) -> Option<&MonsterSnapshot> {
        self.snapshots
            .binary_search_by_key(&monster, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of monsters in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no monsters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Reports whether a boss is alive.
    #[must_use]
    pub fn has_boss(&self) -> bool {
        self.snapshots
            .iter()
            .any(|snapshot| snapshot.kind == MonsterKind::Boss)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MonsterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single health pickup used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier allocated to the pickup by the world.
    pub id: PickupId,
    /// World-space position.
    pub position: Vec2,
    /// Phase of the pulse animation in radians.
    pub pulse_phase: f32,
}

impl PickupSnapshot {
    /// Scale factor of the pulse animation, oscillating within `[0.8, 1.2]`.
    #[must_use]
    pub fn pulse_scale(&self) -> f32 {
        1.0 + self.pulse_phase.sin() * 0.2
    }
}

/// Read-only snapshot describing all uncollected pickups within the level.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pickup snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Number of pickups in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no pickups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PickupSnapshot> {
        self.snapshots
    }
}

/// Aggregated read-only state consumed by HUD and menu presenters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Monsters killed on the current level.
    pub kills: u32,
    /// One-based index of the current level.
    pub dungeon_level: u32,
    /// Number of levels in the campaign.
    pub level_count: u32,
    /// Player experience level.
    pub player_level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_threshold: u32,
    /// Unspent upgrade points.
    pub upgrade_points: u32,
    /// Time left before the level's limit expires.
    pub time_remaining: Duration,
    /// Unlock and timer state of every ability.
    pub abilities: AbilityRoster,
    /// Active game mode.
    pub mode: GameMode,
}
