use std::time::Duration;

/// Tunable gameplay constants enforced by the authoritative world.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Window after a hit during which further damage to the player is ignored.
    pub invulnerability: Duration,
    /// Minimum interval between two weapon shots.
    pub shot_cooldown: Duration,
    /// Maximum health of a fresh player.
    pub player_max_health: f32,
    /// Movement speed of a fresh player in world units per second.
    pub player_speed: f32,
    /// Shot damage of a fresh player.
    pub player_damage: f32,
    /// Damage added by each damage upgrade.
    pub damage_upgrade: f32,
    /// Maximum health added by each health upgrade.
    pub health_upgrade: f32,
    /// Speed added by each speed upgrade.
    pub speed_upgrade: f32,
    /// Experience required for the first level-up.
    pub experience_threshold: u32,
    /// Factor applied to the threshold after every level-up.
    pub threshold_growth: f32,
    /// Upgrade points granted per level-up.
    pub points_per_level: u32,
    /// Health restored by a pickup.
    pub pickup_heal: f32,
    /// Distance within which the player collects a pickup.
    pub pickup_radius: f32,
    /// Pickup pulse animation speed in radians per second.
    pub pulse_rate: f32,
    /// Health regenerated per second once regeneration is unlocked.
    pub regen_per_second: f32,
    /// Active time of timed abilities.
    pub ability_duration: Duration,
    /// Cooldown of timed abilities after they expire.
    pub ability_cooldown: Duration,
    /// Active time of the boss ability.
    pub monster_ability_duration: Duration,
    /// Cooldown of the boss ability after it expires.
    pub monster_ability_cooldown: Duration,
    /// Speed and damage multiplier while the boss ability is active.
    pub monster_ability_multiplier: f32,
    /// Time a monster flashes after being hit.
    pub hit_flash: Duration,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            invulnerability: Duration::from_secs(1),
            shot_cooldown: Duration::from_millis(100),
            player_max_health: 100.0,
            player_speed: 240.0,
            player_damage: 10.0,
            damage_upgrade: 5.0,
            health_upgrade: 20.0,
            speed_upgrade: 20.0,
            experience_threshold: 100,
            threshold_growth: 1.5,
            points_per_level: 2,
            pickup_heal: 20.0,
            pickup_radius: 32.0,
            pulse_rate: 6.0,
            regen_per_second: 1.0,
            ability_duration: Duration::from_secs(5),
            ability_cooldown: Duration::from_secs(30),
            monster_ability_duration: Duration::from_secs(5),
            monster_ability_cooldown: Duration::from_secs(15),
            monster_ability_multiplier: 1.5,
            hit_flash: Duration::from_millis(150),
        }
    }
}
