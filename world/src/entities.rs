use std::time::Duration;

use glam::Vec2;
use raycrawl_core::{
    Ability, AbilityRoster, Event, MonsterId, MonsterKind, MonsterSnapshot, MonsterTemplate,
    PickupId, PickupSnapshot, PlayerSnapshot,
};

use crate::Rules;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) angle: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) experience_threshold: u32,
    pub(crate) upgrade_points: u32,
    pub(crate) abilities: AbilityRoster,
    last_hit: Option<Duration>,
    last_shot: Option<Duration>,
}

impl Player {
    pub(crate) fn new(rules: &Rules, spawn: Vec2) -> Self {
        Self {
            position: spawn,
            angle: 0.0,
            health: rules.player_max_health,
            max_health: rules.player_max_health,
            speed: rules.player_speed,
            damage: rules.player_damage,
            level: 1,
            experience: 0,
            experience_threshold: rules.experience_threshold,
            upgrade_points: 0,
            abilities: AbilityRoster::default(),
            last_hit: None,
            last_shot: None,
        }
    }

    /// Applies damage unless the invulnerability window from the previous hit
    /// is still open. Blocked hits leave the window untouched.
    pub(crate) fn take_damage(&mut self, amount: f32, now: Duration, window: Duration) -> bool {
        if self.invulnerable_for(now, window) > Duration::ZERO {
            return false;
        }

        self.health = (self.health - amount).max(0.0);
        self.last_hit = Some(now);
        true
    }

    pub(crate) fn invulnerable_for(&self, now: Duration, window: Duration) -> Duration {
        self.last_hit.map_or(Duration::ZERO, |hit| {
            window.saturating_sub(now.saturating_sub(hit))
        })
    }

    /// Restores health up to the maximum, returning the amount applied.
    pub(crate) fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub(crate) fn weapon_ready_in(&self, now: Duration, cooldown: Duration) -> Duration {
        self.last_shot.map_or(Duration::ZERO, |shot| {
            cooldown.saturating_sub(now.saturating_sub(shot))
        })
    }

    pub(crate) fn record_shot(&mut self, now: Duration) {
        self.last_shot = Some(now);
    }

    /// Adds experience and resolves every threshold crossed, returning the
    /// number of levels gained.
    pub(crate) fn grant_experience(&mut self, amount: u32, rules: &Rules) -> u32 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while self.experience_threshold > 0 && self.experience >= self.experience_threshold {
            self.experience -= self.experience_threshold;
            let grown = (self.experience_threshold as f32 * rules.threshold_growth).round();
            self.experience_threshold = (grown as u32).max(self.experience_threshold + 1);
            self.level += 1;
            self.upgrade_points = self.upgrade_points.saturating_add(rules.points_per_level);
            gained += 1;
        }
        gained
    }

    pub(crate) fn tick_abilities(&mut self, dt: Duration, rules: &Rules, out: &mut Vec<Event>) {
        for ability in Ability::ALL {
            if !ability.is_timed() {
                continue;
            }

            let status = self.abilities.get_mut(ability);
            if status.active_remaining > Duration::ZERO {
                status.active_remaining = status.active_remaining.saturating_sub(dt);
                if status.active_remaining.is_zero() {
                    status.cooldown_remaining = rules.ability_cooldown;
                    out.push(Event::AbilityExpired { ability });
                }
            } else {
                status.cooldown_remaining = status.cooldown_remaining.saturating_sub(dt);
            }
        }

        if self.abilities.is_active(Ability::HealthRegen) && self.health > 0.0 {
            let _ = self.heal(rules.regen_per_second * dt.as_secs_f32());
        }
    }

    pub(crate) fn snapshot(&self, now: Duration, rules: &Rules) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            angle: self.angle,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            damage: self.damage,
            level: self.level,
            experience: self.experience,
            experience_threshold: self.experience_threshold,
            upgrade_points: self.upgrade_points,
            weapon_ready_in: self.weapon_ready_in(now, rules.shot_cooldown),
            since_last_shot: self.last_shot.map(|shot| now.saturating_sub(shot)),
            invulnerable_for: self.invulnerable_for(now, rules.invulnerability),
            abilities: self.abilities,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) kind: MonsterKind,
    pub(crate) template: MonsterTemplate,
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    attack_ready_in: Duration,
    ability_remaining: Duration,
    ability_cooldown: Duration,
    flash_remaining: Duration,
}

impl Monster {
    pub(crate) fn new(id: MonsterId, kind: MonsterKind, dungeon_level: u32, position: Vec2) -> Self {
        let template = kind.template_for_level(dungeon_level);
        Self {
            id,
            kind,
            template,
            position,
            health: template.max_health,
            attack_ready_in: Duration::ZERO,
            ability_remaining: Duration::ZERO,
            ability_cooldown: Duration::ZERO,
            flash_remaining: Duration::ZERO,
        }
    }

    pub(crate) fn ability_active(&self) -> bool {
        !self.ability_remaining.is_zero()
    }

    pub(crate) fn ability_ready(&self) -> bool {
        self.kind == MonsterKind::Boss && !self.ability_active() && self.ability_cooldown.is_zero()
    }

    pub(crate) fn attack_ready(&self) -> bool {
        self.attack_ready_in.is_zero()
    }

    fn multiplier(&self, rules: &Rules) -> f32 {
        if self.ability_active() {
            rules.monster_ability_multiplier
        } else {
            1.0
        }
    }

    pub(crate) fn effective_damage(&self, rules: &Rules) -> f32 {
        self.template.damage * self.multiplier(rules)
    }

    pub(crate) fn start_attack_cooldown(&mut self) {
        self.attack_ready_in = self.template.attack_cooldown;
    }

    pub(crate) fn activate_ability(&mut self, rules: &Rules) {
        self.ability_remaining = rules.monster_ability_duration;
    }

    /// Removes health and starts the hit flash, returning the amount applied.
    pub(crate) fn apply_damage(&mut self, amount: f32, rules: &Rules) -> f32 {
        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        self.flash_remaining = rules.hit_flash;
        before - self.health
    }

    pub(crate) fn tick(&mut self, dt: Duration, rules: &Rules, out: &mut Vec<Event>) {
        self.attack_ready_in = self.attack_ready_in.saturating_sub(dt);
        self.flash_remaining = self.flash_remaining.saturating_sub(dt);

        if self.ability_active() {
            self.ability_remaining = self.ability_remaining.saturating_sub(dt);
            if self.ability_remaining.is_zero() {
                self.ability_cooldown = rules.monster_ability_cooldown;
                out.push(Event::MonsterAbilityExpired { monster: self.id });
            }
        } else {
            self.ability_cooldown = self.ability_cooldown.saturating_sub(dt);
        }
    }

    pub(crate) fn snapshot(&self, rules: &Rules) -> MonsterSnapshot {
        let multiplier = self.multiplier(rules);
        MonsterSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.template.max_health,
            speed: self.template.speed * multiplier,
            damage: self.template.damage * multiplier,
            attack_range: self.template.attack_range,
            detection_range: self.template.detection_range,
            size: self.template.size,
            attack_ready: self.attack_ready(),
            ability_active: self.ability_active(),
            ability_ready: self.ability_ready(),
            hit_flash: !self.flash_remaining.is_zero(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) position: Vec2,
    pub(crate) pulse_phase: f32,
}

impl Pickup {
    pub(crate) fn snapshot(&self) -> PickupSnapshot {
        PickupSnapshot {
            id: self.id,
            position: self.position,
            pulse_phase: self.pulse_phase,
        }
    }
}
