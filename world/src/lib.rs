#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Raycrawl.
//!
//! Every mutation flows through [`apply`]. Commands that would break a world
//! invariant (a position inside a wall, a purchase without points, an attack
//! still on cooldown) are rejected silently: no state changes and no event is
//! emitted.

mod entities;
mod levels;
mod rules;

use std::time::Duration;

use glam::Vec2;
use raycrawl_core::{
    Ability, Command, Event, GameMode, GridMap, MonsterId, MonsterKind, PickupId, SpecialArea,
    Upgrade,
};

use self::entities::{Monster, Pickup, Player};
pub use self::levels::{Campaign, LevelDefinition, LevelError};
pub use self::rules::Rules;

/// Represents the authoritative Raycrawl world state.
#[derive(Debug)]
pub struct World {
    campaign: Campaign,
    rules: Rules,
    level_index: usize,
    mode: GameMode,
    elapsed: Duration,
    level_elapsed: Duration,
    player: Player,
    monsters: Vec<Monster>,
    pickups: Vec<Pickup>,
    next_monster_id: u32,
    next_pickup_id: u32,
    kills: u32,
    occupied_area: Option<SpecialArea>,
}

impl World {
    /// Creates a world running the built-in campaign with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_campaign(Campaign::builtin(), Rules::default())
    }

    /// Creates a world positioned at the start of the first level of the
    /// provided campaign.
    #[must_use]
    pub fn with_campaign(campaign: Campaign, rules: Rules) -> Self {
        let first = campaign.level(0);
        let player = Player::new(&rules, first.spawn());
        let occupied_area = special_area_at(first.map(), first.spawn());
        Self {
            campaign,
            rules,
            level_index: 0,
            mode: GameMode::Running,
            elapsed: Duration::ZERO,
            level_elapsed: Duration::ZERO,
            player,
            monsters: Vec::new(),
            pickups: Vec::new(),
            next_monster_id: 0,
            next_pickup_id: 0,
            kills: 0,
            occupied_area,
        }
    }

    /// Creates a world that skips ahead to the level with the provided
    /// zero-based index, clamped to the last level of the campaign.
    #[must_use]
    pub fn starting_at(campaign: Campaign, rules: Rules, level_index: usize) -> Self {
        let mut world = Self::with_campaign(campaign, rules);
        if level_index > 0 {
            let mut discarded = Vec::new();
            world.start_level(level_index, &mut discarded);
        }
        world
    }

    fn level(&self) -> &LevelDefinition {
        self.campaign.level(self.level_index)
    }

    fn map(&self) -> &GridMap {
        self.level().map()
    }

    fn dungeon_level(&self) -> u32 {
        self.level_index as u32 + 1
    }

    fn monster_index(&self, monster: MonsterId) -> Option<usize> {
        self.monsters.iter().position(|entry| entry.id == monster)
    }

    fn set_mode(&mut self, mode: GameMode, out_events: &mut Vec<Event>) {
        if self.mode == mode {
            return;
        }
        log::debug!("game mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        out_events.push(Event::GameModeChanged { mode });
    }

    fn start_level(&mut self, index: usize, out_events: &mut Vec<Event>) {
        self.level_index = index.min(self.campaign.len().saturating_sub(1));
        self.monsters.clear();
        self.pickups.clear();
        self.level_elapsed = Duration::ZERO;
        self.kills = 0;

        let spawn = self.level().spawn();
        self.player.position = spawn;
        self.player.angle = 0.0;
        self.occupied_area = special_area_at(self.map(), spawn);

        log::info!(
            "entering level {} of {}",
            self.dungeon_level(),
            self.campaign.len()
        );
        out_events.push(Event::LevelStarted {
            level: self.dungeon_level(),
            spawn,
        });
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.player = Player::new(&self.rules, self.campaign.level(0).spawn());
        self.elapsed = Duration::ZERO;
        self.start_level(0, out_events);
        self.set_mode(GameMode::Running, out_events);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        self.level_elapsed = self.level_elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.player.tick_abilities(dt, &self.rules, out_events);
        for monster in &mut self.monsters {
            monster.tick(dt, &self.rules, out_events);
        }

        let phase_step = self.rules.pulse_rate * dt.as_secs_f32();
        for pickup in &mut self.pickups {
            pickup.pulse_phase = (pickup.pulse_phase + phase_step) % std::f32::consts::TAU;
        }
        self.collect_pickups(out_events);

        if self.level_elapsed >= self.level().time_limit() {
            log::info!("time limit expired on level {}", self.dungeon_level());
            self.set_mode(GameMode::GameOver, out_events);
        }
    }

    fn move_player(&mut self, delta: Vec2, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() || !delta.is_finite() {
            return;
        }

        let from = self.player.position;
        let to = from + delta;
        if !self.map().is_walkable_position(to) {
            return;
        }

        self.player.position = to;
        out_events.push(Event::PlayerMoved { from, to });
        self.collect_pickups(out_events);
        self.refresh_special_area(out_events);
    }

    /// Fires the entry effect only when the player crosses from outside a
    /// special area into it; wandering within one area never re-triggers.
    fn refresh_special_area(&mut self, out_events: &mut Vec<Event>) {
        let position = self.player.position;
        let Some(cell) = self.map().cell_of(position) else {
            return;
        };
        let area = self.map().cell(cell).and_then(|entry| entry.special_area());
        if area == self.occupied_area {
            return;
        }

        self.occupied_area = area;
        let Some(area) = area else {
            return;
        };

        out_events.push(Event::SpecialAreaEntered {
            area,
            cell,
            position,
        });

        if area == SpecialArea::Exit {
            self.advance_level(out_events);
        }
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        let next = self.level_index + 1;
        if next < self.campaign.len() {
            self.start_level(next, out_events);
        } else {
            log::info!("campaign completed");
            self.set_mode(GameMode::Completed, out_events);
        }
    }

    fn collect_pickups(&mut self, out_events: &mut Vec<Event>) {
        let position = self.player.position;
        let radius = self.rules.pickup_radius;
        let heal = self.rules.pickup_heal;
        let player = &mut self.player;

        self.pickups.retain(|pickup| {
            if pickup.position.distance(position) >= radius {
                return true;
            }

            out_events.push(Event::PickupCollected { pickup: pickup.id });
            let amount = player.heal(heal);
            if amount > 0.0 {
                out_events.push(Event::PlayerHealed {
                    amount,
                    health: player.health,
                });
            }
            false
        });
    }

    fn spawn_monster(&mut self, kind: MonsterKind, position: Vec2, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() || !self.map().is_walkable_position(position) {
            return;
        }

        let monster = MonsterId::new(self.next_monster_id);
        self.next_monster_id = self.next_monster_id.wrapping_add(1);
        self.monsters
            .push(Monster::new(monster, kind, self.dungeon_level(), position));
        out_events.push(Event::MonsterSpawned {
            monster,
            kind,
            position,
        });
    }

    fn spawn_pickup(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() || !self.map().is_walkable_position(position) {
            return;
        }

        let pickup = PickupId::new(self.next_pickup_id);
        self.next_pickup_id = self.next_pickup_id.wrapping_add(1);
        self.pickups.push(Pickup {
            id: pickup,
            position,
            pulse_phase: 0.0,
        });
        out_events.push(Event::PickupSpawned { pickup, position });
    }

    fn move_monster(&mut self, monster: MonsterId, to: Vec2, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() || !self.map().is_walkable_position(to) {
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };

        let entry = &mut self.monsters[index];
        let from = entry.position;
        entry.position = to;
        out_events.push(Event::MonsterMoved { monster, from, to });
    }

    fn monster_attack(&mut self, monster: MonsterId, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() {
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };

        let attacker = &mut self.monsters[index];
        let in_range =
            attacker.position.distance(self.player.position) <= attacker.template.attack_range;
        if !attacker.attack_ready() || !in_range {
            return;
        }

        attacker.start_attack_cooldown();
        let amount = attacker.effective_damage(&self.rules);
        if !self
            .player
            .take_damage(amount, self.elapsed, self.rules.invulnerability)
        {
            return;
        }

        out_events.push(Event::PlayerDamaged {
            amount,
            health: self.player.health,
        });
        if self.player.health <= 0.0 {
            log::info!("player died on level {}", self.dungeon_level());
            self.set_mode(GameMode::GameOver, out_events);
        }
    }

    fn activate_monster_ability(&mut self, monster: MonsterId, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() {
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };

        let boss = &mut self.monsters[index];
        if !boss.ability_ready() {
            return;
        }
        boss.activate_ability(&self.rules);
        out_events.push(Event::MonsterAbilityActivated { monster });
    }

    fn despawn_monster(&mut self, monster: MonsterId, out_events: &mut Vec<Event>) {
        let Some(index) = self.monster_index(monster) else {
            return;
        };
        let _ = self.monsters.remove(index);
        out_events.push(Event::MonsterDespawned { monster });
    }

    /// Applies damage and, when health reaches zero, performs the single kill
    /// bookkeeping pass: removal, kill count, experience and level-ups.
    fn damage_monster(&mut self, monster: MonsterId, amount: f32, out_events: &mut Vec<Event>) {
        let accepts_damage = matches!(self.mode, GameMode::Running | GameMode::Upgrade);
        if !accepts_damage || !(amount.is_finite() && amount > 0.0) {
            return;
        }
        let Some(index) = self.monster_index(monster) else {
            return;
        };

        let target = &mut self.monsters[index];
        let applied = target.apply_damage(amount, &self.rules);
        out_events.push(Event::MonsterDamaged {
            monster,
            amount: applied,
            health: target.health,
        });
        if target.health > 0.0 {
            return;
        }

        let killed = self.monsters.remove(index);
        self.kills = self.kills.saturating_add(1);
        let experience = killed.template.experience;
        out_events.push(Event::MonsterKilled {
            monster,
            kind: killed.kind,
            experience,
        });

        let gained = self.player.grant_experience(experience, &self.rules);
        if gained == 0 {
            return;
        }

        let first_new_level = self.player.level + 1 - gained;
        for offset in 0..gained {
            let level = first_new_level + offset;
            let remaining_levels = gained - offset - 1;
            let upgrade_points = self.player.upgrade_points
                - remaining_levels.saturating_mul(self.rules.points_per_level);
            out_events.push(Event::PlayerLeveledUp {
                level,
                upgrade_points,
            });
        }
        log::debug!("player reached level {}", self.player.level);
        self.set_mode(GameMode::Upgrade, out_events);
    }

    fn purchase_upgrade(&mut self, upgrade: Upgrade, out_events: &mut Vec<Event>) {
        if self.mode != GameMode::Upgrade {
            return;
        }

        let cost = upgrade.cost();
        if self.player.upgrade_points < cost {
            return;
        }

        match upgrade {
            Upgrade::Damage => self.player.damage += self.rules.damage_upgrade,
            Upgrade::Speed => self.player.speed += self.rules.speed_upgrade,
            Upgrade::Health => {
                self.player.max_health += self.rules.health_upgrade;
                let amount = self.player.heal(self.rules.health_upgrade);
                out_events.push(Event::PlayerHealed {
                    amount,
                    health: self.player.health,
                });
            }
            Upgrade::Unlock(ability) => {
                let status = self.player.abilities.get_mut(ability);
                if status.unlocked {
                    return;
                }
                status.unlocked = true;
            }
        }

        self.player.upgrade_points -= cost;
        out_events.push(Event::UpgradePurchased {
            upgrade,
            remaining_points: self.player.upgrade_points,
        });
    }

    fn activate_ability(&mut self, ability: Ability, out_events: &mut Vec<Event>) {
        if !self.mode.is_running() || !ability.is_timed() {
            return;
        }

        let status = self.player.abilities.get_mut(ability);
        if !status.is_ready() {
            return;
        }
        status.active_remaining = self.rules.ability_duration;
        out_events.push(Event::AbilityActivated { ability });
    }

    fn request_mode(&mut self, mode: GameMode, out_events: &mut Vec<Event>) {
        let allowed = matches!(
            (self.mode, mode),
            (GameMode::Running, GameMode::Paused)
                | (GameMode::Paused, GameMode::Running)
                | (GameMode::Upgrade, GameMode::Running)
        );
        if allowed {
            self.set_mode(mode, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetGameMode { mode } => world.request_mode(mode, out_events),
        Command::RestartCampaign => world.restart(out_events),
        Command::MovePlayer { delta } => world.move_player(delta, out_events),
        Command::RotatePlayer { radians } => {
            if world.mode.is_running() && radians.is_finite() {
                world.player.angle = (world.player.angle + radians).rem_euclid(std::f32::consts::TAU);
            }
        }
        Command::FireWeapon { heading } => {
            let ready = world
                .player
                .weapon_ready_in(world.elapsed, world.rules.shot_cooldown)
                .is_zero();
            if world.mode.is_running() && ready {
                world.player.record_shot(world.elapsed);
                out_events.push(Event::WeaponFired { heading });
            }
        }
        Command::SpawnMonster { kind, position } => world.spawn_monster(kind, position, out_events),
        Command::SpawnPickup { position } => world.spawn_pickup(position, out_events),
        Command::MoveMonster { monster, to } => world.move_monster(monster, to, out_events),
        Command::MonsterAttack { monster } => world.monster_attack(monster, out_events),
        Command::ActivateMonsterAbility { monster } => {
            world.activate_monster_ability(monster, out_events);
        }
        Command::DespawnMonster { monster } => world.despawn_monster(monster, out_events),
        Command::DamageMonster { monster, amount } => {
            world.damage_monster(monster, amount, out_events);
        }
        Command::PurchaseUpgrade { upgrade } => world.purchase_upgrade(upgrade, out_events),
        Command::ActivateAbility { ability } => world.activate_ability(ability, out_events),
    }
}

fn special_area_at(map: &GridMap, position: Vec2) -> Option<SpecialArea> {
    map.cell_of(position)
        .and_then(|cell| map.cell(cell))
        .and_then(|cell| cell.special_area())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use raycrawl_core::{
        GameMode, GridMap, HudSnapshot, MonsterView, PickupView, PlayerSnapshot,
    };

    /// Provides read-only access to the current level's tile grid.
    #[must_use]
    pub fn map(world: &World) -> &GridMap {
        world.map()
    }

    /// Active game mode.
    #[must_use]
    pub fn game_mode(world: &World) -> GameMode {
        world.mode
    }

    /// One-based index of the current level.
    #[must_use]
    pub fn dungeon_level(world: &World) -> u32 {
        world.dungeon_level()
    }

    /// Maximum live monster population for the current level.
    #[must_use]
    pub fn monster_cap(world: &World) -> usize {
        world.level().monster_cap()
    }

    /// Monsters killed on the current level.
    #[must_use]
    pub fn kills(world: &World) -> u32 {
        world.kills
    }

    /// Simulated time spent on the current level.
    #[must_use]
    pub fn level_elapsed(world: &World) -> Duration {
        world.level_elapsed
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot(world.elapsed, &world.rules)
    }

    /// Captures a read-only view of the monsters inhabiting the level.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(
            world
                .monsters
                .iter()
                .map(|monster| monster.snapshot(&world.rules))
                .collect(),
        )
    }

    /// Captures a read-only view of the uncollected pickups in the level.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        PickupView::from_snapshots(world.pickups.iter().map(|pickup| pickup.snapshot()).collect())
    }

    /// Aggregates the values displayed by HUD and menu presenters.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        let player = &world.player;
        HudSnapshot {
            health: player.health,
            max_health: player.max_health,
            kills: world.kills,
            dungeon_level: world.dungeon_level(),
            level_count: world.campaign.len() as u32,
            player_level: player.level,
            experience: player.experience,
            experience_threshold: player.experience_threshold,
            upgrade_points: player.upgrade_points,
            time_remaining: world
                .level()
                .time_limit()
                .saturating_sub(world.level_elapsed),
            abilities: player.abilities,
            mode: world.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycrawl_core::{CellCoord, MonsterKind};

    fn arena() -> World {
        let rows = [
            "11111111", "10000001", "10000001", "10003001", "10000051", "11111111",
        ];
        let level = LevelDefinition::from_digit_rows(
            &rows,
            64.0,
            CellCoord::new(1, 1),
            Duration::from_secs(60),
            10,
        )
        .expect("valid level");
        let second = LevelDefinition::from_digit_rows(
            &rows,
            64.0,
            CellCoord::new(2, 2),
            Duration::from_secs(60),
            10,
        )
        .expect("valid level");
        let campaign = Campaign::new(vec![level, second]).expect("non-empty campaign");
        World::with_campaign(campaign, Rules::default())
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn tick_is_frozen_outside_running_mode() {
        let mut world = arena();
        let _ = run(
            &mut world,
            Command::SetGameMode {
                mode: GameMode::Paused,
            },
        );
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::level_elapsed(&world), Duration::ZERO);
    }

    #[test]
    fn movement_into_walls_is_rejected() {
        let mut world = arena();
        let events = run(
            &mut world,
            Command::MovePlayer {
                delta: Vec2::new(-64.0, 0.0),
            },
        );
        assert!(events.is_empty());
        assert_eq!(query::player(&world).position, Vec2::new(96.0, 96.0));
    }

    #[test]
    fn rotation_wraps_into_a_full_turn() {
        let mut world = arena();
        let _ = run(&mut world, Command::RotatePlayer { radians: -0.5 });
        let angle = query::player(&world).angle;
        assert!((angle - (std::f32::consts::TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn weapon_respects_shot_cooldown() {
        let mut world = arena();
        assert_eq!(
            run(&mut world, Command::FireWeapon { heading: 0.0 }),
            vec![Event::WeaponFired { heading: 0.0 }]
        );
        assert!(run(&mut world, Command::FireWeapon { heading: 0.0 }).is_empty());
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
        );
        assert_eq!(run(&mut world, Command::FireWeapon { heading: 0.0 }).len(), 1);
    }

    #[test]
    fn monster_spawns_are_rejected_inside_walls() {
        let mut world = arena();
        let rejected = run(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Normal,
                position: Vec2::new(10.0, 10.0),
            },
        );
        assert!(rejected.is_empty());

        let accepted = run(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Normal,
                position: Vec2::new(300.0, 100.0),
            },
        );
        assert!(matches!(
            accepted.as_slice(),
            [Event::MonsterSpawned {
                kind: MonsterKind::Normal,
                ..
            }]
        ));
    }

    #[test]
    fn monster_moves_into_walls_are_rejected() {
        let mut world = arena();
        let _ = run(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Elite,
                position: Vec2::new(300.0, 100.0),
            },
        );
        let monster = MonsterId::new(0);
        assert!(run(
            &mut world,
            Command::MoveMonster {
                monster,
                to: Vec2::new(300.0, 10.0),
            }
        )
        .is_empty());
        assert_eq!(
            run(
                &mut world,
                Command::MoveMonster {
                    monster,
                    to: Vec2::new(310.0, 100.0),
                }
            )
            .len(),
            1
        );
    }

    #[test]
    fn pickups_heal_when_collected() {
        let mut world = arena();
        let _ = run(
            &mut world,
            Command::SpawnMonster {
                kind: MonsterKind::Boss,
                position: Vec2::new(130.0, 96.0),
            },
        );
        let _ = run(
            &mut world,
            Command::MonsterAttack {
                monster: MonsterId::new(0),
            },
        );
        assert!((query::player(&world).health - 75.0).abs() < f32::EPSILON);

        let _ = run(
            &mut world,
            Command::SpawnPickup {
                position: Vec2::new(160.0, 96.0),
            },
        );
        let events = run(
            &mut world,
            Command::MovePlayer {
                delta: Vec2::new(40.0, 0.0),
            },
        );
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PickupCollected { .. })));
        assert!((query::player(&world).health - 95.0).abs() < f32::EPSILON);
        assert!(query::pickup_view(&world).is_empty());
    }

    #[test]
    fn purchases_require_upgrade_mode_and_points() {
        let mut world = arena();
        assert!(run(
            &mut world,
            Command::PurchaseUpgrade {
                upgrade: Upgrade::Damage,
            }
        )
        .is_empty());

        world.mode = GameMode::Upgrade;
        world.player.upgrade_points = 3;
        let events = run(
            &mut world,
            Command::PurchaseUpgrade {
                upgrade: Upgrade::Unlock(Ability::DoubleShot),
            },
        );
        assert_eq!(
            events,
            vec![Event::UpgradePurchased {
                upgrade: Upgrade::Unlock(Ability::DoubleShot),
                remaining_points: 0,
            }]
        );
        assert!(run(
            &mut world,
            Command::PurchaseUpgrade {
                upgrade: Upgrade::Speed,
            }
        )
        .is_empty());
    }

    #[test]
    fn timed_abilities_expire_into_cooldown() {
        let mut world = arena();
        world.player.abilities.get_mut(Ability::SlowTime).unlocked = true;

        assert_eq!(
            run(
                &mut world,
                Command::ActivateAbility {
                    ability: Ability::SlowTime,
                }
            ),
            vec![Event::AbilityActivated {
                ability: Ability::SlowTime,
            }]
        );
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
        );
        assert!(events.contains(&Event::AbilityExpired {
            ability: Ability::SlowTime,
        }));
        assert!(run(
            &mut world,
            Command::ActivateAbility {
                ability: Ability::SlowTime,
            }
        )
        .is_empty());
    }

    #[test]
    fn time_limit_ends_the_game() {
        let mut world = arena();
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(60),
            },
        );
        assert_eq!(
            events.last(),
            Some(&Event::GameModeChanged {
                mode: GameMode::GameOver,
            })
        );
        assert_eq!(query::hud(&world).time_remaining, Duration::ZERO);
    }

    #[test]
    fn worlds_can_start_on_a_later_level() {
        let campaign = Campaign::new(vec![
            arena().campaign.level(0).clone(),
            arena().campaign.level(1).clone(),
        ])
        .expect("non-empty campaign");
        let world = World::starting_at(campaign.clone(), Rules::default(), 1);
        assert_eq!(query::dungeon_level(&world), 2);
        assert_eq!(query::player(&world).position, Vec2::new(160.0, 160.0));

        let clamped = World::starting_at(campaign, Rules::default(), 9);
        assert_eq!(query::dungeon_level(&clamped), 2);
    }

    #[test]
    fn restart_resets_progress() {
        let mut world = arena();
        world.player.damage = 99.0;
        world.mode = GameMode::GameOver;
        let events = run(&mut world, Command::RestartCampaign);
        assert!(matches!(events.first(), Some(Event::LevelStarted { level: 1, .. })));
        assert_eq!(query::game_mode(&world), GameMode::Running);
        assert!((query::player(&world).damage - 10.0).abs() < f32::EPSILON);
    }
}
