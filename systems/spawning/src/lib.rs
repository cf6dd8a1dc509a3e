#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn director that keeps the dungeon populated.
//!
//! The director runs three timers over simulated time: a trickle timer adding
//! one monster, a wave timer adding a small group, and a heart timer adding
//! health pickups. It also answers special-area entries with trap ambushes,
//! boss summons and treasure hearts. Every random choice comes from a seeded
//! [`ChaCha8Rng`], so identical event streams yield identical commands.

use std::time::Duration;

use glam::Vec2;
use rand::{distributions::Distribution, distributions::WeightedIndex, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raycrawl_core::{
    CellCoord, Command, Event, GridMap, MonsterKind, MonsterView, PickupView, PlayerSnapshot,
    SpecialArea,
};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    rng_seed: u64,
    trickle_interval: Duration,
    wave_interval: Duration,
    wave_size: usize,
    placement_attempts: usize,
    min_player_distance: f32,
    min_entity_distance: Option<f32>,
    kind_weights: [u32; 3],
    trap_burst: usize,
    boss_wave_every: u32,
    heart_interval: Duration,
    max_hearts: usize,
    min_heart_distance: f32,
    treasure_hearts: usize,
}

impl Config {
    /// Creates a configuration with the default cadence and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            trickle_interval: Duration::from_secs(5),
            wave_interval: Duration::from_secs(30),
            wave_size: 3,
            placement_attempts: 50,
            min_player_distance: 200.0,
            min_entity_distance: None,
            kind_weights: [75, 20, 5],
            trap_burst: 3,
            boss_wave_every: 3,
            heart_interval: Duration::from_secs(5),
            max_hearts: 5,
            min_heart_distance: 100.0,
            treasure_hearts: 3,
        }
    }

    /// Overrides the single-monster and wave cadences.
    #[must_use]
    pub const fn with_timers(mut self, trickle_interval: Duration, wave_interval: Duration) -> Self {
        self.trickle_interval = trickle_interval;
        self.wave_interval = wave_interval;
        self
    }

    /// Overrides the number of monsters released per wave.
    #[must_use]
    pub const fn with_wave_size(mut self, wave_size: usize) -> Self {
        self.wave_size = wave_size;
        self
    }

    /// Overrides the minimum distance between a new monster and the player.
    #[must_use]
    pub const fn with_min_player_distance(mut self, distance: f32) -> Self {
        self.min_player_distance = distance;
        self
    }

    /// Overrides the minimum distance between a new entity and existing ones.
    ///
    /// Defaults to the map's cell size.
    #[must_use]
    pub const fn with_min_entity_distance(mut self, distance: f32) -> Self {
        self.min_entity_distance = Some(distance);
        self
    }

    /// Overrides the relative draw weights of normal, elite and boss monsters.
    #[must_use]
    pub const fn with_kind_weights(mut self, normal: u32, elite: u32, boss: u32) -> Self {
        self.kind_weights = [normal, elite, boss];
        self
    }

    /// Guarantees a boss every `waves` waves while none is alive. Zero disables
    /// the guarantee.
    #[must_use]
    pub const fn with_boss_wave_every(mut self, waves: u32) -> Self {
        self.boss_wave_every = waves;
        self
    }

    /// Overrides the heart cadence and the live heart limit.
    #[must_use]
    pub const fn with_hearts(mut self, heart_interval: Duration, max_hearts: usize) -> Self {
        self.heart_interval = heart_interval;
        self.max_hearts = max_hearts;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Immutable world state the director places entities against.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
    /// Tile grid of the current level.
    pub map: &'a GridMap,
    /// Current player state.
    pub player: &'a PlayerSnapshot,
    /// Live monsters.
    pub monsters: &'a MonsterView,
    /// Uncollected pickups.
    pub pickups: &'a PickupView,
    /// Maximum live monster population for the level.
    pub monster_cap: usize,
}

/// Pure system that emits monster and pickup spawn commands.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
    trickle_elapsed: Duration,
    wave_elapsed: Duration,
    heart_elapsed: Duration,
    waves_released: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            trickle_elapsed: Duration::ZERO,
            wave_elapsed: Duration::ZERO,
            heart_elapsed: Duration::ZERO,
            waves_released: 0,
        }
    }

    /// Consumes world events and immutable views to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], context: SpawnContext<'_>, out: &mut Vec<Command>) {
        let mut plan = Plan::new(&context);
        let mut elapsed = Duration::ZERO;

        for event in events {
            match event {
                Event::LevelStarted { .. } => {
                    self.reset_timers();
                    elapsed = Duration::ZERO;
                    plan = Plan::new(&context);
                }
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::SpecialAreaEntered { area, position, .. } => {
                    self.answer_special_area(*area, *position, &context, &mut plan, out);
                }
                _ => {}
            }
        }

        if elapsed.is_zero() {
            return;
        }

        self.run_trickle(elapsed, &context, &mut plan, out);
        self.run_waves(elapsed, &context, &mut plan, out);
        self.run_hearts(elapsed, &context, &mut plan, out);
    }

    fn reset_timers(&mut self) {
        self.trickle_elapsed = Duration::ZERO;
        self.wave_elapsed = Duration::ZERO;
        self.heart_elapsed = Duration::ZERO;
        self.waves_released = 0;
    }

    fn answer_special_area(
        &mut self,
        area: SpecialArea,
        trigger: Vec2,
        context: &SpawnContext<'_>,
        plan: &mut Plan,
        out: &mut Vec<Command>,
    ) {
        match area {
            SpecialArea::Trap => {
                for _ in 0..self.config.trap_burst {
                    let position = self.scatter_around(trigger, context.map);
                    plan.spawn_monster(MonsterKind::Normal, position, out);
                }
            }
            SpecialArea::Boss => {
                let position = self.scatter_around(trigger, context.map);
                plan.spawn_monster(MonsterKind::Boss, position, out);
            }
            SpecialArea::Treasure => {
                for _ in 0..self.config.treasure_hearts {
                    self.try_spawn_heart(context, plan, out);
                }
            }
            SpecialArea::Exit => {}
        }
    }

    /// Picks a walkable point within one cell of the trigger on each axis,
    /// falling back to the trigger itself.
    fn scatter_around(&mut self, trigger: Vec2, map: &GridMap) -> Vec2 {
        let reach = map.cell_size();
        for _ in 0..self.config.placement_attempts {
            let offset = Vec2::new(
                self.rng.gen_range(-reach..=reach),
                self.rng.gen_range(-reach..=reach),
            );
            let candidate = trigger + offset;
            if map.is_walkable_position(candidate) {
                return candidate;
            }
        }
        trigger
    }

    fn run_trickle(
        &mut self,
        elapsed: Duration,
        context: &SpawnContext<'_>,
        plan: &mut Plan,
        out: &mut Vec<Command>,
    ) {
        let interval = self.config.trickle_interval;
        if interval.is_zero() {
            return;
        }

        self.trickle_elapsed = self.trickle_elapsed.saturating_add(elapsed);
        while self.trickle_elapsed >= interval {
            self.trickle_elapsed -= interval;
            if plan.monster_count >= context.monster_cap {
                continue;
            }
            let kind = self.draw_kind(plan.boss_present);
            self.try_spawn_monster(kind, context, plan, out);
        }
    }

    fn run_waves(
        &mut self,
        elapsed: Duration,
        context: &SpawnContext<'_>,
        plan: &mut Plan,
        out: &mut Vec<Command>,
    ) {
        let interval = self.config.wave_interval;
        if interval.is_zero() {
            return;
        }

        self.wave_elapsed = self.wave_elapsed.saturating_add(elapsed);
        while self.wave_elapsed >= interval {
            self.wave_elapsed -= interval;
            self.waves_released = self.waves_released.saturating_add(1);

            let room = context.monster_cap.saturating_sub(plan.monster_count);
            let size = self.config.wave_size.min(room);
            if size == 0 {
                continue;
            }

            let every = self.config.boss_wave_every;
            let boss_due = every > 0 && self.waves_released % every == 0 && !plan.boss_present;
            log::debug!(
                "releasing wave {} with {} monsters (boss due: {})",
                self.waves_released,
                size,
                boss_due
            );

            for index in 0..size {
                let kind = if index == 0 && boss_due {
                    MonsterKind::Boss
                } else {
                    self.draw_kind(plan.boss_present)
                };
                self.try_spawn_monster(kind, context, plan, out);
            }
        }
    }

    fn run_hearts(
        &mut self,
        elapsed: Duration,
        context: &SpawnContext<'_>,
        plan: &mut Plan,
        out: &mut Vec<Command>,
    ) {
        let interval = self.config.heart_interval;
        if interval.is_zero() {
            return;
        }

        self.heart_elapsed = self.heart_elapsed.saturating_add(elapsed);
        while self.heart_elapsed >= interval {
            self.heart_elapsed -= interval;
            if plan.heart_count < self.config.max_hearts {
                self.try_spawn_heart(context, plan, out);
            }
        }
    }

    /// Draws a monster kind from the configured weights. Bosses are excluded
    /// while one is alive or already requested.
    fn draw_kind(&mut self, boss_present: bool) -> MonsterKind {
        let mut weights = self.config.kind_weights;
        if boss_present {
            weights[2] = 0;
        }

        WeightedIndex::new(weights)
            .ok()
            .map_or(MonsterKind::Normal, |distribution| {
                MonsterKind::ALL[distribution.sample(&mut self.rng)]
            })
    }

    fn try_spawn_monster(
        &mut self,
        kind: MonsterKind,
        context: &SpawnContext<'_>,
        plan: &mut Plan,
        out: &mut Vec<Command>,
    ) {
        let spacing = self
            .config
            .min_entity_distance
            .unwrap_or_else(|| context.map.cell_size());
        let player = context.player.position;
        let min_player = self.config.min_player_distance;

        let position = self.search(context.map, |candidate| {
            candidate.distance(player) >= min_player && plan.is_clear(candidate, spacing)
        });
        if let Some(position) = position {
            plan.spawn_monster(kind, position, out);
        }
    }

    fn try_spawn_heart(&mut self, context: &SpawnContext<'_>, plan: &mut Plan, out: &mut Vec<Command>) {
        let spacing = self.config.min_heart_distance;
        let player = context.player.position;
        let position = self.search(context.map, |candidate| {
            candidate.distance(player) >= spacing && plan.hearts_clear(candidate, spacing)
        });
        if let Some(position) = position {
            plan.spawn_heart(position, out);
        }
    }

    /// Bounded rejection sampling over uniformly drawn cell centres.
    fn search<F>(&mut self, map: &GridMap, accept: F) -> Option<Vec2>
    where
        F: Fn(Vec2) -> bool,
    {
        if map.columns() == 0 || map.rows() == 0 {
            return None;
        }

        for _ in 0..self.config.placement_attempts {
            let cell = CellCoord::new(
                self.rng.gen_range(0..map.columns()),
                self.rng.gen_range(0..map.rows()),
            );
            let walkable = map.cell(cell).map_or(false, |entry| !entry.is_wall());
            if !walkable {
                continue;
            }

            let candidate = map.cell_center(cell);
            if accept(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Population bookkeeping for one `handle` call, so requests emitted earlier
/// in the same frame count against caps and spacing rules.
#[derive(Debug)]
struct Plan {
    monster_positions: Vec<Vec2>,
    heart_positions: Vec<Vec2>,
    monster_count: usize,
    heart_count: usize,
    boss_present: bool,
}

impl Plan {
    fn new(context: &SpawnContext<'_>) -> Self {
        let monster_positions: Vec<Vec2> = context
            .monsters
            .iter()
            .map(|monster| monster.position)
            .collect();
        let heart_positions: Vec<Vec2> = context
            .pickups
            .iter()
            .map(|pickup| pickup.position)
            .collect();
        Self {
            monster_count: monster_positions.len(),
            heart_count: heart_positions.len(),
            monster_positions,
            heart_positions,
            boss_present: context.monsters.has_boss(),
        }
    }

    fn is_clear(&self, candidate: Vec2, spacing: f32) -> bool {
        self.monster_positions
            .iter()
            .chain(self.heart_positions.iter())
            .all(|other| other.distance(candidate) >= spacing)
    }

    fn hearts_clear(&self, candidate: Vec2, spacing: f32) -> bool {
        self.heart_positions
            .iter()
            .all(|other| other.distance(candidate) >= spacing)
    }

    fn spawn_monster(&mut self, kind: MonsterKind, position: Vec2, out: &mut Vec<Command>) {
        self.monster_positions.push(position);
        self.monster_count += 1;
        self.boss_present |= kind == MonsterKind::Boss;
        out.push(Command::SpawnMonster { kind, position });
    }

    fn spawn_heart(&mut self, position: Vec2, out: &mut Vec<Command>) {
        self.heart_positions.push(position);
        self.heart_count += 1;
        out.push(Command::SpawnPickup { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppressed_boss_is_never_drawn() {
        let mut spawning = Spawning::new(Config::new(7).with_kind_weights(0, 0, 1));
        for _ in 0..32 {
            assert_eq!(spawning.draw_kind(true), MonsterKind::Normal);
        }
        assert_eq!(spawning.draw_kind(false), MonsterKind::Boss);
    }

    #[test]
    fn scatter_falls_back_to_the_trigger() {
        let map = GridMap::from_rows(&[vec![1, 1, 1], vec![1, 3, 1], vec![1, 1, 1]], 64.0)
            .expect("valid grid");
        let mut spawning = Spawning::default();
        let trigger = Vec2::new(96.0, 96.0);
        let position = spawning.scatter_around(trigger, &map);
        assert!(map.is_walkable_position(position));
    }
}
