//! Frame pipeline that advances the world and rebuilds the scene.
//!
//! Each frame runs in a fixed order: mode requests from the input snapshot,
//! the world tick, player movement, the spawn director, monster behavior and
//! finally the weapon. Every system sees all events the frame produced before
//! its turn. Drawing data is then derived from the settled world: wall columns
//! first, then sprites tested against their depth buffer.

use std::time::Duration;

use raycrawl_core::{Command, ControlState, Event, GameMode, MonsterKind};
use raycrawl_rendering::{
    Color, FrameInput, Palette, Scene, SpriteKind, SpritePresentation, WallSlice,
};
use raycrawl_system_combat::Combat;
use raycrawl_system_monster_ai::MonsterAi;
use raycrawl_system_movement::Movement;
use raycrawl_system_raycast::{Projection, WallColumn, WallHit, WallSurface};
use raycrawl_system_spawning::{SpawnContext, Spawning};
use raycrawl_system_sprites::{Compositor, ProjectedSprite, SpriteSubject};
use raycrawl_world::{self as world, query, World};

use crate::config::{ConfigError, GameConfig};

/// Longest simulated step taken for a single frame, so a stalled window does
/// not teleport monsters through the level.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);
const HEART_TINT: Color = Color::from_rgb_u8(255, 0, 0);
const HIT_FLASH_TINT: Color = Color::from_rgb_u8(255, 90, 90);
const SPRITE_FALLOFF: f32 = 0.001;
const SPRITE_MIN_BRIGHTNESS: f32 = 0.2;

/// Owns the world, every system and the reusable frame buffers.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    movement: Movement,
    spawning: Spawning,
    monster_ai: MonsterAi,
    combat: Combat,
    projection: Projection,
    compositor: Compositor,
    config: GameConfig,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds the world and systems described by `config`.
    ///
    /// `start_level` is zero-based and clamped to the campaign length.
    pub(crate) fn new(
        config: &GameConfig,
        seed: u64,
        start_level: usize,
    ) -> Result<Self, ConfigError> {
        let world = World::starting_at(config.campaign()?, config.rules(), start_level);
        let cell_size = query::map(&world).cell_size();
        Ok(Self {
            movement: Movement::new(config.movement()),
            spawning: Spawning::new(config.spawning(seed)),
            monster_ai: MonsterAi::new(config.monster_ai(seed.wrapping_add(1))),
            combat: Combat::new(config.combat()),
            projection: Projection::new(config.projection()),
            compositor: Compositor::new(config.compositor(cell_size)),
            config: config.clone(),
            world,
            events: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Empty scene sized for the configured projection.
    pub(crate) fn initial_scene(&mut self) -> Scene {
        let mut scene = Scene::new(
            self.config.projection.view_height,
            Palette::default(),
            query::hud(&self.world),
        );
        self.populate_scene(&mut scene);
        scene
    }

    /// Advances the simulation by one rendered frame.
    pub(crate) fn step(&mut self, dt: Duration, input: &FrameInput) {
        self.events.clear();

        self.request_mode_changes(input);
        self.flush();

        let dt = dt.min(MAX_FRAME_STEP);
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        let controls = ControlState {
            forward: input.forward,
            backward: input.backward,
            strafe_left: input.strafe_left,
            strafe_right: input.strafe_right,
            turn: input.mouse_delta_x,
            fire: input.fire,
        };
        let player = query::player(&self.world);
        self.movement
            .handle(&self.events, &controls, &player, &mut self.commands);
        self.flush();

        let player = query::player(&self.world);
        let monsters = query::monster_view(&self.world);
        let pickups = query::pickup_view(&self.world);
        self.spawning.handle(
            &self.events,
            SpawnContext {
                map: query::map(&self.world),
                player: &player,
                monsters: &monsters,
                pickups: &pickups,
                monster_cap: query::monster_cap(&self.world),
            },
            &mut self.commands,
        );
        self.flush();

        let monsters = query::monster_view(&self.world);
        self.monster_ai.handle(
            &self.events,
            query::map(&self.world),
            &player,
            &monsters,
            &mut self.commands,
        );
        self.flush();

        let player = query::player(&self.world);
        let monsters = query::monster_view(&self.world);
        self.combat.handle(
            query::game_mode(&self.world),
            controls.fire,
            &player,
            &monsters,
            &mut self.commands,
        );
        self.flush();

        if self
            .events
            .iter()
            .any(|event| matches!(event, Event::LevelStarted { .. }))
        {
            let cell_size = query::map(&self.world).cell_size();
            self.compositor = Compositor::new(self.config.compositor(cell_size));
        }
    }

    /// Rewrites `scene` from the current world state.
    pub(crate) fn populate_scene(&mut self, scene: &mut Scene) {
        let player = query::player(&self.world);
        self.projection
            .project(query::map(&self.world), player.position, player.angle);
        scene.columns.clear();
        scene
            .columns
            .extend(self.projection.columns().iter().map(wall_slice));

        let monsters = query::monster_view(&self.world);
        let pickups = query::pickup_view(&self.world);
        let sprites = self.compositor.compose(
            player.position,
            player.angle,
            self.projection.depth_buffer(),
            &monsters,
            &pickups,
        );
        scene.sprites.clear();
        scene.sprites.extend(sprites.iter().map(present_sprite));

        scene.hud = query::hud(&self.world);
        scene.since_last_shot = player.since_last_shot;
    }

    fn request_mode_changes(&mut self, input: &FrameInput) {
        let mode = query::game_mode(&self.world);
        if input.restart {
            self.commands.push(Command::RestartCampaign);
        }
        if input.pause {
            let target = match mode {
                GameMode::Running => Some(GameMode::Paused),
                GameMode::Paused => Some(GameMode::Running),
                _ => None,
            };
            if let Some(mode) = target {
                self.commands.push(Command::SetGameMode { mode });
            }
        }
        if let Some(upgrade) = input.purchase_upgrade {
            self.commands.push(Command::PurchaseUpgrade { upgrade });
        }
        if input.resume {
            self.commands.push(Command::SetGameMode {
                mode: GameMode::Running,
            });
        }
        if let Some(ability) = input.activate_ability {
            self.commands.push(Command::ActivateAbility { ability });
        }
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

fn wall_slice(column: &WallColumn) -> WallSlice {
    match column.hit {
        Some(WallHit { surface, .. }) => WallSlice {
            top: column.top,
            height: column.height,
            brightness: column.brightness,
            mortar: surface == WallSurface::Mortar,
        },
        None => WallSlice::EMPTY,
    }
}

fn present_sprite(sprite: &ProjectedSprite) -> SpritePresentation {
    let shade = (1.0 - sprite.distance * SPRITE_FALLOFF).clamp(SPRITE_MIN_BRIGHTNESS, 1.0);
    let (kind, tint, scale, health_fraction) = match sprite.subject {
        SpriteSubject::Monster {
            kind,
            health_fraction,
            hit_flash,
            raging,
            ..
        } => {
            let tint = if hit_flash {
                HIT_FLASH_TINT
            } else if raging {
                monster_color(kind).lighten(0.3)
            } else {
                monster_color(kind)
            };
            (
                SpriteKind::Monster(kind),
                tint,
                kind.template().sprite_scale,
                Some(health_fraction),
            )
        }
        SpriteSubject::Pickup { pulse_scale, .. } => {
            (SpriteKind::Heart, HEART_TINT, pulse_scale, None)
        }
    };

    SpritePresentation {
        kind,
        column: sprite.column,
        distance: sprite.distance,
        size: sprite.size,
        top: sprite.top,
        scale,
        tint: tint.scale(shade),
        health_fraction,
    }
}

fn monster_color(kind: MonsterKind) -> Color {
    let color = kind.template().color;
    Color::from_rgb_u8(color.red(), color.green(), color.blue())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use raycrawl_core::{Ability, Upgrade};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const FRAME: Duration = Duration::from_millis(16);

    fn simulation(seed: u64) -> Simulation {
        Simulation::new(&GameConfig::default(), seed, 0).expect("default config is valid")
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn scene_covers_every_projected_column() {
        let mut simulation = simulation(7);
        let scene = simulation.initial_scene();

        assert_eq!(scene.columns.len(), GameConfig::default().projection.columns);
        assert!(scene.columns.iter().any(|slice| slice.height > 0.0));
        assert_eq!(scene.hud.dungeon_level, 1);
        assert_eq!(scene.mode(), GameMode::Running);
    }

    #[test]
    fn pause_freezes_the_level_clock() {
        let mut simulation = simulation(7);
        simulation.step(FRAME, &idle());
        let before = query::level_elapsed(&simulation.world);

        let pause = FrameInput {
            pause: true,
            ..FrameInput::default()
        };
        simulation.step(FRAME, &pause);
        assert_eq!(query::game_mode(&simulation.world), GameMode::Paused);
        for _ in 0..10 {
            simulation.step(FRAME, &idle());
        }
        assert_eq!(query::level_elapsed(&simulation.world), before);

        simulation.step(FRAME, &pause);
        assert_eq!(query::game_mode(&simulation.world), GameMode::Running);
        assert!(query::level_elapsed(&simulation.world) > before);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut simulation = simulation(7);
        simulation.step(Duration::from_secs(3), &idle());
        assert_eq!(query::level_elapsed(&simulation.world), MAX_FRAME_STEP);
    }

    #[test]
    fn held_fire_kills_a_monster_in_front() {
        let mut simulation = simulation(3);
        let player = query::player(&simulation.world);
        let target = player.position + Vec2::new(96.0, 0.0);
        let mut events = Vec::new();
        world::apply(
            &mut simulation.world,
            Command::SpawnMonster {
                kind: MonsterKind::Normal,
                position: target,
            },
            &mut events,
        );
        assert!(matches!(events.as_slice(), [Event::MonsterSpawned { .. }]));

        let fire = FrameInput {
            fire: true,
            ..FrameInput::default()
        };
        let mut kills = 0;
        for _ in 0..60 {
            simulation.step(FRAME, &fire);
            kills += simulation
                .events
                .iter()
                .filter(|event| matches!(event, Event::MonsterKilled { .. }))
                .count();
        }
        assert!(kills >= 1);
        assert!(query::kills(&simulation.world) >= 1);

        let mut scene = simulation.initial_scene();
        simulation.populate_scene(&mut scene);
        assert!(scene.since_last_shot.is_some());
    }

    #[test]
    fn locked_abilities_and_menu_input_are_ignored_while_running() {
        let mut simulation = simulation(3);
        let input = FrameInput {
            activate_ability: Some(Ability::SlowTime),
            purchase_upgrade: Some(Upgrade::Damage),
            ..FrameInput::default()
        };
        simulation.step(FRAME, &input);

        assert!(!simulation
            .events
            .iter()
            .any(|event| matches!(event, Event::AbilityActivated { .. } | Event::UpgradePurchased { .. })));
        assert_eq!(query::player(&simulation.world).damage, 10.0);
    }

    #[test]
    fn restart_returns_to_the_first_level() {
        let mut simulation =
            Simulation::new(&GameConfig::default(), 3, 2).expect("default config is valid");
        assert_eq!(query::dungeon_level(&simulation.world), 3);

        let restart = FrameInput {
            restart: true,
            ..FrameInput::default()
        };
        simulation.step(FRAME, &restart);
        assert_eq!(query::dungeon_level(&simulation.world), 1);
    }

    fn fingerprint(seed: u64) -> u64 {
        let mut simulation = simulation(seed);
        let mut scene = simulation.initial_scene();
        let mut hasher = DefaultHasher::new();

        for frame in 0..900_u32 {
            let input = FrameInput {
                forward: frame % 120 < 40,
                strafe_left: frame % 200 > 150,
                mouse_delta_x: if frame % 90 < 10 { 15.0 } else { 0.0 },
                fire: frame % 7 == 0,
                ..FrameInput::default()
            };
            simulation.step(FRAME, &input);
            simulation.populate_scene(&mut scene);

            for monster in query::monster_view(&simulation.world).iter() {
                monster.id.hash(&mut hasher);
                monster.position.x.to_bits().hash(&mut hasher);
                monster.position.y.to_bits().hash(&mut hasher);
            }
            scene.sprites.len().hash(&mut hasher);
            scene.hud.kills.hash(&mut hasher);
        }
        let player = query::player(&simulation.world);
        player.position.x.to_bits().hash(&mut hasher);
        player.position.y.to_bits().hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn seeded_runs_replay_identically() {
        assert_eq!(fingerprint(42), fingerprint(42));
    }
}
