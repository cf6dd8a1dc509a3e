#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Raycrawl.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Text overlays live in the local `hud` module and sprite frame loading in
//! `sprites`, so the rest of the adapter only deals with filled shapes.

mod hud;
mod sprites;

use anyhow::Result;
use macroquad::{
    color::{Color as MacroquadColor, WHITE},
    input::{
        is_key_down, is_key_pressed, is_mouse_button_down, mouse_position, set_cursor_grab,
        show_mouse, KeyCode, MouseButton,
    },
    math::{vec2, Vec2 as MacroquadVec2},
    shapes::{draw_circle, draw_line, draw_rectangle, draw_triangle},
    texture::{draw_texture_ex, DrawTextureParams},
};
use raycrawl_core::{Ability, GameMode};
use raycrawl_rendering::{
    AssetCatalog, Color, FrameInput, Presentation, RenderingBackend, Scene, SpriteKind,
    SpritePresentation,
};
use std::{
    f32::consts::PI,
    path::PathBuf,
    time::{Duration, Instant},
};

use self::sprites::{FallbackNotices, SpriteAtlas};

/// Pixels of simulated mouse travel per second while an arrow key is held.
const ARROW_TURN_RATE: f32 = 600.0;
const RECOIL_DURATION: Duration = Duration::from_millis(50);
const RECOIL_DISTANCE: f32 = 20.0;

/// Raw key and mouse state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct InputObservations {
    forward: bool,
    backward: bool,
    strafe_left: bool,
    strafe_right: bool,
    fire: bool,
    pause: bool,
    fullscreen: bool,
    quit: bool,
    restart: bool,
    confirm: bool,
    double_shot: bool,
    slow_time: bool,
    menu_digit: Option<u8>,
    mouse_delta_x: f32,
}

impl InputObservations {
    fn poll(last_mouse_x: &mut Option<f32>, dt: Duration) -> Self {
        let (mouse_x, _) = mouse_position();
        let mut mouse_delta_x = last_mouse_x.map_or(0.0, |previous| mouse_x - previous);
        *last_mouse_x = Some(mouse_x);

        let arrows = f32::from(u8::from(is_key_down(KeyCode::Right)))
            - f32::from(u8::from(is_key_down(KeyCode::Left)));
        mouse_delta_x += arrows * ARROW_TURN_RATE * dt.as_secs_f32();

        const DIGITS: [KeyCode; 7] = [
            KeyCode::Key1,
            KeyCode::Key2,
            KeyCode::Key3,
            KeyCode::Key4,
            KeyCode::Key5,
            KeyCode::Key6,
            KeyCode::Key7,
        ];
        let menu_digit = DIGITS
            .iter()
            .position(|key| is_key_pressed(*key))
            .map(|index| index as u8 + 1);

        Self {
            forward: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            backward: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            strafe_left: is_key_down(KeyCode::A),
            strafe_right: is_key_down(KeyCode::D),
            fire: is_mouse_button_down(MouseButton::Left) || is_key_down(KeyCode::LeftControl),
            pause: is_key_pressed(KeyCode::P),
            fullscreen: is_key_pressed(KeyCode::F),
            quit: is_key_pressed(KeyCode::Escape),
            restart: is_key_pressed(KeyCode::R),
            confirm: is_key_pressed(KeyCode::Enter),
            double_shot: is_key_pressed(KeyCode::Q),
            slow_time: is_key_pressed(KeyCode::Space),
            menu_digit,
            mouse_delta_x,
        }
    }
}

/// Translates raw observations into the frame input the simulation expects.
///
/// Keys are interpreted according to the active mode: digits pick upgrades
/// only inside the upgrade menu, and gameplay input is dropped elsewhere.
fn gather_frame_input(observations: InputObservations, mode: GameMode) -> FrameInput {
    let mut input = FrameInput {
        pause: observations.pause && matches!(mode, GameMode::Running | GameMode::Paused),
        toggle_fullscreen: observations.fullscreen,
        ..FrameInput::default()
    };

    match mode {
        GameMode::Running => {
            input.forward = observations.forward;
            input.backward = observations.backward;
            input.strafe_left = observations.strafe_left;
            input.strafe_right = observations.strafe_right;
            input.fire = observations.fire;
            input.mouse_delta_x = observations.mouse_delta_x;
            input.activate_ability = if observations.slow_time {
                Some(Ability::SlowTime)
            } else if observations.double_shot {
                Some(Ability::DoubleShot)
            } else {
                None
            };
        }
        GameMode::Upgrade => {
            input.purchase_upgrade = observations
                .menu_digit
                .and_then(|digit| hud::UPGRADE_MENU.get(usize::from(digit).checked_sub(1)?))
                .copied();
            input.resume = observations.confirm;
        }
        GameMode::GameOver | GameMode::Completed => {
            input.restart = observations.restart;
        }
        GameMode::Paused => {}
    }

    input
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
    manifest_path: PathBuf,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
            manifest_path: SpriteAtlas::default_manifest_path(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }

    /// Overrides the location of the sprite manifest.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the averages once a second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

/// Maps view-space coordinates onto the current window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ViewMetrics {
    column_width: f32,
    y_scale: f32,
    screen_width: f32,
    screen_height: f32,
}

impl ViewMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let columns = scene.columns.len().max(1) as f32;
        let y_scale = if scene.view_height > 0.0 {
            screen_height / scene.view_height
        } else {
            1.0
        };
        Self {
            column_width: screen_width / columns,
            y_scale,
            screen_width,
            screen_height,
        }
    }

    fn column_center(&self, column: usize) -> f32 {
        (column as f32 + 0.5) * self.column_width
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            window_width,
            window_height,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_height).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let atlas = if load_sprites {
                SpriteAtlas::load(&manifest_path)
            } else {
                log::info!("sprite loading disabled, drawing fallback shapes");
                SpriteAtlas::default()
            };
            let mut notices = FallbackNotices::default();
            let mut fps_counter = FpsCounter::default();
            let mut fullscreen = false;
            let mut last_mouse_x = None;
            let mut animation_clock = Duration::ZERO;
            let mut cursor_grabbed = false;

            loop {
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                animation_clock += frame_dt;

                let observations = InputObservations::poll(&mut last_mouse_x, frame_dt);
                if observations.quit {
                    break;
                }
                if observations.fullscreen {
                    fullscreen = !fullscreen;
                    macroquad::window::set_fullscreen(fullscreen);
                }

                let frame_input = gather_frame_input(observations, scene.mode());
                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let wants_grab = scene.mode() == GameMode::Running;
                if wants_grab != cursor_grabbed {
                    set_cursor_grab(wants_grab);
                    show_mouse(!wants_grab);
                    cursor_grabbed = wants_grab;
                }

                let render_start = Instant::now();
                let metrics = ViewMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_background(&scene, &metrics);
                draw_walls(&scene, &metrics);
                for sprite in &scene.sprites {
                    draw_sprite(sprite, &metrics, &atlas, &mut notices, animation_clock);
                }
                draw_weapon(scene.since_last_shot, &metrics);
                hud::draw_status(&scene.hud, metrics.screen_width);
                hud::draw_mode_overlay(&scene.hud, metrics.screen_width, metrics.screen_height);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_background(scene: &Scene, metrics: &ViewMetrics) {
    let horizon = metrics.screen_height / 2.0;
    draw_rectangle(
        0.0,
        0.0,
        metrics.screen_width,
        horizon,
        to_macroquad_color(scene.palette.sky),
    );
    draw_rectangle(
        0.0,
        horizon,
        metrics.screen_width,
        metrics.screen_height - horizon,
        to_macroquad_color(scene.palette.floor),
    );
}

fn draw_walls(scene: &Scene, metrics: &ViewMetrics) {
    let palette = scene.palette;
    for (index, slice) in scene.columns.iter().enumerate() {
        if slice.height <= 0.0 {
            continue;
        }
        let x = index as f32 * metrics.column_width;
        let top = slice.top * metrics.y_scale;
        let height = slice.height * metrics.y_scale;
        let base = if slice.mortar {
            palette.mortar
        } else {
            palette.wall
        };
        draw_rectangle(
            x,
            top,
            metrics.column_width,
            height,
            to_macroquad_color(base.scale(slice.brightness)),
        );

        if index % 4 == 0 {
            let band = height / 8.0;
            draw_rectangle(
                x,
                top,
                metrics.column_width,
                band,
                to_macroquad_color(palette.highlight),
            );
            draw_rectangle(
                x,
                top + height - band,
                metrics.column_width,
                band,
                to_macroquad_color(palette.shadow),
            );
        }
    }
}

fn draw_sprite(
    sprite: &SpritePresentation,
    metrics: &ViewMetrics,
    atlas: &SpriteAtlas,
    notices: &mut FallbackNotices,
    animation_clock: Duration,
) {
    let size = sprite.size * sprite.scale * metrics.y_scale;
    if size <= 0.0 {
        return;
    }
    let center_x = metrics.column_center(sprite.column);
    let center_y = (sprite.top + sprite.size / 2.0) * metrics.y_scale;

    if let Some(texture) = atlas.frame_at(sprite.kind, animation_clock) {
        draw_texture_ex(
            texture,
            center_x - size / 2.0,
            center_y - size / 2.0,
            to_macroquad_color(sprite.tint),
            DrawTextureParams {
                dest_size: Some(vec2(size, size)),
                ..DrawTextureParams::default()
            },
        );
    } else {
        if atlas.frames(sprite.kind).is_empty() {
            let _ = notices.note(sprite.kind);
        }
        draw_fallback_shape(sprite, center_x, center_y, size);
    }

    if let Some(fraction) = sprite.health_fraction {
        let width = size;
        let y = center_y - size / 2.0 - 8.0;
        draw_rectangle(
            center_x - width / 2.0,
            y,
            width,
            4.0,
            MacroquadColor::new(0.3, 0.0, 0.0, 1.0),
        );
        draw_rectangle(
            center_x - width / 2.0,
            y,
            width * fraction.clamp(0.0, 1.0),
            4.0,
            MacroquadColor::new(0.0, 0.8, 0.0, 1.0),
        );
    }
}

fn draw_fallback_shape(sprite: &SpritePresentation, center_x: f32, center_y: f32, size: f32) {
    let tint = to_macroquad_color(sprite.tint);
    let radius = size / 2.0;
    match sprite.kind {
        SpriteKind::Heart => {
            let lobe = radius / 2.0;
            draw_circle(center_x - lobe, center_y - lobe / 2.0, lobe, tint);
            draw_circle(center_x + lobe, center_y - lobe / 2.0, lobe, tint);
            draw_triangle(
                MacroquadVec2::new(center_x - radius, center_y - lobe / 4.0),
                MacroquadVec2::new(center_x + radius, center_y - lobe / 4.0),
                MacroquadVec2::new(center_x, center_y + radius),
                tint,
            );
        }
        SpriteKind::Monster(_) => {
            draw_circle(center_x, center_y, radius, tint);
            let eye = radius / 5.0;
            let eye_y = center_y - radius / 4.0;
            draw_circle(center_x - radius / 3.0, eye_y, eye, WHITE);
            draw_circle(center_x + radius / 3.0, eye_y, eye, WHITE);
        }
    }
}

/// Vertical weapon offset after a shot, rising and falling over the recoil window.
fn recoil_offset(since_last_shot: Option<Duration>) -> f32 {
    match since_last_shot {
        Some(elapsed) if elapsed < RECOIL_DURATION => {
            let phase = elapsed.as_secs_f32() / RECOIL_DURATION.as_secs_f32();
            (phase * PI).sin() * RECOIL_DISTANCE
        }
        _ => 0.0,
    }
}

fn draw_weapon(since_last_shot: Option<Duration>, metrics: &ViewMetrics) {
    let width = 100.0;
    let height = 150.0;
    let x = (metrics.screen_width - width) / 2.0;
    let y = metrics.screen_height - height + recoil_offset(since_last_shot);
    draw_rectangle(x, y, width, height, MacroquadColor::from_rgba(70, 70, 70, 255));

    let barrel_width = 30.0;
    let barrel_height = 60.0;
    let barrel_x = x + (width - barrel_width) / 2.0;
    let barrel_y = y - barrel_height / 2.0;
    draw_rectangle(
        barrel_x,
        barrel_y,
        barrel_width,
        barrel_height,
        MacroquadColor::from_rgba(50, 50, 50, 255),
    );

    if matches!(since_last_shot, Some(elapsed) if elapsed < RECOIL_DURATION / 2) {
        draw_triangle(
            MacroquadVec2::new(barrel_x + barrel_width / 2.0, barrel_y - 30.0),
            MacroquadVec2::new(barrel_x - 20.0, barrel_y),
            MacroquadVec2::new(barrel_x + barrel_width + 20.0, barrel_y),
            MacroquadColor::from_rgba(255, 200, 0, 255),
        );
    }

    let cx = metrics.screen_width / 2.0;
    let cy = metrics.screen_height / 2.0;
    draw_line(cx - 8.0, cy, cx + 8.0, cy, 2.0, WHITE);
    draw_line(cx, cy - 8.0, cx, cy + 8.0, 2.0, WHITE);
}

fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}
