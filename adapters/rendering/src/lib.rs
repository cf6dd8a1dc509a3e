#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Raycrawl adapters.
//!
//! The simulation describes every frame as a [`Scene`]: one wall slice per
//! screen column, the projected sprites already in painter's order, and the
//! HUD state. Backends only draw what the scene contains and report input as
//! a [`FrameInput`] snapshot.

use anyhow::Result as AnyResult;
use raycrawl_core::{Ability, GameMode, HudSnapshot, MonsterKind, Upgrade};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        Self {
            red: self.red + (1.0 - self.red) * amount,
            green: self.green + (1.0 - self.green) * amount,
            blue: self.blue + (1.0 - self.blue) * amount,
            alpha: self.alpha,
        }
    }

    /// Returns a new color with every RGB channel multiplied by `factor`.
    ///
    /// Used for distance shading; alpha is left untouched.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Forward key held.
    pub forward: bool,
    /// Backward key held.
    pub backward: bool,
    /// Strafe-left key held.
    pub strafe_left: bool,
    /// Strafe-right key held.
    pub strafe_right: bool,
    /// Fire button held.
    pub fire: bool,
    /// Pause toggle pressed on this frame.
    pub pause: bool,
    /// Fullscreen toggle pressed on this frame.
    pub toggle_fullscreen: bool,
    /// Horizontal mouse movement in pixels since the previous frame.
    pub mouse_delta_x: f32,
    /// Ability hotkey pressed on this frame.
    pub activate_ability: Option<Ability>,
    /// Upgrade chosen from the upgrade menu on this frame.
    pub purchase_upgrade: Option<Upgrade>,
    /// Request to leave the upgrade menu.
    pub resume: bool,
    /// Request to restart the campaign.
    pub restart: bool,
}

/// Kinds of billboard sprites the presenter knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKind {
    /// A monster of the provided kind.
    Monster(MonsterKind),
    /// A health heart pickup.
    Heart,
}

impl SpriteKind {
    /// Every sprite kind the asset catalog may be asked about.
    pub const ALL: [SpriteKind; 4] = [
        SpriteKind::Monster(MonsterKind::Normal),
        SpriteKind::Monster(MonsterKind::Elite),
        SpriteKind::Monster(MonsterKind::Boss),
        SpriteKind::Heart,
    ];

    /// Key naming the sprite kind inside asset manifests.
    #[must_use]
    pub const fn manifest_key(self) -> &'static str {
        match self {
            Self::Monster(MonsterKind::Normal) => "monster_normal",
            Self::Monster(MonsterKind::Elite) => "monster_elite",
            Self::Monster(MonsterKind::Boss) => "monster_boss",
            Self::Heart => "heart",
        }
    }

    /// Parses a manifest key produced by [`SpriteKind::manifest_key`].
    #[must_use]
    pub fn from_manifest_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.manifest_key() == key)
    }
}

/// Opaque handle to one loaded animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u32);

impl FrameHandle {
    /// Creates a new frame handle with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Capability reporting which animation frames are available per sprite kind.
///
/// An empty slice means the kind has no usable frames and the presenter draws
/// its procedural fallback shape instead.
pub trait AssetCatalog {
    /// Frames available for the provided sprite kind.
    fn frames(&self, kind: SpriteKind) -> &[FrameHandle];
}

/// Solid colors used to paint the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Upper half of the viewport.
    pub sky: Color,
    /// Lower half of the viewport.
    pub floor: Color,
    /// Brick texels at full brightness.
    pub wall: Color,
    /// Mortar texels at full brightness.
    pub mortar: Color,
    /// Highlight band drawn at the top of every fourth column.
    pub highlight: Color,
    /// Shadow band drawn at the bottom of every fourth column.
    pub shadow: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::from_rgb_u8(20, 20, 30),
            floor: Color::from_rgb_u8(40, 35, 30),
            wall: Color::from_rgb_u8(60, 55, 50),
            mortar: Color::from_rgb_u8(40, 35, 30),
            highlight: Color::from_rgb_u8(80, 75, 70),
            shadow: Color::from_rgb_u8(40, 35, 30),
        }
    }
}

/// Wall slice drawn in a single screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    /// Top edge in view pixels.
    pub top: f32,
    /// Height in view pixels; zero when the ray hit nothing.
    pub height: f32,
    /// Distance shade applied to the texel color.
    pub brightness: f32,
    /// Whether the ray landed on a mortar texel.
    pub mortar: bool,
}

impl WallSlice {
    /// Slice for a column whose ray did not reach a wall.
    pub const EMPTY: WallSlice = WallSlice {
        top: 0.0,
        height: 0.0,
        brightness: 0.0,
        mortar: false,
    };
}

/// Billboard sprite positioned in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// What to draw.
    pub kind: SpriteKind,
    /// Screen column the sprite is centred on.
    pub column: usize,
    /// Distance from the viewer, used to pick shading.
    pub distance: f32,
    /// Full on-screen height in view pixels.
    pub size: f32,
    /// Top edge in view pixels.
    pub top: f32,
    /// Extra scale applied around the centre, such as the heart pulse.
    pub scale: f32,
    /// Tint for procedural shapes.
    pub tint: Color,
    /// Remaining health fraction shown as a bar above monsters.
    pub health_fraction: Option<f32>,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Height of the view the projection was computed for.
    pub view_height: f32,
    /// Background and wall colors.
    pub palette: Palette,
    /// One slice per projected column, left to right.
    pub columns: Vec<WallSlice>,
    /// Visible sprites, farthest first.
    pub sprites: Vec<SpritePresentation>,
    /// HUD state.
    pub hud: HudSnapshot,
    /// Time since the player last fired, driving the recoil animation.
    pub since_last_shot: Option<Duration>,
}

impl Scene {
    /// Creates a scene with no columns or sprites.
    #[must_use]
    pub fn new(view_height: f32, palette: Palette, hud: HudSnapshot) -> Self {
        Self {
            view_height,
            palette,
            columns: Vec::new(),
            sprites: Vec::new(),
            hud,
            since_last_shot: None,
        }
    }

    /// Active game mode.
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.hud.mode
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Requested window width in pixels.
    pub window_width: u32,
    /// Requested window height in pixels.
    pub window_height: u32,
    /// Scene content that should be displayed first.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        window_width: u32,
        window_height: u32,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if window_width == 0 || window_height == 0 {
            return Err(RenderingError::InvalidWindowSize {
                width: window_width,
                height: window_height,
            });
        }
        Ok(Self {
            window_title: window_title.into(),
            window_width,
            window_height,
            scene,
        })
    }
}

/// Rendering backend capable of presenting Raycrawl scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and rewrites the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The window must have a non-zero area.
    InvalidWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
