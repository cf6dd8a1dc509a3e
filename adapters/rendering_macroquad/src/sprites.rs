use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use macroquad::texture::Texture2D;
use raycrawl_rendering::{AssetCatalog, FrameHandle, SpriteKind};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const DEFAULT_FRAME_RATE: f32 = 8.0;

/// Animation frames loaded from the sprite manifest.
///
/// Kinds without frames report an empty slice so the renderer falls back to
/// procedural shapes.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    frames: BTreeMap<SpriteKind, Vec<FrameHandle>>,
    textures: Vec<Texture2D>,
    frame_rate: f32,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self {
            frames: BTreeMap::new(),
            textures: Vec::new(),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl SpriteAtlas {
    /// Returns the default manifest path relative to the working directory.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Loads the manifest at `path`, degrading to an empty atlas on failure.
    pub(crate) fn load(path: &Path) -> Self {
        match Self::from_manifest_with_loader(path, default_loader) {
            Ok(atlas) => {
                log::info!(
                    "loaded {} sprite frames from {}",
                    atlas.textures.len(),
                    path.display()
                );
                atlas
            }
            Err(error) => {
                log::warn!("sprites disabled, drawing fallback shapes: {error:#}");
                Self::default()
            }
        }
    }

    /// Frame to draw for `kind` after `elapsed` of animation, if any.
    #[must_use]
    pub(crate) fn frame_at(&self, kind: SpriteKind, elapsed: Duration) -> Option<Texture2D> {
        let frames = self.frames(kind);
        if frames.is_empty() {
            return None;
        }
        let step = (elapsed.as_secs_f32() * self.frame_rate) as usize;
        let handle = frames[step % frames.len()];
        self.textures.get(handle.get() as usize).copied()
    }

    fn from_manifest_with_loader(
        path: &Path,
        mut loader: impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = parse_manifest(&contents, &base)?;
        Ok(Self::from_entries(manifest, &mut loader))
    }

    fn from_entries(
        manifest: ParsedManifest,
        loader: &mut impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Self {
        let mut atlas = Self {
            frame_rate: manifest.frame_rate,
            ..Self::default()
        };

        'kinds: for (kind, paths) in manifest.entries {
            let mut loaded = Vec::with_capacity(paths.len());
            for path in &paths {
                match loader(path) {
                    Ok(texture) => loaded.push(texture),
                    Err(error) => {
                        log::warn!("dropping sprite {kind:?}: {error:#}");
                        continue 'kinds;
                    }
                }
            }

            let handles = loaded
                .into_iter()
                .map(|texture| {
                    let handle = FrameHandle::new(atlas.textures.len() as u32);
                    atlas.textures.push(texture);
                    handle
                })
                .collect();
            let _ = atlas.frames.insert(kind, handles);
        }

        atlas
    }
}

impl AssetCatalog for SpriteAtlas {
    fn frames(&self, kind: SpriteKind) -> &[FrameHandle] {
        self.frames.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Remembers which sprite kinds already reported a missing asset.
#[derive(Debug, Default)]
pub(crate) struct FallbackNotices {
    reported: BTreeSet<SpriteKind>,
}

impl FallbackNotices {
    /// Logs the first fallback draw of `kind`; later calls stay quiet.
    pub(crate) fn note(&mut self, kind: SpriteKind) -> bool {
        let first = self.reported.insert(kind);
        if first {
            log::warn!(
                "no frames for sprite `{}`, drawing fallback shape",
                kind.manifest_key()
            );
        }
        first
    }
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    frame_rate: Option<f32>,
    #[serde(default)]
    sprites: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, PartialEq)]
struct ParsedManifest {
    frame_rate: f32,
    entries: Vec<(SpriteKind, Vec<PathBuf>)>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<ParsedManifest> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let frame_rate = match manifest.frame_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        Some(rate) => bail!("sprite frame rate must be positive (received {rate})"),
        None => DEFAULT_FRAME_RATE,
    };

    let mut entries = Vec::with_capacity(manifest.sprites.len());
    for (name, frames) in manifest.sprites {
        let Some(kind) = SpriteKind::from_manifest_key(&name) else {
            bail!("unknown sprite key `{name}` in manifest");
        };
        if frames.is_empty() {
            continue;
        }
        let paths = frames
            .into_iter()
            .map(|relative| base_path.join(relative))
            .collect();
        entries.push((kind, paths));
    }
    entries.sort_by_key(|(kind, _)| *kind);

    Ok(ParsedManifest {
        frame_rate,
        entries,
    })
}
