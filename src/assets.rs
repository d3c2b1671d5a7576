//! Asset lookup.
//!
//! Resolvers answer "which of these candidate files exists" and never fail:
//! a miss is `None`, and callers degrade to a placeholder or skip the stage.

use crate::movie::AnimationKind;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const ANIMATED_EXTENSIONS: &[&str] = &[".webp", ".apng", ".gif"];
pub const ANIMATED_OR_STATIC_EXTENSIONS: &[&str] = &[".webp", ".apng", ".gif", ".png"];
pub const IMAGE_EXTENSIONS: &[&str] = &[".png"];
pub const AUDIO_EXTENSIONS: &[&str] = &[".opus", ".ogg", ".mp3", ".wav"];

pub trait AssetResolver {
    /// First existing `candidate + extension`, trying candidates in order and
    /// extensions in order within each candidate.
    fn find_asset(&self, candidates: &[PathBuf], extensions: &[&str]) -> Option<PathBuf>;
}

/// Character folder entry, e.g. `characters/Phoenix/(a)normal`.
pub fn character_path(character: &str, name: &str) -> PathBuf {
    Path::new("characters").join(character).join(name)
}

/// Theme folder entry.
pub fn theme_path(name: &str) -> PathBuf {
    Path::new("themes").join("default").join(name)
}

/// Background folder entry.
pub fn background_path(name: &str) -> PathBuf {
    Path::new("background").join(name)
}

pub fn music_path(name: &str) -> PathBuf {
    Path::new("sounds").join("music").join(name)
}

/// Leading `!` marks an asset hidden from the local picker; it is still playable.
fn strip_hidden_marker(name: &str) -> &str {
    name.strip_prefix('!').unwrap_or(name)
}

fn bubble_name(name: &str) -> String {
    if name.eq_ignore_ascii_case("custom") {
        name.to_string()
    } else {
        format!("{name}_bubble")
    }
}

/// Resolve an animation the way each layer looks it up.
pub fn resolve_animation(
    assets: &dyn AssetResolver,
    kind: AnimationKind,
    name: &str,
    character: &str,
) -> Option<PathBuf> {
    match kind {
        AnimationKind::Pre => assets.find_asset(
            &[character_path(character, name)],
            ANIMATED_OR_STATIC_EXTENSIONS,
        ),
        AnimationKind::Talking => assets.find_asset(
            &[character_path(character, &format!("(b){name}"))],
            ANIMATED_OR_STATIC_EXTENSIONS,
        ),
        AnimationKind::Idle => assets.find_asset(
            &[character_path(character, &format!("(a){name}"))],
            ANIMATED_OR_STATIC_EXTENSIONS,
        ),
        AnimationKind::Shout => assets
            .find_asset(&[character_path(character, &bubble_name(name))], ANIMATED_EXTENSIONS)
            .or_else(|| assets.find_asset(&[theme_path(name)], ANIMATED_EXTENSIONS)),
        AnimationKind::Overlay => {
            let name = strip_hidden_marker(name);
            let bubble = bubble_name(name);
            assets
                .find_asset(
                    &[
                        character_path(character, &bubble),
                        character_path(character, &format!("overlay/{bubble}")),
                    ],
                    ANIMATED_OR_STATIC_EXTENSIONS,
                )
                .or_else(|| assets.find_asset(&[theme_path(name)], ANIMATED_OR_STATIC_EXTENSIONS))
                .or_else(|| {
                    assets.find_asset(&[theme_path("placeholder")], ANIMATED_OR_STATIC_EXTENSIONS)
                })
        }
        AnimationKind::Theme => assets.find_asset(&[theme_path(name)], ANIMATED_OR_STATIC_EXTENSIONS),
    }
}

/// Looks assets up on disk under a base directory.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    base: PathBuf,
}

impl FsAssetResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

fn with_extension(candidate: &Path, ext: &str) -> PathBuf {
    let mut s = candidate.as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}

impl AssetResolver for FsAssetResolver {
    fn find_asset(&self, candidates: &[PathBuf], extensions: &[&str]) -> Option<PathBuf> {
        for candidate in candidates {
            for ext in extensions {
                let path = self.base.join(with_extension(candidate, ext));
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }
}

/// In-memory asset set, keyed by relative path including extension.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    known: HashSet<PathBuf>,
}

impl StaticAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>) -> Self {
        self.insert(path);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) {
        self.known.insert(path.into());
    }
}

impl AssetResolver for StaticAssets {
    fn find_asset(&self, candidates: &[PathBuf], extensions: &[&str]) -> Option<PathBuf> {
        candidates
            .iter()
            .flat_map(|c| extensions.iter().map(move |ext| with_extension(c, ext)))
            .find(|p| self.known.contains(p))
    }
}

/// Pretends every asset exists with the first extension offered.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAsset;

impl AssetResolver for AnyAsset {
    fn find_asset(&self, candidates: &[PathBuf], extensions: &[&str]) -> Option<PathBuf> {
        let candidate = candidates.first()?;
        let ext = extensions.first().copied().unwrap_or("");
        Some(with_extension(candidate, ext))
    }
}
