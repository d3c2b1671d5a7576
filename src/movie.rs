//! Animation playback collaborator.
//!
//! Rendering is external; the courtroom only tells a player per layer which
//! resolved file to play and learns about completion through
//! `CourtroomEvent::AnimationDone`.

use std::path::{Path, PathBuf};

/// Stacked animation layers of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Shout/objection splash.
    Objection,
    /// The speaking character (pre-animation, talking, idle).
    Character,
    /// Per-character visual effect overlay.
    Effect,
    /// Speed-line backdrop for zoom emotes.
    Speedlines,
    /// Witness testimony / cross examination splash.
    Wtce,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Self::Objection,
        Self::Character,
        Self::Effect,
        Self::Speedlines,
        Self::Wtce,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "objection" | "shout" => Some(Self::Objection),
            "character" | "char" | "preanim" => Some(Self::Character),
            "effect" => Some(Self::Effect),
            "speedlines" => Some(Self::Speedlines),
            "wtce" => Some(Self::Wtce),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Objection => "objection",
            Self::Character => "character",
            Self::Effect => "effect",
            Self::Speedlines => "speedlines",
            Self::Wtce => "wtce",
        }
    }
}

/// Which flavor of animation is being requested; decides asset lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Pre-animation played once before the main pose.
    Pre,
    /// Talking loop, `(b)<emote>`.
    Talking,
    /// Idle loop, `(a)<emote>`.
    Idle,
    /// Shout splash: character `<name>_bubble`, then theme `<name>`.
    Shout,
    /// Effect overlay: character `<name>_bubble`, then theme `<name>`, then placeholder.
    Overlay,
    /// Theme-only animation (speed lines, WTCE).
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieState {
    Stopped,
    Running,
}

pub trait MoviePlayer {
    /// Start playing a resolved file. `play_once` players stop on the last frame.
    fn play(&mut self, file: &Path, play_once: bool);
    fn stop(&mut self);
    fn state(&self) -> MovieState;
}

/// Player that only tracks what it was asked to do.
#[derive(Debug, Default)]
pub struct StubMovie {
    current: Option<PathBuf>,
}

impl StubMovie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }
}

impl MoviePlayer for StubMovie {
    fn play(&mut self, file: &Path, _play_once: bool) {
        tracing::debug!("playing {}", file.display());
        self.current = Some(file.to_path_buf());
    }

    fn stop(&mut self) {
        self.current = None;
    }

    fn state(&self) -> MovieState {
        if self.current.is_some() {
            MovieState::Running
        } else {
            MovieState::Stopped
        }
    }
}
