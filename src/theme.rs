//! Theme data consulted by the scene: shout/effect/WTCE names, highlight
//! markers, text colors and sound aliases.
//!
//! Theme lookup on disk is an external concern; this module only holds the
//! parsed values, with built-in defaults matching the stock theme.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// An opaque RGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value).ok_or_else(|| format!("invalid color {value:?}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Text color selector carried by a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Default,
    Green,
    Red,
    Orange,
    /// The "quiet" color: the speaker does not play a talking animation.
    Blue,
    Yellow,
    Rainbow,
    Pink,
    Cyan,
}

impl TextColor {
    const ALL: [TextColor; 9] = [
        Self::Default,
        Self::Green,
        Self::Red,
        Self::Orange,
        Self::Blue,
        Self::Yellow,
        Self::Rainbow,
        Self::Pink,
        Self::Cyan,
    ];

    /// Out-of-range indices fall back to the default color.
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::Default)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn count() -> usize {
        Self::ALL.len()
    }
}

/// One inline highlight marker pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    pub start: char,
    pub end: char,
    pub color: Color,
    /// Whether the marker characters themselves are rendered.
    #[serde(default)]
    pub visible: bool,
}

/// A per-character visual effect and its sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDef {
    pub name: String,
    pub sfx: String,
    #[serde(default)]
    pub play_once: bool,
}

/// Parsed theme values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_shouts")]
    pub shout_names: Vec<String>,
    #[serde(default = "default_effects")]
    pub effects: Vec<EffectDef>,
    #[serde(default = "default_wtce")]
    pub wtce_names: Vec<String>,
    #[serde(default = "default_true")]
    pub enable_highlighting: bool,
    #[serde(default = "default_highlights")]
    pub highlights: Vec<HighlightRule>,
    /// Indexed by `TextColor::index()`; rainbow's entry is unused.
    #[serde(default = "default_text_colors")]
    pub text_colors: Vec<Color>,
    /// Sound alias -> file (e.g. `word_call` -> `sfx-gallery.wav`).
    #[serde(default = "default_sounds")]
    pub sounds: HashMap<String, String>,
    #[serde(default)]
    pub enable_showname_image: bool,
    #[serde(default)]
    pub enable_cycle_ding: bool,
}

fn default_true() -> bool { true }

fn default_shouts() -> Vec<String> {
    ["objection", "hold_it", "take_that", "custom"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_effects() -> Vec<EffectDef> {
    let def = |name: &str, sfx: &str, play_once| EffectDef {
        name: name.to_string(),
        sfx: sfx.to_string(),
        play_once,
    };
    vec![
        def("realization", "sfx-realization.wav", true),
        def("hearts", "sfx-squee.wav", false),
        def("reaction", "sfx-reactionding.wav", true),
        def("impact", "sfx-fan.wav", true),
    ]
}

fn default_wtce() -> Vec<String> {
    vec!["testimony1".to_string(), "testimony2".to_string()]
}

fn default_highlights() -> Vec<HighlightRule> {
    let rule = |start, end, color, visible| HighlightRule {
        start,
        end,
        color,
        visible,
    };
    vec![
        rule('`', '`', Color::rgb(0x00, 0xFF, 0x00), false),
        rule('|', '|', Color::rgb(0xFF, 0x80, 0x00), false),
        rule('(', ')', Color::rgb(0x6B, 0xC6, 0xF7), true),
        rule('[', ']', Color::rgb(0xA0, 0xA0, 0xA0), true),
    ]
}

fn default_text_colors() -> Vec<Color> {
    vec![
        Color::WHITE,
        Color::rgb(0x00, 0xFF, 0x00),
        Color::rgb(0xFF, 0x00, 0x00),
        Color::rgb(0xFF, 0xA5, 0x00),
        Color::rgb(0x6B, 0xC6, 0xF7),
        Color::rgb(0xFF, 0xFF, 0x00),
        Color::WHITE,
        Color::rgb(0xFF, 0xC0, 0xCB),
        Color::rgb(0x00, 0xFF, 0xFF),
    ]
}

fn default_sounds() -> HashMap<String, String> {
    HashMap::from([
        ("word_call".to_string(), "sfx-gallery.wav".to_string()),
        ("mod_call".to_string(), "sfx-gallery.wav".to_string()),
        ("cycle".to_string(), "sfx-blipmale.wav".to_string()),
        ("testimony1".to_string(), "sfx-testimony2.wav".to_string()),
        ("testimony2".to_string(), "sfx-testimony.wav".to_string()),
    ])
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            shout_names: default_shouts(),
            effects: default_effects(),
            wtce_names: default_wtce(),
            enable_highlighting: true,
            highlights: default_highlights(),
            text_colors: default_text_colors(),
            sounds: default_sounds(),
            enable_showname_image: false,
            enable_cycle_ding: false,
        }
    }
}

impl Theme {
    /// Load a theme JSON file, falling back to the built-in theme on any error.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable theme {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Base color for a text color selector.
    pub fn text_color(&self, color: TextColor) -> Color {
        self.text_colors
            .get(color.index())
            .copied()
            .unwrap_or(Color::WHITE)
    }

    /// Resolve a sound alias, or an empty string when unknown.
    pub fn sound(&self, alias: &str) -> String {
        self.sounds.get(alias).cloned().unwrap_or_default()
    }

    /// Shout name for a 1-based objection code.
    pub fn shout(&self, code: usize) -> Option<&str> {
        code.checked_sub(1)
            .and_then(|i| self.shout_names.get(i))
            .map(String::as_str)
    }

    /// Effect for a 1-based effect index.
    pub fn effect(&self, index: usize) -> Option<&EffectDef> {
        index.checked_sub(1).and_then(|i| self.effects.get(i))
    }

    /// WTCE name for a 1-based index.
    pub fn wtce(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.wtce_names.get(i))
            .map(String::as_str)
    }
}
