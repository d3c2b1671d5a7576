//! Client configuration persistence.
//!
//! Stores user preferences (chat log display, text reveal pacing, callwords)
//! as JSON at `~/.local/share/courtroom-sim/config.json`. Loaded once on
//! startup; saved on every change so the file is always current.

use crate::chat_log::{DisplayOptions, GrowDirection};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file path.
fn default_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("courtroom-sim")
        .join("config.json")
}

/// Persisted client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtroomConfig {
    #[serde(default = "default_log_max_lines")]
    pub log_max_lines: usize,
    #[serde(default)]
    pub log_display_timestamps: bool,
    #[serde(default = "default_true")]
    pub log_display_self_highlight: bool,
    #[serde(default)]
    pub log_display_empty_messages: bool,
    #[serde(default = "default_true")]
    pub log_display_music_switch: bool,
    #[serde(default)]
    pub log_newline_format: bool,
    #[serde(default)]
    pub log_grow_direction: GrowDirection,
    #[serde(default)]
    pub log_recording_enabled: bool,
    /// Where recorded IC/OOC lines go when recording is on.
    #[serde(default)]
    pub log_recording_path: Option<PathBuf>,
    #[serde(default = "default_viewport_lines")]
    pub log_viewport_lines: usize,
    #[serde(default)]
    pub blank_blips: bool,
    #[serde(default = "default_blip_rate")]
    pub blip_rate: u32,
    #[serde(default = "default_chat_tick_interval")]
    pub chat_tick_interval_ms: u64,
    #[serde(default)]
    pub first_person: bool,
    #[serde(default)]
    pub always_pre: bool,
    #[serde(default)]
    pub callwords: Vec<String>,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub path: PathBuf,
}

fn default_log_max_lines() -> usize { 200 }
fn default_viewport_lines() -> usize { 30 }
fn default_blip_rate() -> u32 { 1 }
fn default_chat_tick_interval() -> u64 { 60 }
fn default_true() -> bool { true }

impl Default for CourtroomConfig {
    fn default() -> Self {
        Self {
            log_max_lines: default_log_max_lines(),
            log_display_timestamps: false,
            log_display_self_highlight: true,
            log_display_empty_messages: false,
            log_display_music_switch: true,
            log_newline_format: false,
            log_grow_direction: GrowDirection::default(),
            log_recording_enabled: false,
            log_recording_path: None,
            log_viewport_lines: default_viewport_lines(),
            blank_blips: false,
            blip_rate: default_blip_rate(),
            chat_tick_interval_ms: default_chat_tick_interval(),
            first_person: false,
            always_pre: false,
            callwords: Vec::new(),
            path: default_path(),
        }
    }
}

impl CourtroomConfig {
    /// Load from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(&default_path())
    }

    /// Load from an explicit path, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        config.path = path.to_path_buf();
        config
    }

    /// Persist current config to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chat log display toggles derived from the persisted settings.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            timestamps: self.log_display_timestamps,
            self_highlight: self.log_display_self_highlight,
            suppress_empty: !self.log_display_empty_messages,
            suppress_music: !self.log_display_music_switch,
            newline_join: self.log_newline_format,
            grow_direction: self.log_grow_direction,
        }
    }

    /// Blip cadence; a zero rate would never blip, so it reads as one.
    pub fn effective_blip_rate(&self) -> u32 {
        self.blip_rate.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = CourtroomConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config.log_max_lines, 200);
        assert_eq!(config.chat_tick_interval_ms, 60);
        assert!(config.log_display_self_highlight);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let mut config = CourtroomConfig::load_from(&path);
        config.log_newline_format = true;
        config.callwords = vec!["phoenix".to_string()];
        config.log_grow_direction = GrowDirection::Up;
        config.save().unwrap();

        let loaded = CourtroomConfig::load_from(&path);
        assert!(loaded.log_newline_format);
        assert_eq!(loaded.callwords, vec!["phoenix".to_string()]);
        assert_eq!(loaded.log_grow_direction, GrowDirection::Up);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "blip_rate": 0, "log_display_empty_messages": true }"#).unwrap();

        let config = CourtroomConfig::load_from(&path);
        assert_eq!(config.effective_blip_rate(), 1);
        assert!(!config.display_options().suppress_empty);
        assert!(config.display_options().self_highlight);
    }

    #[test]
    fn test_garbage_json_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let config = CourtroomConfig::load_from(&path);
        assert_eq!(config.log_viewport_lines, 30);
    }
}
