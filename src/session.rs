//! Per-session courtroom state handed to message admission: the character
//! list, who we are, who is muted, and the evidence on record.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    /// Folder name, also the name used on the wire.
    pub name: String,
    /// Display name; empty means use `name`.
    #[serde(default)]
    pub showname: String,
    /// Blip voice suffix (`male`, `female`, ...).
    #[serde(default = "default_gender")]
    pub gender: String,
}

fn default_gender() -> String { "male".into() }

impl CharacterInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            showname: String::new(),
            gender: default_gender(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.showname.trim().is_empty() {
            &self.name
        } else {
            &self.showname
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceInfo {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub characters: Vec<CharacterInfo>,
    /// Our own character id; `None` while spectating.
    #[serde(default)]
    pub own_char_id: Option<usize>,
    #[serde(default)]
    pub muted: HashSet<usize>,
    #[serde(default)]
    pub evidence: Vec<EvidenceInfo>,
    #[serde(default)]
    pub testimony_in_progress: bool,
}

impl SessionState {
    pub fn with_characters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            characters: names.into_iter().map(CharacterInfo::new).collect(),
            ..Self::default()
        }
    }

    pub fn character(&self, id: usize) -> Option<&CharacterInfo> {
        self.characters.get(id)
    }

    pub fn is_muted(&self, id: usize) -> bool {
        self.muted.contains(&id)
    }

    pub fn set_muted(&mut self, id: usize, muted: bool) {
        if muted {
            self.muted.insert(id);
        } else {
            self.muted.remove(&id);
        }
    }

    pub fn is_spectating(&self) -> bool {
        self.own_char_id.is_none()
    }

    /// Evidence by 1-based index; 0 means none.
    pub fn evidence(&self, index: usize) -> Option<&EvidenceInfo> {
        index.checked_sub(1).and_then(|i| self.evidence.get(i))
    }
}
