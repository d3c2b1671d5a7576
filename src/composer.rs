//! Outgoing message composer.
//!
//! Interactive controls are identified by a typed [`Control`] tag and routed
//! through [`Composer::dispatch`]; [`Composer::compose`] turns the current
//! selection into the field list the server expects.

use crate::scene::message::{HIDDEN_EMOTE, NO_PREANIM};
use crate::session::SessionState;
use crate::theme::{TextColor, Theme};
use serde::{Deserialize, Serialize};

/// One entry of a character's emote list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteDef {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub pre_anim: String,
    pub emote: String,
    #[serde(default)]
    pub modifier: i64,
    /// `None` sends `chat`.
    #[serde(default)]
    pub desk_modifier: Option<String>,
    #[serde(default)]
    pub sfx_name: String,
    #[serde(default)]
    pub sfx_delay: i64,
}

impl EmoteDef {
    pub fn new(emote: impl Into<String>) -> Self {
        Self {
            comment: String::new(),
            pre_anim: String::new(),
            emote: emote.into(),
            modifier: 0,
            desk_modifier: None,
            sfx_name: String::new(),
            sfx_delay: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTarget {
    Shout,
    Effect,
    Emote,
    Wtce,
}

/// Tag carried by each interactive control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// 1-based shout button.
    Shout(usize),
    /// 1-based effect button.
    Effect(usize),
    Cycle { target: CycleTarget, delta: i32 },
    Pre,
    Flip,
    Hidden,
    PresentEvidence,
    TextColor(i64),
}

#[derive(Debug, Clone)]
pub struct Composer {
    pub character: String,
    pub char_id: usize,
    pub side: String,
    pub showname: String,
    emotes: Vec<EmoteDef>,
    emote: usize,
    shout_count: usize,
    effect_count: usize,
    wtce_count: usize,
    shout: Option<usize>,
    effect: Option<usize>,
    wtce: Option<usize>,
    /// Played on every cycle press when set.
    cycle_sfx: Option<String>,
    pre: bool,
    always_pre: bool,
    flip: bool,
    hidden: bool,
    present_evidence: bool,
    selected_evidence: Option<usize>,
    text_color: i64,
}

impl Composer {
    pub fn new(character: impl Into<String>, char_id: usize, emotes: Vec<EmoteDef>) -> Self {
        Self {
            character: character.into(),
            char_id,
            side: "wit".to_string(),
            showname: String::new(),
            emotes,
            emote: 0,
            shout_count: 4,
            effect_count: 4,
            wtce_count: 2,
            shout: None,
            effect: None,
            wtce: None,
            cycle_sfx: None,
            pre: false,
            always_pre: false,
            flip: false,
            hidden: false,
            present_evidence: false,
            selected_evidence: None,
            text_color: 0,
        }
    }

    /// Button group sizes, usually the theme's shout and effect counts.
    pub fn with_groups(mut self, shouts: usize, effects: usize) -> Self {
        self.shout_count = shouts;
        self.effect_count = effects;
        self
    }

    /// Group sizes and the cycle ding from a theme.
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.shout_count = theme.shout_names.len();
        self.effect_count = theme.effects.len();
        self.wtce_count = theme.wtce_names.len();
        self.cycle_sfx = theme
            .enable_cycle_ding
            .then(|| theme.sound("cycle"))
            .filter(|s| !s.is_empty());
        self
    }

    /// Keep the pre-animation box checked across messages.
    pub fn with_always_pre(mut self, always_pre: bool) -> Self {
        self.always_pre = always_pre;
        self.pre = self.pre || always_pre;
        self
    }

    pub fn shout(&self) -> Option<usize> {
        self.shout
    }

    pub fn effect(&self) -> Option<usize> {
        self.effect
    }

    pub fn wtce(&self) -> Option<usize> {
        self.wtce
    }

    /// Splash name for the selected WTCE button, e.g. `testimony1`.
    pub fn wtce_request(&self) -> Option<String> {
        self.wtce.map(|n| format!("testimony{n}"))
    }

    pub fn emote_index(&self) -> usize {
        self.emote
    }

    pub fn pre(&self) -> bool {
        self.pre
    }

    pub fn flip(&self) -> bool {
        self.flip
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn text_color(&self) -> i64 {
        self.text_color
    }

    pub fn select_evidence(&mut self, index: Option<usize>) {
        self.selected_evidence = index;
    }

    /// Apply a control. Returns a sound to play as feedback, if any.
    pub fn dispatch(&mut self, control: Control) -> Option<String> {
        match control {
            Control::Shout(n) => self.shout = toggle(self.shout, n, self.shout_count),
            Control::Effect(n) => self.effect = toggle(self.effect, n, self.effect_count),
            Control::Cycle { target, delta } => {
                self.cycle(target, delta);
                return self.cycle_sfx.clone();
            }
            Control::Pre => self.pre = !self.pre,
            Control::Flip => self.flip = !self.flip,
            Control::Hidden => self.hidden = !self.hidden,
            Control::PresentEvidence => self.present_evidence = !self.present_evidence,
            Control::TextColor(n) => {
                self.text_color = if (0..TextColor::count() as i64).contains(&n) { n } else { 0 };
            }
        }
        None
    }

    fn cycle(&mut self, target: CycleTarget, delta: i32) {
        match target {
            CycleTarget::Shout => self.shout = cycle_button(self.shout, delta, self.shout_count),
            CycleTarget::Effect => self.effect = cycle_button(self.effect, delta, self.effect_count),
            CycleTarget::Wtce => self.wtce = cycle_button(self.wtce, delta, self.wtce_count),
            CycleTarget::Emote => {
                if !self.emotes.is_empty() {
                    let len = self.emotes.len() as i64;
                    self.emote = (self.emote as i64 + i64::from(delta)).rem_euclid(len) as usize;
                }
            }
        }
    }

    /// Emote modifier as sent, with the legacy adjustments for shouts and the
    /// pre-animation box.
    fn emote_modifier(&self, base: i64) -> i64 {
        if self.shout.is_some() {
            return if base == 5 { 6 } else { 2 };
        }
        match (self.pre, base) {
            (true, 0) => 1,
            (false, 1) => 0,
            (false, 4) => 5,
            (_, other) => other,
        }
    }

    /// Build the outgoing field list, or `None` when sending is not allowed:
    /// blank text, spectating or muted, or the previous message is still
    /// playing and no shout would interrupt it.
    pub fn compose(&self, text: &str, session: &SessionState, playback_busy: bool) -> Option<Vec<String>> {
        if text.trim().is_empty() {
            return None;
        }
        if session.own_char_id.is_none_or(|id| session.is_muted(id)) {
            tracing::debug!("Not sending: spectating or muted");
            return None;
        }
        if playback_busy && self.shout.is_none() {
            tracing::debug!("Not sending: previous message still playing");
            return None;
        }
        let Some(emote) = self.emotes.get(self.emote) else {
            tracing::warn!("No emote selected for {}", self.character);
            return None;
        };

        let pre_anim = if emote.pre_anim.trim().is_empty() {
            NO_PREANIM.to_string()
        } else {
            emote.pre_anim.clone()
        };
        let sfx = if emote.sfx_name.trim().is_empty() {
            "1".to_string()
        } else {
            emote.sfx_name.clone()
        };
        let evidence = match (self.present_evidence, self.selected_evidence) {
            (true, Some(index)) => index + 1,
            _ => 0,
        };

        Some(vec![
            emote.desk_modifier.clone().unwrap_or_else(|| "chat".to_string()),
            pre_anim,
            self.character.clone(),
            if self.hidden { HIDDEN_EMOTE.to_string() } else { emote.emote.clone() },
            text.to_string(),
            self.side.clone(),
            sfx,
            self.emote_modifier(emote.modifier).to_string(),
            self.char_id.to_string(),
            emote.sfx_delay.to_string(),
            self.shout.unwrap_or(0).to_string(),
            evidence.to_string(),
            u8::from(self.flip).to_string(),
            self.effect.unwrap_or(0).to_string(),
            self.text_color.to_string(),
            self.showname.clone(),
        ])
    }

    /// Our message came back from the server: reset the one-shot controls.
    pub fn acknowledge(&mut self) {
        self.shout = None;
        self.effect = None;
        self.present_evidence = false;
        self.pre = self.always_pre;
    }
}

/// Mutually exclusive button group: pressing the active button clears it.
fn toggle(current: Option<usize>, pressed: usize, count: usize) -> Option<usize> {
    if pressed == 0 || pressed > count {
        return current;
    }
    if current == Some(pressed) { None } else { Some(pressed) }
}

fn cycle_button(current: Option<usize>, delta: i32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let count = count as i64;
    let start = match current {
        Some(n) => n as i64 - 1,
        None if delta < 0 => 0,
        None => -1,
    };
    Some((start + i64::from(delta)).rem_euclid(count) as usize + 1)
}
