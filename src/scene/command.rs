//! Side effects requested by the playback machine.
//!
//! The machine never touches collaborators itself: it records what should
//! happen and the courtroom applies the commands in order.

use super::highlight::Glyph;
use super::layout::SceneLayout;
use crate::chat_log::ChatRecord;
use crate::event::TimerKind;
use crate::movie::Layer;
use crate::sound::Channel;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    PlayAnimation {
        layer: Layer,
        file: PathBuf,
        play_once: bool,
    },
    StopAnimation(Layer),
    PlaySound {
        channel: Channel,
        sfx: String,
        character: Option<String>,
    },
    StopSounds(Channel),
    /// Select the text blip sound.
    SetBlip(String),
    Blip,
    StartTimer {
        kind: TimerKind,
        delay_ms: u64,
        repeating: bool,
    },
    StopTimer(TimerKind),
    ShowEvidence {
        image: String,
        left: bool,
    },
    HideEvidence,
    SetScene(SceneLayout),
    SetDeskVisible(bool),
    SetMirrored(bool),
    SetCharacterHidden(bool),
    SetShowname(String),
    /// Character-supplied showname image replacing the text, or `None`.
    ShownameImage(Option<PathBuf>),
    SetChatbox(String),
    ChatboxVisible(bool),
    ClearMessage,
    RevealGlyph(Glyph),
    AppendLog(ChatRecord),
    /// Line for the recorded transcript, if recording is on.
    Transcript {
        name: String,
        message: String,
    },
    /// Ask the window system for attention.
    Alert,
    /// Client-side OOC notice.
    Notice {
        name: String,
        message: String,
    },
    Testimony(bool),
}
