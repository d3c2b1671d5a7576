//! The in-character scene: message decoding, the playback state machine and
//! the text renderer it drives.

pub mod command;
pub mod highlight;
pub mod layout;
pub mod message;
pub mod playback;

pub use command::SceneCommand;
pub use highlight::{Glyph, HighlightRenderer, RevealStyle, Tick};
pub use layout::SceneLayout;
pub use message::{ChatMessage, EmoteModifier};
pub use playback::{
    AnimLevel, PlaybackContext, PlaybackMachine, PlaybackSettings, PlaybackState, StageEnv,
    TextState,
};
