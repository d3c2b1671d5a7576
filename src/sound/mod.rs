//! Audio playback collaborator.
//!
//! Device output is external; the courtroom drives one player per channel.
//! [`SilentAudio`] is the no-op player used when no device is attached.

mod stub;

pub use stub::SilentAudio;

/// Independent audio channels; stopping one never cuts another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Shouts,
    Effects,
    Blips,
    System,
    Music,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Self::Shouts,
        Self::Effects,
        Self::Blips,
        Self::System,
        Self::Music,
    ];
}

pub trait AudioPlayer {
    /// Play a sound by file name. `character` scopes the lookup to a
    /// character folder first when given.
    fn play(&mut self, sfx_name: &str, character: Option<&str>);

    /// Select the blip sound used by [`AudioPlayer::blip`].
    fn set_blip(&mut self, _sfx_name: &str) {}

    /// Play one text blip.
    fn blip(&mut self) {}

    fn stop_all(&mut self);
}
