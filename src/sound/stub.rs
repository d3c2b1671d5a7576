use super::AudioPlayer;

/// No-op audio player used when no device is attached.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl SilentAudio {
    pub fn new() -> Self {
        Self
    }
}

impl AudioPlayer for SilentAudio {
    fn play(&mut self, sfx_name: &str, _character: Option<&str>) {
        tracing::trace!("sound {} (silent)", sfx_name);
    }

    fn stop_all(&mut self) {}
}
