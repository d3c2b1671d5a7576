//! Shared test helpers: recording collaborators, a stock asset set and a
//! chat message builder.

use courtroom_sim::assets::StaticAssets;
use courtroom_sim::config::CourtroomConfig;
use courtroom_sim::courtroom::{Backend, Courtroom};
use courtroom_sim::movie::{Layer, MoviePlayer, MovieState};
use courtroom_sim::session::SessionState;
use courtroom_sim::sound::{AudioPlayer, Channel};
use courtroom_sim::theme::Theme;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// One collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Play {
        layer: Layer,
        file: String,
        play_once: bool,
    },
    Stop(Layer),
    Sound {
        channel: Channel,
        sfx: String,
    },
    StopSounds(Channel),
    SetBlip(String),
    Blip,
}

pub type Calls = Rc<RefCell<Vec<Call>>>;

pub struct RecordingMovie {
    layer: Layer,
    calls: Calls,
    running: bool,
}

impl MoviePlayer for RecordingMovie {
    fn play(&mut self, file: &Path, play_once: bool) {
        self.running = true;
        self.calls.borrow_mut().push(Call::Play {
            layer: self.layer,
            file: file.display().to_string(),
            play_once,
        });
    }

    fn stop(&mut self) {
        self.running = false;
        self.calls.borrow_mut().push(Call::Stop(self.layer));
    }

    fn state(&self) -> MovieState {
        if self.running {
            MovieState::Running
        } else {
            MovieState::Stopped
        }
    }
}

pub struct RecordingAudio {
    channel: Channel,
    calls: Calls,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, sfx_name: &str, _character: Option<&str>) {
        self.calls.borrow_mut().push(Call::Sound {
            channel: self.channel,
            sfx: sfx_name.to_string(),
        });
    }

    fn set_blip(&mut self, sfx_name: &str) {
        self.calls.borrow_mut().push(Call::SetBlip(sfx_name.to_string()));
    }

    fn blip(&mut self) {
        self.calls.borrow_mut().push(Call::Blip);
    }

    fn stop_all(&mut self) {
        self.calls.borrow_mut().push(Call::StopSounds(self.channel));
    }
}

/// Backend whose players all append to one shared call list.
pub fn recording_backend(assets: StaticAssets) -> (Backend, Calls) {
    let calls: Calls = Rc::default();
    let mut backend = Backend::new(assets);
    for layer in Layer::ALL {
        backend = backend.with_movie(
            layer,
            RecordingMovie {
                layer,
                calls: calls.clone(),
                running: false,
            },
        );
    }
    for channel in Channel::ALL {
        backend = backend.with_audio(
            channel,
            RecordingAudio {
                channel,
                calls: calls.clone(),
            },
        );
    }
    (backend, calls)
}

/// Assets for Phoenix and Edgeworth plus the stock theme.
#[allow(dead_code)]
pub fn stage_assets() -> StaticAssets {
    [
        "characters/Phoenix/deskslam.gif",
        "characters/Phoenix/(a)normal.gif",
        "characters/Phoenix/(b)normal.gif",
        "characters/Edgeworth/(a)normal.gif",
        "characters/Edgeworth/(b)normal.gif",
        "themes/default/objection.gif",
        "themes/default/hold_it.gif",
        "themes/default/defense_speedlines.gif",
        "themes/default/prosecution_speedlines.gif",
        "themes/default/realization.png",
        "themes/default/testimony1.gif",
        "themes/default/testimony2.gif",
        "background/defenseempty.png",
        "background/prosecutorempty.png",
        "background/witnessempty.png",
        "background/defensedesk.png",
        "background/prosecutiondesk.png",
        "background/stand.png",
    ]
    .into_iter()
    .fold(StaticAssets::new(), |assets, path| assets.with(path))
}

/// Phoenix (0), Edgeworth (1), Maya (2).
#[allow(dead_code)]
pub fn session() -> SessionState {
    SessionState::with_characters(["Phoenix", "Edgeworth", "Maya"])
}

#[allow(dead_code)]
pub fn courtroom_with(config: CourtroomConfig, session: SessionState) -> (Courtroom, Calls) {
    let (backend, calls) = recording_backend(stage_assets());
    (Courtroom::new(config, Theme::default(), session, backend), calls)
}

#[allow(dead_code)]
pub fn courtroom() -> (Courtroom, Calls) {
    courtroom_with(CourtroomConfig::default(), session())
}

/// Files played on a layer so far.
#[allow(dead_code)]
pub fn plays(calls: &Calls, layer: Layer) -> Vec<String> {
    calls
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Call::Play { layer: l, file, .. } if *l == layer => Some(file.clone()),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn sounds(calls: &Calls, channel: Channel) -> Vec<String> {
    calls
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Call::Sound { channel: ch, sfx } if *ch == channel => Some(sfx.clone()),
            _ => None,
        })
        .collect()
}

/// Builds chat message field lists; defaults to Phoenix saying "Hello" at
/// the defense bench with no pre-animation.
#[derive(Debug, Clone)]
pub struct Msg {
    fields: Vec<String>,
}

#[allow(dead_code)]
impl Msg {
    pub fn new() -> Self {
        let fields = [
            "chat", "-", "Phoenix", "normal", "Hello", "def", "1", "0", "0", "0", "0", "0", "0",
            "0", "0", "",
        ];
        Self {
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn set(mut self, index: usize, value: impl ToString) -> Self {
        self.fields[index] = value.to_string();
        self
    }

    pub fn desk(self, desk: &str) -> Self { self.set(0, desk) }
    pub fn pre(self, pre: &str) -> Self { self.set(1, pre) }
    pub fn character(self, name: &str) -> Self { self.set(2, name) }
    pub fn emote(self, emote: &str) -> Self { self.set(3, emote) }
    pub fn text(self, text: &str) -> Self { self.set(4, text) }
    pub fn side(self, side: &str) -> Self { self.set(5, side) }
    pub fn sfx(self, name: &str, delay: i64) -> Self { self.set(6, name).set(9, delay) }
    pub fn emote_mod(self, modifier: i64) -> Self { self.set(7, modifier) }
    pub fn char_id(self, id: i64) -> Self { self.set(8, id) }
    pub fn shout(self, code: i64) -> Self { self.set(10, code) }
    pub fn evidence(self, index: i64) -> Self { self.set(11, index) }
    pub fn flip(self) -> Self { self.set(12, 1) }
    pub fn effect(self, index: i64) -> Self { self.set(13, index) }
    pub fn color(self, color: i64) -> Self { self.set(14, color) }
    pub fn showname(self, name: &str) -> Self { self.set(15, name) }

    /// Drop trailing fields to produce a short message.
    pub fn truncated(mut self, len: usize) -> Self {
        self.fields.truncate(len);
        self
    }

    pub fn build(self) -> Vec<String> {
        self.fields
    }
}
