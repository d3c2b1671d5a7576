//! The courtroom host.
//!
//! Owns the playback machine, chat log, countdown clocks and the logical
//! scheduler, and applies the machine's scene commands to the collaborators.
//! All input arrives as [`CourtroomEvent`]s or through the direct entry
//! points; the chat log is flushed once per entry point so eviction is
//! batched.

use crate::assets::{music_path, resolve_animation, AssetResolver, AUDIO_EXTENSIONS};
use crate::chat_log::{ChatLog, ChatRecord, DisplayOptions};
use crate::config::CourtroomConfig;
use crate::event::{CourtroomEvent, EventQueue, Scheduler, TimerKind};
use crate::movie::{AnimationKind, Layer, MoviePlayer, StubMovie};
use crate::scene::playback::{TESTIMONY_HIDE_MS, TESTIMONY_SHOW_MS};
use crate::scene::{
    Glyph, PlaybackMachine, PlaybackSettings, PlaybackState, SceneCommand, StageEnv,
};
use crate::session::SessionState;
use crate::sound::{AudioPlayer, Channel, SilentAudio};
use crate::theme::Theme;
use crate::timer::{FiringChange, TimerBank, TimerCommand};
use crate::transcript::{self, Transcript};
use crate::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Collaborators the courtroom drives.
pub struct Backend {
    assets: Box<dyn AssetResolver>,
    movies: BTreeMap<Layer, Box<dyn MoviePlayer>>,
    audio: BTreeMap<Channel, Box<dyn AudioPlayer>>,
}

impl Backend {
    /// Stub players on every layer and channel.
    pub fn new(assets: impl AssetResolver + 'static) -> Self {
        Self {
            assets: Box::new(assets),
            movies: Layer::ALL
                .into_iter()
                .map(|l| (l, Box::new(StubMovie::new()) as Box<dyn MoviePlayer>))
                .collect(),
            audio: Channel::ALL
                .into_iter()
                .map(|c| (c, Box::new(SilentAudio::new()) as Box<dyn AudioPlayer>))
                .collect(),
        }
    }

    pub fn with_movie(mut self, layer: Layer, player: impl MoviePlayer + 'static) -> Self {
        self.movies.insert(layer, Box::new(player));
        self
    }

    pub fn with_audio(mut self, channel: Channel, player: impl AudioPlayer + 'static) -> Self {
        self.audio.insert(channel, Box::new(player));
        self
    }

    pub fn assets(&self) -> &dyn AssetResolver {
        self.assets.as_ref()
    }

    fn movie(&mut self, layer: Layer) -> Option<&mut (dyn MoviePlayer + 'static)> {
        self.movies.get_mut(&layer).map(|m| m.as_mut())
    }

    fn audio(&mut self, channel: Channel) -> Option<&mut (dyn AudioPlayer + 'static)> {
        self.audio.get_mut(&channel).map(|a| a.as_mut())
    }
}

/// Client-side OOC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceView {
    pub image: String,
    pub left: bool,
}

/// What is currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    pub side: String,
    pub background: String,
    pub desk: String,
    pub desk_visible: bool,
    pub evidence: Option<EvidenceView>,
    pub chatbox: String,
    pub chatbox_visible: bool,
    pub showname: String,
    pub showname_image: Option<PathBuf>,
    /// Visible revealed text.
    pub message: String,
    pub glyphs: Vec<Glyph>,
    pub mirrored: bool,
    pub character_hidden: bool,
    pub testimony: bool,
    pub animations: BTreeMap<Layer, PathBuf>,
    /// Defense and prosecution bars, 0..=10.
    pub health: [i32; 2],
    pub music: Option<String>,
    pub alerts: usize,
}

impl Default for SceneView {
    fn default() -> Self {
        Self {
            side: String::new(),
            background: String::new(),
            desk: String::new(),
            desk_visible: false,
            evidence: None,
            chatbox: String::new(),
            chatbox_visible: false,
            showname: String::new(),
            showname_image: None,
            message: String::new(),
            glyphs: Vec::new(),
            mirrored: false,
            character_hidden: false,
            testimony: false,
            animations: BTreeMap::new(),
            health: [10, 10],
            music: None,
            alerts: 0,
        }
    }
}

impl SceneView {
    pub fn speedlines(&self) -> bool {
        self.animations.contains_key(&Layer::Speedlines)
    }
}

pub struct Courtroom {
    config: CourtroomConfig,
    theme: Rc<Theme>,
    session: SessionState,
    machine: PlaybackMachine,
    log: ChatLog,
    timers: TimerBank,
    scheduler: Scheduler,
    events: EventQueue,
    backend: Backend,
    scene: SceneView,
    notices: Vec<Notice>,
    transcript: Option<Transcript>,
}

impl Courtroom {
    pub fn new(config: CourtroomConfig, theme: Theme, session: SessionState, backend: Backend) -> Self {
        let theme = Rc::new(theme);
        let machine = PlaybackMachine::new(theme.clone(), PlaybackSettings::from_config(&config));
        let mut log = ChatLog::new(config.log_max_lines, config.display_options());
        log.set_viewport_lines(config.log_viewport_lines);
        let transcript = config.log_recording_enabled.then(|| {
            Transcript::new(
                config
                    .log_recording_path
                    .clone()
                    .unwrap_or_else(transcript::default_path),
            )
        });
        Self {
            config,
            theme,
            session,
            machine,
            log,
            timers: TimerBank::new(),
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
            backend,
            scene: SceneView::default(),
            notices: Vec::new(),
            transcript,
        }
    }

    pub fn config(&self) -> &CourtroomConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn machine(&self) -> &PlaybackMachine {
        &self.machine
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.state()
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ChatLog {
        &mut self.log
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scene(&self) -> &SceneView {
        &self.scene
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Logical time in ms.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn awaiting_animation(&self) -> Option<Layer> {
        self.machine.awaiting_animation()
    }

    pub fn push_event(&mut self, event: CourtroomEvent) {
        self.events.push(event);
    }

    /// Handle every queued event, then flush the chat log once.
    pub fn pump(&mut self) {
        tracing::trace!("Pumping {} events", self.events.len());
        while !self.events.is_empty() {
            for event in self.events.drain() {
                self.handle(event);
            }
        }
        self.log.flush();
    }

    fn handle(&mut self, event: CourtroomEvent) {
        match event {
            CourtroomEvent::Message(fields) => {
                if let Err(e) = self.handle_message(&fields) {
                    tracing::debug!("Rejected message: {}", e);
                }
            }
            CourtroomEvent::AnimationDone(layer) => self.handle_animation_done(layer),
            CourtroomEvent::TimerFired(kind) => self.handle_timer(kind),
            CourtroomEvent::Song {
                song,
                char_id,
                showname,
            } => self.handle_song(&song, char_id, showname.as_deref()),
            CourtroomEvent::Wtce(name) => self.handle_wtce(&name),
            CourtroomEvent::HealthBar { bar, state } => self.handle_health(bar, state),
            CourtroomEvent::Timer(command) => self.handle_timer_command(command),
            CourtroomEvent::ModCall(message) => self.handle_mod_call(&message),
        }
    }

    /// Submit a chat message field list.
    pub fn submit<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        let result = self.handle_message(fields);
        self.log.flush();
        result
    }

    fn handle_message<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        let env = StageEnv {
            session: &self.session,
            assets: self.backend.assets.as_ref(),
        };
        let result = self.machine.submit(fields, &env);
        self.apply_commands();
        result
    }

    /// An animation layer finished playing.
    pub fn animation_done(&mut self, layer: Layer) {
        self.handle_animation_done(layer);
        self.log.flush();
    }

    fn handle_animation_done(&mut self, layer: Layer) {
        if matches!(layer, Layer::Objection | Layer::Effect | Layer::Wtce) {
            self.scene.animations.remove(&layer);
        }
        let env = StageEnv {
            session: &self.session,
            assets: self.backend.assets.as_ref(),
        };
        self.machine.animation_finished(layer, &env);
        self.apply_commands();
    }

    /// Move logical time forward by `ms`, firing due timers in deadline order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now().saturating_add(ms);
        while let Some(kind) = self.scheduler.pop_due(target) {
            self.handle_timer(kind);
        }
        self.scheduler.settle(target);
        self.log.flush();
    }

    fn handle_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::ChatTick | TimerKind::SfxDelay => {
                let env = StageEnv {
                    session: &self.session,
                    assets: self.backend.assets.as_ref(),
                };
                self.machine.timer_fired(kind, &env);
                self.apply_commands();
            }
            TimerKind::Countdown(slot) => {
                self.timers.fire(slot);
            }
            TimerKind::TestimonyShow => {
                self.scene.testimony = false;
                if self.session.testimony_in_progress {
                    self.scheduler.start_once(TimerKind::TestimonyHide, TESTIMONY_HIDE_MS);
                }
            }
            TimerKind::TestimonyHide => {
                if self.session.testimony_in_progress {
                    self.scene.testimony = true;
                    self.scheduler.start_once(TimerKind::TestimonyShow, TESTIMONY_SHOW_MS);
                }
            }
        }
    }

    fn apply_commands(&mut self) {
        for command in self.machine.take_commands() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::PlayAnimation {
                layer,
                file,
                play_once,
            } => {
                if let Some(movie) = self.backend.movie(layer) {
                    movie.play(&file, play_once);
                }
                self.scene.animations.insert(layer, file);
            }
            SceneCommand::StopAnimation(layer) => {
                if let Some(movie) = self.backend.movie(layer) {
                    movie.stop();
                }
                self.scene.animations.remove(&layer);
            }
            SceneCommand::PlaySound {
                channel,
                sfx,
                character,
            } => {
                if let Some(audio) = self.backend.audio(channel) {
                    audio.play(&sfx, character.as_deref());
                }
            }
            SceneCommand::StopSounds(channel) => {
                if let Some(audio) = self.backend.audio(channel) {
                    audio.stop_all();
                }
            }
            SceneCommand::SetBlip(sfx) => {
                if let Some(audio) = self.backend.audio(Channel::Blips) {
                    audio.set_blip(&sfx);
                }
            }
            SceneCommand::Blip => {
                if let Some(audio) = self.backend.audio(Channel::Blips) {
                    audio.blip();
                }
            }
            SceneCommand::StartTimer {
                kind,
                delay_ms,
                repeating,
            } => {
                if repeating {
                    self.scheduler.start_repeating(kind, delay_ms);
                } else {
                    self.scheduler.start_once(kind, delay_ms);
                }
            }
            SceneCommand::StopTimer(kind) => self.scheduler.cancel(kind),
            SceneCommand::ShowEvidence { image, left } => {
                self.scene.evidence = Some(EvidenceView { image, left });
            }
            SceneCommand::HideEvidence => self.scene.evidence = None,
            SceneCommand::SetScene(layout) => {
                self.scene.side = layout.side;
                self.scene.background = layout.background;
                self.scene.desk = layout.desk;
                self.scene.desk_visible = layout.desk_visible;
            }
            SceneCommand::SetDeskVisible(visible) => self.scene.desk_visible = visible,
            SceneCommand::SetMirrored(mirrored) => self.scene.mirrored = mirrored,
            SceneCommand::SetCharacterHidden(hidden) => self.scene.character_hidden = hidden,
            SceneCommand::SetShowname(name) => self.scene.showname = name,
            SceneCommand::ShownameImage(image) => self.scene.showname_image = image,
            SceneCommand::SetChatbox(name) => self.scene.chatbox = name,
            SceneCommand::ChatboxVisible(visible) => self.scene.chatbox_visible = visible,
            SceneCommand::ClearMessage => {
                self.scene.message.clear();
                self.scene.glyphs.clear();
            }
            SceneCommand::RevealGlyph(glyph) => {
                if glyph.visible {
                    self.scene.message.push(glyph.ch);
                }
                self.scene.glyphs.push(glyph);
            }
            SceneCommand::AppendLog(record) => self.log.append(record),
            SceneCommand::Transcript { name, message } => self.record(&name, &message),
            SceneCommand::Alert => self.scene.alerts += 1,
            SceneCommand::Notice { name, message } => self.notices.push(Notice { name, message }),
            SceneCommand::Testimony(shown) => self.scene.testimony = shown,
        }
    }

    fn record(&self, name: &str, message: &str) {
        if let Some(transcript) = &self.transcript {
            if let Err(e) = transcript.record(name, message) {
                tracing::warn!("Failed to record {}: {}", transcript.path().display(), e);
            }
        }
    }

    /// Music change.
    pub fn play_song(&mut self, song: &str, char_id: i64, showname: Option<&str>) {
        self.handle_song(song, char_id, showname);
        self.log.flush();
    }

    fn handle_song(&mut self, song: &str, char_id: i64, showname: Option<&str>) {
        let speaker = usize::try_from(char_id)
            .ok()
            .filter(|&id| id < self.session.characters.len());
        if let Some(id) = speaker {
            if self.session.is_muted(id) {
                tracing::debug!("Ignoring song from muted character {}", id);
                return;
            }
            let name = showname
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| self.session.character(id).map(|c| c.display_name().to_string()))
                .unwrap_or_default();
            let message = format!("has played a song: {song}");
            self.record(&name, &message);
            self.log.append(ChatRecord::music(&name, &message));
        }

        let mut extensions = vec![""];
        extensions.extend_from_slice(AUDIO_EXTENSIONS);
        let file = self
            .backend
            .assets
            .find_asset(&[music_path(song)], &extensions)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| song.to_string());
        if let Some(audio) = self.backend.audio(Channel::Music) {
            audio.play(&file, None);
        }
        self.scene.music = Some(song.to_string());
    }

    /// Witness testimony / cross examination splash, `testimonyN`.
    pub fn wtce(&mut self, name: &str) {
        self.handle_wtce(name);
        self.log.flush();
    }

    fn handle_wtce(&mut self, name: &str) {
        let Some(index) = name
            .strip_prefix("testimony")
            .and_then(|n| n.parse::<usize>().ok())
        else {
            tracing::debug!("Unknown WTCE {:?}", name);
            return;
        };
        let Some(anim) = self.theme.wtce(index).map(str::to_string) else {
            tracing::debug!("WTCE index {} out of range", index);
            return;
        };

        let mut sfx = self.theme.sound(&anim);
        if sfx.is_empty() {
            sfx = anim.clone();
        }
        if let Some(audio) = self.backend.audio(Channel::System) {
            audio.play(&sfx, None);
        }
        match resolve_animation(self.backend.assets(), AnimationKind::Theme, &anim, "") {
            Some(file) => self.apply(SceneCommand::PlayAnimation {
                layer: Layer::Wtce,
                file,
                play_once: true,
            }),
            None => tracing::warn!("Missing WTCE animation {}", anim),
        }

        match index {
            1 => self.session.testimony_in_progress = true,
            2 => {
                self.session.testimony_in_progress = false;
                self.scene.testimony = false;
                self.scheduler.cancel(TimerKind::TestimonyShow);
                self.scheduler.cancel(TimerKind::TestimonyHide);
            }
            _ => {}
        }
    }

    /// Moderator call: server notice, `mod_call` sound and an alert.
    pub fn mod_call(&mut self, message: &str) {
        self.handle_mod_call(message);
    }

    fn handle_mod_call(&mut self, message: &str) {
        tracing::info!("Moderator call: {}", message);
        self.notices.push(Notice {
            name: String::new(),
            message: message.to_string(),
        });
        let sfx = self.theme.sound("mod_call");
        if let Some(audio) = self.backend.audio(Channel::System) {
            audio.play(&sfx, None);
        }
        self.scene.alerts += 1;
    }

    /// Bar 1 is defense, bar 2 prosecution; states outside 0..=10 are ignored.
    pub fn set_health(&mut self, bar: i32, state: i32) {
        self.handle_health(bar, state);
    }

    fn handle_health(&mut self, bar: i32, state: i32) {
        if !(0..=10).contains(&state) {
            return;
        }
        match bar {
            1 => self.scene.health[0] = state,
            2 => self.scene.health[1] = state,
            _ => {}
        }
    }

    /// Apply a countdown command. Out-of-range slots are ignored.
    pub fn timer_command(&mut self, command: TimerCommand) {
        self.handle_timer_command(command);
    }

    fn handle_timer_command(&mut self, command: TimerCommand) {
        let kind = TimerKind::Countdown(command.slot());
        match self.timers.apply(command) {
            FiringChange::None => {}
            FiringChange::Start { interval_ms } => self.scheduler.start_repeating(kind, interval_ms),
            FiringChange::Stop => self.scheduler.cancel(kind),
            FiringChange::Retime { interval_ms } => self.scheduler.set_interval(kind, interval_ms),
        }
    }

    pub fn set_timer_time(&mut self, slot: usize, time_ms: i64) {
        self.timer_command(TimerCommand::Set { slot, time_ms });
    }

    pub fn set_timer_step(&mut self, slot: usize, step_ms: i64) {
        self.timer_command(TimerCommand::Step { slot, step_ms });
    }

    pub fn set_timer_interval(&mut self, slot: usize, interval_ms: u64) {
        self.timer_command(TimerCommand::Interval { slot, interval_ms });
    }

    pub fn pause_timer(&mut self, slot: usize) {
        self.timer_command(TimerCommand::Pause { slot });
    }

    pub fn resume_timer(&mut self, slot: usize) {
        self.timer_command(TimerCommand::Resume { slot });
    }

    /// Append a record from outside the scene (server lines, imports).
    pub fn append_record(&mut self, record: ChatRecord) {
        self.log.append(record);
    }

    /// Flush queued log records.
    pub fn flush_log(&mut self) -> usize {
        self.log.flush()
    }

    /// Change the log's display toggles; reflows the whole log.
    pub fn set_display_options(&mut self, options: DisplayOptions) {
        let mut settings = self.machine.settings().clone();
        settings.self_highlight = options.self_highlight;
        self.machine.set_settings(settings);
        self.log.set_options(options);
    }

    pub fn set_callwords(&mut self, words: Vec<String>) {
        let mut settings = self.machine.settings().clone();
        settings.set_callwords(&words);
        self.machine.set_settings(settings);
        self.config.callwords = words;
    }

    pub fn set_muted(&mut self, char_id: usize, muted: bool) {
        self.session.set_muted(char_id, muted);
    }
}
