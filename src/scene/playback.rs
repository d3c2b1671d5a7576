//! Message playback state machine.
//!
//! One message plays as `ShoutCheck -> PreAnimation -> MainAnimation ->
//! TextReveal -> Idle`. Stages that wait on an animation return to the caller
//! and resume from [`PlaybackMachine::animation_finished`]; the text reveal
//! advances on `ChatTick` firings. A new message preempts whatever is playing.
//!
//! Everything the machine wants done is pushed as a [`SceneCommand`] and
//! collected with [`PlaybackMachine::take_commands`].

use super::command::SceneCommand;
use super::highlight::{HighlightRenderer, RevealStyle, Tick};
use super::layout;
use super::message::{ChatMessage, EmoteModifier};
use crate::assets::{character_path, resolve_animation, AssetResolver, IMAGE_EXTENSIONS};
use crate::chat_log::ChatRecord;
use crate::config::CourtroomConfig;
use crate::event::TimerKind;
use crate::movie::{AnimationKind, Layer};
use crate::session::SessionState;
use crate::sound::Channel;
use crate::theme::{TextColor, Theme};
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::rc::Rc;

/// Playback stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    ShoutCheck,
    PreAnimation,
    MainAnimation,
    TextReveal,
}

/// Character animation level; only ever raised within one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnimLevel {
    None,
    Pre,
    Talking,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextState {
    NotStarted,
    Ticking,
    Done,
}

/// Read-only collaborators a stage may consult.
pub struct StageEnv<'a> {
    pub session: &'a SessionState,
    pub assets: &'a dyn AssetResolver,
}

/// Player options that shape playback.
#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub tick_interval_ms: u64,
    pub blip_rate: u32,
    pub blank_blips: bool,
    pub first_person: bool,
    pub self_highlight: bool,
    callwords: Vec<(String, Regex)>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from_config(&CourtroomConfig::default())
    }
}

impl PlaybackSettings {
    pub fn from_config(config: &CourtroomConfig) -> Self {
        let mut settings = Self {
            tick_interval_ms: config.chat_tick_interval_ms.max(1),
            blip_rate: config.effective_blip_rate(),
            blank_blips: config.blank_blips,
            first_person: config.first_person,
            self_highlight: config.log_display_self_highlight,
            callwords: Vec::new(),
        };
        settings.set_callwords(&config.callwords);
        settings
    }

    /// Case-insensitive literal words; blank entries are ignored.
    pub fn set_callwords(&mut self, words: &[String]) {
        self.callwords = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .filter_map(|w| {
                RegexBuilder::new(&regex::escape(w))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (w.to_string(), re))
                    .map_err(|e| tracing::warn!("Bad callword {:?}: {}", w, e))
                    .ok()
            })
            .collect();
    }

    pub fn callwords(&self) -> impl Iterator<Item = &str> {
        self.callwords.iter().map(|(w, _)| w.as_str())
    }
}

/// Per-message state threaded through the stages.
#[derive(Debug, Clone)]
pub struct PlaybackContext {
    pub message: ChatMessage,
    /// Resolved character index of the speaker.
    pub speaker: usize,
    pub is_system: bool,
    pub is_self: bool,
    /// Our own line with first-person mode on: no scene or character playback.
    pub first_person: bool,
    pub showname: String,
    pub gender: String,
    pub text_state: TextState,
    pub anim_level: AnimLevel,
    /// A shout played in place of the pre-animation.
    pub shout_consumed_preanim: bool,
}

/// Where a stage left playback.
enum Step {
    Next(PlaybackState),
    Await(Layer),
    Done,
}

pub struct PlaybackMachine {
    state: PlaybackState,
    context: Option<PlaybackContext>,
    renderer: HighlightRenderer,
    theme: Rc<Theme>,
    settings: PlaybackSettings,
    awaiting: Option<Layer>,
    history: Vec<PlaybackState>,
    outbox: Vec<SceneCommand>,
}

impl PlaybackMachine {
    pub fn new(theme: Rc<Theme>, settings: PlaybackSettings) -> Self {
        let rules = if theme.enable_highlighting {
            theme.highlights.clone()
        } else {
            Vec::new()
        };
        Self {
            state: PlaybackState::Idle,
            context: None,
            renderer: HighlightRenderer::new(rules),
            theme,
            settings,
            awaiting: None,
            history: Vec::new(),
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Stages entered for the current (or last) message, in order.
    pub fn stage_history(&self) -> &[PlaybackState] {
        &self.history
    }

    pub fn context(&self) -> Option<&PlaybackContext> {
        self.context.as_ref()
    }

    pub fn current_message(&self) -> Option<&ChatMessage> {
        self.context.as_ref().map(|c| &c.message)
    }

    pub fn highlight_depth(&self) -> usize {
        self.renderer.depth()
    }

    pub fn tick_position(&self) -> usize {
        self.renderer.cursor()
    }

    /// Layer whose completion the machine is waiting on.
    pub fn awaiting_animation(&self) -> Option<Layer> {
        self.awaiting
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
    }

    pub fn take_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn push(&mut self, command: SceneCommand) {
        self.outbox.push(command);
    }

    fn enter(&mut self, state: PlaybackState) {
        tracing::debug!("Playback stage {:?}", state);
        self.state = state;
        if state != PlaybackState::Idle {
            self.history.push(state);
        }
    }

    /// Accept a message, preempting anything in flight. Rejected messages
    /// leave the machine untouched.
    pub fn submit<S: AsRef<str>>(&mut self, fields: &[S], env: &StageEnv) -> Result<()> {
        let mut message = ChatMessage::decode(fields)?;
        let (speaker, is_system) = resolve_speaker(message.char_id, env.session)?;

        self.interrupt();

        if message.shout > 0 && message.emote_modifier == EmoteModifier::None {
            message.emote_modifier = EmoteModifier::Preanim;
        }

        let is_self = !is_system && env.session.own_char_id == Some(speaker);
        let character = env.session.character(speaker);
        let showname = if !message.showname.trim().is_empty() {
            message.showname.trim().to_string()
        } else if is_system {
            String::new()
        } else {
            character.map(|c| c.display_name().to_string()).unwrap_or_default()
        };
        let gender = character.map_or_else(|| "male".to_string(), |c| c.gender.clone());

        let mut ctx = PlaybackContext {
            speaker,
            is_system,
            is_self,
            first_person: is_self && self.settings.first_person,
            showname,
            gender,
            text_state: TextState::NotStarted,
            anim_level: AnimLevel::None,
            shout_consumed_preanim: false,
            message,
        };

        self.log_message(&ctx);
        self.run(PlaybackState::ShoutCheck, &mut ctx, env);
        self.context = Some(ctx);
        Ok(())
    }

    /// Stop everything tied to the previous message.
    fn interrupt(&mut self) {
        self.push(SceneCommand::StopTimer(TimerKind::ChatTick));
        self.push(SceneCommand::StopTimer(TimerKind::SfxDelay));
        self.push(SceneCommand::StopAnimation(Layer::Objection));
        self.push(SceneCommand::StopAnimation(Layer::Character));
        self.push(SceneCommand::StopAnimation(Layer::Speedlines));
        self.push(SceneCommand::StopAnimation(Layer::Effect));
        self.push(SceneCommand::StopSounds(Channel::Shouts));
        self.push(SceneCommand::StopSounds(Channel::Effects));
        self.push(SceneCommand::HideEvidence);
        self.renderer.reset();
        self.context = None;
        self.awaiting = None;
        self.history.clear();
        self.state = PlaybackState::Idle;
    }

    fn log_message(&mut self, ctx: &PlaybackContext) {
        let text = &ctx.message.text;
        if ctx.is_system {
            if !text.trim().is_empty() {
                self.push(SceneCommand::AppendLog(ChatRecord::system(text)));
                self.push(SceneCommand::Transcript {
                    name: String::new(),
                    message: text.clone(),
                });
            }
            return;
        }
        self.push(SceneCommand::AppendLog(ChatRecord::ic(&ctx.showname, text, ctx.is_self)));
        self.push(SceneCommand::Transcript {
            name: ctx.showname.clone(),
            message: text.clone(),
        });
    }

    /// Run stages from `state` until one waits or playback hands off to the
    /// tick timer.
    fn run(&mut self, mut state: PlaybackState, ctx: &mut PlaybackContext, env: &StageEnv) {
        loop {
            let step = match state {
                PlaybackState::ShoutCheck => self.shout_check(ctx, env),
                PlaybackState::PreAnimation => self.pre_animation(ctx, env),
                PlaybackState::MainAnimation => self.main_animation(ctx, env),
                PlaybackState::TextReveal | PlaybackState::Idle => Step::Done,
            };
            match step {
                Step::Next(next) => state = next,
                Step::Await(layer) => {
                    self.awaiting = Some(layer);
                    return;
                }
                Step::Done => return,
            }
        }
    }

    fn shout_check(&mut self, ctx: &mut PlaybackContext, env: &StageEnv) -> Step {
        self.enter(PlaybackState::ShoutCheck);
        let code = ctx.message.shout;
        if code <= 0 {
            return Step::Next(PlaybackState::PreAnimation);
        }
        let Some(name) = usize::try_from(code)
            .ok()
            .and_then(|c| self.theme.shout(c))
            .map(str::to_string)
        else {
            tracing::debug!("Unknown shout {}; playing without one", code);
            return Step::Next(PlaybackState::PreAnimation);
        };

        ctx.shout_consumed_preanim = true;
        let character = ctx.message.character.clone();
        self.push(SceneCommand::PlaySound {
            channel: Channel::Shouts,
            sfx: name.clone(),
            character: Some(character.clone()),
        });
        match resolve_animation(env.assets, AnimationKind::Shout, &name, &character) {
            Some(file) => {
                self.push(SceneCommand::PlayAnimation {
                    layer: Layer::Objection,
                    file,
                    play_once: true,
                });
                Step::Await(Layer::Objection)
            }
            None => {
                tracing::warn!("Missing shout animation {} for {}", name, character);
                Step::Next(PlaybackState::PreAnimation)
            }
        }
    }

    fn pre_animation(&mut self, ctx: &mut PlaybackContext, env: &StageEnv) -> Step {
        self.enter(PlaybackState::PreAnimation);
        self.push(SceneCommand::StopAnimation(Layer::Speedlines));
        self.push(SceneCommand::StopAnimation(Layer::Character));
        self.push(SceneCommand::SetShowname(ctx.showname.clone()));
        self.push(SceneCommand::ClearMessage);
        self.push(SceneCommand::ChatboxVisible(false));

        let chatbox = if self.settings.self_highlight
            && ctx.is_self
            && resolve_animation(env.assets, AnimationKind::Theme, "chatbox_self", "").is_some()
        {
            "chatbox_self"
        } else {
            "chatmed"
        };
        self.push(SceneCommand::SetChatbox(chatbox.to_string()));

        if !ctx.first_person {
            self.set_scene(ctx, env);
        }
        self.push(SceneCommand::SetMirrored(ctx.message.flip));

        let modifier = ctx.message.emote_modifier;
        if !modifier.plays_preanim() {
            return Step::Next(PlaybackState::MainAnimation);
        }
        self.push(SceneCommand::StartTimer {
            kind: TimerKind::SfxDelay,
            delay_ms: ctx.message.sfx_delay_ms(),
            repeating: false,
        });

        if !ctx.message.wants_preanim() || ctx.shout_consumed_preanim || ctx.first_person {
            return Step::Next(PlaybackState::MainAnimation);
        }
        let pre = ctx.message.pre_anim.trim().to_string();
        match resolve_animation(env.assets, AnimationKind::Pre, &pre, &ctx.message.character) {
            Some(file) => {
                ctx.anim_level = AnimLevel::Pre;
                self.push(SceneCommand::PlayAnimation {
                    layer: Layer::Character,
                    file,
                    play_once: true,
                });
                Step::Await(Layer::Character)
            }
            None => {
                tracing::warn!("Missing pre-animation {} for {}", pre, ctx.message.character);
                Step::Next(PlaybackState::MainAnimation)
            }
        }
    }

    fn set_scene(&mut self, ctx: &PlaybackContext, env: &StageEnv) {
        let side = ctx.message.side.as_str();
        let layout = layout::resolve(side, &ctx.message.desk_modifier, env.assets);
        self.push(SceneCommand::SetScene(layout));

        if env.session.testimony_in_progress && side == "wit" {
            self.push(SceneCommand::Testimony(true));
            self.push(SceneCommand::StartTimer {
                kind: TimerKind::TestimonyShow,
                delay_ms: TESTIMONY_SHOW_MS,
                repeating: false,
            });
        } else {
            self.push(SceneCommand::Testimony(false));
            self.push(SceneCommand::StopTimer(TimerKind::TestimonyShow));
            self.push(SceneCommand::StopTimer(TimerKind::TestimonyHide));
        }
    }

    fn main_animation(&mut self, ctx: &mut PlaybackContext, env: &StageEnv) -> Step {
        self.enter(PlaybackState::MainAnimation);
        self.setup_chat(ctx);
        self.showname_image(ctx, env);
        self.show_evidence(ctx, env);

        if ctx.message.emote_modifier.has_speedlines() && !ctx.first_person {
            let name = match ctx.message.side.as_str() {
                "pro" | "hlp" | "wit" => "prosecution_speedlines",
                _ => "defense_speedlines",
            };
            self.push(SceneCommand::SetDeskVisible(false));
            match resolve_animation(env.assets, AnimationKind::Theme, name, "") {
                Some(file) => self.push(SceneCommand::PlayAnimation {
                    layer: Layer::Speedlines,
                    file,
                    play_once: false,
                }),
                None => tracing::warn!("Missing speed lines {}", name),
            }
        }

        self.select_main_animation(ctx, env);
        self.play_effect(ctx, env);
        self.check_callwords(ctx);

        self.push(SceneCommand::StartTimer {
            kind: TimerKind::ChatTick,
            delay_ms: self.settings.tick_interval_ms,
            repeating: true,
        });
        self.enter(PlaybackState::TextReveal);
        Step::Done
    }

    fn setup_chat(&mut self, ctx: &mut PlaybackContext) {
        let color = ctx.message.text_color;
        let style = RevealStyle {
            base_color: self.theme.text_color(color),
            rainbow: color == TextColor::Rainbow,
            blip_rate: self.settings.blip_rate,
            blank_blips: self.settings.blank_blips,
        };
        self.push(SceneCommand::ChatboxVisible(true));
        self.push(SceneCommand::SetBlip(format!("sfx-blip{}.wav", ctx.gender)));
        if ctx.message.is_empty() {
            self.renderer.begin("", style);
            ctx.text_state = TextState::Done;
        } else {
            self.renderer.begin(&ctx.message.text, style);
            ctx.text_state = TextState::Ticking;
        }
    }

    fn showname_image(&mut self, ctx: &PlaybackContext, env: &StageEnv) {
        let image = if self.theme.enable_showname_image && !ctx.message.is_empty() {
            env.assets.find_asset(
                &[character_path(&ctx.message.character, "showname")],
                IMAGE_EXTENSIONS,
            )
        } else {
            None
        };
        self.push(SceneCommand::ShownameImage(image));
    }

    fn show_evidence(&mut self, ctx: &PlaybackContext, env: &StageEnv) {
        let index = usize::try_from(ctx.message.evidence).unwrap_or(0);
        if index == 0 {
            return;
        }
        match env.session.evidence(index) {
            Some(evidence) => {
                let left = !matches!(ctx.message.side.as_str(), "def" | "hlp" | "jud");
                self.push(SceneCommand::ShowEvidence {
                    image: evidence.image.clone(),
                    left,
                });
            }
            None => tracing::debug!("No evidence at index {}", index),
        }
    }

    /// Pick talking or idle and play it, unless that would not raise the
    /// current level. Returns whether anything changed.
    fn select_main_animation(&mut self, ctx: &mut PlaybackContext, env: &StageEnv) -> bool {
        let level = if ctx.message.text_color != TextColor::Blue
            && ctx.text_state == TextState::Ticking
        {
            AnimLevel::Talking
        } else {
            AnimLevel::Idle
        };
        if level <= ctx.anim_level {
            return false;
        }
        ctx.anim_level = level;

        self.push(SceneCommand::StopAnimation(Layer::Character));
        let hidden = ctx.message.is_hidden_emote();
        self.push(SceneCommand::SetCharacterHidden(hidden));
        if !hidden && !ctx.first_person {
            let kind = if level == AnimLevel::Talking {
                AnimationKind::Talking
            } else {
                AnimationKind::Idle
            };
            self.play_character(ctx, kind, env);
        }
        true
    }

    fn play_character(&mut self, ctx: &PlaybackContext, kind: AnimationKind, env: &StageEnv) {
        let (emote, character) = (&ctx.message.emote, &ctx.message.character);
        match resolve_animation(env.assets, kind, emote, character) {
            Some(file) => self.push(SceneCommand::PlayAnimation {
                layer: Layer::Character,
                file,
                play_once: false,
            }),
            None => tracing::warn!("Missing {:?} animation {} for {}", kind, emote, character),
        }
    }

    fn play_effect(&mut self, ctx: &PlaybackContext, env: &StageEnv) {
        let index = ctx.message.effect;
        if index <= 0 {
            return;
        }
        let Some(effect) = usize::try_from(index)
            .ok()
            .and_then(|i| self.theme.effect(i))
            .cloned()
        else {
            tracing::debug!("Unknown effect {}", index);
            return;
        };
        let character = ctx.message.character.clone();
        self.push(SceneCommand::PlaySound {
            channel: Channel::Effects,
            sfx: effect.sfx.clone(),
            character: Some(character.clone()),
        });
        match resolve_animation(env.assets, AnimationKind::Overlay, &effect.name, &character) {
            Some(file) => self.push(SceneCommand::PlayAnimation {
                layer: Layer::Effect,
                file,
                play_once: effect.play_once,
            }),
            None => tracing::warn!("Missing effect {}", effect.name),
        }
    }

    fn check_callwords(&mut self, ctx: &PlaybackContext) {
        let text = &ctx.message.text;
        let Some(word) = self
            .settings
            .callwords
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(w, _)| w.clone())
        else {
            return;
        };
        tracing::info!("Callword {:?} from {}", word, ctx.showname);
        let message = format!(
            "{} has called you via your callword \"{}\": \"{}\"",
            ctx.showname, word, text
        );
        self.push(SceneCommand::PlaySound {
            channel: Channel::System,
            sfx: self.theme.sound("word_call"),
            character: None,
        });
        self.push(SceneCommand::Alert);
        self.push(SceneCommand::Notice {
            name: "CLIENT".to_string(),
            message: message.clone(),
        });
        self.push(SceneCommand::Transcript {
            name: "(OOC)CLIENT".to_string(),
            message,
        });
    }

    /// An animation layer finished playing.
    pub fn animation_finished(&mut self, layer: Layer, env: &StageEnv) {
        let Some(mut ctx) = self.context.take() else {
            return;
        };
        match (self.state, layer) {
            (PlaybackState::ShoutCheck, Layer::Objection)
                if self.awaiting == Some(Layer::Objection) =>
            {
                self.awaiting = None;
                self.run(PlaybackState::PreAnimation, &mut ctx, env);
            }
            (PlaybackState::PreAnimation, Layer::Character)
                if self.awaiting == Some(Layer::Character) =>
            {
                self.awaiting = None;
                self.run(PlaybackState::MainAnimation, &mut ctx, env);
            }
            (PlaybackState::TextReveal, Layer::Character) => {
                self.select_main_animation(&mut ctx, env);
            }
            (state, layer) => {
                tracing::trace!("Ignoring {} completion in {:?}", layer.as_str(), state);
            }
        }
        self.context = Some(ctx);
    }

    /// A playback timer fired.
    pub fn timer_fired(&mut self, kind: TimerKind, env: &StageEnv) {
        match kind {
            TimerKind::ChatTick => self.chat_tick(env),
            TimerKind::SfxDelay => self.play_sfx(),
            _ => {}
        }
    }

    fn play_sfx(&mut self) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        if !ctx.message.has_sfx() {
            return;
        }
        let command = SceneCommand::PlaySound {
            channel: Channel::Effects,
            sfx: ctx.message.sfx_name.trim().to_string(),
            character: Some(ctx.message.character.clone()),
        };
        self.push(command);
    }

    fn chat_tick(&mut self, env: &StageEnv) {
        if self.state != PlaybackState::TextReveal {
            return;
        }
        match self.renderer.tick() {
            Tick::Revealed(glyph) => {
                self.push(SceneCommand::RevealGlyph(glyph));
                if glyph.blip {
                    self.push(SceneCommand::Blip);
                }
            }
            Tick::Exhausted => self.finish_reveal(env),
        }
    }

    fn finish_reveal(&mut self, env: &StageEnv) {
        self.push(SceneCommand::StopTimer(TimerKind::ChatTick));
        if let Some(mut ctx) = self.context.take() {
            ctx.text_state = TextState::Done;
            if ctx.anim_level < AnimLevel::Idle {
                ctx.anim_level = AnimLevel::Idle;
                if !ctx.first_person && !ctx.message.is_hidden_emote() {
                    self.play_character(&ctx, AnimationKind::Idle, env);
                }
            }
            self.context = Some(ctx);
        }
        self.renderer.reset();
        self.enter(PlaybackState::Idle);
    }
}

/// Overlay blink timings while testimony is in progress.
pub const TESTIMONY_SHOW_MS: u64 = 1500;
pub const TESTIMONY_HIDE_MS: u64 = 500;

/// `-1` is the server speaking; it borrows character 0.
fn resolve_speaker(char_id: i64, session: &SessionState) -> Result<(usize, bool)> {
    if char_id == -1 {
        return Ok((0, true));
    }
    let id = usize::try_from(char_id)
        .ok()
        .filter(|&id| id < session.characters.len())
        .ok_or(Error::UnknownSpeaker(char_id))?;
    if session.is_muted(id) {
        return Err(Error::MutedSpeaker(id));
    }
    Ok((id, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AnyAsset;

    fn session() -> SessionState {
        SessionState::with_characters(["Phoenix", "Edgeworth"])
    }

    #[test]
    fn test_resolve_speaker() {
        let s = session();
        assert_eq!(resolve_speaker(1, &s).unwrap(), (1, false));
        assert_eq!(resolve_speaker(-1, &s).unwrap(), (0, true));
        assert!(matches!(resolve_speaker(2, &s), Err(Error::UnknownSpeaker(2))));
        assert!(matches!(resolve_speaker(-7, &s), Err(Error::UnknownSpeaker(-7))));
    }

    #[test]
    fn test_callwords_are_literal_and_case_insensitive() {
        let mut settings = PlaybackSettings::default();
        settings.set_callwords(&["a.b".to_string(), "  ".to_string()]);
        assert_eq!(settings.callwords().collect::<Vec<_>>(), vec!["a.b"]);
        assert!(settings.callwords[0].1.is_match("xx A.B yy"));
        assert!(!settings.callwords[0].1.is_match("axb"));
    }

    #[test]
    fn test_interrupt_resets_machine() {
        let session = session();
        let env = StageEnv {
            session: &session,
            assets: &AnyAsset,
        };
        let mut machine = PlaybackMachine::new(Rc::new(Theme::default()), PlaybackSettings::default());
        let fields: Vec<String> = [
            "chat", "-", "Phoenix", "normal", "`hi`", "def", "1", "0", "0", "0", "0", "0", "0",
            "0", "0",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        machine.submit(&fields, &env).unwrap();
        machine.timer_fired(TimerKind::ChatTick, &env);
        assert_eq!(machine.highlight_depth(), 2);
        machine.submit(&fields, &env).unwrap();
        assert_eq!(machine.highlight_depth(), 1);
        assert_eq!(machine.tick_position(), 0);
    }
}
