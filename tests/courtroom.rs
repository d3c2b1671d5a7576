//! Courtroom host: event pumping, music, testimony, health bars, transcript
//! recording and script replay.

mod common;

use common::{courtroom, courtroom_with, plays, session, sounds};
use courtroom_sim::config::CourtroomConfig;
use courtroom_sim::event::{CourtroomEvent, TimerKind};
use courtroom_sim::movie::Layer;
use courtroom_sim::runtime;
use courtroom_sim::scene::PlaybackState;
use courtroom_sim::script;
use courtroom_sim::sound::Channel;
use tempfile::tempdir;

fn message(id: &str, name: &str, text: &str, side: &str) -> Vec<String> {
    [
        "chat", "-", name, "normal", text, side, "1", "0", id, "0", "0", "0", "0", "0", "0", "",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_pump_handles_queue_and_flushes_once() {
    let config = CourtroomConfig {
        log_max_lines: 2,
        ..CourtroomConfig::default()
    };
    let (mut court, _) = courtroom_with(config, session());
    court.push_event(CourtroomEvent::Message(message("0", "Phoenix", "one", "def")));
    court.push_event(CourtroomEvent::Message(message("1", "Edgeworth", "two", "pro")));
    court.push_event(CourtroomEvent::Message(message("2", "Maya", "three", "wit")));
    court.push_event(CourtroomEvent::Message(vec!["short".into()]));
    court.pump();

    assert_eq!(court.log().text(), "Edgeworth: two\nMaya: three\n");
    assert_eq!(court.scene().showname, "Maya");
    assert_eq!(court.state(), PlaybackState::TextReveal);
}

#[test]
fn test_song_from_character() {
    let (mut court, calls) = courtroom();
    court.play_song("trial.opus", 0, None);
    assert_eq!(court.log().text(), "Phoenix has played a song: trial.opus\n");
    assert_eq!(sounds(&calls, Channel::Music), vec!["trial.opus"]);
    assert_eq!(court.scene().music.as_deref(), Some("trial.opus"));

    court.play_song("cross.opus", 1, Some("Miles"));
    assert!(court.log().text().ends_with("Miles has played a song: cross.opus\n"));
}

#[test]
fn test_song_from_server_or_muted() {
    let (mut court, calls) = courtroom();
    court.play_song("lobby.opus", -1, None);
    assert!(court.log().is_empty());
    assert_eq!(sounds(&calls, Channel::Music), vec!["lobby.opus"]);

    court.set_muted(2, true);
    court.play_song("noise.opus", 2, None);
    assert!(court.log().is_empty());
    assert_eq!(sounds(&calls, Channel::Music).len(), 1);
}

#[test]
fn test_music_switch_can_be_hidden() {
    let config = CourtroomConfig {
        log_display_music_switch: false,
        ..CourtroomConfig::default()
    };
    let (mut court, _) = courtroom_with(config, session());
    court.play_song("trial.opus", 0, None);
    assert_eq!(court.log().len(), 1);
    assert_eq!(court.log().text(), "");
}

#[test]
fn test_testimony_overlay_blinks() {
    let (mut court, calls) = courtroom();
    court.wtce("testimony1");
    assert!(court.session().testimony_in_progress);
    assert_eq!(plays(&calls, Layer::Wtce), vec!["themes/default/testimony1.gif"]);
    assert_eq!(sounds(&calls, Channel::System), vec!["sfx-testimony2.wav"]);

    court.submit(&message("2", "Maya", "I saw it", "wit")).unwrap();
    assert!(court.scene().testimony);
    court.advance(1_500);
    assert!(!court.scene().testimony);
    court.advance(500);
    assert!(court.scene().testimony);

    court.wtce("testimony2");
    assert!(!court.session().testimony_in_progress);
    assert!(!court.scene().testimony);
    assert!(!court.scheduler().is_active(TimerKind::TestimonyShow));
    assert!(!court.scheduler().is_active(TimerKind::TestimonyHide));
}

#[test]
fn test_testimony_hidden_off_the_stand() {
    let (mut court, _) = courtroom();
    court.wtce("testimony1");
    court.submit(&message("0", "Phoenix", "Objection", "def")).unwrap();
    assert!(!court.scene().testimony);
}

#[test]
fn test_unknown_wtce_is_ignored() {
    let (mut court, calls) = courtroom();
    court.wtce("testimony9");
    court.wtce("judgeruling");
    assert!(calls.borrow().is_empty());
    assert!(!court.session().testimony_in_progress);
}

#[test]
fn test_health_bars() {
    let (mut court, _) = courtroom();
    court.set_health(1, 3);
    court.set_health(2, 7);
    court.set_health(2, 11);
    court.set_health(3, 5);
    court.set_health(1, -1);
    assert_eq!(court.scene().health, [3, 7]);
}

#[test]
fn test_transcript_recording() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.log");
    let config = CourtroomConfig {
        log_recording_enabled: true,
        log_recording_path: Some(path.clone()),
        callwords: vec!["maya".into()],
        ..CourtroomConfig::default()
    };
    let (mut court, _) = courtroom_with(config, session());
    court.submit(&message("0", "Phoenix", "Maya, help!", "def")).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("]Phoenix: Maya, help!"));
    assert!(lines[1].contains("](OOC)CLIENT: Phoenix has called you"));
}

#[test]
fn test_display_options_reflow_through_host() {
    let (mut court, _) = courtroom();
    court.submit(&message("0", "Phoenix", "Hello", "def")).unwrap();
    let mut options = *court.log().options();
    options.newline_join = true;
    court.set_display_options(options);
    assert_eq!(court.log().text(), "Phoenix\nHello\n\n");
}

#[test]
fn test_replay_script() {
    let text = "\
// opening
MS#chat#-#Phoenix#normal#Hold it!#def#1#1#0#0#2#0#0#0#0#%
WAIT#100#%
DONE#objection#%
WAIT#1000#%
MC#trial.opus#0#%
TI#0#set#5000#%
TI#0#resume#0#%
WAIT#120#%
";
    let lines = script::parse_script(text).unwrap();
    let session = script::session_from_script(&lines);
    let (backend, _) = common::recording_backend(common::stage_assets());
    let mut court = courtroom_sim::Courtroom::new(
        CourtroomConfig::default(),
        courtroom_sim::theme::Theme::default(),
        session,
        backend,
    );
    runtime::replay(&mut court, &lines);

    assert_eq!(court.state(), PlaybackState::Idle);
    assert_eq!(court.scene().message, "Hold it!");
    let report = runtime::report(&court);
    assert_eq!(
        report,
        "Phoenix: Hold it!\nPhoenix has played a song: trial.opus\ntimer 0: 00:00:04.880\n"
    );
}

#[test]
fn test_mod_call_alerts_and_notices() {
    let (mut court, calls) = courtroom();
    court.mod_call("[Maya] needs a moderator");
    assert_eq!(court.scene().alerts, 1);
    assert_eq!(sounds(&calls, Channel::System), vec!["sfx-gallery.wav"]);
    assert_eq!(runtime::report(&court), "(OOC)[Maya] needs a moderator\n");
}

#[test]
fn test_mod_call_from_script() {
    let lines = script::parse_script("ZZ#Help in courtroom 2#%\n").unwrap();
    let (mut court, _) = courtroom();
    runtime::replay(&mut court, &lines);
    assert_eq!(court.notices()[0].message, "Help in courtroom 2");
    assert!(court.notices()[0].name.is_empty());
}
