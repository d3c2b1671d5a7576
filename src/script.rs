//! Replay scripts: protocol-style lines (`HEADER#field#...#%`) plus a few
//! harness headers for waiting and animation completion.
//!
//! | Header  | Fields                        |
//! |---------|-------------------------------|
//! | `MS`    | chat message fields           |
//! | `WAIT`  | logical ms                    |
//! | `DONE`  | layer name                    |
//! | `TI`    | slot, command, value          |
//! | `MC`    | song, char id, [showname]     |
//! | `RT`    | WTCE name                     |
//! | `HP`    | bar, state                    |
//! | `ZZ`    | moderator call message        |

use crate::event::CourtroomEvent;
use crate::movie::Layer;
use crate::scene::message::Field;
use crate::session::{CharacterInfo, SessionState};
use crate::timer::TimerCommand;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    Event(CourtroomEvent),
    Wait(u64),
}

/// Undo the protocol's escaping of reserved characters.
pub fn unescape(field: &str) -> String {
    field
        .replace("<num>", "#")
        .replace("<percent>", "%")
        .replace("<dollar>", "$")
        .replace("<and>", "&")
}

fn number<T: std::str::FromStr>(field: &'static str, value: Option<&String>) -> Result<T> {
    let value = value.map(String::as_str).unwrap_or("");
    value.trim().parse().map_err(|_| Error::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Parse one line. Blank lines and `//` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(None);
    }
    let body = line.strip_suffix('%').unwrap_or(line);
    let body = body.strip_suffix('#').unwrap_or(body);
    let mut parts = body.split('#');
    let header = parts.next().unwrap_or("");
    let fields: Vec<String> = parts.map(unescape).collect();

    let parsed = match header {
        "MS" => ScriptLine::Event(CourtroomEvent::Message(fields)),
        "WAIT" => ScriptLine::Wait(number("wait", fields.first())?),
        "DONE" => {
            let name = fields.first().map(String::as_str).unwrap_or("");
            let layer = Layer::from_str(name).ok_or_else(|| Error::InvalidField {
                field: "layer",
                value: name.to_string(),
            })?;
            ScriptLine::Event(CourtroomEvent::AnimationDone(layer))
        }
        "TI" => ScriptLine::Event(CourtroomEvent::Timer(timer_command(&fields)?)),
        "MC" => ScriptLine::Event(CourtroomEvent::Song {
            song: fields.first().cloned().unwrap_or_default(),
            char_id: number("char_id", fields.get(1))?,
            showname: fields.get(2).filter(|s| !s.is_empty()).cloned(),
        }),
        "RT" => ScriptLine::Event(CourtroomEvent::Wtce(fields.first().cloned().unwrap_or_default())),
        "HP" => ScriptLine::Event(CourtroomEvent::HealthBar {
            bar: number("bar", fields.first())?,
            state: number("state", fields.get(1))?,
        }),
        "ZZ" => ScriptLine::Event(CourtroomEvent::ModCall(fields.first().cloned().unwrap_or_default())),
        other => return Err(Error::Other(format!("unknown script header {other:?}"))),
    };
    Ok(Some(parsed))
}

fn timer_command(fields: &[String]) -> Result<TimerCommand> {
    let slot = number("slot", fields.first())?;
    let command = fields.get(1).map(String::as_str).unwrap_or("");
    Ok(match command {
        "set" => TimerCommand::Set {
            slot,
            time_ms: number("time", fields.get(2))?,
        },
        "step" => TimerCommand::Step {
            slot,
            step_ms: number("step", fields.get(2))?,
        },
        "interval" => TimerCommand::Interval {
            slot,
            interval_ms: number("interval", fields.get(2))?,
        },
        "pause" => TimerCommand::Pause { slot },
        "resume" => TimerCommand::Resume { slot },
        other => {
            return Err(Error::InvalidField {
                field: "timer command",
                value: other.to_string(),
            });
        }
    })
}

/// Parse a whole script, reporting the first bad line with its number.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (n, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(parsed)) => lines.push(parsed),
            Ok(None) => {}
            Err(e) => return Err(Error::Other(format!("line {}: {}", n + 1, e))),
        }
    }
    Ok(lines)
}

/// Character list implied by the chat messages of a script: each id gets the
/// name it first speaks with.
pub fn session_from_script(lines: &[ScriptLine]) -> SessionState {
    let mut characters: Vec<CharacterInfo> = Vec::new();
    for line in lines {
        let ScriptLine::Event(CourtroomEvent::Message(fields)) = line else {
            continue;
        };
        let Some(id) = fields
            .get(Field::CharId as usize)
            .and_then(|s| s.trim().parse::<usize>().ok())
        else {
            continue;
        };
        let name = fields.get(Field::CharName as usize).cloned().unwrap_or_default();
        if characters.len() <= id {
            characters.resize_with(id + 1, CharacterInfo::default);
        }
        if characters[id].name.is_empty() {
            characters[id] = CharacterInfo::new(name);
        }
    }
    SessionState {
        characters,
        ..SessionState::default()
    }
}
