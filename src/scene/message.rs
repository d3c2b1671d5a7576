//! In-character chat message as decoded from one protocol line.

use crate::theme::TextColor;
use crate::{Error, Result};

/// Minimum number of fields for a message to be playable.
pub const MIN_FIELDS: usize = 15;
/// Fields in a complete message; shorter trailing optionals are padded.
pub const FIELD_COUNT: usize = 16;

/// Field positions on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DeskModifier = 0,
    PreAnim,
    CharName,
    Emote,
    Message,
    Side,
    SoundName,
    EmoteModifier,
    CharId,
    SoundDelay,
    ShoutModifier,
    EvidenceId,
    Flip,
    EffectState,
    TextColor,
    Showname,
}

/// Emote modifier: which animation stages the message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmoteModifier {
    /// Straight to the main pose.
    None,
    /// Pre-animation, then main pose.
    Preanim,
    /// Shout-accompanied pre-animation.
    Shout,
    /// Zoom with speed lines, no pre-animation.
    ShoutNoPreanim,
    /// Zoom with speed lines after a pre-animation.
    ShoutPreanim,
    /// Anything else; treated like `None`.
    Unknown(i64),
}

impl EmoteModifier {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Preanim,
            2 => Self::Shout,
            5 => Self::ShoutNoPreanim,
            6 => Self::ShoutPreanim,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Preanim => 1,
            Self::Shout => 2,
            Self::ShoutNoPreanim => 5,
            Self::ShoutPreanim => 6,
            Self::Unknown(other) => other,
        }
    }

    pub fn plays_preanim(self) -> bool {
        matches!(self, Self::Preanim | Self::Shout | Self::ShoutPreanim)
    }

    /// Shout-tier modifiers hide the desk and draw speed lines.
    pub fn has_speedlines(self) -> bool {
        matches!(self, Self::ShoutNoPreanim | Self::ShoutPreanim)
    }
}

/// Marker meaning "no pre-animation requested".
pub const NO_PREANIM: &str = "-";
/// Emote name that hides the character entirely.
pub const HIDDEN_EMOTE: &str = "../../misc/blank";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub desk_modifier: String,
    pub pre_anim: String,
    pub character: String,
    pub emote: String,
    pub text: String,
    pub side: String,
    pub sfx_name: String,
    pub emote_modifier: EmoteModifier,
    /// `-1` marks system speech.
    pub char_id: i64,
    /// Logical units; scaled by [`SFX_DELAY_SCALE`] into ms.
    pub sfx_delay: i64,
    /// 0 = none, otherwise a 1-based shout index.
    pub shout: i64,
    /// 0 = none, otherwise a 1-based evidence index.
    pub evidence: i64,
    pub flip: bool,
    /// 0 = none, otherwise a 1-based effect index.
    pub effect: i64,
    pub text_color: TextColor,
    pub showname: String,
}

/// All time values in character data are multiplied by this to get ms.
pub const SFX_DELAY_SCALE: i64 = 60;

/// Lenient integer parse: anything unparseable reads as 0.
fn int_field(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

impl ChatMessage {
    /// Decode a field list. Fewer than [`MIN_FIELDS`] is malformed; missing
    /// trailing optionals are padded with empty strings.
    pub fn decode<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() < MIN_FIELDS {
            return Err(Error::MalformedMessage {
                fields: fields.len(),
                minimum: MIN_FIELDS,
            });
        }
        let get = |f: Field| {
            fields
                .get(f as usize)
                .map(|s| s.as_ref().to_string())
                .unwrap_or_default()
        };
        let num = |f: Field| int_field(&get(f));

        Ok(Self {
            desk_modifier: get(Field::DeskModifier),
            pre_anim: get(Field::PreAnim),
            character: get(Field::CharName),
            emote: get(Field::Emote),
            text: get(Field::Message),
            side: get(Field::Side),
            sfx_name: get(Field::SoundName),
            emote_modifier: EmoteModifier::from_code(num(Field::EmoteModifier)),
            char_id: num(Field::CharId),
            sfx_delay: num(Field::SoundDelay),
            shout: num(Field::ShoutModifier),
            evidence: num(Field::EvidenceId),
            flip: num(Field::Flip) == 1,
            effect: num(Field::EffectState),
            text_color: TextColor::from_index(num(Field::TextColor)),
            showname: get(Field::Showname),
        })
    }

    /// A message whose text is blank plays no text reveal.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() || self.text == " "
    }

    pub fn is_hidden_emote(&self) -> bool {
        self.emote == HIDDEN_EMOTE
    }

    pub fn wants_preanim(&self) -> bool {
        let pre = self.pre_anim.trim();
        !pre.is_empty() && pre != NO_PREANIM
    }

    /// Sound delay in logical ms, never negative.
    pub fn sfx_delay_ms(&self) -> u64 {
        u64::try_from(self.sfx_delay.saturating_mul(SFX_DELAY_SCALE)).unwrap_or(0)
    }

    /// `0` and `1` are legacy "no sound" values.
    pub fn has_sfx(&self) -> bool {
        let name = self.sfx_name.trim();
        !name.is_empty() && name != "0" && name != "1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(n: usize) -> Vec<String> {
        let base = [
            "chat", "deskslam", "Phoenix", "normal", "Hello", "def", "sfx-deskslam", "1", "0",
            "2", "0", "0", "1", "0", "4", "Nick",
        ];
        base.iter().take(n).map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_full() {
        let msg = ChatMessage::decode(&fields(16)).unwrap();
        assert_eq!(msg.character, "Phoenix");
        assert_eq!(msg.emote_modifier, EmoteModifier::Preanim);
        assert_eq!(msg.sfx_delay_ms(), 120);
        assert!(msg.flip);
        assert_eq!(msg.text_color, TextColor::Blue);
        assert_eq!(msg.showname, "Nick");
    }

    #[test]
    fn test_decode_pads_showname() {
        let msg = ChatMessage::decode(&fields(15)).unwrap();
        assert_eq!(msg.showname, "");
    }

    #[test]
    fn test_decode_rejects_short() {
        let err = ChatMessage::decode(&fields(14)).unwrap_err();
        assert!(matches!(err, Error::MalformedMessage { fields: 14, minimum: 15 }));
    }

    #[test]
    fn test_lenient_numbers_and_sentinels() {
        let mut f = fields(16);
        f[Field::CharId as usize] = "abc".into();
        f[Field::PreAnim as usize] = " - ".into();
        f[Field::SoundName as usize] = "1".into();
        f[Field::SoundDelay as usize] = "-4".into();
        let msg = ChatMessage::decode(&f).unwrap();
        assert_eq!(msg.char_id, 0);
        assert!(!msg.wants_preanim());
        assert!(!msg.has_sfx());
        assert_eq!(msg.sfx_delay_ms(), 0);
    }

    #[test]
    fn test_emote_modifier_codes() {
        assert!(EmoteModifier::from_code(6).plays_preanim());
        assert!(EmoteModifier::from_code(6).has_speedlines());
        assert!(!EmoteModifier::from_code(5).plays_preanim());
        assert_eq!(EmoteModifier::from_code(3), EmoteModifier::Unknown(3));
        assert_eq!(EmoteModifier::Unknown(3).code(), 3);
    }
}
