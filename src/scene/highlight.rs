//! Incremental text reveal with nested inline color markers.
//!
//! A stack of [`HighlightFrame`]s tracks the active color. The bottom frame is
//! implicit and colorless, so the stack depth never drops below one: an end
//! marker at depth one pops nothing but keeps its rule's visibility.

use crate::theme::{Color, HighlightRule};

/// Rainbow text cycles through these, one per non-space character.
pub const RAINBOW_PALETTE: [Color; 5] = [
    Color::rgb(0xBA, 0x15, 0x18),
    Color::rgb(0xD5, 0x59, 0x00),
    Color::rgb(0xE7, 0xCE, 0x4E),
    Color::rgb(0x65, 0xC8, 0x56),
    Color::rgb(0x15, 0x96, 0xC8),
];

/// One level of the color stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightFrame {
    pub start: char,
    pub end: char,
    /// `None` only for the implicit base frame.
    pub color: Option<Color>,
    pub visible: bool,
}

impl HighlightFrame {
    fn base() -> Self {
        Self {
            start: '\0',
            end: '\0',
            color: None,
            visible: true,
        }
    }
}

/// Per-message reveal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStyle {
    /// Color used while the stack top is the base frame.
    pub base_color: Color,
    pub rainbow: bool,
    /// Blip every Nth audible character; 0 reads as 1.
    pub blip_rate: u32,
    /// Whether spaces count as audible.
    pub blank_blips: bool,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            rainbow: false,
            blip_rate: 1,
            blank_blips: false,
        }
    }
}

/// One revealed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
    /// Marker characters may be consumed without being drawn.
    pub visible: bool,
    pub blip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Revealed(Glyph),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct HighlightRenderer {
    rules: Vec<HighlightRule>,
    text: Vec<char>,
    cursor: usize,
    stack: Vec<HighlightFrame>,
    style: RevealStyle,
    blip_pos: u32,
    rainbow_index: usize,
}

impl HighlightRenderer {
    /// `rules` empty disables highlighting entirely.
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self {
            rules,
            text: Vec::new(),
            cursor: 0,
            stack: vec![HighlightFrame::base()],
            style: RevealStyle::default(),
            blip_pos: 0,
            rainbow_index: 0,
        }
    }

    /// Start revealing `text` from the first character with a fresh stack.
    pub fn begin(&mut self, text: &str, style: RevealStyle) {
        self.reset();
        self.text = text.chars().collect();
        self.style = style;
    }

    /// Drop the current text, cursor and color stack.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.stack.truncate(1);
        self.blip_pos = 0;
        self.rainbow_index = 0;
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.text.len()
    }

    fn top_color(&self) -> Option<Color> {
        self.stack.last().and_then(|f| f.color)
    }

    fn current_color(&self) -> Color {
        self.top_color().unwrap_or(self.style.base_color)
    }

    /// Consume one character.
    pub fn tick(&mut self) -> Tick {
        let Some(&ch) = self.text.get(self.cursor) else {
            return Tick::Exhausted;
        };
        self.cursor += 1;

        let (color, visible) = if ch == ' ' {
            (self.current_color(), true)
        } else if self.style.rainbow {
            let color = RAINBOW_PALETTE[self.rainbow_index % RAINBOW_PALETTE.len()];
            self.rainbow_index += 1;
            (color, true)
        } else {
            self.apply_markers(ch)
        };

        let blip = self.count_blip(ch);
        Tick::Revealed(Glyph {
            ch,
            color,
            visible,
            blip,
        })
    }

    fn apply_markers(&mut self, ch: char) -> (Color, bool) {
        let current = self.top_color();
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.start == ch && current != Some(r.color))
        {
            let frame = HighlightFrame {
                start: rule.start,
                end: rule.end,
                color: Some(rule.color),
                visible: rule.visible,
            };
            self.stack.push(frame);
            return (rule.color, rule.visible);
        }

        // The closing marker still draws in the color it closes.
        let color = self.current_color();
        if let Some(visible) = self.rules.iter().find(|r| r.end == ch).map(|r| r.visible) {
            if self.stack.len() > 1 {
                self.stack.pop();
            }
            return (color, visible);
        }
        (color, true)
    }

    fn count_blip(&mut self, ch: char) -> bool {
        if ch == ' ' && !self.style.blank_blips {
            return false;
        }
        let rate = self.style.blip_rate.max(1);
        let blip = self.blip_pos % rate == 0;
        if blip {
            self.blip_pos = 0;
        }
        self.blip_pos += 1;
        blip
    }
}
