//! Bounded in-character chat log.
//!
//! Records are queued by [`ChatLog::append`] and only become visible at
//! [`ChatLog::flush`], which evicts the oldest excess records in one batch and
//! re-renders the whole log. Display toggles change which records show and how
//! they are joined, so changing them reflows everything too.
//!
//! Logical order is always append order. [`GrowDirection`] only decides whether
//! new blocks appear at the bottom (`Down`) or the top (`Up`) of the view.

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;

/// Visual growth direction of the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowDirection {
    Up,
    #[default]
    Down,
}

/// Display toggles; every change requires a full reflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub timestamps: bool,
    pub self_highlight: bool,
    pub suppress_empty: bool,
    pub suppress_music: bool,
    pub newline_join: bool,
    pub grow_direction: GrowDirection,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            timestamps: false,
            self_highlight: true,
            suppress_empty: true,
            suppress_music: false,
            newline_join: false,
            grow_direction: GrowDirection::Down,
        }
    }
}

const ANONYMOUS: &str = "Anonymous";

/// One log entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    name: String,
    message: String,
    timestamp: NaiveTime,
    is_system: bool,
    is_music: bool,
    is_self: bool,
}

impl ChatRecord {
    fn new(name: &str, message: &str) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() { ANONYMOUS.to_string() } else { name.to_string() },
            message: message.trim().to_string(),
            timestamp: Local::now().time(),
            is_system: false,
            is_music: false,
            is_self: false,
        }
    }

    /// In-character line.
    pub fn ic(name: &str, message: &str, is_self: bool) -> Self {
        Self {
            is_self,
            ..Self::new(name, message)
        }
    }

    /// Line spoken by the server; rendered without a name.
    pub fn system(message: &str) -> Self {
        Self {
            is_system: true,
            ..Self::new("", message)
        }
    }

    /// Music change announcement.
    pub fn music(name: &str, message: &str) -> Self {
        Self {
            is_music: true,
            ..Self::new(name, message)
        }
    }

    /// Override the creation time.
    pub fn at(mut self, timestamp: NaiveTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> NaiveTime {
        self.timestamp
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn is_music(&self) -> bool {
        self.is_music
    }

    pub fn is_self(&self) -> bool {
        self.is_self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    Normal,
    /// Our own lines while self highlight is on.
    SelfName,
}

/// Rendered text of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    pub text: String,
    /// Byte range of the name inside `text`, empty for system lines.
    pub name: Range<usize>,
    pub name_style: NameStyle,
}

fn render_block(record: &ChatRecord, options: &DisplayOptions) -> Option<LogBlock> {
    if options.suppress_empty && record.message.is_empty() {
        return None;
    }
    if options.suppress_music && record.is_music {
        return None;
    }

    let mut text = String::new();
    if options.timestamps {
        text.push_str(&format!("[{}] ", record.timestamp.format("%H:%M")));
    }
    let end = if options.newline_join { "\n\n" } else { "\n" };

    if record.is_system {
        let at = text.len();
        text.push_str(&record.message);
        text.push_str(end);
        return Some(LogBlock {
            text,
            name: at..at,
            name_style: NameStyle::Normal,
        });
    }

    let separator = if options.newline_join {
        "\n"
    } else if record.is_music {
        " "
    } else {
        ": "
    };
    let start = text.len();
    text.push_str(&record.name);
    let name = start..text.len();
    text.push_str(separator);
    text.push_str(&record.message);
    text.push_str(end);

    let name_style = if options.self_highlight && record.is_self {
        NameStyle::SelfName
    } else {
        NameStyle::Normal
    };
    Some(LogBlock {
        text,
        name,
        name_style,
    })
}

/// Scroll offset (in lines) and selection (byte range in the visual text).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogView {
    pub offset: usize,
    pub selection: Option<Range<usize>>,
}

#[derive(Debug)]
pub struct ChatLog {
    max_records: usize,
    retained: VecDeque<ChatRecord>,
    pending: Vec<ChatRecord>,
    options: DisplayOptions,
    blocks: Vec<LogBlock>,
    view: LogView,
    viewport_lines: usize,
    max_scroll: usize,
}

impl ChatLog {
    pub fn new(max_records: usize, options: DisplayOptions) -> Self {
        Self {
            max_records,
            retained: VecDeque::new(),
            pending: Vec::new(),
            options,
            blocks: Vec::new(),
            view: LogView::default(),
            viewport_lines: 0,
            max_scroll: 0,
        }
    }

    /// Queue a record; it shows after the next flush.
    pub fn append(&mut self, record: ChatRecord) {
        self.pending.push(record);
    }

    /// Evict the oldest records beyond the capacity, adopt queued records and
    /// reflow. Returns the number of records evicted.
    pub fn flush(&mut self) -> usize {
        let total = self.retained.len() + self.pending.len();
        let mut excess = total.saturating_sub(self.max_records);
        let evicted = excess;

        let from_retained = excess.min(self.retained.len());
        self.retained.drain(..from_retained);
        excess -= from_retained;
        self.pending.drain(..excess.min(self.pending.len()));
        self.retained.extend(self.pending.drain(..));

        if evicted > 0 {
            tracing::debug!("Chat log evicted {} records", evicted);
        }
        self.reflow();
        evicted
    }

    /// Change display toggles and reflow.
    pub fn set_options(&mut self, options: DisplayOptions) {
        self.options = options;
        self.reflow();
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Capacity; takes effect at the next flush.
    pub fn set_max_records(&mut self, max_records: usize) {
        self.max_records = max_records;
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn set_viewport_lines(&mut self, lines: usize) {
        self.viewport_lines = lines;
        self.reflow();
    }

    /// Re-render every retained record, keeping the view pinned to the growth
    /// edge if it was there and nothing is selected; otherwise the previous
    /// offset and selection are restored.
    pub fn reflow(&mut self) {
        let pinned = self.is_pinned();
        let saved = self.view.clone();

        self.blocks = self
            .retained
            .iter()
            .filter_map(|r| render_block(r, &self.options))
            .collect();
        let lines: usize = self.blocks.iter().map(|b| b.text.matches('\n').count()).sum();
        self.max_scroll = lines.saturating_sub(self.viewport_lines);

        self.view = if pinned {
            LogView {
                offset: self.edge_offset(),
                selection: None,
            }
        } else {
            LogView {
                offset: saved.offset.min(self.max_scroll),
                selection: saved.selection,
            }
        };
    }

    fn edge_offset(&self) -> usize {
        match self.options.grow_direction {
            GrowDirection::Down => self.max_scroll,
            GrowDirection::Up => 0,
        }
    }

    /// Whether the view sits on the edge new records appear at.
    pub fn is_pinned(&self) -> bool {
        self.view.selection.is_none() && self.view.offset == self.edge_offset()
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.view.offset = offset.min(self.max_scroll);
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.view.selection = Some(range);
    }

    pub fn clear_selection(&mut self) {
        self.view.selection = None;
    }

    pub fn view(&self) -> &LogView {
        &self.view
    }

    pub fn max_scroll(&self) -> usize {
        self.max_scroll
    }

    pub fn records(&self) -> impl Iterator<Item = &ChatRecord> {
        self.retained.iter()
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Rendered blocks in append order.
    pub fn blocks(&self) -> &[LogBlock] {
        &self.blocks
    }

    /// Rendered log in append order.
    pub fn text(&self) -> String {
        self.blocks.iter().map(|b| b.text.as_str()).collect()
    }

    /// Rendered log as laid out on screen.
    pub fn visual_text(&self) -> String {
        match self.options.grow_direction {
            GrowDirection::Down => self.text(),
            GrowDirection::Up => self.blocks.iter().rev().map(|b| b.text.as_str()).collect(),
        }
    }

    pub fn clear(&mut self) {
        self.retained.clear();
        self.pending.clear();
        self.reflow();
    }
}
