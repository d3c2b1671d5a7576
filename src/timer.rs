//! In-scene countdown clocks.
//!
//! Each slot owns a logical time that moves by a signed step per firing.
//! Firings come from a fixed-rate scheduler timer, so the clock counts
//! firings rather than measuring elapsed wall time: a stalled host delays
//! steps but never skips or doubles them. Pausing gates firings; it never
//! resets the accumulated time.

/// Number of on-screen timer slots.
pub const TIMER_SLOTS: usize = 5;

const DEFAULT_STEP_MS: i64 = -12;
const DEFAULT_INTERVAL_MS: u64 = 12;

/// One clock slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    /// Logical time in ms; may go negative.
    pub time_ms: i64,
    /// Added to `time_ms` on every firing while running.
    pub step_ms: i64,
    /// Wall interval between firings.
    pub interval_ms: u64,
    pub running: bool,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            time_ms: 0,
            step_ms: DEFAULT_STEP_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
            running: false,
        }
    }
}

impl CountdownTimer {
    /// Apply one firing. Returns whether time moved.
    pub fn fire(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.time_ms = self.time_ms.saturating_add(self.step_ms);
        true
    }

    pub fn clock(&self) -> String {
        format_clock(self.time_ms)
    }
}

/// Command addressed to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Set { slot: usize, time_ms: i64 },
    Step { slot: usize, step_ms: i64 },
    Interval { slot: usize, interval_ms: u64 },
    Pause { slot: usize },
    Resume { slot: usize },
}

impl TimerCommand {
    pub fn slot(&self) -> usize {
        match *self {
            Self::Set { slot, .. }
            | Self::Step { slot, .. }
            | Self::Interval { slot, .. }
            | Self::Pause { slot }
            | Self::Resume { slot } => slot,
        }
    }
}

/// What the host has to do with its scheduler after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiringChange {
    None,
    Start { interval_ms: u64 },
    Stop,
    Retime { interval_ms: u64 },
}

/// Fixed set of clock slots. Out-of-range slots are ignored everywhere.
#[derive(Debug, Clone)]
pub struct TimerBank {
    slots: [CountdownTimer; TIMER_SLOTS],
}

impl Default for TimerBank {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| CountdownTimer::default()),
        }
    }
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: usize) -> Option<&CountdownTimer> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountdownTimer> {
        self.slots.iter()
    }

    pub fn set_time(&mut self, slot: usize, time_ms: i64) {
        if let Some(t) = self.slots.get_mut(slot) {
            t.time_ms = time_ms;
        }
    }

    pub fn set_step(&mut self, slot: usize, step_ms: i64) {
        if let Some(t) = self.slots.get_mut(slot) {
            t.step_ms = step_ms;
        }
    }

    /// Returns whether a running slot needs its firing timer retimed.
    pub fn set_firing_interval(&mut self, slot: usize, interval_ms: u64) -> bool {
        match self.slots.get_mut(slot) {
            Some(t) => {
                t.interval_ms = interval_ms.max(1);
                t.running
            }
            None => false,
        }
    }

    pub fn pause(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(t) if t.running => {
                t.running = false;
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(t) if !t.running => {
                t.running = true;
                true
            }
            _ => false,
        }
    }

    /// One firing of a slot's timer.
    pub fn fire(&mut self, slot: usize) -> bool {
        self.slots.get_mut(slot).is_some_and(CountdownTimer::fire)
    }

    /// Apply a command and report the scheduler change it implies.
    pub fn apply(&mut self, command: TimerCommand) -> FiringChange {
        if command.slot() >= TIMER_SLOTS {
            tracing::debug!("Ignoring timer command for slot {}", command.slot());
            return FiringChange::None;
        }
        match command {
            TimerCommand::Set { slot, time_ms } => {
                self.set_time(slot, time_ms);
                FiringChange::None
            }
            TimerCommand::Step { slot, step_ms } => {
                self.set_step(slot, step_ms);
                FiringChange::None
            }
            TimerCommand::Interval { slot, interval_ms } => {
                if self.set_firing_interval(slot, interval_ms) {
                    FiringChange::Retime {
                        interval_ms: self.slots[slot].interval_ms,
                    }
                } else {
                    FiringChange::None
                }
            }
            TimerCommand::Pause { slot } => {
                if self.pause(slot) {
                    FiringChange::Stop
                } else {
                    FiringChange::None
                }
            }
            TimerCommand::Resume { slot } => {
                if self.resume(slot) {
                    FiringChange::Start {
                        interval_ms: self.slots[slot].interval_ms,
                    }
                } else {
                    FiringChange::None
                }
            }
        }
    }
}

/// `HH:MM:SS.mmm`, with a leading `-` for negative times.
pub fn format_clock(time_ms: i64) -> String {
    let sign = if time_ms < 0 { "-" } else { "" };
    let ms = time_ms.unsigned_abs();
    let hours = ms / 3_600_000;
    let minutes = ms / 60_000 % 60;
    let seconds = ms / 1000 % 60;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{:03}", ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_slot_ignores_firings() {
        let mut bank = TimerBank::new();
        bank.set_time(0, 1000);
        assert!(!bank.fire(0));
        assert_eq!(bank.get(0).unwrap().time_ms, 1000);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut bank = TimerBank::new();
        bank.set_time(TIMER_SLOTS, 5);
        assert!(!bank.resume(99));
        assert!(!bank.fire(99));
        assert_eq!(bank.apply(TimerCommand::Resume { slot: 7 }), FiringChange::None);
    }

    #[test]
    fn test_apply_reports_firing_changes() {
        let mut bank = TimerBank::new();
        assert_eq!(
            bank.apply(TimerCommand::Resume { slot: 1 }),
            FiringChange::Start { interval_ms: 12 }
        );
        assert_eq!(bank.apply(TimerCommand::Resume { slot: 1 }), FiringChange::None);
        assert_eq!(
            bank.apply(TimerCommand::Interval { slot: 1, interval_ms: 0 }),
            FiringChange::Retime { interval_ms: 1 }
        );
        assert_eq!(bank.apply(TimerCommand::Pause { slot: 1 }), FiringChange::Stop);
        assert_eq!(
            bank.apply(TimerCommand::Interval { slot: 1, interval_ms: 50 }),
            FiringChange::None
        );
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00.000");
        assert_eq!(format_clock(3_723_004), "01:02:03.004");
        assert_eq!(format_clock(-1500), "-00:00:01.500");
    }
}
