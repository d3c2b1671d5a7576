//! Logical-time deadline queue.
//!
//! Time only moves when the host calls [`Scheduler::pop_due`] with a target.
//! Repeating timers are fixed-rate: the next deadline is the previous
//! deadline plus the interval, so a stalled host fires every missed tick
//! late instead of dropping them.

use super::TimerKind;

/// A pending timer.
#[derive(Debug, Clone)]
struct PendingTimer {
    kind: TimerKind,
    /// Logical ms at which this timer fires.
    fire_at: u64,
    /// For repeating timers: interval between firings.
    interval: Option<u64>,
    /// Insertion order, breaks deadline ties.
    seq: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    timers: Vec<PendingTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in ms.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Arm a one-shot timer, replacing any pending timer of the same kind.
    pub fn start_once(&mut self, kind: TimerKind, delay_ms: u64) {
        self.insert(kind, delay_ms, None);
    }

    /// Arm a repeating timer, replacing any pending timer of the same kind.
    pub fn start_repeating(&mut self, kind: TimerKind, interval_ms: u64) {
        let interval = interval_ms.max(1);
        self.insert(kind, interval, Some(interval));
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: u64, interval: Option<u64>) {
        self.cancel(kind);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(PendingTimer {
            kind,
            fire_at: self.now.saturating_add(delay_ms),
            interval,
            seq,
        });
    }

    /// Cancel a timer. Cancelling an idle kind is a no-op.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    /// Deadline of a pending timer.
    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.timers.iter().find(|t| t.kind == kind).map(|t| t.fire_at)
    }

    /// Change a repeating timer's interval. The already scheduled firing
    /// keeps its deadline; the new interval applies from the next one.
    pub fn set_interval(&mut self, kind: TimerKind, interval_ms: u64) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.kind == kind) {
            if timer.interval.is_some() {
                timer.interval = Some(interval_ms.max(1));
            }
        }
    }

    /// Pop the earliest timer due at or before `target`, moving logical time
    /// to its deadline. Repeating timers are rescheduled before returning so
    /// the handler may cancel or re-arm them.
    pub fn pop_due(&mut self, target: u64) -> Option<TimerKind> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at <= target)
            .min_by_key(|(_, t)| (t.fire_at, t.seq))
            .map(|(i, _)| i)?;

        let fire_at = self.timers[index].fire_at;
        self.now = self.now.max(fire_at);
        let kind = self.timers[index].kind;
        match self.timers[index].interval {
            Some(interval) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let timer = &mut self.timers[index];
                timer.fire_at = fire_at + interval;
                timer.seq = seq;
            }
            None => {
                self.timers.remove(index);
            }
        }
        Some(kind)
    }

    /// Move logical time to `target` once everything due has been popped.
    pub fn settle(&mut self, target: u64) {
        self.now = self.now.max(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, target: u64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        while let Some(kind) = s.pop_due(target) {
            fired.push(kind);
        }
        s.settle(target);
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut s = Scheduler::new();
        s.start_once(TimerKind::SfxDelay, 120);
        assert!(drain(&mut s, 100).is_empty());
        assert_eq!(drain(&mut s, 200), vec![TimerKind::SfxDelay]);
        assert!(drain(&mut s, 1000).is_empty());
        assert!(!s.is_active(TimerKind::SfxDelay));
    }

    #[test]
    fn test_repeating_catches_up_after_stall() {
        let mut s = Scheduler::new();
        s.start_repeating(TimerKind::ChatTick, 60);
        let fired = drain(&mut s, 300);
        assert_eq!(fired.len(), 5);
        assert_eq!(s.deadline(TimerKind::ChatTick), Some(360));
    }

    #[test]
    fn test_deadline_order_and_ties() {
        let mut s = Scheduler::new();
        s.start_once(TimerKind::Countdown(1), 50);
        s.start_once(TimerKind::SfxDelay, 20);
        s.start_once(TimerKind::Countdown(0), 50);
        assert_eq!(
            drain(&mut s, 100),
            vec![TimerKind::SfxDelay, TimerKind::Countdown(1), TimerKind::Countdown(0)]
        );
    }

    #[test]
    fn test_restart_replaces_deadline() {
        let mut s = Scheduler::new();
        s.start_once(TimerKind::SfxDelay, 50);
        s.start_once(TimerKind::SfxDelay, 500);
        assert!(drain(&mut s, 100).is_empty());
        assert_eq!(s.deadline(TimerKind::SfxDelay), Some(500));
    }

    #[test]
    fn test_interval_change_applies_next_firing() {
        let mut s = Scheduler::new();
        s.start_repeating(TimerKind::Countdown(0), 100);
        s.set_interval(TimerKind::Countdown(0), 10);
        assert_eq!(s.deadline(TimerKind::Countdown(0)), Some(100));
        assert_eq!(drain(&mut s, 100).len(), 1);
        assert_eq!(s.deadline(TimerKind::Countdown(0)), Some(110));
    }
}
