//! Event sources feeding the courtroom: decoded protocol messages, animation
//! completion signals and logical timer firings.

mod scheduler;

pub use scheduler::Scheduler;

use crate::movie::Layer;
use crate::timer::TimerCommand;

/// Logical timers owned by the courtroom scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Per-character text reveal tick.
    ChatTick,
    /// Delay before a message's sound effect plays.
    SfxDelay,
    /// Firing timer of an in-scene countdown slot.
    Countdown(usize),
    /// How long the testimony overlay stays visible.
    TestimonyShow,
    /// Gap before the testimony overlay blinks back in.
    TestimonyHide,
}

/// An event waiting to be handled by the courtroom.
#[derive(Debug, Clone, PartialEq)]
pub enum CourtroomEvent {
    /// A decoded in-character chat message (field list).
    Message(Vec<String>),
    /// An animation layer finished playing.
    AnimationDone(Layer),
    /// A logical timer fired.
    TimerFired(TimerKind),
    /// Music change announced by the server.
    Song {
        song: String,
        char_id: i64,
        showname: Option<String>,
    },
    /// Witness testimony / cross examination splash (e.g. `testimony1`).
    Wtce(String),
    /// Health bar update: bar 1 is defense, bar 2 prosecution.
    HealthBar { bar: i32, state: i32 },
    /// Countdown timer command.
    Timer(TimerCommand),
    /// A moderator was called; carries the server's description.
    ModCall(String),
}

/// Event queue for pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<CourtroomEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CourtroomEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<CourtroomEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = EventQueue::new();
        queue.push(CourtroomEvent::Wtce("testimony1".into()));
        queue.push(CourtroomEvent::AnimationDone(Layer::Wtce));
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                CourtroomEvent::Wtce("testimony1".into()),
                CourtroomEvent::AnimationDone(Layer::Wtce),
            ]
        );
        assert!(queue.is_empty());
    }
}
