//! Drivers for the binary: deterministic script replay and a live stdin loop.

use crate::courtroom::Courtroom;
use crate::movie::Layer;
use crate::script::{parse_line, ScriptLine};
use crate::Result;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Wall ms between logical time steps in live mode.
pub const FRAME_MS: u64 = 10;
/// Live mode has no real player, so awaited animations complete after this.
pub const AUTO_COMPLETE_MS: u64 = 600;

/// Feed script lines through the courtroom in order.
pub fn replay(courtroom: &mut Courtroom, lines: &[ScriptLine]) {
    for line in lines {
        apply_line(courtroom, line.clone());
    }
}

fn apply_line(courtroom: &mut Courtroom, line: ScriptLine) {
    match line {
        ScriptLine::Event(event) => {
            courtroom.push_event(event);
            courtroom.pump();
        }
        ScriptLine::Wait(ms) => courtroom.advance(ms),
    }
}

/// Rendered log, client notices and active clocks.
pub fn report(courtroom: &Courtroom) -> String {
    let mut out = courtroom.log().visual_text();
    for notice in courtroom.notices() {
        if notice.name.is_empty() {
            let _ = writeln!(out, "(OOC){}", notice.message);
        } else {
            let _ = writeln!(out, "(OOC){}: {}", notice.name, notice.message);
        }
    }
    for (slot, timer) in courtroom.timers().iter().enumerate() {
        if timer.running || timer.time_ms != 0 {
            let _ = writeln!(out, "timer {}: {}", slot, timer.clock());
        }
    }
    out
}

/// Completes whatever animation the machine has waited on for too long.
#[derive(Debug, Default)]
struct AutoComplete {
    waiting: Option<(Layer, u64)>,
}

impl AutoComplete {
    fn poll(&mut self, courtroom: &mut Courtroom) {
        let now = courtroom.now();
        match (courtroom.awaiting_animation(), self.waiting) {
            (None, _) => self.waiting = None,
            (Some(layer), Some((waiting, since))) if layer == waiting => {
                if now.saturating_sub(since) >= AUTO_COMPLETE_MS {
                    tracing::debug!("Auto-completing {}", layer.as_str());
                    self.waiting = None;
                    courtroom.animation_done(layer);
                }
            }
            (Some(layer), _) => self.waiting = Some((layer, now)),
        }
    }
}

async fn read_lines(tx: mpsc::UnboundedSender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("stdin read failed: {}", e);
                break;
            }
        }
    }
}

/// Read script lines from stdin in real time until EOF. `WAIT` lines advance
/// logical time immediately on top of the wall-clock frames.
pub fn run_live(courtroom: &mut Courtroom) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(read_lines(tx));
        let mut frames = tokio::time::interval(Duration::from_millis(FRAME_MS));
        let mut auto = AutoComplete::default();

        loop {
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else { break };
                    match parse_line(&line) {
                        Ok(Some(parsed)) => apply_line(courtroom, parsed),
                        Ok(None) => {}
                        Err(e) => tracing::warn!("Skipping line: {}", e),
                    }
                }
                _ = frames.tick() => {
                    courtroom.advance(FRAME_MS);
                    auto.poll(courtroom);
                }
            }
        }
    });
    Ok(())
}
