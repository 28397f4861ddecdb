use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::Ticker;
use crate::types::{Mode, Records, date_key};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// Countdown has no target yet; the caller should ask for one.
    NeedsDuration,
    /// Countdown already ran down to zero.
    NeedsReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Advanced,
    Finished,
}

/// Result of draining the tick source once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poll {
    pub ticks: u32,
    pub finished: bool,
}

/// Countdown / stopwatch state machine.
///
/// `ticker` is the only tick source; it is `Some` exactly while the engine
/// is running.
#[derive(Clone, Debug)]
pub struct TimerEngine {
    mode: Mode,
    status: TimerStatus,
    total_seconds: u64,
    remaining_seconds: u64,
    elapsed_seconds: u64,
    ticker: Option<Ticker>,
}

impl TimerEngine {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            status: TimerStatus::Idle,
            total_seconds: 0,
            remaining_seconds: 0,
            elapsed_seconds: 0,
            ticker: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Value shown on the face: remaining for countdown, elapsed for stopwatch.
    pub fn display_seconds(&self) -> u64 {
        match self.mode {
            Mode::Countdown => self.remaining_seconds,
            Mode::Stopwatch => self.elapsed_seconds,
        }
    }

    /// Seconds a commit would attribute right now.
    pub fn used_seconds(&self) -> u64 {
        match self.mode {
            Mode::Countdown => self.total_seconds.saturating_sub(self.remaining_seconds),
            Mode::Stopwatch => self.elapsed_seconds,
        }
    }

    /// Fraction of the countdown still left, when a duration is configured.
    pub fn progress(&self) -> Option<f64> {
        if self.mode != Mode::Countdown || self.total_seconds == 0 {
            return None;
        }
        Some(self.remaining_seconds as f64 / self.total_seconds as f64)
    }

    pub fn start(&mut self) -> StartOutcome {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> StartOutcome {
        if self.is_running() {
            return StartOutcome::AlreadyRunning;
        }
        if self.mode == Mode::Countdown {
            if self.total_seconds == 0 {
                return StartOutcome::NeedsDuration;
            }
            if self.remaining_seconds == 0 {
                return StartOutcome::NeedsReset;
            }
        }
        self.ticker = Some(Ticker::new(now, TICK_PERIOD));
        self.status = TimerStatus::Running;
        debug!(mode = ?self.mode, "timer started");
        StartOutcome::Started
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }
        match self.mode {
            Mode::Countdown => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds == 0 {
                    self.stop();
                    info!(total_seconds = self.total_seconds, "countdown finished");
                    return TickOutcome::Finished;
                }
            }
            Mode::Stopwatch => {
                self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
            }
        }
        TickOutcome::Advanced
    }

    /// Drains the tick source and applies every due tick.
    pub fn poll(&mut self, now: Instant) -> Poll {
        let due = match self.ticker.as_mut() {
            Some(ticker) => ticker.due(now),
            None => return Poll::default(),
        };
        let mut poll = Poll::default();
        for _ in 0..due {
            match self.tick() {
                TickOutcome::Ignored => break,
                TickOutcome::Advanced => poll.ticks += 1,
                TickOutcome::Finished => {
                    poll.ticks += 1;
                    poll.finished = true;
                    break;
                }
            }
        }
        poll
    }

    pub fn stop(&mut self) {
        if self.ticker.take().is_some() {
            self.status = TimerStatus::Stopped;
            debug!(used_seconds = self.used_seconds(), "timer stopped");
        }
    }

    pub fn reset(&mut self) {
        self.stop();
        match self.mode {
            Mode::Countdown => self.remaining_seconds = self.total_seconds,
            Mode::Stopwatch => self.elapsed_seconds = 0,
        }
        self.status = TimerStatus::Idle;
    }

    /// Switching modes discards any configured or running session.
    pub fn set_mode(&mut self, mode: Mode) {
        self.stop();
        self.mode = mode;
        self.total_seconds = 0;
        self.remaining_seconds = 0;
        self.elapsed_seconds = 0;
        self.status = TimerStatus::Idle;
    }

    /// Sets the countdown target. Ignored in stopwatch mode.
    pub fn configure_duration(&mut self, hours: u32, minutes: u32) -> bool {
        if self.mode != Mode::Countdown {
            return false;
        }
        self.total_seconds = u64::from(hours) * 3600 + u64::from(minutes) * 60;
        self.remaining_seconds = self.total_seconds;
        true
    }

    /// Adds the whole minutes used so far to `records[date][subject]`.
    ///
    /// Returns the minutes added, or `None` when there was nothing to record.
    /// The engine keeps its state, so repeated commits add the same amount again.
    pub fn commit(&self, subject: &str, date: NaiveDate, records: &mut Records) -> Option<u32> {
        let used = self.used_seconds();
        if used == 0 {
            return None;
        }
        let minutes = u32::try_from(used / 60).unwrap_or(u32::MAX);
        if minutes == 0 {
            return None;
        }
        let entry = records
            .entry(date_key(date))
            .or_default()
            .entry(subject.to_string())
            .or_insert(0);
        *entry = entry.saturating_add(minutes);
        Some(minutes)
    }
}
