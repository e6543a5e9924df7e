use std::time::{Duration, Instant};

pub const DEFAULT_BOT_INTERVAL_MS: u64 = 45;

/// The armed state of the driver. Holding it in an `Option` is the whole
/// cancellation story: every transition that stops the bot takes the
/// schedule, so a stale schedule can never fire again.
#[derive(Debug, Clone, Copy)]
struct Schedule {
    /// Number of target characters the bot has already produced. Captured
    /// from the transcript length at engage time so the bot resumes where
    /// manual typing left off.
    cursor: usize,
    /// Target length; the bot stops when the cursor reaches it.
    end: usize,
    next_due: Instant,
}

/// Paces synthetic keystrokes for the autotype ("bot") mode.
///
/// The driver only decides *when* the next character is due; the controller
/// feeds each step through the same input path a human uses, so the
/// validator and metrics never see a difference.
#[derive(Debug, Clone)]
pub struct AutotypeDriver {
    interval: Duration,
    schedule: Option<Schedule>,
}

impl AutotypeDriver {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            schedule: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }

    /// Change the per-character pace. Takes effect from the next poll.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval = Duration::from_millis(interval_ms);
    }

    /// Arm the driver starting from `start` typed characters, replacing any
    /// schedule that was already live.
    pub fn engage(&mut self, now: Instant, start: usize, end: usize) {
        if start >= end {
            self.schedule = None;
            return;
        }
        self.schedule = Some(Schedule {
            cursor: start,
            end,
            next_due: now + self.interval,
        });
    }

    /// Drop the schedule. Idempotent.
    pub fn disengage(&mut self) {
        self.schedule = None;
    }

    pub fn is_engaged(&self) -> bool {
        self.schedule.is_some()
    }

    /// If a synthetic keystroke is due, advance the cursor and return the
    /// new transcript length to submit. Call in a loop to catch up after a
    /// coarse tick. Disengages itself once the end is reached.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let sched = self.schedule.as_mut()?;
        if now < sched.next_due {
            return None;
        }
        sched.cursor += 1;
        sched.next_due += self.interval;
        let cursor = sched.cursor;
        if cursor >= sched.end {
            self.schedule = None;
        }
        Some(cursor)
    }
}

impl Default for AutotypeDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_INTERVAL_MS)
    }
}
