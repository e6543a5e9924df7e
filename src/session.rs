use std::time::{Duration, Instant};

/// Ground truth of a single typing session: what has been typed so far,
/// when it started, whether it finished, and the cumulative keystroke
/// counters that feed accuracy.
///
/// The session knows nothing about the target text; the controller owns the
/// snippet and runs the validator. Everything here is either directly
/// observed (transcript, timestamps) or monotonic bookkeeping.
#[derive(Debug, Clone)]
pub struct Session {
    transcript: String,
    transcript_chars: usize,
    pub started_at: Option<Instant>,
    pub finished: bool,
    pub has_error: bool,
    /// Total growth events. Never decremented; deleting a wrong character
    /// does not erase the fact that the keystroke happened.
    pub total_keystrokes: u32,
    pub error_keystrokes: u32,
    final_elapsed: Option<Duration>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            transcript: String::new(),
            transcript_chars: 0,
            started_at: None,
            finished: false,
            has_error: false,
            total_keystrokes: 0,
            error_keystrokes: 0,
            final_elapsed: None,
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Transcript length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.transcript_chars
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Anchor the timing clock. Called once, on the first non-empty input.
    pub fn begin(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Replace the transcript wholesale and store the recomputed error flag.
    pub fn apply(&mut self, transcript: String, chars: usize, has_error: bool) {
        self.transcript = transcript;
        self.transcript_chars = chars;
        self.has_error = has_error;
    }

    pub fn record_keystroke(&mut self, wrong: bool) {
        self.total_keystrokes += 1;
        if wrong {
            self.error_keystrokes += 1;
        }
    }

    /// Terminal transition: freezes the elapsed clock at this instant.
    pub fn mark_finished(&mut self, now: Instant) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.final_elapsed = self.started_at.map(|s| now.duration_since(s));
    }

    /// Wall-clock time typed so far. Zero before the first keystroke,
    /// frozen once finished.
    pub fn elapsed(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.final_elapsed {
            return frozen;
        }
        match self.started_at {
            Some(start) => now.duration_since(start),
            None => Duration::ZERO,
        }
    }

    /// Back to the blank slate. Counters, anchors, and flags all go.
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
