use std::time::{Duration, Instant};

use crate::autotype::AutotypeDriver;
use crate::catalog::Snippet;
use crate::feedback::FeedbackSignal;
use crate::metrics;
use crate::modes::{GuideDisplay, ModePolicy};
use crate::session::Session;
use crate::validate::validate_chars;

/// Tab inserts a fixed-width indent, routed through the normal input path.
pub const TAB_INDENT: &str = "    ";

/// Non-printable keys the controller cares about. Everything else reaches
/// the core as a whole-transcript candidate via [`SessionController::submit_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Escape,
    Tab,
    Backspace,
}

/// Read-only projection of the live session handed to the presentation
/// layer on every update. Rendering must not mutate any of this.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub transcript: String,
    pub finished: bool,
    pub has_error: bool,
    pub wpm: u32,
    pub accuracy: u8,
    pub elapsed: Duration,
    /// 0..=100, share of the target typed so far.
    pub progress: u8,
    pub guide: GuideDisplay,
    pub bot_running: bool,
}

/// Orchestrates one typing session against one snippet: validates input,
/// keeps the keystroke ledger, applies the mode policy, paces the bot, and
/// emits feedback signals for the presentation layer to drain.
///
/// A controller is created fresh per snippet and thrown away wholesale on
/// snippet change; there is no partial teardown.
#[derive(Debug)]
pub struct SessionController {
    snippet: Snippet,
    target: Vec<char>,
    session: Session,
    pub modes: ModePolicy,
    autotype: AutotypeDriver,
    signals: Vec<FeedbackSignal>,
    guide_hidden: bool,
    /// Presentation "zen" state; the core only tracks the flag and the
    /// escape transition out of it.
    pub focus: bool,
}

impl SessionController {
    pub fn new(snippet: Snippet, modes: ModePolicy, bot_speed_ms: u64) -> Self {
        let target: Vec<char> = snippet.code.chars().collect();
        let guide_hidden = !modes.guide_visible(0, false);
        Self {
            snippet,
            target,
            session: Session::new(),
            modes,
            autotype: AutotypeDriver::new(bot_speed_ms),
            signals: Vec::new(),
            guide_hidden,
            focus: false,
        }
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn transcript(&self) -> &str {
        self.session.transcript()
    }

    pub fn finished(&self) -> bool {
        self.session.finished
    }

    pub fn has_started(&self) -> bool {
        self.session.has_started()
    }

    pub fn bot_running(&self) -> bool {
        self.autotype.is_engaged()
    }

    /// Per-character correctness for what has been typed so far.
    pub fn per_char_correct(&self) -> Vec<bool> {
        let typed: Vec<char> = self.session.transcript().chars().collect();
        validate_chars(&typed, &self.target).per_char
    }

    /// The single mutation entry point. `candidate` is the whole new
    /// transcript, textarea-style, which makes growth, deletion, and the
    /// bot's synthetic prefixes all look the same.
    ///
    /// Contract violations (already finished, candidate longer than the
    /// target) fail closed: no state change, no signal.
    pub fn submit_input(&mut self, candidate: &str) {
        if self.session.finished {
            return;
        }
        let cand: Vec<char> = candidate.chars().collect();
        if cand.len() > self.target.len() {
            return;
        }

        let now = Instant::now();
        if !cand.is_empty() {
            self.session.begin(now);
        }

        let validation = validate_chars(&cand, &self.target);
        let prev_len = self.session.char_len();
        let grew = cand.len() > prev_len;
        let fresh_wrong = grew && !validation.per_char[cand.len() - 1];

        if fresh_wrong && self.modes.hardcore {
            // The mismatch is intercepted before any accounting: the wrong
            // transcript never lands, the whole session starts over.
            self.reset();
            self.signals.push(FeedbackSignal::HardcoreReset);
            return;
        }

        if grew {
            self.session.record_keystroke(fresh_wrong);
            if fresh_wrong {
                self.signals.push(FeedbackSignal::WrongKeystroke {
                    intensity: self.modes.wrong_key_intensity(),
                });
            }
        }

        self.session
            .apply(candidate.to_string(), cand.len(), validation.has_error);

        if cand.len() == self.target.len() && validation.clean() {
            self.session.mark_finished(now);
            self.autotype.disengage();
            let perfect = self.modes.precision
                && metrics::accuracy(
                    self.session.total_keystrokes,
                    self.session.error_keystrokes,
                ) == 100;
            self.signals.push(FeedbackSignal::Completion { perfect });
        }

        self.refresh_visibility();
    }

    /// Escape, Tab and Backspace, per the mode policy. Tab and Backspace
    /// are re-expressed as candidates and routed through `submit_input`.
    pub fn submit_special_key(&mut self, key: SpecialKey) {
        match key {
            SpecialKey::Escape => {
                if self.focus {
                    self.focus = false;
                    self.signals.push(FeedbackSignal::FocusExit);
                }
            }
            SpecialKey::Tab => {
                let candidate = format!("{}{}", self.session.transcript(), TAB_INDENT);
                self.submit_input(&candidate);
            }
            SpecialKey::Backspace => {
                if self.modes.hardcore {
                    // Intercepted and dropped: hardcore has nothing to delete.
                    return;
                }
                let mut chars: Vec<char> = self.session.transcript().chars().collect();
                if chars.pop().is_some() {
                    let candidate: String = chars.into_iter().collect();
                    self.submit_input(&candidate);
                }
            }
        }
    }

    /// Append a single typed character to the transcript.
    pub fn submit_char(&mut self, c: char) {
        let mut candidate = String::with_capacity(self.session.transcript().len() + 4);
        candidate.push_str(self.session.transcript());
        candidate.push(c);
        self.submit_input(&candidate);
    }

    /// Back to a blank session: transcript, counters, timing anchors, and
    /// the bot schedule all go; default visibility comes back on its own
    /// once the transcript is empty.
    pub fn reset(&mut self) {
        self.session.reset();
        self.autotype.disengage();
        self.refresh_visibility();
    }

    /// Toggle the bot. Engaging captures the current transcript length so
    /// the bot resumes after manual progress instead of starting over.
    pub fn set_autotype(&mut self, on: bool, now: Instant) {
        self.modes.autotype = on;
        if on && !self.session.finished {
            self.autotype
                .engage(now, self.session.char_len(), self.target.len());
        } else {
            self.autotype.disengage();
        }
        self.refresh_visibility();
    }

    pub fn set_bot_speed(&mut self, interval_ms: u64) {
        self.autotype.set_interval(interval_ms);
    }

    /// Replace a single mode toggle. Visibility is re-resolved because
    /// blind/recall/ghost changes can flip it without any keystroke.
    pub fn set_modes(&mut self, modes: ModePolicy) {
        let autotype_changed = modes.autotype != self.modes.autotype;
        self.modes = modes;
        if autotype_changed {
            self.set_autotype(modes.autotype, Instant::now());
        } else {
            self.refresh_visibility();
        }
    }

    /// Drive the bot from the runtime tick. Catches up on every due
    /// synthetic keystroke, each through the normal input path.
    pub fn tick(&mut self, now: Instant) {
        while let Some(cursor) = self.autotype.poll(now) {
            let candidate: String = self.target[..cursor].iter().collect();
            self.submit_input(&candidate);
            if self.session.finished {
                break;
            }
        }
    }

    /// Signals accumulated since the last drain, in emission order.
    pub fn drain_signals(&mut self) -> Vec<FeedbackSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn snapshot(&self) -> SessionView {
        let now = Instant::now();
        let elapsed = self.session.elapsed(now);
        let len = self.session.char_len();
        let progress = if self.target.is_empty() {
            0
        } else {
            ((len as f64 / self.target.len() as f64) * 100.0).round() as u8
        };
        SessionView {
            transcript: self.session.transcript().to_string(),
            finished: self.session.finished,
            has_error: self.session.has_error,
            wpm: metrics::wpm(len, elapsed),
            accuracy: metrics::accuracy(
                self.session.total_keystrokes,
                self.session.error_keystrokes,
            ),
            elapsed,
            progress,
            guide: self.modes.guide_display(len, self.bot_running()),
            bot_running: self.bot_running(),
        }
    }

    pub fn total_keystrokes(&self) -> u32 {
        self.session.total_keystrokes
    }

    pub fn error_keystrokes(&self) -> u32 {
        self.session.error_keystrokes
    }

    fn refresh_visibility(&mut self) {
        let hidden = !self
            .modes
            .guide_visible(self.session.char_len(), self.bot_running());
        if hidden != self.guide_hidden {
            self.guide_hidden = hidden;
            self.signals
                .push(FeedbackSignal::VisibilityChange { visible: !hidden });
        }
    }
}
