use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::controller::SessionController;
use crate::feedback::FeedbackSignal;

/// Raw terminal input handed to the drill loop. The cadence is not an
/// event here; the runner owns it and turns it into controller ticks.
#[derive(Clone, Debug)]
pub enum TrainerEvent {
    Key(KeyEvent),
    Resize,
}

/// Source of terminal events (keyboard, resize).
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if one arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TrainerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(TrainerEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(TrainerEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit and headless integration tests
pub struct TestEventSource {
    rx: Receiver<TrainerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TrainerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// What one turn of the drill loop produced.
#[derive(Debug)]
pub enum LoopStep {
    /// Terminal input for the caller to dispatch.
    Input(TrainerEvent),
    /// The cadence fired: the clock advanced and any due bot keystrokes
    /// went through the controller. `signals` is the feedback that fell
    /// out; `redraw` is true while the screen is stale (live session,
    /// bot typing, or fresh signals).
    Ticked {
        signals: Vec<FeedbackSignal>,
        redraw: bool,
    },
}

/// Pumps the drill loop one step at a time: waits up to one cadence
/// interval for terminal input, and on timeout advances the session
/// itself — elapsed time and the autotype bot both ride on this.
pub struct Runner<E: EventSource> {
    event_source: E,
    cadence: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, cadence: Duration) -> Self {
        Self {
            event_source,
            cadence,
        }
    }

    /// Block up to the cadence interval. Input is returned for the caller
    /// to dispatch; a timeout ticks the controller and drains its signals.
    pub fn pump(&self, controller: &mut SessionController) -> LoopStep {
        match self.event_source.recv_timeout(self.cadence) {
            Ok(ev) => LoopStep::Input(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                controller.tick(Instant::now());
                let signals = controller.drain_signals();
                let live = controller.has_started() && !controller.finished();
                let redraw = live || controller.bot_running() || !signals.is_empty();
                LoopStep::Ticked { signals, redraw }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Language, Level, Snippet};
    use crate::modes::ModePolicy;
    use std::sync::mpsc;

    fn controller(code: &str) -> SessionController {
        let snippet = Snippet {
            id: "R-1".into(),
            title: "runner".into(),
            language: Language::Rust,
            category: "Systems".into(),
            level: Level::Beginner,
            description: String::new(),
            output: None,
            code: code.into(),
        };
        SessionController::new(snippet, ModePolicy::default(), 10)
    }

    #[test]
    fn pump_times_out_into_a_tick() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));
        let mut c = controller("abc");

        match runner.pump(&mut c) {
            LoopStep::Ticked { signals, redraw } => {
                // Idle session: nothing happened, nothing to repaint.
                assert!(signals.is_empty());
                assert!(!redraw);
            }
            LoopStep::Input(_) => panic!("expected a tick on timeout"),
        }
    }

    #[test]
    fn pump_passes_input_through_undispatched() {
        let (tx, rx) = mpsc::channel();
        tx.send(TrainerEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));
        let mut c = controller("abc");

        match runner.pump(&mut c) {
            LoopStep::Input(TrainerEvent::Resize) => {}
            other => panic!("expected Resize, got {:?}", other),
        }
        // Input never advances the session.
        assert_eq!(c.transcript(), "");
    }

    #[test]
    fn pump_drives_the_bot_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));
        let mut c = controller("ab");
        // Engage in the past so the first synthetic keystrokes are due.
        c.set_autotype(true, Instant::now() - Duration::from_millis(100));

        match runner.pump(&mut c) {
            LoopStep::Ticked { signals, redraw } => {
                assert!(redraw);
                assert!(c.finished());
                assert!(signals
                    .iter()
                    .any(|s| matches!(s, FeedbackSignal::Completion { .. })));
            }
            LoopStep::Input(_) => panic!("expected a tick on timeout"),
        }
    }

    #[test]
    fn live_session_keeps_requesting_redraws() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));
        let mut c = controller("abc");
        c.submit_char('a');
        c.drain_signals();

        match runner.pump(&mut c) {
            LoopStep::Ticked { redraw, .. } => assert!(redraw, "the elapsed clock is moving"),
            LoopStep::Input(_) => panic!("expected a tick on timeout"),
        }
    }
}
