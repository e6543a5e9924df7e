// End-to-end drills through the library surface: whole sessions driven the
// way the binary drives them, asserting on the observable scoring, mode,
// and bot behavior.

use std::time::{Duration, Instant};

use typedrill::catalog::{Language, Level, Snippet};
use typedrill::controller::{SessionController, SpecialKey};
use typedrill::feedback::FeedbackSignal;
use typedrill::modes::{GuideDisplay, ModePolicy};

fn snippet(code: &str) -> Snippet {
    Snippet {
        id: "D-1".into(),
        title: "drill".into(),
        language: Language::Python,
        category: "Logic".into(),
        level: Level::Beginner,
        description: String::new(),
        output: None,
        code: code.into(),
    }
}

fn controller(code: &str) -> SessionController {
    SessionController::new(snippet(code), ModePolicy::default(), 45)
}

fn type_all(c: &mut SessionController, text: &str) {
    for ch in text.chars() {
        c.submit_char(ch);
    }
}

#[test]
fn transcript_never_exceeds_the_target() {
    let mut c = controller("abc");
    type_all(&mut c, "abc");
    // Further characters (from any source) are dropped.
    c.submit_char('d');
    c.submit_input("abcd");
    assert_eq!(c.transcript(), "abc");
}

#[test]
fn error_flag_covers_the_whole_transcript() {
    let mut c = controller("hello");
    type_all(&mut c, "hel");
    assert!(!c.snapshot().has_error);
    c.submit_char('x');
    assert!(c.snapshot().has_error);
    // An early mistake keeps the flag set even when later chars match.
    c.submit_special_key(SpecialKey::Backspace);
    c.submit_input("hxll");
    assert!(c.snapshot().has_error);
}

#[test]
fn corrections_do_not_recover_accuracy() {
    let mut c = controller("ab");
    c.submit_char('a');
    c.submit_char('x');
    c.submit_special_key(SpecialKey::Backspace);
    c.submit_char('b');
    assert!(c.finished());
    // 3 keystrokes, 1 wrong: round(2/3 * 100).
    assert_eq!(c.total_keystrokes(), 3);
    assert_eq!(c.error_keystrokes(), 1);
    assert_eq!(c.snapshot().accuracy, 67);
}

#[test]
fn completion_requires_an_exact_full_match() {
    let mut c = controller("ab");
    c.submit_char('a');
    assert!(!c.finished());
    c.submit_char('x');
    assert!(!c.finished(), "full length with a mismatch is not done");
    c.submit_special_key(SpecialKey::Backspace);
    c.submit_char('b');
    assert!(c.finished());
}

#[test]
fn clean_run_scores_full_accuracy() {
    let mut c = controller("let x = 1;");
    type_all(&mut c, "let x = 1;");
    assert!(c.finished());
    assert_eq!(c.total_keystrokes(), 10);
    assert_eq!(c.error_keystrokes(), 0);
    assert_eq!(c.snapshot().accuracy, 100);
}

#[test]
fn finished_view_freezes_the_clock() {
    let mut c = controller("hi");
    type_all(&mut c, "hi");
    assert!(c.finished());
    let first = c.snapshot().elapsed;
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(c.snapshot().elapsed, first);
}

#[test]
fn hardcore_mistake_restarts_from_scratch() {
    let mut c = controller("for i in xs:");
    c.modes.hardcore = true;
    type_all(&mut c, "for i");
    c.submit_char('X');
    assert_eq!(c.transcript(), "");
    assert_eq!(c.total_keystrokes(), 0);
    assert_eq!(c.error_keystrokes(), 0);
    assert!(!c.has_started());
    assert!(c.drain_signals().contains(&FeedbackSignal::HardcoreReset));
    // The run is still playable from the top.
    type_all(&mut c, "for i in xs:");
    assert!(c.finished());
    assert_eq!(c.snapshot().accuracy, 100);
}

#[test]
fn bot_picks_up_where_the_user_stopped() {
    let mut c = controller("return n");
    type_all(&mut c, "retu");
    let t0 = Instant::now();
    c.set_autotype(true, t0);

    c.tick(t0 + Duration::from_millis(45));
    assert_eq!(c.transcript(), "retur");
    c.tick(t0 + Duration::from_millis(45 * 4));
    assert_eq!(c.transcript(), "return n");
    assert!(c.finished());
    assert!(!c.bot_running());
}

#[test]
fn blind_outranks_recall() {
    let mut c = SessionController::new(
        snippet("abc"),
        ModePolicy {
            blind: true,
            recall: true,
            ..ModePolicy::default()
        },
        45,
    );
    assert_eq!(c.snapshot().guide, GuideDisplay::Hidden);
    c.submit_char('a');
    assert_eq!(c.snapshot().guide, GuideDisplay::Hidden);
    // Turning blind off leaves recall in charge: hidden once typing started.
    let mut modes = c.modes;
    modes.blind = false;
    c.set_modes(modes);
    assert_eq!(c.snapshot().guide, GuideDisplay::Hidden);
    c.submit_special_key(SpecialKey::Backspace);
    assert_eq!(c.snapshot().guide, GuideDisplay::Full);
}

#[test]
fn recall_stays_visible_while_the_bot_types() {
    let mut c = SessionController::new(
        snippet("abcdef"),
        ModePolicy {
            recall: true,
            ..ModePolicy::default()
        },
        45,
    );
    let t0 = Instant::now();
    c.set_autotype(true, t0);
    c.tick(t0 + Duration::from_millis(45 * 2));
    assert_eq!(c.transcript(), "ab");
    assert_eq!(c.snapshot().guide, GuideDisplay::Full);
    // Recall kicks back in when the bot stops mid-run.
    c.set_autotype(false, t0);
    assert_eq!(c.snapshot().guide, GuideDisplay::Hidden);
}

#[test]
fn reset_returns_everything_to_zero() {
    let mut c = controller("abcdef");
    type_all(&mut c, "abX");
    let t0 = Instant::now();
    c.set_autotype(true, t0);
    c.reset();

    assert_eq!(c.transcript(), "");
    assert!(!c.has_started());
    assert!(!c.bot_running());
    let view = c.snapshot();
    assert_eq!(view.elapsed, Duration::ZERO);
    assert_eq!(view.wpm, 0);
    assert_eq!(view.accuracy, 100);
    // A stale bot schedule must not keep typing after the reset.
    c.tick(t0 + Duration::from_secs(10));
    assert_eq!(c.transcript(), "");
}

#[test]
fn short_targets_report_zero_wpm() {
    let mut c = controller("ab");
    type_all(&mut c, "ab");
    assert!(c.finished());
    // Five or fewer characters never produce a wpm figure.
    assert_eq!(c.snapshot().wpm, 0);
}

#[test]
fn multiline_snippet_with_tabs_plays_through() {
    let code = "def f():\n    return 1";
    let mut c = controller(code);
    type_all(&mut c, "def f():\n");
    c.submit_special_key(SpecialKey::Tab);
    type_all(&mut c, "return 1");
    assert!(c.finished());
    assert_eq!(c.snapshot().accuracy, 100);
}
