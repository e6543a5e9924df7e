use std::time::Duration;

/// Minimum transcript length before a wpm figure is worth showing; the
/// first handful of keystrokes produce wild numbers.
const WPM_MIN_CHARS: usize = 5;

/// Cumulative keystroke accuracy as a whole percentage.
///
/// Counts every growth keystroke ever made, including mistakes that were
/// later corrected, so the figure reflects effort rather than the final
/// string. 100 when nothing has been typed yet.
pub fn accuracy(total_keystrokes: u32, error_keystrokes: u32) -> u8 {
    if total_keystrokes == 0 {
        return 100;
    }
    let correct = total_keystrokes.saturating_sub(error_keystrokes) as f64;
    let pct = (correct / total_keystrokes as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Words per minute using the standard 5-characters-per-word convention.
///
/// Zero until the transcript passes a small threshold, and zero for a zero
/// elapsed time (nothing meaningful to divide by).
pub fn wpm(chars_typed: usize, elapsed: Duration) -> u32 {
    if chars_typed <= WPM_MIN_CHARS {
        return 0;
    }
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    let raw = (chars_typed as f64 / 5.0) / minutes;
    raw.round().max(0.0) as u32
}

/// mm:ss.d display form of an elapsed duration.
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let dec = (ms % 1000) / 100;
    format!("{minutes:02}:{seconds:02}.{dec}")
}
