/// Result of comparing a transcript against the target text.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// True when any typed position differs from the target.
    pub has_error: bool,
    /// Per-character correctness for every typed position.
    pub per_char: Vec<bool>,
}

impl Validation {
    pub fn clean(&self) -> bool {
        !self.has_error
    }
}

/// Whole-string prefix comparison of `transcript` against `target`.
///
/// Pure and side-effect free. An empty transcript is always valid; a correct
/// prefix shorter than the target is valid-and-incomplete. The error flag is
/// whole-string: trailing correct characters never clear an earlier mismatch.
pub fn validate(transcript: &str, target: &str) -> Validation {
    let target: Vec<char> = target.chars().collect();
    validate_chars(&transcript.chars().collect::<Vec<_>>(), &target)
}

/// Char-slice variant used by the controller, which keeps the target
/// pre-split to avoid re-collecting on every keystroke.
pub fn validate_chars(transcript: &[char], target: &[char]) -> Validation {
    let per_char: Vec<bool> = transcript
        .iter()
        .enumerate()
        .map(|(i, c)| target.get(i) == Some(c))
        .collect();
    let has_error = per_char.iter().any(|ok| !ok);
    Validation {
        has_error,
        per_char,
    }
}
