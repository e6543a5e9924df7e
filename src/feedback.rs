/// How hard the presentation should signal a miss. Blind sessions get the
/// strong cue since the guide text cannot show the mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Normal,
    Strong,
}

/// Outward notifications produced by the session core for the presentation
/// layer. The core never renders; it only says what just happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackSignal {
    /// Fired once per freshly typed wrong character.
    WrongKeystroke { intensity: Intensity },
    /// Hardcore mode wiped the session because of a mistake.
    HardcoreReset,
    /// The transcript reached the target. `perfect` is true only when
    /// precision mode is on and cumulative accuracy is 100.
    Completion { perfect: bool },
    /// The combined blind/recall rule changed whether the guide text shows.
    VisibilityChange { visible: bool },
    /// Escape left the focus ("zen") presentation state.
    FocusExit,
}
