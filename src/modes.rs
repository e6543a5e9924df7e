use crate::feedback::Intensity;

/// Orthogonal session modifiers. Each toggles independently; their effects
/// compose, with blind taking precedence over recall for visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModePolicy {
    /// Guide text rendered at low emphasis instead of full strength.
    pub ghost: bool,
    /// Guide text vanishes once the first character is typed.
    pub recall: bool,
    /// Guide text always hidden. Wins over recall.
    pub blind: bool,
    /// Any fresh mistake resets the whole session; backspace is suppressed.
    pub hardcore: bool,
    /// Upgrades the completion signal when accuracy is a clean 100.
    pub precision: bool,
    /// The scripted bot types instead of the user.
    pub autotype: bool,
}

/// How the guide text should currently be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideDisplay {
    /// Normal dim guide text.
    Full,
    /// Low-emphasis ghost rendering.
    Ghost,
    /// Not shown at all.
    Hidden,
}

impl ModePolicy {
    /// Resolve guide-text presentation from the current transcript length
    /// and whether the bot is actively typing.
    ///
    /// Precedence: blind hides unconditionally; recall hides once anything
    /// has been typed, but not while the bot is the one typing; ghost only
    /// changes emphasis, never visibility.
    pub fn guide_display(&self, transcript_len: usize, bot_running: bool) -> GuideDisplay {
        if self.blind {
            return GuideDisplay::Hidden;
        }
        if self.recall && transcript_len >= 1 && !bot_running {
            return GuideDisplay::Hidden;
        }
        if self.ghost {
            return GuideDisplay::Ghost;
        }
        GuideDisplay::Full
    }

    /// The boolean the visibility-change signal carries: is the guide text
    /// visible at all (ghost still counts as visible).
    pub fn guide_visible(&self, transcript_len: usize, bot_running: bool) -> bool {
        self.guide_display(transcript_len, bot_running) != GuideDisplay::Hidden
    }

    /// Miss-feedback strength. Blind sessions need an unmistakable cue.
    pub fn wrong_key_intensity(&self) -> Intensity {
        if self.blind {
            Intensity::Strong
        } else {
            Intensity::Normal
        }
    }
}
