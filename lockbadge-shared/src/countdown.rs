//! Countdown badge model: one decrement-and-redraw tick over a
//! remaining-seconds counter, with an urgency tier derived from the
//! post-decrement value.
//!
//! The badge moves `Normal -> Warning -> Locked` as the counter falls; the
//! transition is one-directional and `Locked` is terminal until something
//! outside resets the stored value.

/// Element id of the badge the updater drives.
pub const BADGE_ELEMENT_ID: &str = "compteur-temps-restant";
/// Data attribute holding the remaining seconds, string-serialized.
pub const REMAINING_ATTR: &str = "temps-restant";

/// At or below this many seconds (24h) the badge switches to the warning tier.
pub const WARNING_THRESHOLD_SECS: i64 = 24 * 3600;

/// Terminal text once the counter is exhausted.
pub const LOCKED_TEXT: &str = "Application blocked";

const LOCK_ICON: &str = r#"<i class="fas fa-lock me-1"></i>"#;
const HOURGLASS_ICON: &str = r#"<i class="fas fa-hourglass-half me-1"></i>"#;

/// Visual urgency tier derived from remaining seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// More than 24h left; the badge keeps whatever styling it already has.
    Normal,
    /// 24h or less left, not yet expired.
    Warning,
    /// Expired or unparsable counter.
    Locked,
}

impl Tier {
    pub fn of(remaining: i64) -> Self {
        if remaining <= 0 {
            Tier::Locked
        } else if remaining <= WARNING_THRESHOLD_SECS {
            Tier::Warning
        } else {
            Tier::Normal
        }
    }

    /// CSS classes to add when this tier is rendered.
    pub fn classes_to_add(self) -> &'static [&'static str] {
        match self {
            Tier::Normal => &[],
            Tier::Warning => &["bg-warning"],
            Tier::Locked => &["bg-danger", "text-white"],
        }
    }

    /// CSS classes to remove when this tier is rendered.
    pub fn classes_to_remove(self) -> &'static [&'static str] {
        match self {
            Tier::Normal => &[],
            Tier::Warning => &["bg-success"],
            Tier::Locked => &["bg-warning", "text-dark"],
        }
    }
}

/// What the badge should show after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Counting { remaining: i64 },
    Locked,
}

impl DisplayState {
    pub fn tier(&self) -> Tier {
        match self {
            DisplayState::Counting { remaining } => Tier::of(*remaining),
            DisplayState::Locked => Tier::Locked,
        }
    }

    pub fn text(&self) -> String {
        match self {
            DisplayState::Counting { remaining } => format_hms(*remaining),
            DisplayState::Locked => LOCKED_TEXT.to_string(),
        }
    }

    /// Inner HTML for the badge: icon plus text.
    pub fn html(&self) -> String {
        match self {
            DisplayState::Counting { remaining } => {
                format!("{HOURGLASS_ICON}{}", format_hms(*remaining))
            }
            DisplayState::Locked => format!("{LOCK_ICON}{LOCKED_TEXT}"),
        }
    }
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Value to write back to the stored attribute. `None` when the counter
    /// was already exhausted or unparsable; no decrement happens then.
    pub write_back: Option<i64>,
    pub display: DisplayState,
}

/// One tick: decrement if the counter is still running and derive the redraw.
///
/// `parsed` is the stored attribute parsed upstream; `None` covers both a
/// missing attribute and one that is not an integer.
pub fn tick(parsed: Option<i64>) -> TickOutcome {
    let Some(t) = parsed else {
        return TickOutcome {
            write_back: None,
            display: DisplayState::Locked,
        };
    };
    if t <= 0 {
        return TickOutcome {
            write_back: None,
            display: DisplayState::Locked,
        };
    }

    let t = t - 1;
    // The write-back happens even on the tick that crosses zero; only the
    // rendering switches to the terminal state.
    let display = if t <= 0 {
        DisplayState::Locked
    } else {
        DisplayState::Counting { remaining: t }
    };
    TickOutcome {
        write_back: Some(t),
        display,
    }
}

/// Parses the string-serialized attribute value.
pub fn parse_remaining(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok()
}

/// Formats seconds as zero-padded `HH:MM:SS`. Hours may exceed two digits.
pub fn format_hms(total: i64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_24h_stays_normal_and_decrements() {
        let out = tick(Some(90_000));
        assert_eq!(out.write_back, Some(89_999));
        assert_eq!(out.display, DisplayState::Counting { remaining: 89_999 });
        assert_eq!(out.display.tier(), Tier::Normal);
        assert!(Tier::Normal.classes_to_add().is_empty());
        assert!(Tier::Normal.classes_to_remove().is_empty());
    }

    #[test]
    fn at_or_below_24h_turns_warning() {
        let out = tick(Some(500));
        assert_eq!(out.write_back, Some(499));
        assert_eq!(out.display.tier(), Tier::Warning);
        assert_eq!(out.display.text(), "00:08:19");
    }

    #[test]
    fn boundary_is_inclusive_at_exactly_24h() {
        // 86401 decrements to exactly 86400, which already counts as warning.
        let out = tick(Some(WARNING_THRESHOLD_SECS + 1));
        assert_eq!(out.write_back, Some(WARNING_THRESHOLD_SECS));
        assert_eq!(out.display.tier(), Tier::Warning);
    }

    #[test]
    fn exhausted_counter_locks_without_decrement() {
        for t in [0, -5] {
            let out = tick(Some(t));
            assert_eq!(out.write_back, None);
            assert_eq!(out.display, DisplayState::Locked);
        }
        let out = tick(None);
        assert_eq!(out.write_back, None);
        assert_eq!(out.display.text(), LOCKED_TEXT);
    }

    #[test]
    fn crossing_zero_renders_locked_but_writes_back() {
        let out = tick(Some(1));
        assert_eq!(out.write_back, Some(0));
        assert_eq!(out.display, DisplayState::Locked);
        assert!(out.display.html().contains("fa-lock"));
    }

    #[test]
    fn hour_minute_rollover() {
        let out = tick(Some(3661));
        assert_eq!(out.write_back, Some(3660));
        assert_eq!(out.display.text(), "01:01:00");
    }

    #[test]
    fn one_hour_exactly_formats_down() {
        let out = tick(Some(3600));
        assert_eq!(out.display.text(), "00:59:59");
        assert_eq!(out.display.tier(), Tier::Warning);
    }

    #[test]
    fn formats_are_zero_padded() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(86_399), "23:59:59");
        // More than 99 hours keeps all digits.
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    #[test]
    fn unparsable_attribute_locks() {
        assert_eq!(parse_remaining(Some("abc")), None);
        assert_eq!(parse_remaining(None), None);
        assert_eq!(parse_remaining(Some(" 42 ")), Some(42));
        assert_eq!(parse_remaining(Some("-3")), Some(-3));
    }
}
