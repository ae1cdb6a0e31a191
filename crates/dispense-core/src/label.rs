//! Parser for free-text last-visit labels.
//!
//! Labels follow a loose grammar, `[Crossover] Cycle <n> Day <n>`, typed by
//! site staff. The parser never fails: unreadable labels fall back to
//! Cycle 1 Day 1 and carry a [`LabelDefect`] so the record can be audited.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static CYCLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcycle[\s:#.\-]*(\d+)").expect("cycle pattern is valid")
});

static DAY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bday[\s:#.\-]*(\d+)").expect("day pattern is valid"));

const CROSSOVER_MARKER: &str = "crossover";

/// Largest cycle number a label may carry.
pub const MAX_LABEL_CYCLE: u32 = 9_999;

/// Largest day number a label may carry.
pub const MAX_LABEL_DAY: u32 = 366;

/// Cycle/day position read from a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelPosition {
    pub cycle: u32,
    pub day: u32,
    pub crossover: bool,
}

/// Why a label could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum LabelDefect {
    #[error("label is empty")]
    Empty,
    #[error("no cycle number found")]
    MissingCycle,
    #[error("no day number found")]
    MissingDay,
    #[error("day appears before cycle")]
    DayBeforeCycle,
    #[error("cycle or day number is zero")]
    ZeroValue,
    #[error("cycle or day number is too large")]
    OutOfRange,
    /// The label's day reaches back before the earliest supported date.
    #[error("cycle start falls before the earliest supported date")]
    PrecedesCalendar,
}

/// Result of parsing a last-visit label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitLabel {
    Parsed(LabelPosition),
    /// Cycle 1 Day 1 substituted for an unreadable label.
    Fallback {
        position: LabelPosition,
        defect: LabelDefect,
    },
}

impl VisitLabel {
    pub fn position(&self) -> LabelPosition {
        match self {
            Self::Parsed(position) | Self::Fallback { position, .. } => *position,
        }
    }

    pub fn defect(&self) -> Option<LabelDefect> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { defect, .. } => Some(*defect),
        }
    }

    fn fallback(crossover: bool, defect: LabelDefect) -> Self {
        Self::Fallback {
            position: LabelPosition {
                cycle: 1,
                day: 1,
                crossover,
            },
            defect,
        }
    }
}

/// Parse a last-visit label such as `"Crossover Cycle 2 Day 1"`.
///
/// Matching is case-insensitive and tolerates punctuation between keyword and
/// number (`"cycle: 3, day #8"`). `Cycle` must come before `Day`.
///
/// ```
/// use dispense_core::label::{parse_visit_label, LabelPosition, VisitLabel};
///
/// assert_eq!(
///     parse_visit_label("Crossover Cycle 2 Day 1"),
///     VisitLabel::Parsed(LabelPosition { cycle: 2, day: 1, crossover: true })
/// );
/// assert!(parse_visit_label("Screening").defect().is_some());
/// ```
pub fn parse_visit_label(label: &str) -> VisitLabel {
    let text = label.trim();
    let crossover = text.to_lowercase().contains(CROSSOVER_MARKER);
    if text.is_empty() {
        return VisitLabel::fallback(crossover, LabelDefect::Empty);
    }

    let Some(cycle_caps) = CYCLE_PATTERN.captures(text) else {
        return VisitLabel::fallback(crossover, LabelDefect::MissingCycle);
    };
    let cycle_match = cycle_caps.get(0).map_or(0, |m| m.end());
    let Some(day_caps) = DAY_PATTERN.captures(&text[cycle_match..]) else {
        let defect = if DAY_PATTERN.is_match(text) {
            LabelDefect::DayBeforeCycle
        } else {
            LabelDefect::MissingDay
        };
        return VisitLabel::fallback(crossover, defect);
    };

    let (Some(cycle), Some(day)) = (number(&cycle_caps), number(&day_caps)) else {
        return VisitLabel::fallback(crossover, LabelDefect::OutOfRange);
    };
    if cycle > MAX_LABEL_CYCLE || day > MAX_LABEL_DAY {
        return VisitLabel::fallback(crossover, LabelDefect::OutOfRange);
    }
    if cycle == 0 || day == 0 {
        return VisitLabel::fallback(crossover, LabelDefect::ZeroValue);
    }
    VisitLabel::Parsed(LabelPosition {
        cycle,
        day,
        crossover,
    })
}

fn number(caps: &regex::Captures<'_>) -> Option<u32> {
    caps.get(1)?.as_str().parse().ok()
}
