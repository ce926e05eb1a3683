// ── Comfort feedback ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// One of the seven comfort levels a user can report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedbackValue {
    TooHot,
    TooWarm,
    BitWarm,
    #[default]
    Comfortable,
    BitCold,
    TooCold,
    Freezing,
}

impl FeedbackValue {
    /// Parse a feedback name; unrecognised names mean `Comfortable`.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Score sent to the service, `3` (too hot) down to `-3` (freezing).
    pub fn score(self) -> i8 {
        match self {
            Self::TooHot => 3,
            Self::TooWarm => 2,
            Self::BitWarm => 1,
            Self::Comfortable => 0,
            Self::BitCold => -1,
            Self::TooCold => -2,
            Self::Freezing => -3,
        }
    }

    /// Switch label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::TooHot => "Too Hot",
            Self::TooWarm => "Too Warm",
            Self::BitWarm => "Bit Warm",
            Self::Comfortable => "Comfortable",
            Self::BitCold => "Bit Cold",
            Self::TooCold => "Too Cold",
            Self::Freezing => "Freezing",
        }
    }

    /// All seven values, hottest first.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_cover_the_full_scale() {
        let scores: Vec<i8> = FeedbackValue::all().map(FeedbackValue::score).collect();
        assert_eq!(scores, vec![3, 2, 1, 0, -1, -2, -3]);
    }

    #[test]
    fn names_round_through_snake_case() {
        assert_eq!(FeedbackValue::from_name("too_hot"), FeedbackValue::TooHot);
        assert_eq!(FeedbackValue::from_name("bit_cold"), FeedbackValue::BitCold);
        assert_eq!(FeedbackValue::Freezing.to_string(), "freezing");
    }

    #[test]
    fn unknown_name_is_comfortable() {
        assert_eq!(FeedbackValue::from_name("lukewarm"), FeedbackValue::Comfortable);
        assert_eq!(FeedbackValue::from_name("").score(), 0);
    }
}
