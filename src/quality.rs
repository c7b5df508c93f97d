use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr};

use crate::error::{Result, SM2Error};

/// Self-assessed recall quality for a single review, on the SM-2 scale.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "snake_case")]
pub enum Quality {
    /// Total failure to recall.
    Blackout = 0,
    Incorrect = 1,
    /// Incorrect, but the answer felt familiar once shown.
    Familiar = 2,
    /// Correct, with serious difficulty.
    Difficult = 3,
    Hesitant = 4,
    /// Perfect, effortless recall.
    Perfect = 5,
}

impl Quality {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Anything below 3 resets the card's learning progress.
    pub fn is_lapse(self) -> bool {
        self < Quality::Difficult
    }
}

fn invalid(value: impl ToString) -> SM2Error {
    SM2Error::InvalidQuality {
        value: value.to_string(),
    }
}

impl TryFrom<u8> for Quality {
    type Error = SM2Error;

    fn try_from(value: u8) -> Result<Self> {
        Quality::from_repr(value).ok_or_else(|| invalid(value))
    }
}

impl TryFrom<i32> for Quality {
    type Error = SM2Error;

    fn try_from(value: i32) -> Result<Self> {
        Quality::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for Quality {
    type Error = SM2Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(Quality::from_repr)
            .ok_or_else(|| invalid(value))
    }
}

impl TryFrom<f64> for Quality {
    type Error = SM2Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 || !(0.0..=5.0).contains(&value) {
            return Err(invalid(value));
        }
        Quality::try_from(value as u8)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.value()
    }
}

pub fn describe_quality(quality: Quality) -> &'static str {
    match quality {
        Quality::Blackout => "Complete blackout",
        Quality::Incorrect => "Incorrect",
        Quality::Familiar => "Incorrect, but familiar",
        Quality::Difficult => "Correct with difficulty",
        Quality::Hesitant => "Correct after hesitation",
        Quality::Perfect => "Perfect recall",
    }
}

pub fn quality_color(quality: Quality) -> &'static str {
    match quality {
        Quality::Blackout => "bg-red-500",
        Quality::Incorrect => "bg-orange-500",
        Quality::Familiar => "bg-yellow-500",
        Quality::Difficult => "bg-blue-500",
        Quality::Hesitant => "bg-green-500",
        Quality::Perfect => "bg-emerald-500",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use strum::IntoEnumIterator;

    #[test]
    fn accepts_the_six_ratings() {
        let values = (0u8..=5)
            .map(|v| Quality::try_from(v).unwrap().value())
            .collect_vec();
        assert_eq!(values, [0, 1, 2, 3, 4, 5]);
        assert_eq!(Quality::COUNT, 6);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Quality::try_from(6u8),
            Err(SM2Error::InvalidQuality {
                value: "6".to_string()
            })
        );
        assert!(Quality::try_from(-1i64).is_err());
        assert!(Quality::try_from(256i64).is_err());
        assert!(Quality::try_from(i32::MIN).is_err());
    }

    #[test]
    fn rejects_fractional_and_non_finite() {
        assert!(Quality::try_from(2.5f64).is_err());
        assert!(Quality::try_from(f64::NAN).is_err());
        assert!(Quality::try_from(f64::INFINITY).is_err());
        assert!(Quality::try_from(5.000001f64).is_err());
        assert_eq!(Quality::try_from(4.0f64), Ok(Quality::Hesitant));
        assert_eq!(Quality::try_from(-0.0f64), Ok(Quality::Blackout));
    }

    #[test]
    fn lapse_boundary() {
        let lapses = Quality::iter().filter(|q| q.is_lapse()).collect_vec();
        assert_eq!(
            lapses,
            [Quality::Blackout, Quality::Incorrect, Quality::Familiar]
        );
    }

    #[test]
    fn labels_and_colors_are_total_and_distinct() {
        let labels = Quality::iter().map(describe_quality).collect_vec();
        let colors = Quality::iter().map(quality_color).collect_vec();
        assert_eq!(labels.iter().unique().count(), 6);
        assert_eq!(colors.iter().unique().count(), 6);
        assert_eq!(describe_quality(Quality::Perfect), "Perfect recall");
        assert_eq!(quality_color(Quality::Blackout), "bg-red-500");
    }

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(Quality::Familiar.to_string(), "familiar");
        assert_eq!("perfect".parse::<Quality>().unwrap(), Quality::Perfect);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Quality::Hesitant).unwrap(), "4");
        assert_eq!(
            serde_json::from_str::<Quality>("3").unwrap(),
            Quality::Difficult
        );
        assert!(serde_json::from_str::<Quality>("9").is_err());
    }
}
