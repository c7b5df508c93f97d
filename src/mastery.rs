use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

const LEARNING_REPETITIONS: u32 = 3;
const MASTERED_EASINESS_FACTOR: f64 = 2.5;

/// Display label summarising how far along a card is. Has no effect on
/// scheduling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MasteryLevel {
    New,
    Learning,
    Reviewing,
    Mastered,
}

pub fn classify_mastery(easiness_factor: f64, repetition_count: u32) -> MasteryLevel {
    if repetition_count == 0 {
        MasteryLevel::New
    } else if repetition_count < LEARNING_REPETITIONS {
        MasteryLevel::Learning
    } else if easiness_factor >= MASTERED_EASINESS_FACTOR {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Reviewing
    }
}
