use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::{Result, SM2Error};
use crate::mastery::{MasteryLevel, classify_mastery};
use crate::quality::Quality;

pub const MIN_EASINESS_FACTOR: f64 = 1.3;
pub const INITIAL_EASINESS_FACTOR: f64 = 2.5;
const FIRST_INTERVAL: u32 = 1;
const SECOND_INTERVAL: u32 = 6;

trait Round {
    fn to_2_decimal(self) -> f64;
}

impl Round for f64 {
    fn to_2_decimal(self) -> f64 {
        (self * 100.0).round() / 100.0
    }
}

/// The SM-2 memory of a single card. A fresh card starts with
/// `easiness_factor = 2.5`, no repetitions and a zero interval, so it is due
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub easiness_factor: f64,
    /// Consecutive successful recalls since the last lapse.
    pub repetition_count: u32,
    pub interval_days: u32,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            easiness_factor: INITIAL_EASINESS_FACTOR,
            repetition_count: 0,
            interval_days: 0,
        }
    }
}

impl MemoryState {
    pub fn new_card() -> Self {
        Self::default()
    }

    /// Builds a state from signed storage columns.
    pub fn from_raw(
        easiness_factor: f64,
        repetition_count: i64,
        interval_days: i64,
    ) -> Result<Self> {
        let repetition_count =
            u32::try_from(repetition_count).map_err(|_| SM2Error::InvalidState {
                reason: "repetition count must be a non-negative 32-bit integer",
            })?;
        let interval_days = u32::try_from(interval_days).map_err(|_| SM2Error::InvalidState {
            reason: "interval must be a non-negative 32-bit integer",
        })?;
        let state = Self {
            easiness_factor,
            repetition_count,
            interval_days,
        };
        state.validate()?;
        Ok(state)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.easiness_factor.is_finite() {
            return Err(SM2Error::InvalidState {
                reason: "easiness factor must be finite",
            });
        }
        Ok(())
    }

    pub fn mastery(&self) -> MasteryLevel {
        classify_mastery(self.easiness_factor, self.repetition_count)
    }
}

/// A new memory state together with the moment the card becomes due again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReview {
    pub state: MemoryState,
    pub next_review_at: DateTime<Utc>,
}

/// Every possible outcome of reviewing a card now, indexed by quality.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    outcomes: [ScheduledReview; 6],
}

impl NextStates {
    pub fn get(&self, quality: Quality) -> &ScheduledReview {
        &self.outcomes[quality.value() as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quality, &ScheduledReview)> {
        Quality::iter().zip(self.outcomes.iter())
    }
}

/// SM-2 easiness update, floored at 1.3 and rounded to two decimals. An input
/// below the floor is raised to it first.
pub fn next_easiness_factor(easiness_factor: f64, quality: Quality) -> f64 {
    let easiness_factor = easiness_factor.max(MIN_EASINESS_FACTOR);
    let q = f64::from(5 - quality.value());
    let easiness_factor = easiness_factor + (0.1 - q * (0.08 + q * 0.02));
    easiness_factor.max(MIN_EASINESS_FACTOR).to_2_decimal()
}

/// Interval for the review that brings the card to `repetition_count + 1`
/// successes. Lapses always restart at one day.
pub fn next_interval(
    easiness_factor: f64,
    repetition_count: u32,
    interval_days: u32,
    quality: Quality,
) -> u32 {
    if quality.is_lapse() {
        return FIRST_INTERVAL;
    }
    match repetition_count {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        // `as` saturates, so absurdly long intervals cap at u32::MAX.
        _ => ((interval_days as f64 * easiness_factor.max(MIN_EASINESS_FACTOR)).round() as u32)
            .max(FIRST_INTERVAL),
    }
}

/// Computes the memory state that follows a review of the given quality.
pub fn next_state(state: &MemoryState, quality: Quality) -> Result<MemoryState> {
    state.validate()?;
    if state.easiness_factor < MIN_EASINESS_FACTOR {
        warn!(
            "easiness factor {} is below the {} floor, clamping",
            state.easiness_factor, MIN_EASINESS_FACTOR
        );
    }

    let interval_days = next_interval(
        state.easiness_factor,
        state.repetition_count,
        state.interval_days,
        quality,
    );
    let repetition_count = if quality.is_lapse() {
        0
    } else {
        state.repetition_count.saturating_add(1)
    };

    Ok(MemoryState {
        easiness_factor: next_easiness_factor(state.easiness_factor, quality),
        repetition_count,
        interval_days,
    })
}

pub(crate) fn due_after(now: DateTime<Utc>, interval_days: u32) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(interval_days))
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or(SM2Error::DateOutOfRange)
}

/// Records a review performed at `now`. `quality` may be a [`Quality`] or a
/// raw integer, which is validated before anything else happens.
pub fn schedule_next_review<Q>(
    quality: Q,
    state: &MemoryState,
    now: DateTime<Utc>,
) -> Result<ScheduledReview>
where
    Q: TryInto<Quality>,
    SM2Error: From<Q::Error>,
{
    schedule(quality.try_into()?, state, now)
}

pub(crate) fn schedule(
    quality: Quality,
    state: &MemoryState,
    now: DateTime<Utc>,
) -> Result<ScheduledReview> {
    let next = next_state(state, quality)?;
    let next_review_at = due_after(now, next.interval_days)?;
    debug!(
        "quality {} moved card from {:?} to {:?}, due {}",
        quality.value(),
        state,
        next,
        next_review_at
    );
    Ok(ScheduledReview {
        state: next,
        next_review_at,
    })
}

/// Previews all six outcomes of reviewing a card at `now`.
pub fn next_states(state: &MemoryState, now: DateTime<Utc>) -> Result<NextStates> {
    let mut outcomes = [ScheduledReview {
        state: *state,
        next_review_at: now,
    }; 6];
    for (slot, quality) in outcomes.iter_mut().zip(Quality::iter()) {
        *slot = schedule(quality, state, now)?;
    }
    Ok(NextStates { outcomes })
}
