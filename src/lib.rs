mod due;
mod error;
mod mastery;
mod quality;
mod revlog;
mod scheduler;
mod simulation;
#[cfg(test)]
mod test_helpers;

pub use due::DueQueue;
pub use error::{Result, SM2Error};
pub use mastery::{MasteryLevel, classify_mastery};
pub use quality::{Quality, describe_quality, quality_color};
pub use revlog::{ReviewLogEntry, replay, review_card};
pub use scheduler::{
    INITIAL_EASINESS_FACTOR, MIN_EASINESS_FACTOR, MemoryState, NextStates, ScheduledReview,
    next_easiness_factor, next_interval, next_state, next_states, schedule_next_review,
};
pub use simulation::{Card, SimulationResult, SimulatorConfig, simulate, simulate_many};
