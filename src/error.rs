use std::convert::Infallible;

use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq)]
pub enum SM2Error {
    #[snafu(display("quality must be an integer between 0 and 5, got {value}"))]
    InvalidQuality { value: String },
    #[snafu(display("invalid memory state: {reason}"))]
    InvalidState { reason: &'static str },
    #[snafu(display("next review date is out of range"))]
    DateOutOfRange,
    InvalidDeckSize,
    InvalidLearnSpan,
    InvalidProbabilities,
}

impl From<Infallible> for SM2Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T, E = SM2Error> = std::result::Result<T, E>;
