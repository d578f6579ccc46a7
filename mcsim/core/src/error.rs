use thiserror::Error;

use mcsim_core_maths::SearchError;

#[derive(Debug, Error, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum SamplingError {
    #[error("The rate vector is empty.")]
    EmptyRates,
    #[error("The rate {rate} at index {index} is negative.")]
    NegativeRate { index: usize, rate: f64 },
    #[error("The rate {rate} at index {index} is not finite.")]
    NonFiniteRate { index: usize, rate: f64 },
    #[error("The rates contain no positive entry to sample from.")]
    NoPositiveRate,
    #[error("The rate {0} must be positive and finite.")]
    NonPositiveRate(f64),
    #[error("The rate bound {0} must be positive and finite.")]
    InvalidRateBound(f64),
    #[error("The rate {rate} at time {time} exceeds the asserted bound {bound}.")]
    RateBoundExceeded { time: f64, rate: f64, bound: f64 },
    #[error("The rate increased from {previous} to {rate} at time {time}.")]
    IncreasingRate { time: f64, rate: f64, previous: f64 },
    #[error("The rate {rate} lies more than 2^{max_spread} away from the other rates.")]
    RateSpreadExceeded { rate: f64, max_spread: i16 },
    #[error("Expected {expected} entries but found {found}.")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Index {index} is out of bounds for {len} entries.")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("The horizon {horizon} lies before the start time {start}.")]
    InvalidHorizon { start: f64, horizon: f64 },
    #[error("The proposal density {0} must be positive and finite.")]
    InvalidProposalDensity(f64),
    #[error("Cannot reweight an empty set of samples.")]
    EmptySamples,
    #[error(transparent)]
    Search(#[from] SearchError),
}
