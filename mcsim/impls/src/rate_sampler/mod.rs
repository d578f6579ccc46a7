use mcsim_core::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};
use mcsim_core_bond::NonNegativeF64;

mod vector;


pub use vector::RateVector;

/// Checks that `rates` is a non-empty vector of non-negative finite rates
/// and returns their sum.
///
/// # Errors
///
/// Returns `SamplingError::EmptyRates` if `rates` is empty,
/// `SamplingError::NonFiniteRate` or `SamplingError::NegativeRate` for the
/// first invalid entry.
pub fn validate_rates(rates: &[f64]) -> Result<NonNegativeF64, SamplingError> {
    if rates.is_empty() {
        return Err(SamplingError::EmptyRates);
    }

    let mut total = NonNegativeF64::zero();

    for (index, rate) in rates.iter().copied().enumerate() {
        if !rate.is_finite() {
            return Err(SamplingError::NonFiniteRate { index, rate });
        }

        total += NonNegativeF64::new(rate)
            .map_err(|_| SamplingError::NegativeRate { index, rate })?;
    }

    Ok(total)
}

/// Draws an index with probability proportional to its rate.
///
/// The uniform `u` is drawn from `(0, total]` and the index `i` with
/// `cumsum[i-1] < u <= cumsum[i]` is selected. The scan starts from
/// whichever end of `rates` is closer to `u`, so zero-rate entries are
/// never returned.
///
/// # Errors
///
/// Returns a `SamplingError` if `rates` is invalid or does not contain
/// any positive rate.
#[debug_ensures(ret.as_ref().map_or(true, |i| rates[*i] > 0.0), "selected rate is positive")]
pub fn next_event<M: MathsCore, G: RngCore<M>>(
    rates: &[f64],
    rng: &mut G,
) -> Result<usize, SamplingError> {
    let total = validate_rates(rates)?.get();

    if total <= 0.0 {
        return Err(SamplingError::NoPositiveRate);
    }

    let u = rng.sample_uniform_open_closed().get() * total;

    if u <= total * 0.5 {
        let mut acc = 0.0_f64;

        for (i, rate) in rates.iter().enumerate() {
            acc += rate;

            if u <= acc {
                return Ok(i);
            }
        }

        // Rounding can leave the forward sum just below u
        rates
            .iter()
            .rposition(|rate| *rate > 0.0)
            .ok_or(SamplingError::NoPositiveRate)
    } else {
        // cumsum[j-1] < u  <=>  sum(rates[j..]) > total - u
        let threshold = total - u;
        let mut acc = 0.0_f64;

        for (j, rate) in rates.iter().enumerate().rev() {
            acc += rate;

            if acc > threshold {
                return Ok(j);
            }
        }

        rates
            .iter()
            .position(|rate| *rate > 0.0)
            .ok_or(SamplingError::NoPositiveRate)
    }
}
