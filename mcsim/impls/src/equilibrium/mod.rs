//! Importance sampling of equilibrium ensembles with Metropolis-type
//! acceptance rules.

use mcsim_core::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};

use serde::{Deserialize, Serialize};

use crate::rate_sampler::RateVector;

pub mod reweighting;


/// Metropolis test for the move from `old` to `new` in an ensemble with
/// weights `exp(log_weight(args))`.
#[must_use]
pub fn accept<M: MathsCore, G: RngCore<M>, A: ?Sized, F: FnMut(&A) -> f64>(
    mut log_weight: F,
    new: &A,
    old: &A,
    rng: &mut G,
) -> bool {
    let log_ratio = log_weight(new) - log_weight(old);

    accept_log_ratio(log_ratio, rng)
}

/// Accepts unconditionally if `log_ratio >= 0` and otherwise with
/// probability `exp(log_ratio)`. A NaN ratio is always rejected.
#[must_use]
pub fn accept_log_ratio<M: MathsCore, G: RngCore<M>>(log_ratio: f64, rng: &mut G) -> bool {
    if log_ratio.is_nan() {
        return false;
    }

    if log_ratio >= 0.0 {
        return true;
    }

    // Comparing in log space cannot overflow: U < exp(x) <=> ln(U) < x
    M::ln(rng.sample_uniform_open_closed().get()) < log_ratio
}

/// Metropolis acceptance in the canonical ensemble at inverse temperature
/// `beta`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metropolis {
    pub beta: f64,
}

impl Metropolis {
    #[must_use]
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Tests a move that changes the energy by `delta_energy`.
    #[must_use]
    pub fn accept<M: MathsCore, G: RngCore<M>>(&self, delta_energy: f64, rng: &mut G) -> bool {
        accept_log_ratio(-self.beta * delta_energy, rng)
    }
}

/// Metropolis-Hastings acceptance in the canonical ensemble at inverse
/// temperature `beta`, correcting for asymmetric proposals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetropolisHastings {
    pub beta: f64,
}

impl MetropolisHastings {
    #[must_use]
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Tests a move that changes the energy by `delta_energy`, where
    /// `q_old` is the density of proposing the reverse move back to the old
    /// state and `q_new` the density of proposing the move to the new state.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::InvalidProposalDensity` if either density is
    /// not positive and finite.
    pub fn accept<M: MathsCore, G: RngCore<M>>(
        &self,
        delta_energy: f64,
        q_old: f64,
        q_new: f64,
        rng: &mut G,
    ) -> Result<bool, SamplingError> {
        for q in [q_old, q_new] {
            if !(q > 0.0 && q.is_finite()) {
                return Err(SamplingError::InvalidProposalDensity(q));
            }
        }

        Ok(accept_log_ratio(
            -self.beta * delta_energy + M::ln(q_old) - M::ln(q_new),
            rng,
        ))
    }
}

/// Performs `number_updates` updates, each picked from `updates` with
/// probability proportional to its weight. Every update performs its own
/// acceptance test. Returns the number of performed updates.
///
/// # Errors
///
/// Returns `SamplingError::LengthMismatch` if `updates` and `weights`
/// differ in length, or a `SamplingError` if `weights` is invalid or all
/// zero.
#[debug_ensures(ret.as_ref().map_or(true, |n| *n == number_updates))]
pub fn sweep<M: MathsCore, G: RngCore<M>, U: FnMut(&mut G)>(
    updates: &mut [U],
    weights: &[f64],
    rng: &mut G,
    number_updates: usize,
) -> Result<usize, SamplingError> {
    if updates.len() != weights.len() {
        return Err(SamplingError::LengthMismatch {
            expected: weights.len(),
            found: updates.len(),
        });
    }

    let table = RateVector::new(weights.to_vec())?;

    for _ in 0..number_updates {
        let index = table.sample::<M, G>(rng)?;

        (updates[index])(rng);
    }

    debug!("Performed a sweep of {} updates.", number_updates);

    Ok(number_updates)
}
