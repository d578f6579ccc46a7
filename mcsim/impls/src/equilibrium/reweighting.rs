//! Single-histogram reweighting of canonical samples to a different
//! inverse temperature.

use mcsim_core::{cogs::MathsCore, error::SamplingError};
use mcsim_core_maths::log_sum_all;

/// Estimates `ln(Z(beta_new) / Z(beta))` from energies sampled at `beta`.
///
/// # Errors
///
/// Returns `SamplingError::EmptySamples` if `energies` is empty.
pub fn log_partition_ratio<M: MathsCore>(
    energies: &[f64],
    beta: f64,
    beta_new: f64,
) -> Result<f64, SamplingError> {
    if energies.is_empty() {
        return Err(SamplingError::EmptySamples);
    }

    let delta_beta = beta_new - beta;

    #[allow(clippy::cast_precision_loss)]
    let ln_n = M::ln(energies.len() as f64);

    Ok(log_sum_all::<M, _>(energies.iter().map(|energy| -delta_beta * energy)) - ln_n)
}

/// Estimates the expectation of `observables` at `beta_new` from the
/// observables and energies sampled at `beta`.
///
/// # Errors
///
/// Returns `SamplingError::EmptySamples` if there are no samples and
/// `SamplingError::LengthMismatch` if `observables` and `energies` differ in
/// length.
pub fn reweight_expectation<M: MathsCore>(
    observables: &[f64],
    energies: &[f64],
    beta: f64,
    beta_new: f64,
) -> Result<f64, SamplingError> {
    if observables.len() != energies.len() {
        return Err(SamplingError::LengthMismatch {
            expected: energies.len(),
            found: observables.len(),
        });
    }

    if energies.is_empty() {
        return Err(SamplingError::EmptySamples);
    }

    let delta_beta = beta_new - beta;

    let log_norm = log_sum_all::<M, _>(energies.iter().map(|energy| -delta_beta * energy));

    Ok(observables
        .iter()
        .zip(energies)
        .map(|(observable, energy)| observable * M::exp(-delta_beta * energy - log_norm))
        .sum())
}
