use mcsim_core::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};
use mcsim_core_bond::NonNegativeF64;
use mcsim_core_maths::binary_search;

use super::validate_rates;

/// Number of incremental patches after which the prefix sums are rebuilt
/// from scratch.
const RECOMPUTE_INTERVAL: usize = 1024;

/// Relative difference between the patched and the recomputed total that
/// is reported as drift.
const DRIFT_TOLERANCE: f64 = 1e-9;

/// A rate vector with cached cumulative rates that are patched in place
/// whenever a single rate changes.
#[derive(Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RateVector {
    rates: Vec<f64>,
    cumulative: Vec<f64>,
    patches: usize,
}

impl RateVector {
    /// # Errors
    ///
    /// Returns a `SamplingError` if `rates` is empty or contains a negative
    /// or non-finite rate.
    pub fn new(rates: Vec<f64>) -> Result<Self, SamplingError> {
        validate_rates(&rates)?;

        let mut vector = Self {
            cumulative: vec![0.0_f64; rates.len()],
            rates,
            patches: 0,
        };

        vector.rebuild();

        Ok(vector)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.rates.get(index).copied()
    }

    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    #[must_use]
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    #[must_use]
    pub fn total(&self) -> NonNegativeF64 {
        match self.cumulative.last() {
            // Safety: the cumulative rates are clamped to be non-negative
            Some(total) => unsafe { NonNegativeF64::new_unchecked(*total) },
            None => NonNegativeF64::zero(),
        }
    }

    /// Sets the rate at `index` and patches the cumulative rates from
    /// `index` onwards.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::IndexOutOfBounds` if `index` is out of bounds,
    /// `SamplingError::NegativeRate` or `SamplingError::NonFiniteRate` if
    /// `rate` is invalid.
    #[debug_ensures(
        self.cumulative.windows(2).all(|w| w[0] <= w[1]),
        "cumulative rates stay sorted"
    )]
    pub fn set(&mut self, index: usize, rate: f64) -> Result<(), SamplingError> {
        let Some(old_rate) = self.rates.get(index).copied() else {
            return Err(SamplingError::IndexOutOfBounds {
                index,
                len: self.rates.len(),
            });
        };

        if !rate.is_finite() {
            return Err(SamplingError::NonFiniteRate { index, rate });
        }

        if rate < 0.0 {
            return Err(SamplingError::NegativeRate { index, rate });
        }

        #[allow(clippy::float_cmp)]
        if rate == old_rate {
            return Ok(());
        }

        self.rates[index] = rate;

        let delta = rate - old_rate;
        let mut previous = if index > 0 {
            self.cumulative[index - 1]
        } else {
            0.0_f64
        };

        for (rate, cumulative) in self.rates[index..]
            .iter()
            .zip(self.cumulative[index..].iter_mut())
        {
            // Zero rates repeat their predecessor exactly so that they can
            // never be selected
            *cumulative = if *rate > 0.0 {
                (*cumulative + delta).max(previous)
            } else {
                previous
            };

            previous = *cumulative;
        }

        self.patches += 1;

        if self.patches >= RECOMPUTE_INTERVAL {
            self.recompute();
        }

        Ok(())
    }

    /// Rebuilds the cumulative rates from scratch and reports any drift of
    /// the incrementally patched total.
    pub fn recompute(&mut self) {
        let patched = self.total().get();

        self.rebuild();

        let exact = self.total().get();

        if (patched - exact).abs() > DRIFT_TOLERANCE * exact.max(1.0) {
            warn!(
                "The incrementally maintained total rate {patched} drifted from the recomputed \
                 total {exact}."
            );
        }
    }

    /// Draws an index with probability proportional to its rate using a
    /// lower-bound search over the cumulative rates.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::NoPositiveRate` if all rates are zero.
    #[debug_ensures(ret.as_ref().map_or(true, |i| self.rates[*i] > 0.0), "selected rate is positive")]
    pub fn sample<M: MathsCore, G: RngCore<M>>(&self, rng: &mut G) -> Result<usize, SamplingError> {
        let total = self.total().get();

        if total <= 0.0 {
            return Err(SamplingError::NoPositiveRate);
        }

        let u = rng.sample_uniform_open_closed().get() * total;

        Ok(binary_search(&self.cumulative, u)?)
    }

    fn rebuild(&mut self) {
        let mut acc = 0.0_f64;

        for (rate, cumulative) in self.rates.iter().zip(self.cumulative.iter_mut()) {
            acc += rate;
            *cumulative = acc;
        }

        self.patches = 0;
    }
}
