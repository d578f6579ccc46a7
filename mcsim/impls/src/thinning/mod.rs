//! Inter-event times of homogeneous and time-inhomogeneous Poisson
//! processes, sampled by thinning (Ogata 1981, Algorithms 2 and 3).

use mcsim_core::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};
use mcsim_core_bond::{NonNegativeF64, PositiveF64};

use serde::{Deserialize, Serialize};

use crate::rate_sampler::{next_event, validate_rates};

#[cfg(test)]
mod tests;

/// Number of consecutive zero-rate candidates after which a thinning loop
/// without a time limit treats the process as unable to fire again.
pub const MAX_ZERO_RATE_CANDIDATES: u32 = 1 << 20;

/// Draws the waiting time of a homogeneous Poisson process with `rate`.
///
/// # Errors
///
/// Returns `SamplingError::NonPositiveRate` if `rate` is not positive and
/// finite.
pub fn next_time<M: MathsCore, G: RngCore<M>>(
    rate: f64,
    rng: &mut G,
) -> Result<NonNegativeF64, SamplingError> {
    match PositiveF64::new(rate) {
        Ok(lambda) if rate.is_finite() => Ok(rng.sample_exponential(lambda)),
        _ => Err(SamplingError::NonPositiveRate(rate)),
    }
}

/// Result of a thinning loop that is bounded by a time limit.
#[derive(Clone, Debug, PartialEq)]
pub enum Thinned<T> {
    Accepted { delta_t: NonNegativeF64, value: T },
    BeyondLimit,
    /// The rate has dropped to zero and is not expected to rise again
    Exhausted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
#[allow(clippy::module_name_repetitions)]
pub struct PoissonThinner {
    /// Verify that every evaluated rate respects the asserted bound
    pub check_bound: bool,
}

impl Default for PoissonThinner {
    fn default() -> Self {
        Self { check_bound: true }
    }
}

impl PoissonThinner {
    #[must_use]
    pub fn new(check_bound: bool) -> Self {
        Self { check_bound }
    }

    /// Draws the next event time of the process with intensity
    /// `rate_fn(t)`, where `t` is the time elapsed since now, using the
    /// constant majorant `max_rate`.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::InvalidRateBound` if `max_rate` is not
    /// positive and finite, `SamplingError::RateBoundExceeded` if
    /// `check_bound` is set and `rate_fn(t) > max_rate`, and
    /// `SamplingError::NoPositiveRate` if [`MAX_ZERO_RATE_CANDIDATES`]
    /// candidates in a row see a zero rate.
    pub fn next_time<M: MathsCore, G: RngCore<M>, F: FnMut(f64) -> f64>(
        &self,
        rate_fn: F,
        max_rate: f64,
        rng: &mut G,
    ) -> Result<NonNegativeF64, SamplingError> {
        match self.next_time_until(rate_fn, max_rate, NonNegativeF64::infinity(), rng)? {
            Some(delta_t) => Ok(delta_t),
            None => Err(SamplingError::NoPositiveRate),
        }
    }

    /// Like [`Self::next_time`], but gives up with `None` as soon as the
    /// candidate time passes `limit`.
    ///
    /// # Errors
    ///
    /// See [`Self::next_time`].
    pub fn next_time_until<M: MathsCore, G: RngCore<M>, F: FnMut(f64) -> f64>(
        &self,
        mut rate_fn: F,
        max_rate: f64,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Option<NonNegativeF64>, SamplingError> {
        let thinned = self.thin_bounded(
            |t| Ok((checked_rate(rate_fn(t))?, ())),
            max_rate,
            limit,
            rng,
        )?;

        Ok(match thinned {
            Thinned::Accepted { delta_t, .. } => Some(delta_t),
            Thinned::BeyondLimit | Thinned::Exhausted => None,
        })
    }

    /// Draws the next event time of a process with non-increasing
    /// intensity `rate_fn(t)`, using the current rate as the majorant for
    /// all later times. Returns `None` once the rate has reached zero.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::IncreasingRate` if `check_bound` is set and
    /// `rate_fn` increases between two evaluations.
    pub fn next_time_decreasing<M: MathsCore, G: RngCore<M>, F: FnMut(f64) -> f64>(
        &self,
        rate_fn: F,
        rng: &mut G,
    ) -> Result<Option<NonNegativeF64>, SamplingError> {
        Ok(
            match self.next_time_decreasing_until(rate_fn, NonNegativeF64::infinity(), rng)? {
                Thinned::Accepted { delta_t, .. } => Some(delta_t),
                Thinned::BeyondLimit | Thinned::Exhausted => None,
            },
        )
    }

    /// Like [`Self::next_time_decreasing`], but stops once the candidate
    /// time passes `limit`.
    ///
    /// # Errors
    ///
    /// See [`Self::next_time_decreasing`].
    pub fn next_time_decreasing_until<M: MathsCore, G: RngCore<M>, F: FnMut(f64) -> f64>(
        &self,
        mut rate_fn: F,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Thinned<()>, SamplingError> {
        self.thin_decreasing(|t| Ok((checked_rate(rate_fn(t))?, ())), limit, rng)
    }

    /// Draws the next event time of several competing processes with
    /// intensities `rates_fn(t)` and the index of the one that fired.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if `max_rate` is invalid, if a rate vector
    /// is invalid, or if `check_bound` is set and the total rate exceeds
    /// `max_rate`. Returns `SamplingError::NoPositiveRate` if
    /// [`MAX_ZERO_RATE_CANDIDATES`] candidates in a row see a zero total.
    pub fn next<M: MathsCore, G: RngCore<M>, R: AsRef<[f64]>, F: FnMut(f64) -> R>(
        &self,
        rates_fn: F,
        max_rate: f64,
        rng: &mut G,
    ) -> Result<(NonNegativeF64, usize), SamplingError> {
        match self.next_bounded_until(rates_fn, max_rate, NonNegativeF64::infinity(), rng)? {
            Thinned::Accepted { delta_t, value } => Ok((delta_t, value)),
            Thinned::BeyondLimit | Thinned::Exhausted => Err(SamplingError::NoPositiveRate),
        }
    }

    /// Like [`Self::next`], but gives up with `None` as soon as the
    /// candidate time passes `limit`.
    ///
    /// # Errors
    ///
    /// See [`Self::next`].
    pub fn next_until<M: MathsCore, G: RngCore<M>, R: AsRef<[f64]>, F: FnMut(f64) -> R>(
        &self,
        rates_fn: F,
        max_rate: f64,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Option<(NonNegativeF64, usize)>, SamplingError> {
        Ok(
            match self.next_bounded_until::<M, G, R, F>(rates_fn, max_rate, limit, rng)? {
                Thinned::Accepted { delta_t, value } => Some((delta_t, value)),
                Thinned::BeyondLimit | Thinned::Exhausted => None,
            },
        )
    }

    /// Like [`Self::next_until`], but distinguishes a candidate passing
    /// `limit` from a total rate that stayed zero for
    /// [`MAX_ZERO_RATE_CANDIDATES`] candidates without a limit.
    ///
    /// # Errors
    ///
    /// See [`Self::next`].
    pub fn next_bounded_until<
        M: MathsCore,
        G: RngCore<M>,
        R: AsRef<[f64]>,
        F: FnMut(f64) -> R,
    >(
        &self,
        mut rates_fn: F,
        max_rate: f64,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Thinned<usize>, SamplingError> {
        let thinned = self.thin_bounded(
            |t| {
                let rates = rates_fn(t);
                let total = validate_rates(rates.as_ref())?;

                Ok((total.get(), rates))
            },
            max_rate,
            limit,
            rng,
        )?;

        Ok(match thinned {
            Thinned::Accepted { delta_t, value } => Thinned::Accepted {
                delta_t,
                value: next_event(value.as_ref(), rng)?,
            },
            Thinned::BeyondLimit => Thinned::BeyondLimit,
            Thinned::Exhausted => Thinned::Exhausted,
        })
    }

    /// Draws the next event time of several competing processes whose
    /// total intensity is non-increasing, together with the index of the
    /// process that fired.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if a rate vector is invalid, or if
    /// `check_bound` is set and the total rate increases.
    pub fn next_decreasing_until<
        M: MathsCore,
        G: RngCore<M>,
        R: AsRef<[f64]>,
        F: FnMut(f64) -> R,
    >(
        &self,
        mut rates_fn: F,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Thinned<usize>, SamplingError> {
        let thinned = self.thin_decreasing(
            |t| {
                let rates = rates_fn(t);
                let total = validate_rates(rates.as_ref())?;

                Ok((total.get(), rates))
            },
            limit,
            rng,
        )?;

        Ok(match thinned {
            Thinned::Accepted { delta_t, value } => Thinned::Accepted {
                delta_t,
                value: next_event(value.as_ref(), rng)?,
            },
            Thinned::BeyondLimit => Thinned::BeyondLimit,
            Thinned::Exhausted => Thinned::Exhausted,
        })
    }

    /// Selects which of the competing processes fired at the accepted
    /// time `t`.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if `rates_fn(t)` is invalid or all zero.
    pub fn next_index<M: MathsCore, G: RngCore<M>, R: AsRef<[f64]>, F: FnOnce(f64) -> R>(
        &self,
        rates_fn: F,
        t: f64,
        rng: &mut G,
    ) -> Result<usize, SamplingError> {
        next_event(rates_fn(t).as_ref(), rng)
    }

    fn thin_bounded<M: MathsCore, G: RngCore<M>, T>(
        &self,
        mut rate_at: impl FnMut(f64) -> Result<(f64, T), SamplingError>,
        max_rate: f64,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Thinned<T>, SamplingError> {
        let bound = match PositiveF64::new(max_rate) {
            Ok(bound) if max_rate.is_finite() => bound,
            _ => return Err(SamplingError::InvalidRateBound(max_rate)),
        };

        let mut t = NonNegativeF64::zero();
        let mut zero_rate_candidates = 0_u32;

        loop {
            t += rng.sample_exponential(bound);

            if t > limit {
                return Ok(Thinned::BeyondLimit);
            }

            let (rate, value) = rate_at(t.get())?;

            if self.check_bound && rate > max_rate {
                return Err(SamplingError::RateBoundExceeded {
                    time: t.get(),
                    rate,
                    bound: max_rate,
                });
            }

            if rate > 0.0 {
                zero_rate_candidates = 0;
            } else if limit == NonNegativeF64::infinity() {
                // Without a limit, only a zero-rate streak can end the loop
                zero_rate_candidates += 1;

                if zero_rate_candidates >= MAX_ZERO_RATE_CANDIDATES {
                    return Ok(Thinned::Exhausted);
                }
            }

            if rng.sample_uniform_open_closed().get() <= rate / max_rate {
                return Ok(Thinned::Accepted { delta_t: t, value });
            }
        }
    }

    fn thin_decreasing<M: MathsCore, G: RngCore<M>, T>(
        &self,
        mut rate_at: impl FnMut(f64) -> Result<(f64, T), SamplingError>,
        limit: NonNegativeF64,
        rng: &mut G,
    ) -> Result<Thinned<T>, SamplingError> {
        let mut t = NonNegativeF64::zero();
        let (mut bound, _) = rate_at(t.get())?;

        loop {
            // A non-increasing rate that reached zero stays zero
            let Ok(lambda) = PositiveF64::new(bound) else {
                return Ok(Thinned::Exhausted);
            };

            t += rng.sample_exponential(lambda);

            if t > limit {
                return Ok(Thinned::BeyondLimit);
            }

            let (rate, value) = rate_at(t.get())?;

            if self.check_bound && rate > bound {
                return Err(SamplingError::IncreasingRate {
                    time: t.get(),
                    rate,
                    previous: bound,
                });
            }

            if rng.sample_uniform_open_closed().get() <= rate / bound {
                return Ok(Thinned::Accepted { delta_t: t, value });
            }

            bound = rate;
        }
    }
}

fn checked_rate(rate: f64) -> Result<f64, SamplingError> {
    if !rate.is_finite() {
        return Err(SamplingError::NonFiniteRate { index: 0, rate });
    }

    if rate < 0.0 {
        return Err(SamplingError::NegativeRate { index: 0, rate });
    }

    Ok(rate)
}
