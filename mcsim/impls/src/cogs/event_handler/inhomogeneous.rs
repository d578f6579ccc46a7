use core::fmt;

use mcsim_core::{
    cogs::{EventDraw, EventHandler, MathsCore, RngCore},
    error::SamplingError,
};
use mcsim_core_bond::{NonNegativeF64, PositiveF64};

use serde::{Deserialize, Serialize};

use crate::{
    rate_sampler::{next_event, validate_rates},
    thinning::{PoissonThinner, Thinned},
};

/// How the rates of an [`InhomogeneousEventHandler`] are bounded from above.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum RateBound {
    /// The total rate never exceeds the given constant
    Constant(PositiveF64),
    /// The total rate never increases over time
    NonIncreasing,
}

/// Event handler for competing processes with time-dependent rates
/// `rates_fn(t)`, evaluated at absolute simulation time `t`.
#[allow(clippy::module_name_repetitions)]
pub struct InhomogeneousEventHandler<F> {
    rates_fn: F,
    bound: RateBound,
    thinner: PoissonThinner,
    time: NonNegativeF64,
    pending: Option<NonNegativeF64>,
}

impl<F> fmt::Debug for InhomogeneousEventHandler<F> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct(stringify!(InhomogeneousEventHandler))
            .field("bound", &self.bound)
            .field("thinner", &self.thinner)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl<R: AsRef<[f64]>, F: Fn(f64) -> R> InhomogeneousEventHandler<F> {
    #[must_use]
    pub fn new(rates_fn: F, bound: RateBound) -> Self {
        Self::with_thinner(rates_fn, bound, PoissonThinner::default())
    }

    #[must_use]
    pub fn with_thinner(rates_fn: F, bound: RateBound, thinner: PoissonThinner) -> Self {
        Self {
            rates_fn,
            bound,
            thinner,
            time: NonNegativeF64::zero(),
            pending: None,
        }
    }

    /// Evaluates the rates from `time` on until the first draw, e.g. when
    /// the simulation does not start at zero.
    #[must_use]
    pub fn starting_at(mut self, time: NonNegativeF64) -> Self {
        self.time = time;
        self
    }

    /// The time of the last fired event, or of the last draw.
    #[must_use]
    pub fn time(&self) -> NonNegativeF64 {
        self.time
    }

    #[must_use]
    pub fn bound(&self) -> RateBound {
        self.bound
    }
}

impl<M: MathsCore, G: RngCore<M>, R: AsRef<[f64]>, F: Fn(f64) -> R> EventHandler<M, G>
    for InhomogeneousEventHandler<F>
{
    type Event = usize;

    fn total_rate(&self) -> NonNegativeF64 {
        match validate_rates((self.rates_fn)(self.time.get()).as_ref()) {
            Ok(total) => total,
            Err(err) => {
                warn!("Invalid rates at time {}: {}", self.time, err);

                NonNegativeF64::zero()
            },
        }
    }

    fn is_exhausted(&self) -> bool {
        // Invalid rates are left for `draw_next` to report
        matches!(
            validate_rates((self.rates_fn)(self.time.get()).as_ref()),
            Ok(total) if total <= 0.0
        )
    }

    fn sample_event(&self, rng: &mut G) -> Option<usize> {
        next_event::<M, G>((self.rates_fn)(self.time.get()).as_ref(), rng).ok()
    }

    fn notify_fired(&mut self, _event: &usize) -> Result<(), SamplingError> {
        if let Some(time) = self.pending.take() {
            self.time = time;
        }

        Ok(())
    }

    fn draw_next(
        &mut self,
        time: NonNegativeF64,
        horizon: NonNegativeF64,
        rng: &mut G,
    ) -> Result<EventDraw<usize>, SamplingError> {
        self.time = time;
        self.pending = None;

        let rates_fn = &self.rates_fn;

        if validate_rates(rates_fn(time.get()).as_ref())? <= 0.0 {
            return Ok(EventDraw::Exhausted);
        }

        let limit = horizon.saturating_sub(time);

        let rates_at = |delta_t: f64| rates_fn(time.get() + delta_t);

        let draw = match self.bound {
            RateBound::Constant(max_rate) => {
                match self
                    .thinner
                    .next_bounded_until::<M, G, R, _>(rates_at, max_rate.get(), limit, rng)?
                {
                    Thinned::Accepted { delta_t, value } => EventDraw::Event {
                        delta_t,
                        event: value,
                    },
                    Thinned::BeyondLimit => EventDraw::BeyondHorizon,
                    Thinned::Exhausted => EventDraw::Exhausted,
                }
            },
            RateBound::NonIncreasing => {
                match self
                    .thinner
                    .next_decreasing_until::<M, G, R, _>(rates_at, limit, rng)?
                {
                    Thinned::Accepted { delta_t, value } => EventDraw::Event {
                        delta_t,
                        event: value,
                    },
                    Thinned::BeyondLimit => EventDraw::BeyondHorizon,
                    Thinned::Exhausted => EventDraw::Exhausted,
                }
            },
        };

        if let EventDraw::Event { delta_t, .. } = &draw {
            self.pending = Some(time + *delta_t);
        }

        Ok(draw)
    }
}
