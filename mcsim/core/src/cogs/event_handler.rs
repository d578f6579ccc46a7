use mcsim_core_bond::{NonNegativeF64, PositiveF64};

use crate::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};

/// The outcome of drawing the next event from an `EventHandler`.
#[derive(Clone, Debug, PartialEq)]
pub enum EventDraw<E> {
    /// `event` fires `delta_t` after the current time
    Event { delta_t: NonNegativeF64, event: E },
    /// No event fires before the horizon
    BeyondHorizon,
    /// No event can fire ever again, e.g. because all rates are zero
    Exhausted,
}

impl<E> EventDraw<E> {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Recomputes the rates that are invalidated by a fired event.
pub trait RateUpdate<T: ?Sized, E: ?Sized> {
    /// # Errors
    ///
    /// Returns a `SamplingError` if a recomputed rate is invalid.
    fn update_rates(&mut self, event: &E, rates: &mut T) -> Result<(), SamplingError>;
}

impl<T: ?Sized, E: ?Sized, F: FnMut(&E, &mut T) -> Result<(), SamplingError>> RateUpdate<T, E>
    for F
{
    fn update_rates(&mut self, event: &E, rates: &mut T) -> Result<(), SamplingError> {
        self(event, rates)
    }
}

/// Rates that never change when an event fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticRates;

impl<T: ?Sized, E: ?Sized> RateUpdate<T, E> for StaticRates {
    fn update_rates(&mut self, _event: &E, _rates: &mut T) -> Result<(), SamplingError> {
        Ok(())
    }
}

#[allow(clippy::module_name_repetitions)]
pub trait EventHandler<M: MathsCore, G: RngCore<M>> {
    type Event: Clone + core::fmt::Debug;

    /// Sum of all currently active rates.
    #[must_use]
    fn total_rate(&self) -> NonNegativeF64;

    #[must_use]
    fn is_exhausted(&self) -> bool {
        self.total_rate() <= 0.0
    }

    /// Selects one event with probability proportional to its rate, or
    /// `None` iff the handler is exhausted.
    #[must_use]
    fn sample_event(&self, rng: &mut G) -> Option<Self::Event>;

    /// Brings the rates up to date after `event` has been executed.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if the recomputed rates are invalid.
    fn notify_fired(&mut self, event: &Self::Event) -> Result<(), SamplingError>;

    /// Draws the waiting time until the next event and its identity.
    ///
    /// The default draws an exponential waiting time on the constant
    /// `total_rate()`, handlers with time-varying rates override this.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if the rates are invalid.
    #[debug_requires(time <= horizon, "time does not exceed the horizon")]
    fn draw_next(
        &mut self,
        time: NonNegativeF64,
        horizon: NonNegativeF64,
        rng: &mut G,
    ) -> Result<EventDraw<Self::Event>, SamplingError> {
        let Ok(lambda) = PositiveF64::new(self.total_rate().get()) else {
            return Ok(EventDraw::Exhausted);
        };

        let delta_t = rng.sample_exponential(lambda);

        if time + delta_t > horizon {
            return Ok(EventDraw::BeyondHorizon);
        }

        Ok(match self.sample_event(rng) {
            Some(event) => EventDraw::Event { delta_t, event },
            None => EventDraw::Exhausted,
        })
    }
}
