use core::fmt;

use mcsim_core::{
    cogs::{EventHandler, MathsCore, RateUpdate, RngCore, StaticRates},
    error::SamplingError,
};
use mcsim_core_bond::NonNegativeF64;

use crate::rate_sampler::RateVector;

/// Event handler over a flat list of rates, where each event is identified
/// by its index into the list.
#[allow(clippy::module_name_repetitions)]
pub struct ListEventHandler<U = StaticRates> {
    rates: RateVector,
    update: U,
}

impl<U> fmt::Debug for ListEventHandler<U> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct(stringify!(ListEventHandler))
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}

impl ListEventHandler<StaticRates> {
    /// # Errors
    ///
    /// Returns a `SamplingError` if `rates` is empty or invalid.
    pub fn new(rates: Vec<f64>) -> Result<Self, SamplingError> {
        Self::with_update(rates, StaticRates)
    }
}

impl<U: RateUpdate<RateVector, usize>> ListEventHandler<U> {
    /// Creates a handler whose rates are refreshed by `update` every time
    /// an event fires.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if `rates` is empty or invalid.
    pub fn with_update(rates: Vec<f64>, update: U) -> Result<Self, SamplingError> {
        Ok(Self {
            rates: RateVector::new(rates)?,
            update,
        })
    }

    #[must_use]
    pub fn rates(&self) -> &RateVector {
        &self.rates
    }

    pub fn rates_mut(&mut self) -> &mut RateVector {
        &mut self.rates
    }
}

impl<M: MathsCore, G: RngCore<M>, U: RateUpdate<RateVector, usize>> EventHandler<M, G>
    for ListEventHandler<U>
{
    type Event = usize;

    fn total_rate(&self) -> NonNegativeF64 {
        self.rates.total()
    }

    fn sample_event(&self, rng: &mut G) -> Option<usize> {
        self.rates.sample::<M, G>(rng).ok()
    }

    fn notify_fired(&mut self, event: &usize) -> Result<(), SamplingError> {
        self.update.update_rates(event, &mut self.rates)
    }
}
