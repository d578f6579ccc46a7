use core::{fmt, hash::Hash};

use mcsim_core::{
    cogs::{EventHandler, MathsCore, RateUpdate, RngCore, StaticRates},
    error::SamplingError,
};
use mcsim_core_bond::NonNegativeF64;

mod sampler;
mod weight;


pub use sampler::{GroupedRates, MAX_EXPONENT_SPREAD};

/// Event handler for large, sparse and frequently changing event sets,
/// where events of similar rate magnitude are grouped together.
#[allow(clippy::module_name_repetitions)]
pub struct GroupedEventHandler<E: Eq + Hash + Clone + fmt::Debug, U = StaticRates> {
    rates: GroupedRates<E>,
    update: U,
}

impl<E: Eq + Hash + Clone + fmt::Debug, U> fmt::Debug for GroupedEventHandler<E, U> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct(stringify!(GroupedEventHandler))
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug> GroupedEventHandler<E, StaticRates> {
    /// # Errors
    ///
    /// Returns a `SamplingError` if any rate is invalid.
    pub fn new<I: IntoIterator<Item = (E, f64)>>(events: I) -> Result<Self, SamplingError> {
        Self::with_update(events, StaticRates)
    }
}

impl<E: Eq + Hash + Clone + fmt::Debug, U: RateUpdate<GroupedRates<E>, E>>
    GroupedEventHandler<E, U>
{
    /// Creates a handler whose rates are refreshed by `update` every time
    /// an event fires.
    ///
    /// # Errors
    ///
    /// Returns a `SamplingError` if any rate is invalid.
    pub fn with_update<I: IntoIterator<Item = (E, f64)>>(
        events: I,
        update: U,
    ) -> Result<Self, SamplingError> {
        let events = events.into_iter();

        let mut rates = GroupedRates::with_capacity(events.size_hint().0);

        for (event, rate) in events {
            rates.set_rate(event, rate)?;
        }

        Ok(Self { rates, update })
    }

    #[must_use]
    pub fn rates(&self) -> &GroupedRates<E> {
        &self.rates
    }

    pub fn rates_mut(&mut self) -> &mut GroupedRates<E> {
        &mut self.rates
    }
}

impl<
        M: MathsCore,
        G: RngCore<M>,
        E: Eq + Hash + Clone + fmt::Debug,
        U: RateUpdate<GroupedRates<E>, E>,
    > EventHandler<M, G> for GroupedEventHandler<E, U>
{
    type Event = E;

    fn total_rate(&self) -> NonNegativeF64 {
        self.rates.total_rate()
    }

    fn sample_event(&self, rng: &mut G) -> Option<E> {
        self.rates.sample::<M, G>(rng)
    }

    fn notify_fired(&mut self, event: &E) -> Result<(), SamplingError> {
        self.update.update_rates(event, &mut self.rates)
    }
}
