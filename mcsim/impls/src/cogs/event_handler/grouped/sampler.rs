use core::{
    cmp::Ordering,
    fmt,
    hash::Hash,
    num::{NonZeroU128, NonZeroUsize},
};

use fnv::FnvBuildHasher;
use hashbrown::HashMap;

use mcsim_core::{
    cogs::{MathsCore, RngCore, RngSampler},
    error::SamplingError,
};
use mcsim_core_bond::{NonNegativeF64, PositiveF64};

use super::weight::{compose_rate, decompose_rate, DecomposedRate};

/// Largest supported difference between the binary exponents of the
/// largest and smallest rate, which keeps the fixed-point total rate
/// within a `u128`.
pub const MAX_EXPONENT_SPREAD: i16 = 48;

#[derive(Clone, Debug, PartialEq, Eq)]
struct RejectionSamplingGroup<E: Eq + Hash> {
    events: Vec<E>,
    weights: Vec<u64>,
    total_weight: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct EventLocation {
    exponent: i16,
    group_index: usize,
}

/// Dynamic event rates grouped by the binary exponent of each rate.
///
/// A group is selected with probability proportional to its exact
/// fixed-point total, and an event within the group by rejection sampling
/// against its mantissa, which succeeds with probability at least 50%.
#[derive(Clone)]
pub struct GroupedRates<E: Eq + Hash + Clone> {
    exponents: Vec<i16>,
    groups: Vec<RejectionSamplingGroup<E>>,
    lookup: HashMap<E, EventLocation, FnvBuildHasher>,
    min_exponent: i16,
    total_weight: u128,
}

impl<E: Eq + Hash + Clone> fmt::Debug for GroupedRates<E> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("GroupedRates")
            .field("exponents", &self.exponents)
            .field("len", &self.len())
            .field("total_rate", &self.total_rate().get())
            .finish()
    }
}

impl<E: Eq + Hash> RejectionSamplingGroup<E> {
    fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    fn sample<M: MathsCore, G: RngCore<M>>(&self, rng: &mut G) -> Option<&E> {
        if let [event] = &self.events[..] {
            return Some(event);
        }

        let length = NonZeroUsize::new(self.weights.len())?;

        loop {
            let index = rng.sample_index(length);
            let height = rng.sample_u64() >> 11;

            // 53rd bit of weight is always 1, so sampling chance >= 50%
            if height < self.weights[index] {
                return self.events.get(index);
            }
        }
    }

    /// Removes the event at `index`, moving the last event into its slot.
    /// Returns `false` iff the group is now empty.
    fn remove(
        &mut self,
        index: usize,
        lookup: &mut HashMap<E, EventLocation, FnvBuildHasher>,
    ) -> bool {
        self.events.swap_remove(index);
        let weight = self.weights.swap_remove(index);

        self.total_weight -= u128::from(weight);

        if let Some(event) = self.events.get(index) {
            if let Some(location) = lookup.get_mut(event) {
                location.group_index = index;
            }
        }

        !self.events.is_empty()
    }

    #[must_use]
    fn add(&mut self, event: E, weight: u64) -> usize {
        self.events.push(event);
        self.weights.push(weight);

        self.total_weight += u128::from(weight);

        self.events.len() - 1
    }

    fn new(event: E, weight: u64) -> Self {
        Self {
            events: vec![event],
            weights: vec![weight],
            total_weight: u128::from(weight),
        }
    }
}

impl<E: Eq + Hash + Clone> GroupedRates<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            exponents: Vec::new(),
            groups: Vec::new(),
            lookup: HashMap::default(),
            min_exponent: 0_i16,
            total_weight: 0_u128,
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity_log2_approx = (usize::BITS - capacity.leading_zeros()) as usize;

        Self {
            exponents: Vec::with_capacity(capacity_log2_approx),
            groups: Vec::with_capacity(capacity_log2_approx),
            lookup: HashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default()),
            min_exponent: 0_i16,
            total_weight: 0_u128,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Iterates over all events, from the largest to the smallest rate
    /// exponent.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.groups.iter().flat_map(RejectionSamplingGroup::iter)
    }

    #[must_use]
    pub fn rate(&self, event: &E) -> Option<PositiveF64> {
        let location = self.lookup.get(event)?;
        let group_index = self.lookup_group_index(location.exponent).ok()?;
        let weight = self.groups[group_index].weights[location.group_index];

        PositiveF64::new(compose_rate(location.exponent, u128::from(weight)).get()).ok()
    }

    /// Exact sum of all rates, rounded once to the nearest `f64`.
    #[must_use]
    pub fn total_rate(&self) -> NonNegativeF64 {
        compose_rate(self.min_exponent, self.total_weight)
    }

    /// Sets the rate of `event`, removing it iff `rate` is zero.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::NegativeRate` or
    /// `SamplingError::NonFiniteRate` if `rate` is invalid, and
    /// `SamplingError::RateSpreadExceeded` if `rate` is too far away from
    /// the other rates.
    #[allow(clippy::float_cmp)]
    pub fn set_rate(&mut self, event: E, rate: f64) -> Result<(), SamplingError> {
        if !rate.is_finite() {
            return Err(SamplingError::NonFiniteRate { index: 0, rate });
        }

        match PositiveF64::new(rate) {
            Ok(rate) => self.update_or_add(event, rate),
            Err(_) if rate == 0.0 => {
                self.remove(&event);
                Ok(())
            },
            Err(_) => Err(SamplingError::NegativeRate { index: 0, rate }),
        }
    }

    /// Samples an event with probability proportional to its rate without
    /// removing it.
    #[must_use]
    pub fn sample<M: MathsCore, G: RngCore<M>>(&self, rng: &mut G) -> Option<E> {
        let total_weight = NonZeroU128::new(self.total_weight)?;

        let cdf_sample = if let [_group] = &self.groups[..] {
            0_u128
        } else {
            rng.sample_index_u128(total_weight)
        };

        let mut cdf_acc = 0_u128;

        for (exponent, group) in self.exponents.iter().copied().zip(self.groups.iter()) {
            cdf_acc += group.total_weight << (i32::from(exponent) - i32::from(self.min_exponent));

            if cdf_sample < cdf_acc {
                return group.sample(rng).cloned();
            }
        }

        None
    }

    /// Inserts `event` with `rate`, replacing its previous rate.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::RateSpreadExceeded` if `rate` differs from
    /// the other rates by more than a factor of `2^MAX_EXPONENT_SPREAD`,
    /// in which case the previous rate of `event` is kept.
    pub fn update_or_add(&mut self, event: E, rate: PositiveF64) -> Result<(), SamplingError> {
        let previous = self.remove(&event);

        let decomposed = decompose_rate(rate);

        if let (Some(max_exponent), Some(min_exponent)) =
            (self.exponents.first(), self.exponents.last())
        {
            if decomposed.exponent.max(*max_exponent) - decomposed.exponent.min(*min_exponent)
                > MAX_EXPONENT_SPREAD
            {
                if let Some(previous) = previous {
                    self.insert(event, decompose_rate(previous));
                }

                return Err(SamplingError::RateSpreadExceeded {
                    rate: rate.get(),
                    max_spread: MAX_EXPONENT_SPREAD,
                });
            }
        }

        self.insert(event, decomposed);

        Ok(())
    }

    /// Removes `event` and returns its rate, if it was present.
    pub fn remove(&mut self, event: &E) -> Option<PositiveF64> {
        let rate = self.rate(event)?;
        let location = self.lookup.remove(event)?;

        let i = self.lookup_group_index(location.exponent).ok()?;
        let exponent_shift = i32::from(location.exponent) - i32::from(self.min_exponent);

        let group = &mut self.groups[i];

        self.total_weight -= group.total_weight << exponent_shift;

        if group.remove(location.group_index, &mut self.lookup) {
            self.total_weight += group.total_weight << exponent_shift;
        } else {
            self.groups.remove(i);
            self.exponents.remove(i);

            let old_min_exponent = self.min_exponent;
            self.min_exponent = self.exponents.last().copied().unwrap_or(0_i16);

            if self.min_exponent > old_min_exponent {
                self.total_weight >>= i32::from(self.min_exponent) - i32::from(old_min_exponent);
            }
        }

        Some(rate)
    }

    fn insert(&mut self, event: E, decomposed: DecomposedRate) {
        let group_index = match self.lookup_group_index(decomposed.exponent) {
            Ok(i) => self.groups[i].add(event.clone(), decomposed.mantissa),
            Err(i) => {
                self.exponents.insert(i, decomposed.exponent);
                self.groups.insert(
                    i,
                    RejectionSamplingGroup::new(event.clone(), decomposed.mantissa),
                );

                let old_min_exponent = self.min_exponent;
                self.min_exponent = self.exponents.last().copied().unwrap_or(0_i16);

                if self.min_exponent < old_min_exponent {
                    self.total_weight <<=
                        i32::from(old_min_exponent) - i32::from(self.min_exponent);
                }

                0_usize
            },
        };

        self.total_weight += u128::from(decomposed.mantissa)
            << (i32::from(decomposed.exponent) - i32::from(self.min_exponent));

        self.lookup.insert(
            event,
            EventLocation {
                exponent: decomposed.exponent,
                group_index,
            },
        );
    }

    fn lookup_group_index(&self, exponent: i16) -> Result<usize, usize> {
        for (i, e) in self.exponents.iter().enumerate() {
            match exponent.cmp(e) {
                Ordering::Equal => return Ok(i),
                Ordering::Greater => return Err(i),
                Ordering::Less => continue,
            }
        }

        Err(self.exponents.len())
    }
}

impl<E: Eq + Hash + Clone> Default for GroupedRates<E> {
    fn default() -> Self {
        Self::new()
    }
}
