use mcsim_core::{
    cogs::{EventDraw, EventHandler, MathsCore, RngCore, RngSampler},
    error::SamplingError,
};
use mcsim_core_bond::{NonNegativeF64, PositiveF64};

use serde::{Deserialize, Serialize};

use crate::rate_sampler::{next_event, validate_rates};


/// Why [`KineticMonteCarlo::advance`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The next event would have fired after the horizon
    Horizon,
    /// No event can ever fire again
    Exhausted,
    /// The configured maximum number of events has fired
    StepLimit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Advance {
    /// Time of the last fired event, or the start time if none fired
    pub time: NonNegativeF64,
    pub steps: u64,
    pub termination: Termination,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct KineticMonteCarlo {
    pub start_time: NonNegativeF64,
    pub max_steps: Option<u64>,
}

impl Default for KineticMonteCarlo {
    fn default() -> Self {
        Self {
            start_time: NonNegativeF64::zero(),
            max_steps: None,
        }
    }
}

impl KineticMonteCarlo {
    /// Fires events drawn from `handler` until the next one would fire
    /// after `total_time`, the handler is exhausted, or `max_steps` events
    /// have fired. `update` is applied to every fired event before the
    /// handler is notified.
    ///
    /// The update of an event that would cross `total_time` is never
    /// applied, so the returned time never exceeds `total_time`.
    ///
    /// # Errors
    ///
    /// Returns `SamplingError::InvalidHorizon` if `total_time` lies before
    /// the start time, or any `SamplingError` raised by `handler`.
    #[debug_ensures(ret.as_ref().map_or(true, |advance| advance.time <= total_time))]
    pub fn advance<
        M: MathsCore,
        G: RngCore<M>,
        H: EventHandler<M, G>,
        F: FnMut(&H::Event),
    >(
        &self,
        rng: &mut G,
        handler: &mut H,
        mut update: F,
        total_time: NonNegativeF64,
    ) -> Result<Advance, SamplingError> {
        if total_time < self.start_time {
            return Err(SamplingError::InvalidHorizon {
                start: self.start_time.get(),
                horizon: total_time.get(),
            });
        }

        debug!(
            "Advancing the simulation from {} to {} ...",
            self.start_time, total_time
        );

        let mut time = self.start_time;
        let mut steps = 0_u64;

        let termination = loop {
            if self.max_steps.map_or(false, |max_steps| steps >= max_steps) {
                break Termination::StepLimit;
            }

            if handler.is_exhausted() {
                break Termination::Exhausted;
            }

            match handler.draw_next(time, total_time, rng)? {
                EventDraw::Event { delta_t, event } => {
                    time += delta_t;
                    steps += 1;

                    trace!("Event {:?} fired at {}.", event, time);

                    update(&event);
                    handler.notify_fired(&event)?;
                },
                EventDraw::BeyondHorizon => break Termination::Horizon,
                EventDraw::Exhausted => break Termination::Exhausted,
            }
        };

        debug!(
            "Advanced the simulation to {} after {} events ({:?}).",
            time, steps, termination
        );

        Ok(Advance {
            time,
            steps,
            termination,
        })
    }
}

/// Advances the simulation from time zero without a step limit, see
/// [`KineticMonteCarlo::advance`].
///
/// # Errors
///
/// Returns any `SamplingError` raised by `handler`.
pub fn advance<M: MathsCore, G: RngCore<M>, H: EventHandler<M, G>, F: FnMut(&H::Event)>(
    rng: &mut G,
    handler: &mut H,
    update: F,
    total_time: NonNegativeF64,
) -> Result<Advance, SamplingError> {
    KineticMonteCarlo::default().advance(rng, handler, update, total_time)
}

/// Draws the waiting time until the next event of the homogeneous
/// processes with `rates` and the index of the event that fires.
///
/// # Errors
///
/// Returns a `SamplingError` if `rates` is invalid or all zero.
pub fn next<M: MathsCore, G: RngCore<M>>(
    rates: &[f64],
    rng: &mut G,
) -> Result<(NonNegativeF64, usize), SamplingError> {
    let Ok(total) = PositiveF64::new(validate_rates(rates)?.get()) else {
        return Err(SamplingError::NoPositiveRate);
    };

    let delta_t = rng.sample_exponential(total);

    Ok((delta_t, next_event(rates, rng)?))
}
