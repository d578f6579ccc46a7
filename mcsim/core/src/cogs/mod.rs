pub use mcsim_core_maths::MathsCore;

pub mod event_handler;
pub use event_handler::{EventDraw, EventHandler, RateUpdate, StaticRates};

pub mod rng;
pub use rng::{RngCore, RngSampler, SeedableRng, SplittableRng};
