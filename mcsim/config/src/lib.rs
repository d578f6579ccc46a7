#![deny(clippy::pedantic)]

#[macro_use]
extern crate log;

mod args;
mod logger;
mod parse;
mod rng;

#[cfg(test)]
mod tests;

pub use args::{SimulationArgs, SweepArgs};
pub use logger::{init_logger, MinimalLogger};
pub use parse::{try_parse, try_print};
pub use rng::RngArgs;
