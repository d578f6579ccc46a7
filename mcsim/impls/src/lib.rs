#![deny(clippy::pedantic)]

#[macro_use]
extern crate contracts;

#[macro_use]
extern crate log;

pub mod cogs;
pub mod equilibrium;
pub mod kinetic;
pub mod rate_sampler;
pub mod thinning;

#[cfg(test)]
mod testing;
