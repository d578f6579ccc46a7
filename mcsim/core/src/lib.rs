#![deny(clippy::pedantic)]

#[macro_use]
extern crate contracts;

pub mod cogs;
pub mod error;
