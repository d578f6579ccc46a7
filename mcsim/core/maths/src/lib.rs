#![deny(clippy::pedantic)]

#[macro_use]
extern crate contracts;

mod log;
mod search;


pub use log::{log_sum, log_sum_all};
pub use search::{binary_search, SearchError};

pub trait MathsCore: 'static + Clone + core::fmt::Debug {
    #[must_use]
    fn floor(x: f64) -> f64;
    #[must_use]
    fn ceil(x: f64) -> f64;
    #[must_use]
    fn ln(x: f64) -> f64;
    #[must_use]
    fn ln_1p(x: f64) -> f64;
    #[must_use]
    fn exp(x: f64) -> f64;
    #[must_use]
    fn sqrt(x: f64) -> f64;
}

#[derive(Clone, Debug)]
pub enum StdMathsCore {}

impl MathsCore for StdMathsCore {
    #[inline]
    fn floor(x: f64) -> f64 {
        x.floor()
    }

    #[inline]
    fn ceil(x: f64) -> f64 {
        x.ceil()
    }

    #[inline]
    fn ln(x: f64) -> f64 {
        x.ln()
    }

    #[inline]
    fn ln_1p(x: f64) -> f64 {
        x.ln_1p()
    }

    #[inline]
    fn exp(x: f64) -> f64 {
        x.exp()
    }

    #[inline]
    fn sqrt(x: f64) -> f64 {
        x.sqrt()
    }
}
