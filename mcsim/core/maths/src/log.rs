use crate::MathsCore;

/// Computes `c = ln(e^a + e^b)` without leaving log space.
///
/// This is useful for sums whose terms span many orders of magnitude, e.g.
/// the partition sum needed to normalise a reweighted ensemble.
///
/// ```
/// # use mcsim_core_maths::{log_sum, StdMathsCore};
/// let c = log_sum::<StdMathsCore>(2.0_f64.ln(), 3.0_f64.ln());
/// assert!((c.exp() - 5.0).abs() < 1e-12);
/// ```
#[must_use]
#[inline]
pub fn log_sum<M: MathsCore>(a: f64, b: f64) -> f64 {
    // ln(0) + x = x, also avoids (-inf) - (-inf) = NaN below
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }

    let (max, min) = if a >= b { (a, b) } else { (b, a) };

    if max == f64::INFINITY {
        return max;
    }

    max + M::ln_1p(M::exp(min - max))
}

/// Folds `log_sum` over all `terms`, returning `ln(0) = -inf` if there are
/// none.
#[must_use]
pub fn log_sum_all<M: MathsCore, I: IntoIterator<Item = f64>>(terms: I) -> f64 {
    terms
        .into_iter()
        .fold(f64::NEG_INFINITY, |acc, term| log_sum::<M>(acc, term))
}
