use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum SearchError {
    #[error("Cannot search an empty sequence.")]
    Empty,
    #[error("{value} is not comparable with the sequence values.")]
    Incomparable { value: f64 },
    #[error("{value} exceeds the last sequence value {last}.")]
    OutOfRange { value: f64, last: f64 },
}

/// Returns the first index `i` into the non-decreasing `sorted` sequence with
/// `value <= sorted[i]`, i.e. `sorted[i - 1] < value <= sorted[i]` where
/// `sorted[-1]` is taken to be negative infinity.
///
/// ```
/// # use mcsim_core_maths::binary_search;
/// assert_eq!(binary_search(&[1.0, 2.0, 3.0, 4.0], 2.5), Ok(2));
/// assert_eq!(binary_search(&[1.0, 2.0, 3.0, 4.0], 2.0), Ok(1));
/// ```
///
/// # Errors
///
/// Returns `SearchError::Empty` if `sorted` is empty,
/// `SearchError::Incomparable` if `value` is NaN, and
/// `SearchError::OutOfRange` if `value` is larger than the last element.
#[debug_requires(
    sorted.windows(2).all(|w| w[0] <= w[1]),
    "sorted is non-decreasing"
)]
#[debug_ensures(
    ret.map_or(true, |i| value <= sorted[i] && (i == 0 || sorted[i - 1] < value)),
    "sorted[i - 1] < value <= sorted[i]"
)]
pub fn binary_search(sorted: &[f64], value: f64) -> Result<usize, SearchError> {
    let Some(last) = sorted.last().copied() else {
        return Err(SearchError::Empty);
    };

    if value.is_nan() {
        return Err(SearchError::Incomparable { value });
    }

    if value > last {
        return Err(SearchError::OutOfRange { value, last });
    }

    let mut lower = 0_usize;
    let mut upper = sorted.len() - 1;

    // Invariant: sorted[upper] >= value and sorted[lower - 1] < value
    while lower < upper {
        let mid = lower + (upper - lower) / 2;

        if sorted[mid] < value {
            lower = mid + 1;
        } else {
            upper = mid;
        }
    }

    Ok(lower)
}
