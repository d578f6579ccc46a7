use core::{cmp::Ordering, convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ClosedOpenUnitF64, OpenClosedUnitF64};

#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
#[error("{0} is not in [0.0, 1.0].")]
pub struct ClosedUnitF64Error(pub f64);

#[derive(Copy, Clone, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct ClosedUnitF64(f64);

impl TryFrom<f64> for ClosedUnitF64 {
    type Error = ClosedUnitF64Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClosedUnitF64> for f64 {
    fn from(value: ClosedUnitF64) -> Self {
        value.0
    }
}

impl From<ClosedOpenUnitF64> for ClosedUnitF64 {
    fn from(value: ClosedOpenUnitF64) -> Self {
        Self(value.get())
    }
}

impl From<OpenClosedUnitF64> for ClosedUnitF64 {
    fn from(value: OpenClosedUnitF64) -> Self {
        Self(value.get())
    }
}

impl fmt::Debug for ClosedUnitF64 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        struct ClosedUnitF64Range(f64);

        impl fmt::Debug for ClosedUnitF64Range {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, "0.0 <= {} <= 1.0", self.0)
            }
        }

        fmt.debug_tuple("ClosedUnitF64")
            .field(&ClosedUnitF64Range(self.0))
            .finish()
    }
}

impl ClosedUnitF64 {
    /// # Errors
    ///
    /// Returns `ClosedUnitF64Error` if not `0.0 <= value <= 1.0`
    pub fn new(value: f64) -> Result<Self, ClosedUnitF64Error> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ClosedUnitF64Error(value))
        }
    }

    /// # Safety
    ///
    /// Only safe iff `0.0 <= value <= 1.0`
    #[must_use]
    pub const unsafe fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    #[must_use]
    pub const fn one() -> Self {
        Self(1.0)
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for ClosedUnitF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for ClosedUnitF64 {}

impl PartialOrd for ClosedUnitF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClosedUnitF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialEq<f64> for ClosedUnitF64 {
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<f64> for ClosedUnitF64 {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}
