use core::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
#[error("{0} is not in (0.0, 1.0].")]
pub struct OpenClosedUnitF64Error(pub f64);

#[derive(Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct OpenClosedUnitF64(f64);

impl TryFrom<f64> for OpenClosedUnitF64 {
    type Error = OpenClosedUnitF64Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OpenClosedUnitF64> for f64 {
    fn from(value: OpenClosedUnitF64) -> Self {
        value.0
    }
}

impl fmt::Debug for OpenClosedUnitF64 {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        struct OpenClosedUnitF64Range(f64);

        impl fmt::Debug for OpenClosedUnitF64Range {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                write!(fmt, "0.0 < {} <= 1.0", self.0)
            }
        }

        fmt.debug_tuple("OpenClosedUnitF64")
            .field(&OpenClosedUnitF64Range(self.0))
            .finish()
    }
}

impl OpenClosedUnitF64 {
    /// # Errors
    ///
    /// Returns `OpenClosedUnitF64Error` if not `0.0 < value <= 1.0`
    pub fn new(value: f64) -> Result<Self, OpenClosedUnitF64Error> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(OpenClosedUnitF64Error(value))
        }
    }

    /// # Safety
    ///
    /// Only safe iff `0.0 < value <= 1.0`
    #[must_use]
    pub const unsafe fn new_unchecked(value: f64) -> Self {
        Self(value)
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
