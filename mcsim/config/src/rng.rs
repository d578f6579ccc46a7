use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mcsim_core::cogs::{MathsCore, RngCore, SeedableRng};

/// How the random stream of a simulation is initialised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RngArgs {
    /// Reproducible stream from a 64-bit seed
    Seed(u64),
    /// Fresh stream seeded from the operating system's entropy source
    Entropy,
}

impl RngArgs {
    /// # Errors
    ///
    /// Returns an error if the entropy source is unavailable.
    pub fn build<M: MathsCore, G: RngCore<M>>(&self) -> Result<G> {
        match self {
            Self::Seed(seed) => Ok(G::seed_from_u64(*seed)),
            Self::Entropy => {
                let mut seed = G::Seed::default();

                getrandom::getrandom(seed.as_mut())
                    .map_err(|err| anyhow::anyhow!("{}", err))
                    .context("Failed to seed the rng from entropy.")?;

                Ok(G::from_seed(seed))
            },
        }
    }
}
