use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mcsim_core_maths::StdMathsCore;
use mcsim_impls::{
    cogs::rng::wyhash::WyHash, kinetic::KineticMonteCarlo, thinning::PoissonThinner,
};

use crate::{parse::try_parse, rng::RngArgs};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct SweepArgs {
    pub number_updates: usize,
}

impl Default for SweepArgs {
    fn default() -> Self {
        Self { number_updates: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct SimulationArgs {
    pub rng: RngArgs,
    #[serde(default)]
    pub kinetic: KineticMonteCarlo,
    #[serde(default)]
    pub thinning: PoissonThinner,
    #[serde(default)]
    pub sweep: SweepArgs,
}

impl SimulationArgs {
    /// # Errors
    ///
    /// Returns an error if `ron_args` does not describe valid arguments.
    pub fn from_ron(ron_args: &str) -> Result<Self> {
        let args: Self = try_parse("simulation", ron_args)?;

        info!("Parsed simulation arguments:\n{:#?}", args);

        Ok(args)
    }

    /// # Errors
    ///
    /// Returns an error if the rng cannot be initialised.
    pub fn build_rng(&self) -> Result<WyHash<StdMathsCore>> {
        self.rng
            .build::<StdMathsCore, WyHash<StdMathsCore>>()
            .context("Failed to initialise the simulation rng.")
    }
}
