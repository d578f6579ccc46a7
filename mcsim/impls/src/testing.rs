use mcsim_core::cogs::RngCore;
use mcsim_core_maths::StdMathsCore;

/// Replays a fixed script of uniform `[0, 1)` samples.
#[derive(Clone, Debug)]
pub struct DummyRng(pub(crate) Vec<u64>);

impl DummyRng {
    pub fn new(mut vec: Vec<f64>) -> Self {
        vec.reverse();

        Self(
            vec.into_iter()
                .map(|u01| ((u01 / f64::from_bits(0x3CA0_0000_0000_0000_u64)) as u64) << 11)
                .collect(),
        )
    }
}

impl RngCore<StdMathsCore> for DummyRng {
    type Seed = [u8; 0];

    #[must_use]
    fn from_seed(_seed: Self::Seed) -> Self {
        Self(Vec::new())
    }

    #[must_use]
    fn sample_u64(&mut self) -> u64 {
        self.0.pop().unwrap()
    }
}
