use core::marker::PhantomData;

use mcsim_core::cogs::{MathsCore, RngCore, SplittableRng};

use serde::{Deserialize, Serialize};

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(bound = "")]
pub struct WyHash<M: MathsCore> {
    seed: u64,
    state: u64,
    #[serde(skip)]
    marker: PhantomData<M>,
}

impl<M: MathsCore> RngCore<M> for WyHash<M> {
    type Seed = [u8; 8];

    #[must_use]
    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        let seed = u64::from_le_bytes(seed);

        Self {
            seed,
            state: seed,
            marker: PhantomData::<M>,
        }
    }

    #[must_use]
    #[inline]
    fn sample_u64(&mut self) -> u64 {
        // Added SeaHash diffuse for better avalanching
        diffuse(wyhash::wyrng(&mut self.state))
    }
}

impl<M: MathsCore> SplittableRng<M> for WyHash<M> {
    fn split(self) -> (Self, Self) {
        let left = self.clone().split_to_stream(0);
        let right = self.split_to_stream(1);

        (left, right)
    }

    fn split_to_stream(self, stream: u64) -> Self {
        let state_bytes = self.state.to_le_bytes();
        let stream_bytes = stream.to_le_bytes();

        let mut bytes = [0_u8; 16];
        bytes[..8].copy_from_slice(&state_bytes);
        bytes[8..].copy_from_slice(&stream_bytes);

        // The stream seed keys every future stream derived from this one
        let seed = wyhash::wyhash(&bytes, self.seed);

        Self {
            seed,
            state: seed,
            marker: PhantomData::<M>,
        }
    }
}

const fn diffuse(mut x: u64) -> u64 {
    // Dynamic shifts from the PCG output round: the high bits select the
    // shift, so flipping them flips the low bits, which the multiplication
    // then scatters upwards.
    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    let a = x >> 32;
    let b = x >> 60;

    x ^= a >> b;

    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    x
}
