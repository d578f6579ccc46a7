use core::{fmt, marker::PhantomData};

use mcsim_core::cogs::{MathsCore, RngCore};

use rand_core::{RngCore as RandRngCore, SeedableRng as RandSeedableRng};

/// Injects any `rand_core` generator, e.g. `rand::rngs::StdRng`, as a
/// random stream.
#[allow(clippy::module_name_repetitions)]
#[repr(transparent)]
pub struct RandAsRng<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> {
    inner: G,
    marker: PhantomData<M>,
}

impl<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> From<G> for RandAsRng<M, G> {
    #[inline]
    fn from(inner: G) -> Self {
        Self {
            inner,
            marker: PhantomData::<M>,
        }
    }
}

impl<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> RandAsRng<M, G> {
    #[must_use]
    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> Clone for RandAsRng<M, G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            marker: PhantomData::<M>,
        }
    }
}

impl<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> fmt::Debug for RandAsRng<M, G> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        struct InnerRng(&'static str);

        impl fmt::Debug for InnerRng {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                fmt.write_str(self.0)
            }
        }

        fmt.debug_tuple("RandAsRng")
            .field(&InnerRng(core::any::type_name::<G>()))
            .finish()
    }
}

impl<M: MathsCore, G: RandRngCore + RandSeedableRng + Clone> RngCore<M> for RandAsRng<M, G> {
    type Seed = G::Seed;

    #[must_use]
    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            inner: G::from_seed(seed),
            marker: PhantomData::<M>,
        }
    }

    #[must_use]
    #[inline]
    fn sample_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
