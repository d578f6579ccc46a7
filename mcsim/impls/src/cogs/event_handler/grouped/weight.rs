use mcsim_core_bond::{NonNegativeF64, PositiveF64};

/// A positive rate `mantissa * 2^(exponent - 52)` with the implicit leading
/// bit of the mantissa made explicit, i.e. `2^52 <= mantissa < 2^53`.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct DecomposedRate {
    pub exponent: i16,
    pub mantissa: u64,
}

pub(super) fn decompose_rate(rate: PositiveF64) -> DecomposedRate {
    let bits = rate.get().to_bits();

    #[allow(clippy::cast_possible_truncation)]
    let mut exponent: i16 = ((bits >> 52) & 0x7ff_u64) as i16;

    let mantissa = if exponent == 0 {
        // Present subnormal rates as if they were normal
        #[allow(clippy::cast_possible_truncation)]
        let subnormal_exponent = (bits.leading_zeros() as i16) - 12;
        exponent -= subnormal_exponent;

        bits << (bits.leading_zeros() - 11)
    } else {
        (bits & 0x000f_ffff_ffff_ffff_u64) | 0x0010_0000_0000_0000_u64
    };

    DecomposedRate {
        exponent: exponent - 1023,
        mantissa,
    }
}

/// Rounds the fixed-point rate `mantissa * 2^(exponent - 52)` to the
/// nearest representable `f64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(super) fn compose_rate(mut exponent: i16, mut mantissa: u128) -> NonNegativeF64 {
    if mantissa == 0 {
        return NonNegativeF64::zero();
    }

    let mut excess_exponent = 75 - (mantissa.leading_zeros() as i16);

    if excess_exponent > 0 && (mantissa & (1_u128 << (excess_exponent - 1))) != 0 {
        mantissa += 1_u128 << excess_exponent;
    }

    excess_exponent = 75 - (mantissa.leading_zeros() as i16);
    exponent += excess_exponent;

    let bits = if exponent >= -1022 {
        let mantissa_u64 = ((mantissa >> excess_exponent) & 0x000f_ffff_ffff_ffff_u128) as u64;

        (((exponent + 1023) as u64) << 52) | mantissa_u64
    } else {
        // Subnormal results have an encoded exponent of 0
        ((mantissa >> (excess_exponent - 1022 - exponent)) & 0x000f_ffff_ffff_ffff_u128) as u64
    };

    // Safety: the sign bit is never set
    unsafe { NonNegativeF64::new_unchecked(f64::from_bits(bits)) }
}
