//! Arbitrary-precision arithmetic façade.
//!
//! The engine needs addition, subtraction, multiplication, division,
//! modulus, gcd, modular exponentiation, shifts, bit tests, and bounded
//! random sampling over signed arbitrary-precision integers. `rug::Integer`
//! (GMP-backed) already provides all of these except bounded random sampling
//! against a caller-supplied RNG, so this module adds only that, plus two
//! small naming conveniences that make call sites read like the spec they
//! implement.

use crate::error::{PrimeError, Result};
use rand::RngCore;
use rug::integer::Order;
use rug::Integer;

/// `value_of(3)` reads better than `Integer::from(3u32)` at call sites that
/// are transcribing FIPS 186-4 pseudocode.
#[inline]
pub fn value_of(x: u32) -> Integer {
    Integer::from(x)
}

/// Minimum number of bits needed to represent `|x|`. Zero has length 0, one
/// has length 1, two has length 2 — exactly `rug::Integer::significant_bits`.
#[inline]
pub fn bit_length(x: &Integer) -> u32 {
    x.significant_bits()
}

/// Uniformly sample an integer in the inclusive range `[min, max]` using
/// `rng`'s uniform bit output, via rejection sampling.
///
/// Fails with [`PrimeError::InvalidArgument`] if `min > max`. If `min ==
/// max`, returns that value without consulting `rng`.
pub fn create_random_in_range<R: RngCore + ?Sized>(
    min: &Integer,
    max: &Integer,
    rng: &mut R,
) -> Result<Integer> {
    if min > max {
        return Err(PrimeError::invalid_argument(format!(
            "create_random_in_range: min ({min}) > max ({max})"
        )));
    }
    if min == max {
        return Ok(min.clone());
    }

    let range = Integer::from(max - min) + 1u32;
    let bits = range.significant_bits();
    loop {
        let candidate = random_bits(bits, rng);
        if candidate < range {
            return Ok(Integer::from(min + candidate));
        }
    }
}

/// Draw exactly `bits` uniformly random bits as a non-negative `Integer`,
/// filling a byte-aligned buffer and masking off the unused high bits of the
/// top byte.
fn random_bits<R: RngCore + ?Sized>(bits: u32, rng: &mut R) -> Integer {
    if bits == 0 {
        return Integer::new();
    }
    let num_bytes = bits.div_ceil(8) as usize;
    let mut buf = vec![0u8; num_bytes];
    rng.fill_bytes(&mut buf);
    let extra_bits = (num_bytes * 8) as u32 - bits;
    if extra_bits > 0 {
        buf[0] &= 0xFFu8 >> extra_bits;
    }
    Integer::from_digits(&buf, Order::Msf)
}
