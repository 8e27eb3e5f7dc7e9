//! # Sieve — Small-Factor Pre-Filter
//!
//! `has_any_small_factors` trial-divides a candidate by every prime up to
//! [`SMALL_FACTOR_LIMIT`] before handing it to the (far more expensive)
//! Miller–Rabin or Shawe–Taylor machinery. The primes are bundled into ten
//! fixed groups whose product fits in a `u32`; each group's product is
//! reduced against the candidate with a single `Integer::mod_u` call (GMP's
//! `mpz_fdiv_ui`), and the per-prime check against that `u32` remainder is
//! then free. The groupings themselves are part of the contract: tests are
//! written against these exact ten products, not just against the union of
//! primes they cover.
//!
//! ## References
//!
//! - NIST FIPS 186-4, Appendix C.6 — this pre-filter is the "trial division
//!   by small primes" step the Shawe–Taylor loop performs before the
//!   Lucas-style witness test on each candidate.

use rug::Integer;

/// Largest prime this sieve tests against.
pub const SMALL_FACTOR_LIMIT: u32 = 211;

/// Ten groups of primes ≤ 211, each group's product fitting in a `u32`.
const GROUPS: &[&[u32]] = &[
    &[2, 3, 5, 7, 11, 13, 17, 19, 23],
    &[29, 31, 37, 41, 43],
    &[47, 53, 59, 61, 67],
    &[71, 73, 79, 83],
    &[89, 97, 101, 103],
    &[107, 109, 113, 127],
    &[131, 137, 139, 149],
    &[151, 157, 163, 167],
    &[173, 179, 181, 191],
    &[193, 197, 199, 211],
];

/// Returns `true` if any prime ≤ [`SMALL_FACTOR_LIMIT`] divides `candidate`.
///
/// # Panics
///
/// Debug builds assert `candidate >= 2`, the precondition every caller in
/// this crate already upholds.
pub fn has_any_small_factors(candidate: &Integer) -> bool {
    debug_assert!(*candidate >= 2u32, "candidate must be >= 2");
    for group in GROUPS {
        let product: u32 = group.iter().product();
        let r = candidate.mod_u(product);
        if group.iter().any(|&p| r % p == 0) {
            return true;
        }
    }
    false
}
