//! FIPS 186-4 Appendix C.3 — Miller–Rabin probabilistic primality testing.
//!
//! Two entry points share one decomposition and one witness loop:
//!
//! - [`is_probable_prime`] — the plain C.3.1 test, a bare `bool`.
//! - [`enhanced_probable_prime_test`] — C.3.2, which additionally extracts a
//!   factor when it can, distinguishing the three shapes of
//!   [`MillerRabinOutput`].
//!
//! Both draw bases from the caller's RNG via
//! [`crate::bigint::create_random_in_range`]; neither retries on a degenerate
//! RNG stream — that is the caller's contract to uphold.

use crate::bigint::create_random_in_range;
use crate::error::{PrimeError, Result};
use rand::RngCore;
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Verdict of [`enhanced_probable_prime_test`].
///
/// Exactly one of three shapes is ever constructed; `factor` and
/// `provably_composite` can never disagree because there is no field to
/// disagree in — the tag *is* the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MillerRabinOutput {
    ProbablyPrime,
    ProvablyCompositeWithFactor { factor: String },
    ProvablyCompositeNotPrimePower,
}

impl MillerRabinOutput {
    fn with_factor(factor: Integer) -> Self {
        MillerRabinOutput::ProvablyCompositeWithFactor {
            factor: factor.to_string(),
        }
    }

    /// `true` for either composite shape.
    pub fn is_provably_composite(&self) -> bool {
        !matches!(self, MillerRabinOutput::ProbablyPrime)
    }

    /// The extracted factor, if this verdict carries one.
    pub fn factor(&self) -> Option<Integer> {
        match self {
            MillerRabinOutput::ProvablyCompositeWithFactor { factor } => {
                Some(Integer::from_str_radix(factor, 10).expect("factor is always a valid decimal integer"))
            }
            _ => None,
        }
    }

    /// `true` iff composite and no factor could be extracted.
    pub fn is_not_prime_power(&self) -> bool {
        matches!(self, MillerRabinOutput::ProvablyCompositeNotPrimePower)
    }
}

/// `candidate − 1 = m · 2ᵃ` with `m` odd.
fn decompose(candidate_minus_one: &Integer) -> (u32, Integer) {
    let mut a: u32 = 0;
    let mut m = candidate_minus_one.clone();
    while m.is_even() {
        m >>= 1;
        a += 1;
    }
    (a, m)
}

fn check_preconditions(candidate: &Integer, iterations: i64) -> Result<()> {
    if *candidate < 2 {
        return Err(PrimeError::invalid_argument(format!(
            "candidate must be >= 2, got {candidate}"
        )));
    }
    if iterations < 1 {
        return Err(PrimeError::invalid_argument(format!(
            "iterations must be >= 1, got {iterations}"
        )));
    }
    Ok(())
}

/// Plain FIPS 186-4 C.3.1 Miller–Rabin test.
pub fn is_probable_prime<R: RngCore + ?Sized>(
    candidate: &Integer,
    rng: &mut R,
    iterations: i64,
) -> Result<bool> {
    check_preconditions(candidate, iterations)?;

    if candidate.significant_bits() == 2 {
        // candidate is 2 or 3.
        return Ok(true);
    }
    if candidate.is_even() {
        return Ok(false);
    }

    let candidate_minus_one = Integer::from(candidate - 1u32);
    let (a, m) = decompose(&candidate_minus_one);
    let lower = Integer::from(2u32);
    let upper = Integer::from(candidate - 2u32);

    for _ in 0..iterations {
        let base = create_random_in_range(&lower, &upper, rng)?;
        if !probable_prime_to_base(candidate, &candidate_minus_one, &m, a, &base) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Inner witness loop shared by the plain and fixed-base tests.
fn probable_prime_to_base(
    candidate: &Integer,
    candidate_minus_one: &Integer,
    m: &Integer,
    a: u32,
    base: &Integer,
) -> bool {
    let mut z = base.clone().pow_mod(m, candidate).expect("modulus > 0");
    if z == 1u32 || &z == candidate_minus_one {
        return true;
    }
    for _ in 1..a {
        z.square_mut();
        z %= candidate;
        if &z == candidate_minus_one {
            return true;
        }
        if z == 1u32 {
            return false;
        }
    }
    false
}

/// FIPS 186-4 C.3.2 enhanced Miller–Rabin test, with composite-witness
/// extraction.
pub fn enhanced_probable_prime_test<R: RngCore + ?Sized>(
    candidate: &Integer,
    rng: &mut R,
    iterations: i64,
) -> Result<MillerRabinOutput> {
    check_preconditions(candidate, iterations)?;

    if candidate.significant_bits() == 2 {
        return Ok(MillerRabinOutput::ProbablyPrime);
    }
    if candidate.is_even() {
        return Ok(MillerRabinOutput::with_factor(Integer::from(2u32)));
    }

    let candidate_minus_one = Integer::from(candidate - 1u32);
    let (a, m) = decompose(&candidate_minus_one);
    let lower = Integer::from(2u32);
    let upper = Integer::from(candidate - 2u32);

    'iterations: for _ in 0..iterations {
        let base = create_random_in_range(&lower, &upper, rng)?;

        let g = base.clone().gcd(candidate);
        if g > 1u32 {
            debug!(factor = %g, "base shares a factor with the candidate");
            return Ok(MillerRabinOutput::with_factor(g));
        }

        let mut z = base.pow_mod(&m, candidate).expect("modulus > 0");
        if z == 1u32 || z == candidate_minus_one {
            continue 'iterations;
        }

        let mut x = z.clone();
        let mut prime_to_base = false;
        for _ in 1..a {
            x = z.clone();
            z.square_mut();
            z %= candidate;
            if z == candidate_minus_one {
                prime_to_base = true;
                break;
            }
            if z == 1u32 {
                break;
            }
        }

        if prime_to_base {
            continue 'iterations;
        }

        if z != 1u32 {
            x = z.clone();
            z.square_mut();
            z %= candidate;
            if z != 1u32 {
                x = z;
            }
        }

        let g = Integer::from(&x - 1u32).gcd(candidate);
        if g > 1u32 {
            debug!(factor = %g, "enhanced Miller-Rabin extracted a composite witness");
            return Ok(MillerRabinOutput::with_factor(g));
        }
        debug!("enhanced Miller-Rabin found a non-trivial root of unity but no factor");
        return Ok(MillerRabinOutput::ProvablyCompositeNotPrimePower);
    }

    Ok(MillerRabinOutput::ProbablyPrime)
}

/// Fixed-base Miller–Rabin witness check.
pub fn is_probable_prime_to_base(candidate: &Integer, base: &Integer) -> Result<bool> {
    if *candidate < 2 {
        return Err(PrimeError::invalid_argument(format!(
            "candidate must be >= 2, got {candidate}"
        )));
    }
    let candidate_minus_one = Integer::from(candidate - 1u32);
    if *base >= candidate_minus_one || *base < 2u32 {
        return Err(PrimeError::invalid_argument(format!(
            "base must satisfy 2 <= base < candidate - 1, got base={base}, candidate={candidate}"
        )));
    }

    if candidate.significant_bits() == 2 {
        return Ok(true);
    }
    if candidate.is_even() {
        return Ok(false);
    }

    let (a, m) = decompose(&candidate_minus_one);
    Ok(probable_prime_to_base(candidate, &candidate_minus_one, &m, a, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn rejects_carmichael_number_561() {
        // 561 = 3 * 11 * 17
        assert!(!is_probable_prime(&Integer::from(561u32), &mut rng(), 40).unwrap());
    }

    #[test]
    fn accepts_mersenne_prime_2_31_minus_1() {
        assert!(is_probable_prime(&Integer::from(2_147_483_647u32), &mut rng(), 40).unwrap());
    }

    #[test]
    fn enhanced_test_on_15_finds_a_factor() {
        // 15 = 3 * 5
        let result = enhanced_probable_prime_test(&Integer::from(15u32), &mut rng(), 10).unwrap();
        match result {
            MillerRabinOutput::ProvablyCompositeWithFactor { factor } => {
                assert!(factor == "3" || factor == "5", "unexpected factor {factor}");
            }
            other => panic!("expected a factor, got {other:?}"),
        }
    }

    #[test]
    fn enhanced_test_accepts_small_primes() {
        for &p in &[2u32, 3, 5, 7, 11, 13] {
            let result =
                enhanced_probable_prime_test(&Integer::from(p), &mut rng(), 10).unwrap();
            assert_eq!(result, MillerRabinOutput::ProbablyPrime, "p={p}");
        }
    }

    #[test]
    fn even_candidate_yields_factor_two() {
        let result = enhanced_probable_prime_test(&Integer::from(100u32), &mut rng(), 10).unwrap();
        assert_eq!(result, MillerRabinOutput::with_factor(Integer::from(2u32)));
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = is_probable_prime(&Integer::from(7u32), &mut rng(), 0).unwrap_err();
        assert!(matches!(err, PrimeError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_candidate_below_two() {
        let err = is_probable_prime(&Integer::from(1u32), &mut rng(), 1).unwrap_err();
        assert!(matches!(err, PrimeError::InvalidArgument(_)));
    }

    #[test]
    fn fixed_base_matches_plain_test_on_known_prime() {
        let candidate = Integer::from(104_729u32); // 10000th prime
        assert!(is_probable_prime_to_base(&candidate, &Integer::from(2u32)).unwrap());
        assert!(is_probable_prime_to_base(&candidate, &Integer::from(3u32)).unwrap());
    }

    #[test]
    fn fixed_base_rejects_out_of_range_base() {
        let candidate = Integer::from(97u32);
        let err = is_probable_prime_to_base(&candidate, &Integer::from(96u32)).unwrap_err();
        assert!(matches!(err, PrimeError::InvalidArgument(_)));
    }

    #[test]
    fn factor_accessor_round_trips() {
        let out = MillerRabinOutput::with_factor(Integer::from(7u32));
        assert!(out.is_provably_composite());
        assert_eq!(out.factor(), Some(Integer::from(7u32)));
        assert!(!out.is_not_prime_power());
    }

    #[test]
    fn not_prime_power_predicate() {
        let out = MillerRabinOutput::ProvablyCompositeNotPrimePower;
        assert!(out.is_provably_composite());
        assert!(out.is_not_prime_power());
        assert_eq!(out.factor(), None);
    }

    #[test]
    fn probably_prime_predicate() {
        let out = MillerRabinOutput::ProbablyPrime;
        assert!(!out.is_provably_composite());
        assert!(!out.is_not_prime_power());
        assert_eq!(out.factor(), None);
    }

    #[test]
    fn serde_tagged_round_trip() {
        let out = MillerRabinOutput::with_factor(Integer::from(13u32));
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"type\":\"ProvablyCompositeWithFactor\""));
        let back: MillerRabinOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
    }

    #[test]
    fn small_composites_always_find_a_witness() {
        // P4 (sampled): for small composites, at least one base rejects.
        for n in [4u32, 6, 8, 9, 10, 15, 21, 25, 27, 33, 35, 49, 221, 561, 1105] {
            let candidate = Integer::from(n);
            let found_witness = (2..n - 1).any(|b| {
                !is_probable_prime_to_base(&candidate, &Integer::from(b)).unwrap_or(true)
            });
            assert!(found_witness, "no witness found rejecting {n}");
        }
    }

    #[test]
    fn small_primes_pass_every_base() {
        // P5 (sampled): every base in range accepts a small prime.
        for &p in &[3u32, 5, 7, 11, 13, 17, 19, 23, 97, 101] {
            let candidate = Integer::from(p);
            for b in 2..p - 1 {
                assert!(
                    is_probable_prime_to_base(&candidate, &Integer::from(b)).unwrap(),
                    "p={p} b={b}"
                );
            }
        }
    }
}
