//! # primeforge — FIPS 186-4 Prime Generation and Primality Testing
//!
//! Implements the two FIPS 186-4 constructions for producing and validating
//! large primes:
//!
//! - **C.3 Miller–Rabin** ([`miller_rabin`]) — probabilistic primality testing,
//!   in both the plain (`is_probable_prime`) and enhanced (`enhanced_probable_prime_test`)
//!   forms. The enhanced variant upgrades a plain pass/fail into a tri-valued
//!   [`miller_rabin::MillerRabinOutput`] that distinguishes "probably prime" from the
//!   two ways a composite witness can be extracted.
//! - **C.6 Shawe–Taylor** ([`shawe_taylor`]) — a deterministic, hash-driven
//!   provable-prime construction. Given a digest algorithm, a target bit
//!   length, and a seed, it recurses on bit length down to a 32-bit base case
//!   and builds a primality certificate on the way back up via Pocklington-
//!   style lifting.
//!
//! ## Module Organization
//!
//! - [`bigint`] — the arithmetic façade consumed by the engine: thin helpers
//!   over `rug::Integer` (`value_of`, `bit_length`, `create_random_in_range`).
//!   Everything else (mod-exp, gcd, shifts, bit tests) is `rug::Integer`
//!   itself; there is no reimplementation.
//! - [`sieve`] — the small-factor sieve, `has_any_small_factors`, bundling
//!   primes up to [`sieve::SMALL_FACTOR_LIMIT`] into ten fixed groups for
//!   single-pass `mod_u` reduction.
//! - [`primality32`] — exact primality for candidates that fit in a `u32`,
//!   used as the Shawe–Taylor base case.
//! - [`miller_rabin`] — the probabilistic engine.
//! - [`shawe_taylor`] — the provable-prime generator.
//! - [`digest`] — the `Digest` trait Shawe–Taylor is generic over, plus
//!   `sha2`-backed adapters.
//! - [`error`] — [`error::PrimeError`], the engine's only error type.
//!
//! ## Design Philosophy
//!
//! Every operation here is synchronous, single-threaded, and side-effect
//! free beyond the caller-supplied RNG and digest: no shared state survives
//! a call, and no result aliases its inputs. See each module's invariants
//! for the exact contract.

pub mod bigint;
pub mod digest;
pub mod error;
pub mod miller_rabin;
pub mod primality32;
pub mod shawe_taylor;
pub mod sieve;

pub use error::{PrimeError, Result};
pub use miller_rabin::{
    enhanced_probable_prime_test, is_probable_prime, is_probable_prime_to_base, MillerRabinOutput,
};
pub use shawe_taylor::{generate_random_prime, ShawTaylorOutput};
pub use sieve::{has_any_small_factors, SMALL_FACTOR_LIMIT};
