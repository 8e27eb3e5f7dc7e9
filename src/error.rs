//! Error type for the prime engine.
//!
//! A small `Debug + Clone` enum with a hand-written `Display`, rather than a
//! `thiserror` derive — the same shape used for GWNUM/hardware-level errors
//! elsewhere in this codebase. `anyhow` is for call sites that aggregate many
//! error sources (the CLI binary); this crate's deep numeric modules report
//! exactly the failures spec'd in FIPS 186-4 C.3/C.6 and nothing else.

use std::fmt;

/// Failure modes of the prime engine. Every failure here is total: the call
/// that raised it produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeError {
    /// A precondition was violated (bad bit length, empty seed, non-positive
    /// iteration count, out-of-range base, ...).
    InvalidArgument(String),
    /// Shawe–Taylor exceeded its iteration budget (`4 * length` in the base
    /// case, `4 * length + old_counter` in the recursive case). Indicates a
    /// pathological input or an adversarial seed.
    GenerationExhausted {
        bit_length: u32,
        prime_gen_counter: u64,
    },
}

impl PrimeError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        PrimeError::InvalidArgument(msg.into())
    }
}

impl fmt::Display for PrimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimeError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            PrimeError::GenerationExhausted {
                bit_length,
                prime_gen_counter,
            } => write!(
                f,
                "Shawe-Taylor generation exhausted its budget for a {bit_length}-bit prime \
                 after {prime_gen_counter} prime_gen_counter steps"
            ),
        }
    }
}

impl std::error::Error for PrimeError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PrimeError>;
