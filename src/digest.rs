//! Hash abstraction consumed by [`crate::shawe_taylor`].
//!
//! FIPS 186-4 C.6 is parameterized over "a hash function" (SHA-256 in the
//! common case, but the construction itself never reaches inside one). This
//! trait is the minimal surface `generate_random_prime` needs: how many bytes
//! one invocation produces, how to feed it input, and how to pull the digest
//! out and reset for the next invocation. Concrete hash algorithms are
//! adapted in, not reimplemented.

/// A resettable hash function.
///
/// Implementations must behave as a single absorb-then-squeeze round per
/// [`Digest::update`]/[`Digest::finish_reset`] pair: `finish_reset` writes
/// exactly [`Digest::digest_size`] bytes and returns the instance to its
/// initial state, ready for the next `update`.
pub trait Digest {
    /// Output size of one invocation, in bytes.
    fn digest_size(&self) -> usize;

    /// Absorb `input`.
    fn update(&mut self, input: &[u8]);

    /// Write `digest_size()` bytes to `output` and reset internal state.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `output.len() != digest_size()`.
    fn finish_reset(&mut self, output: &mut [u8]);
}

/// Hash `input` in one shot and return the digest, resetting `digest`
/// afterward.
pub fn hash_once(digest: &mut dyn Digest, input: &[u8]) -> Vec<u8> {
    digest.update(input);
    let mut out = vec![0u8; digest.digest_size()];
    digest.finish_reset(&mut out);
    out
}

/// SHA-256 adapter.
#[derive(Default)]
pub struct Sha256Digest(sha2::Sha256);

impl Sha256Digest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Digest for Sha256Digest {
    fn digest_size(&self) -> usize {
        32
    }

    fn update(&mut self, input: &[u8]) {
        sha2::Digest::update(&mut self.0, input);
    }

    fn finish_reset(&mut self, output: &mut [u8]) {
        let result = sha2::Digest::finalize_reset(&mut self.0);
        output.copy_from_slice(&result);
    }
}

/// SHA-512 adapter, for callers targeting longer digests (e.g. very large
/// Shawe–Taylor recursion bases where a wider `cLen` reduces hash calls).
#[derive(Default)]
pub struct Sha512Digest(sha2::Sha512);

impl Sha512Digest {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Digest for Sha512Digest {
    fn digest_size(&self) -> usize {
        64
    }

    fn update(&mut self, input: &[u8]) {
        sha2::Digest::update(&mut self.0, input);
    }

    fn finish_reset(&mut self, output: &mut [u8]) {
        let result = sha2::Digest::finalize_reset(&mut self.0);
        output.copy_from_slice(&result);
    }
}
