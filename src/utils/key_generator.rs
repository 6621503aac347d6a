//! Public key generation and admin secret derivation.
//!
//! Keys are drawn uniformly from `A-Z0-9` (36 symbols) using the thread-local
//! CSPRNG from `rand`, which is ChaCha-based and seeded from the operating
//! system. A 5-character key gives 36^5 (about 60.5 million) combinations: few
//! enough that collisions must still be checked against the store.

use rand::Rng;

/// Symbols a key may contain.
pub const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default length of a public key.
pub const DEFAULT_KEY_LENGTH: usize = 5;

/// Default length of the random suffix in a secret key.
pub const DEFAULT_SECRET_SUFFIX_LENGTH: usize = 8;

/// Joins the public key and the random suffix of a secret key.
pub const SECRET_KEY_SEPARATOR: char = '_';

/// Generates a random key of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key(5);
/// assert_eq!(key.len(), 5);
/// assert!(key.bytes().all(|b| KEY_ALPHABET.contains(&b)));
/// ```
pub fn generate_key(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..KEY_ALPHABET.len());
            KEY_ALPHABET[idx] as char
        })
        .collect()
}

/// Source of candidate keys.
///
/// Production code uses [`RandomKeyGenerator`]; tests substitute scripted
/// generators to force collisions deterministically.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// [`KeyGenerator`] backed by [`generate_key`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, length: usize) -> String {
        generate_key(length)
    }
}

/// Derives the admin secret for `public_key`.
///
/// The result is `<public_key>_<suffix>`, where the suffix is fresh randomness
/// independent of the public key. Holding the secret is the only authorization
/// needed to deactivate the mapping.
pub fn derive_secret_key(
    generator: &dyn KeyGenerator,
    public_key: &str,
    suffix_length: usize,
) -> String {
    let suffix = generator.generate(suffix_length);
    format!("{public_key}{SECRET_KEY_SEPARATOR}{suffix}")
}

/// Returns true if `value` is a non-empty string over [`KEY_ALPHABET`].
pub fn is_valid_key(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| KEY_ALPHABET.contains(&b))
}
