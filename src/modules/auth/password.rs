use crate::HmacSha256;
use pbkdf2::pbkdf2;
use rand::Rng;
use std::num::NonZeroU32;

/// PBKDF2 iteration count. Changing this invalidates every stored hash.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (256-bit).
const DERIVED_KEY_BYTES: usize = 32;

/// Salt length in bytes.
const SALT_BYTES: usize = 16;

/// Function to generate a random salt for PBKDF2
pub fn generate_random_salt() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..SALT_BYTES).map(|_| rng.gen()).collect()
}

/// Function to derive a password hash using PBKDF2-HMAC-SHA256
///
/// Deterministic: the same password and salt always produce the same
/// hex-encoded hash, which is what verification relies on. An empty
/// password is hashed like any other string.
pub fn hash_password(password: &str, salt: &[u8]) -> String {
    let mut key = vec![0u8; DERIVED_KEY_BYTES];
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS).unwrap();

    pbkdf2::<HmacSha256>(
        password.as_bytes(),
        salt,
        iterations.get().into(),
        &mut key,
    );

    hex::encode(key)
}

/// Function to verify a password against a stored hex-encoded hash
pub fn verify_password(password: &str, stored_hash: &str, salt: &[u8]) -> bool {
    let candidate = hash_password(password, salt);
    constant_time_eq(candidate.as_bytes(), stored_hash.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// A length mismatch rejects immediately; unequal lengths only occur on
/// corrupt stored data, never on secret-dependent input.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
