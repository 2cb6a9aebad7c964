//! Password hashing

use crate::error::Result;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with a per-call random salt
pub fn hash_password(plaintext: &str) -> Result<String> {
    Ok(hash(plaintext, DEFAULT_COST)?)
}

/// Check a plaintext password against a stored hash.
///
/// bcrypt compares full digests, so verification time does not depend
/// on where the first mismatching byte sits.
pub fn verify_password(plaintext: &str, hashed: &str) -> Result<bool> {
    Ok(verify(plaintext, hashed)?)
}
