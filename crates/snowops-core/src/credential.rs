//! One-way credential hashing.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;

use crate::{Error, Result};

/// Turns a plaintext credential into an opaque, salted hash. The core never
/// persists plaintext and never compares hashes itself.
pub trait CredentialHasher: Send + Sync {
  fn hash(&self, plaintext: &str) -> Result<String>;
}

/// Argon2id with default parameters and a random salt; produces a PHC
/// string (`$argon2id$v=19$…`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
  fn hash(&self, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(plaintext.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| Error::Hash(e.to_string()))
  }
}
