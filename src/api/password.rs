//! Password hashing helpers.
//!
//! Digests are Argon2id PHC strings with a random per-password salt, so the
//! algorithm parameters travel with each digest and verification keeps
//! working after the configured cost changes.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::rngs::OsRng;

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    /// # Errors
    /// Returns an error if the parameters are outside the ranges Argon2 accepts.
    pub fn new(config: HashConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| anyhow!("invalid Argon2 parameters: {e}"))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh salt.
    ///
    /// # Errors
    /// Returns an error if the Argon2 primitive fails.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("failed to hash password: {e}"))?
            .to_string();
        Ok(hash)
    }

    /// Check `candidate` against a stored digest. Malformed digests never match.
    #[must_use]
    pub fn verify(&self, digest: &str, candidate: &str) -> bool {
        PasswordHash::new(digest).is_ok_and(|parsed| {
            self.argon2()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}
