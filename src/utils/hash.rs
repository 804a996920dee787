// src/utils/hash.rs

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::store::StoreError;

/// One-way password hashing capability used by the store.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, StoreError>;

    /// Fails closed: any internal error is reported as a mismatch.
    fn verify(&self, password_hash: &str, password: &str) -> bool;
}

/// Argon2id with a random per-password salt.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hasher with explicit cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, StoreError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| StoreError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, StoreError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StoreError::Hashing(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    fn verify(&self, password_hash: &str, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
