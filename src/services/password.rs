//! Salted one-way password hashing (argon2id, PHC string format).

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("failed to hash password: {0}")]
    Hash(password_hash::Error),
    #[error("hashing task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Work factor from memory (KiB) and iteration count, argon2 defaults where unset.
    pub fn with_cost(
        memory_kib: Option<u32>,
        iterations: Option<u32>,
    ) -> Result<Self, HashError> {
        let params = Params::new(
            memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            iterations.unwrap_or(Params::DEFAULT_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(HashError::Params)?;
        Ok(Self::new(params))
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(HashError::Hash)
    }

    /// Returns false on mismatch and on an unparseable stored hash.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// [`hash`](Self::hash) on the blocking pool so request workers are not stalled.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    pub async fn verify_blocking(
        &self,
        plaintext: String,
        hash: String,
    ) -> Result<bool, HashError> {
        let hasher = self.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash)).await?)
    }
}
