use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Argon2id cost parameters.
///
/// Memory and parallelism are fixed across environments; the time cost is
/// raised in production to trade latency for brute-force resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_cost_kib: u32,
    /// Number of passes over memory
    pub time_cost: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Derived key length in bytes
    pub output_len: usize,
}

impl HashingParams {
    pub const MEMORY_COST_KIB: u32 = 64 * 1024;
    pub const PARALLELISM: u32 = 4;
    pub const OUTPUT_LEN: usize = 32;
    pub const PRODUCTION_TIME_COST: u32 = 4;
    pub const DEVELOPMENT_TIME_COST: u32 = 2;

    /// Parameters used when serving real traffic.
    pub fn production() -> Self {
        Self {
            memory_cost_kib: Self::MEMORY_COST_KIB,
            time_cost: Self::PRODUCTION_TIME_COST,
            parallelism: Self::PARALLELISM,
            output_len: Self::OUTPUT_LEN,
        }
    }

    /// Parameters used in development and test environments.
    pub fn development() -> Self {
        Self {
            time_cost: Self::DEVELOPMENT_TIME_COST,
            ..Self::production()
        }
    }

    /// Override the time cost.
    pub fn with_time_cost(mut self, time_cost: u32) -> Self {
        self.time_cost = time_cost;
        self
    }

    /// Override the memory cost.
    pub fn with_memory_cost_kib(mut self, memory_cost_kib: u32) -> Self {
        self.memory_cost_kib = memory_cost_kib;
        self
    }
}

/// Password hashing implementation.
///
/// Produces self-describing PHC strings (Argon2id) with a random salt, so two
/// hashes of the same password never compare equal.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a new password hasher.
    ///
    /// # Arguments
    /// * `params` - Argon2id cost parameters
    ///
    /// # Errors
    /// * `InvalidParameters` - Parameters are outside the ranges Argon2 accepts
    pub fn new(params: HashingParams) -> Result<Self, PasswordError> {
        let params = Params::new(
            params.memory_cost_kib,
            params.time_cost,
            params.parallelism,
            Some(params.output_len),
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Derivation failed (e.g. memory could not be allocated)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The derivation uses the parameters embedded in `hash`, not the ones
    /// this hasher was built with, so digests survive cost changes. The final
    /// comparison is constant-time.
    ///
    /// # Arguments
    /// * `hash` - Stored password hash in PHC string format
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash is malformed or derivation could not run
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}
