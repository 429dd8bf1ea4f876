//! Password Hashing and Verification
//!
//! The credential manager used by account creation and login:
//! - Argon2id hashing (memory-hard, salted, PHC string output)
//! - Configurable work factor via [`PasswordCost`]
//! - Zeroization of clear text secrets
//! - Malformed stored digests verify as `false`, never panic
//!
//! Length policy for secrets belongs to the entity validators, not here.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum secret length accepted at account creation
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum secret length accepted at account creation
pub const MAX_PASSWORD_LENGTH: usize = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Argon2 parameters rejected (bad work factor configuration)
    #[error("Invalid password hashing parameters: {0}")]
    InvalidCost(String),

    /// Hashing operation failed (entropy source or internal failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Work factor
// ============================================================================

/// Argon2id work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordCost {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordCost {
    /// Cheapest parameters argon2 accepts. Local development and tests only.
    pub fn low() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: 1,
        }
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text secret with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop, Default)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Length in Unicode scalar values
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<String> for ClearTextPassword {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// Holds whatever the store returned. A value that is not a valid PHC
/// string simply never verifies.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a digest read back from storage
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Manager
// ============================================================================

/// Hashes new secrets and verifies login candidates
#[derive(Clone)]
pub struct CredentialManager {
    argon2: Argon2<'static>,
    cost: PasswordCost,
}

impl CredentialManager {
    pub fn new(cost: PasswordCost) -> Result<Self, PasswordHashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            cost,
        })
    }

    /// Hash a secret with a fresh random salt (128 bits)
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a candidate against a stored digest
    ///
    /// Parameters are read from the PHC string, so digests produced under an
    /// older work factor still verify. Argon2 compares in constant time.
    pub fn verify(&self, hashed: &HashedPassword, candidate: &ClearTextPassword) -> bool {
        let parsed_hash = match PasswordHash::new(&hashed.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(candidate.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("cost", &self.cost)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
