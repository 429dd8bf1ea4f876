//! Author Entity
//!
//! Authors sign in with email and password. The clear text password only
//! exists on [`AuthorDraft`]; sealing the draft replaces it with a hash, and
//! only sealed [`NewAuthor`] values reach the store.

use chrono::{DateTime, Utc};
use kernel::id::AuthorId;
use platform::password::{
    ClearTextPassword, CredentialManager, HashedPassword, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH, PasswordHashError,
};

use crate::domain::validation::{ValidationErrors, is_valid_email};

pub const EMAIL_MIN: usize = 2;
pub const EMAIL_MAX: usize = 255;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;

/// Stored author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub email: String,
    pub name: String,
    pub password_hash: HashedPassword,
    pub created: DateTime<Utc>,
}

/// Author fields as submitted, secret still in clear text
#[derive(Debug)]
pub struct AuthorDraft {
    pub email: String,
    pub name: String,
    pub password: ClearTextPassword,
}

/// Author fields ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub email: String,
    pub name: String,
    pub password_hash: HashedPassword,
}

impl AuthorDraft {
    /// Surrounding whitespace is dropped from the email; case is kept
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<ClearTextPassword>,
    ) -> Self {
        let email = email.into();
        Self {
            email: email.trim().to_string(),
            name: name.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check_length("email", &self.email, EMAIL_MIN, EMAIL_MAX);
        if !self.email.is_empty() && !is_valid_email(&self.email) {
            errors.push("email", "must be a valid email address");
        }

        let password_len = self.password.char_len();
        if password_len == 0 {
            errors.push("password", "cannot be blank");
        } else if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&password_len) {
            errors.push(
                "password",
                format!(
                    "the length must be between {} and {}",
                    MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
                ),
            );
        }

        errors.check_length("name", &self.name, NAME_MIN, NAME_MAX);

        errors.into_result()
    }

    /// Hash the secret and drop the clear text
    pub fn seal(self, credentials: &CredentialManager) -> Result<NewAuthor, PasswordHashError> {
        let password_hash = credentials.hash(&self.password)?;
        Ok(NewAuthor {
            email: self.email,
            name: self.name,
            password_hash,
        })
    }
}
