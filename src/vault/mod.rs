//! Credential vault: saved generated passwords, keyed by email.
//!
//! Passwords are Argon2id-hashed with a random salt before they reach any
//! backend; the plaintext is never persisted and the PHC hash string is the
//! only stored form. Listing is newest-first; deleting an id that is
//! already gone reports `NotFound` rather than success.

mod store;

pub use store::{CredentialStore, MemoryCredentialStore};

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// A saved credential as persisted. The hash never leaves the service.
#[derive(Clone, Debug)]
pub struct StoredCredential {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Vault failures in the taxonomy callers map to HTTP statuses.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),
    #[error("credential not found")]
    NotFound,
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("credential store failure")]
    Store(#[from] sqlx::Error),
}

/// Create/list/delete of previously generated passwords.
pub struct CredentialVault {
    store: CredentialStore,
}

impl CredentialVault {
    #[must_use]
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Hash and persist a password for `email`.
    ///
    /// # Errors
    ///
    /// `Validation` on an empty password, `Hash` when Argon2id fails,
    /// `Store` on backend failures. Nothing is persisted on any error.
    pub async fn save(&self, email: &str, password: &str) -> Result<StoredCredential, VaultError> {
        if password.is_empty() {
            return Err(VaultError::Validation("password is required".to_string()));
        }

        let password_hash = hash_password(password)?;
        let credential = StoredCredential {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        self.store.insert(&credential).await?;
        info!(email = %email, id = %credential.id, "credential saved");
        Ok(credential)
    }

    /// List saved credentials for `email`, newest first.
    ///
    /// # Errors
    ///
    /// `Store` on backend failures.
    pub async fn list(&self, email: &str) -> Result<Vec<StoredCredential>, VaultError> {
        Ok(self.store.list(email).await?)
    }

    /// Delete one credential by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no credential matched — including a repeat delete of
    /// an id that was already removed.
    pub async fn delete(&self, id: Uuid) -> Result<(), VaultError> {
        if self.store.delete(id).await? {
            info!(id = %id, "credential deleted");
            Ok(())
        } else {
            Err(VaultError::NotFound)
        }
    }
}

/// Argon2id with a fresh random salt, encoded as a PHC string.
fn hash_password(password: &str) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| VaultError::Hash(err.to_string()))
}
