//! Credential store backends.
//!
//! The vault speaks to one of two backends: a process-local store used by
//! default and in tests, or Postgres when a DSN is configured. Queries are
//! instrumented the same way as the rest of the service's database access.

use std::sync::Mutex;

use sqlx::{PgPool, Row};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::StoredCredential;

/// Backend selection for the credential vault.
pub enum CredentialStore {
    Memory(MemoryCredentialStore),
    Postgres(PgPool),
}

impl CredentialStore {
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryCredentialStore::default())
    }

    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::Postgres(pool)
    }

    pub(super) async fn insert(&self, credential: &StoredCredential) -> Result<(), sqlx::Error> {
        match self {
            Self::Memory(memory) => {
                memory.insert(credential.clone());
                Ok(())
            }
            Self::Postgres(pool) => {
                let query = r"
                    INSERT INTO credentials (id, email, password_hash, created_at)
                    VALUES ($1, $2, $3, $4)
                ";
                let span = info_span!(
                    "db.query",
                    db.system = "postgresql",
                    db.operation = "INSERT",
                    db.statement = query
                );
                sqlx::query(query)
                    .bind(credential.id)
                    .bind(&credential.email)
                    .bind(&credential.password_hash)
                    .bind(credential.created_at)
                    .execute(pool)
                    .instrument(span)
                    .await?;
                Ok(())
            }
        }
    }

    pub(super) async fn list(&self, email: &str) -> Result<Vec<StoredCredential>, sqlx::Error> {
        match self {
            Self::Memory(memory) => Ok(memory.list(email)),
            Self::Postgres(pool) => {
                let query = r"
                    SELECT id, email, password_hash, created_at
                    FROM credentials
                    WHERE email = $1
                    ORDER BY created_at DESC
                ";
                let span = info_span!(
                    "db.query",
                    db.system = "postgresql",
                    db.operation = "SELECT",
                    db.statement = query
                );
                let rows = sqlx::query(query)
                    .bind(email)
                    .fetch_all(pool)
                    .instrument(span)
                    .await?;

                Ok(rows
                    .into_iter()
                    .map(|row| StoredCredential {
                        id: row.get("id"),
                        email: row.get("email"),
                        password_hash: row.get("password_hash"),
                        created_at: row.get("created_at"),
                    })
                    .collect())
            }
        }
    }

    /// Delete by id; `Ok(false)` when no row matched.
    pub(super) async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        match self {
            Self::Memory(memory) => Ok(memory.delete(id)),
            Self::Postgres(pool) => {
                let query = r"DELETE FROM credentials WHERE id = $1";
                let span = info_span!(
                    "db.query",
                    db.system = "postgresql",
                    db.operation = "DELETE",
                    db.statement = query
                );
                let result = sqlx::query(query)
                    .bind(id)
                    .execute(pool)
                    .instrument(span)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
        }
    }

    /// Backend reachability for the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(pool) => {
                use sqlx::Connection;
                let span = info_span!(
                    "db.ping",
                    db.system = "postgresql",
                    db.operation = "PING"
                );
                let mut conn = pool.acquire().await?;
                conn.ping().instrument(span).await
            }
        }
    }

    /// Human-readable backend name for health reporting.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

/// Process-local credential storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<Vec<StoredCredential>>,
}

impl MemoryCredentialStore {
    fn insert(&self, credential: StoredCredential) {
        self.credentials
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(credential);
    }

    fn list(&self, email: &str) -> Vec<StoredCredential> {
        let credentials = self
            .credentials
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Insertion order is creation order; newest-first is the reverse,
        // which also keeps same-timestamp entries deterministic.
        let mut matching: Vec<StoredCredential> = credentials
            .iter()
            .filter(|credential| credential.email == email)
            .cloned()
            .collect();
        matching.reverse();
        matching
    }

    fn delete(&self, id: Uuid) -> bool {
        let mut credentials = self
            .credentials
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = credentials.len();
        credentials.retain(|credential| credential.id != id);
        credentials.len() != before
    }
}
