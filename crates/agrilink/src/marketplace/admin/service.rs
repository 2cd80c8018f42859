use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use super::domain::TableName;
use super::repository::AuditStore;
use crate::marketplace::identity::password;
use crate::marketplace::store::RepositoryError;

/// Admin identity, hashed at construction so the plaintext never outlives
/// startup.
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    pub fn new(username: &str, secret: &str) -> Result<Self, AdminError> {
        let password_hash =
            password::hash_secret(secret).map_err(|err| AdminError::Hashing(err.to_string()))?;
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    fn verify(&self, username: &str, secret: &str) -> bool {
        if self.username != username {
            return false;
        }
        password::verify_secret(secret, &self.password_hash).unwrap_or(false)
    }
}

/// Read/delete access across all store collections.
pub struct AdminService<T> {
    store: Arc<T>,
    credentials: AdminCredentials,
}

impl<T> AdminService<T>
where
    T: AuditStore + 'static,
{
    pub fn new(store: Arc<T>, credentials: AdminCredentials) -> Self {
        Self { store, credentials }
    }

    pub fn login(&self, username: &str, secret: &str) -> Result<(), AdminError> {
        if self.credentials.verify(username, secret) {
            Ok(())
        } else {
            warn!(username, "rejected admin login");
            Err(AdminError::Unauthorized)
        }
    }

    /// Dump every known table. Credentials are re-verified on each call.
    pub fn all_records(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<BTreeMap<&'static str, Vec<serde_json::Value>>, AdminError> {
        self.login(username, secret)?;
        let mut records = BTreeMap::new();
        for table in TableName::ALL {
            records.insert(table.as_str(), self.store.rows(table)?);
        }
        Ok(records)
    }

    /// Delete one row by id. No cascade: references from other collections
    /// are left dangling, and readers tolerate that.
    pub fn delete_record(
        &self,
        username: &str,
        secret: &str,
        table: &str,
        id: u64,
    ) -> Result<(), AdminError> {
        self.login(username, secret)?;
        let table = TableName::parse(table).ok_or_else(|| AdminError::InvalidTable {
            name: table.to_string(),
        })?;
        self.store.delete(table, id).map_err(|err| match err {
            RepositoryError::NotFound => AdminError::NotFound,
            other => AdminError::Repository(other),
        })?;
        warn!(table = table.as_str(), id, "admin deleted record");
        Ok(())
    }
}

/// Error raised by the audit interface.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid admin credentials")]
    Unauthorized,
    #[error("unknown table: {name}")]
    InvalidTable { name: String },
    #[error("record not found")]
    NotFound,
    #[error("credential hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
