use super::domain::TableName;
use crate::marketplace::store::RepositoryError;

/// Raw table access for the audit interface. Rows come back as JSON values
/// so the viewer needs no per-entity knowledge; user rows must not include
/// the credential hash.
pub trait AuditStore: Send + Sync {
    fn rows(&self, table: TableName) -> Result<Vec<serde_json::Value>, RepositoryError>;
    fn delete(&self, table: TableName, id: u64) -> Result<(), RepositoryError>;
}
