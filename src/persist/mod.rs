//! Collaborator interfaces for persistence and authorization. The graph
//! core consumes these seams; concrete backends live behind them.

mod file;
mod memory;

pub use file::JsonSnapshotLog;
pub use memory::{InMemoryDirectory, InMemorySnapshotLog, StaticAuth};

use crate::model::{
    GraphSnapshot, ModuleDef, Policy, Principal, RawGraph, Role, SnapshotMeta, Tenant, User,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Duplicate unique key (tenant or module name, case-insensitive).
    #[error("{0} already exists")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage failure: {0}")]
    Io(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only snapshot history. The active graph is always the newest
/// snapshot; there is no mutable graph record.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn latest(&self) -> StoreResult<Option<GraphSnapshot>>;

    /// Record a brand-new full snapshot and return it.
    async fn append(
        &self,
        uploader_id: &str,
        filename: &str,
        content: RawGraph,
    ) -> StoreResult<GraphSnapshot>;

    /// Newest first, content excluded.
    async fn list_metadata(&self) -> StoreResult<Vec<SnapshotMeta>>;
}

/// Tenants, module definitions, users, and access policies.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>>;
    async fn get_tenant(&self, id: &str) -> StoreResult<Option<Tenant>>;
    async fn upsert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant>;
    async fn delete_tenant(&self, id: &str) -> StoreResult<()>;

    async fn list_modules(&self) -> StoreResult<Vec<ModuleDef>>;
    async fn upsert_module(&self, module: ModuleDef) -> StoreResult<ModuleDef>;
    async fn delete_module(&self, name: &str) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn set_user_role(&self, id: &str, role: Role) -> StoreResult<()>;
    async fn delete_user(&self, id: &str) -> StoreResult<()>;

    /// Feature list granted to a tenant for a module; empty when no policy
    /// is recorded.
    async fn get_policy(&self, tenant_id: &str, module: &str) -> StoreResult<Vec<String>>;
    async fn set_policy(&self, policy: Policy) -> StoreResult<()>;
}

/// Session issuance is out of scope; the core only ever asks who the
/// current caller is.
pub trait AuthProvider: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;
}
