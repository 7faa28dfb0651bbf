//! In-memory implementations of the persistence collaborators, used for
//! tests and as the default directory backend.

use super::{AuthProvider, DirectoryStore, SnapshotStore, StoreError, StoreResult};
use crate::model::{
    epoch_now, GraphSnapshot, ModuleDef, Policy, Principal, RawGraph, Role, SnapshotMeta, Tenant,
    User,
};
use crate::taxonomy;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemorySnapshotLog {
    snapshots: RwLock<Vec<GraphSnapshot>>,
    next_id: AtomicU64,
}

impl InMemorySnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotLog {
    async fn latest(&self) -> StoreResult<Option<GraphSnapshot>> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .iter()
            .max_by_key(|s| (s.timestamp, s.id))
            .cloned())
    }

    async fn append(
        &self,
        uploader_id: &str,
        filename: &str,
        content: RawGraph,
    ) -> StoreResult<GraphSnapshot> {
        let snapshot = GraphSnapshot {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            uploader_id: uploader_id.to_string(),
            filename: filename.to_string(),
            content,
            timestamp: epoch_now(),
        };

        debug!(id = snapshot.id, filename, "appending graph snapshot");
        self.snapshots.write().await.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn list_metadata(&self) -> StoreResult<Vec<SnapshotMeta>> {
        let snapshots = self.snapshots.read().await;
        let mut metas: Vec<SnapshotMeta> = snapshots.iter().map(|s| s.meta()).collect();
        metas.sort_by_key(|m| std::cmp::Reverse((m.timestamp, m.id)));
        Ok(metas)
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    tenants: RwLock<Vec<Tenant>>,
    modules: RwLock<Vec<ModuleDef>>,
    users: RwLock<Vec<User>>,
    policies: RwLock<Vec<Policy>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed module definitions from the built-in taxonomy table.
    pub fn with_taxonomy_modules() -> Self {
        let modules = taxonomy::MODULES
            .iter()
            .map(|(name, color)| ModuleDef {
                name: name.to_string(),
                color: color.to_string(),
            })
            .collect();

        Self {
            modules: RwLock::new(modules),
            ..Default::default()
        }
    }

    pub async fn seed_tenant(&self, tenant: Tenant) {
        self.tenants.write().await.push(tenant);
    }

    pub async fn seed_user(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        Ok(self.tenants.read().await.clone())
    }

    async fn get_tenant(&self, id: &str) -> StoreResult<Option<Tenant>> {
        Ok(self
            .tenants
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn upsert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant> {
        let mut tenants = self.tenants.write().await;

        // Name uniqueness is case-insensitive across distinct tenants.
        let name_taken = tenants
            .iter()
            .any(|t| t.id != tenant.id && t.name.eq_ignore_ascii_case(&tenant.name));
        if name_taken {
            return Err(StoreError::Conflict(format!("Company '{}'", tenant.name)));
        }

        match tenants.iter_mut().find(|t| t.id == tenant.id) {
            Some(existing) => *existing = tenant.clone(),
            None => tenants.push(tenant.clone()),
        }
        Ok(tenant)
    }

    async fn delete_tenant(&self, id: &str) -> StoreResult<()> {
        let mut tenants = self.tenants.write().await;
        let before = tenants.len();
        tenants.retain(|t| t.id != id);
        if tenants.len() == before {
            return Err(StoreError::NotFound(format!("company {}", id)));
        }
        Ok(())
    }

    async fn list_modules(&self) -> StoreResult<Vec<ModuleDef>> {
        Ok(self.modules.read().await.clone())
    }

    async fn upsert_module(&self, module: ModuleDef) -> StoreResult<ModuleDef> {
        let mut modules = self.modules.write().await;

        // An exact name match is an update; a case-insensitive-only match
        // is a uniqueness violation against a distinct entry.
        if let Some(existing) = modules.iter_mut().find(|m| m.name == module.name) {
            existing.color = module.color.clone();
            return Ok(module);
        }
        if modules
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(&module.name))
        {
            return Err(StoreError::Conflict(format!("Module '{}'", module.name)));
        }

        modules.push(module.clone());
        Ok(module)
    }

    async fn delete_module(&self, name: &str) -> StoreResult<()> {
        let mut modules = self.modules.write().await;
        let before = modules.len();
        // Deletion does not cascade to graph nodes; they keep the stale
        // module label and fall back to the default color.
        modules.retain(|m| !m.name.eq_ignore_ascii_case(name));
        if modules.len() == before {
            return Err(StoreError::NotFound(format!("module {}", name)));
        }
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn set_user_role(&self, id: &str, role: Role) -> StoreResult<()> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("user {}", id))),
        }
    }

    async fn delete_user(&self, id: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn get_policy(&self, tenant_id: &str, module: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.module == module)
            .map(|p| p.features.clone())
            .unwrap_or_default())
    }

    async fn set_policy(&self, policy: Policy) -> StoreResult<()> {
        let mut policies = self.policies.write().await;
        match policies
            .iter_mut()
            .find(|p| p.tenant_id == policy.tenant_id && p.module == policy.module)
        {
            Some(existing) => *existing = policy,
            None => policies.push(policy),
        }
        Ok(())
    }
}

/// Fixed-principal auth provider: the session layer is out of scope, so
/// callers wire in whoever the current session resolved to.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    principal: Option<Principal>,
}

impl StaticAuth {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            principal: Some(Principal {
                id: id.into(),
                role: Role::Admin,
            }),
        }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self {
            principal: Some(Principal {
                id: id.into(),
                role: Role::Member,
            }),
        }
    }

    pub fn anonymous() -> Self {
        Self { principal: None }
    }
}

impl AuthProvider for StaticAuth {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}
