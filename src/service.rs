//! Boundary layer in front of the graph core: authorization checks,
//! optimistic edits with persistence fan-out, and conversion of every
//! collaborator failure into a typed error or a uniform outcome shape.
//! Nothing propagates to the view layer as an unhandled fault.

use crate::model::{
    parse_upload, GraphElements, ModuleDef, Policy, Principal, RawEdge, RawGraph, RawNode, Role,
    SnapshotMeta, Tenant, UploadError, User,
};
use crate::persist::{AuthProvider, DirectoryStore, SnapshotStore, StoreError};
use crate::store::{GraphStore, Position, SessionPrefs};
use crate::stylesheet::Stylesheet;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Deliberately generic toward the user; the cause goes to the log.
    #[error("A storage error occurred, please try again")]
    Transient(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => ServiceError::Conflict(what),
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::Io(cause) => ServiceError::Transient(cause),
        }
    }
}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

/// Uniform result shape handed to the view layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

impl OpOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn from_error(err: &ServiceError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

/// Collapse a service result into the `{success, message}` shape.
pub fn outcome(result: Result<String, ServiceError>) -> OpOutcome {
    match result {
        Ok(message) => OpOutcome::ok(message),
        Err(err) => OpOutcome::from_error(&err),
    }
}

/// Everything the viewer needs to draw the current state.
#[derive(Debug, Clone, Serialize)]
pub struct GraphPayload {
    pub elements: GraphElements,
    pub stylesheet: Stylesheet,
    pub node_count: usize,
    pub edge_count: usize,
    pub allowed_modules: Vec<String>,
    pub active_filters: Vec<String>,
    pub positions: HashMap<String, Position>,
}

pub struct GraphService {
    snapshots: Arc<dyn SnapshotStore>,
    directory: Arc<dyn DirectoryStore>,
    auth: Arc<dyn AuthProvider>,
    store: Mutex<GraphStore>,
}

impl GraphService {
    pub fn new(
        snapshots: Arc<dyn SnapshotStore>,
        directory: Arc<dyn DirectoryStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self::with_store(snapshots, directory, auth, GraphStore::new())
    }

    pub fn with_store(
        snapshots: Arc<dyn SnapshotStore>,
        directory: Arc<dyn DirectoryStore>,
        auth: Arc<dyn AuthProvider>,
        store: GraphStore,
    ) -> Self {
        Self {
            snapshots,
            directory,
            auth,
            store: Mutex::new(store),
        }
    }

    /// Direct access to the session store, for the render layer.
    pub async fn store(&self) -> MutexGuard<'_, GraphStore> {
        self.store.lock().await
    }

    /// Hydrate on session start: newest snapshot, module colors, and any
    /// remembered tenant context. A remembered tenant that no longer
    /// exists silently degrades to the administrative view.
    pub async fn init(&self) -> Result<(), ServiceError> {
        let latest = self.snapshots.latest().await?;
        let modules = self.directory.list_modules().await?;

        let remembered = {
            let mut store = self.store.lock().await;
            store.set_module_colors(
                modules.into_iter().map(|m| (m.name, m.color)).collect(),
            );
            if let Some(snapshot) = latest {
                info!(filename = %snapshot.filename, "hydrating graph from latest snapshot");
                store.set_graph_data(snapshot.content);
            }
            store.attach_view();
            store.selected_tenant().map(String::from)
        };

        match self.select_company(remembered.clone()).await {
            Err(ServiceError::NotFound(_)) if remembered.is_some() => {
                self.select_company(None).await
            }
            other => other,
        }
    }

    fn require_admin(&self) -> Result<Principal, ServiceError> {
        match self.auth.current_principal() {
            Some(principal) if principal.role == Role::Admin => Ok(principal),
            _ => Err(ServiceError::Unauthorized),
        }
    }

    // --- graph content ---

    pub async fn upload_graph(
        &self,
        filename: &str,
        json: &str,
    ) -> Result<SnapshotMeta, ServiceError> {
        let principal = self.require_admin()?;
        let graph = parse_upload(json)?;

        let snapshot = self
            .snapshots
            .append(&principal.id, filename, graph)
            .await?;
        let meta = snapshot.meta();

        let mut store = self.store.lock().await;
        store.set_graph_data(snapshot.content);
        Ok(meta)
    }

    /// Optimistic add: local state mutates synchronously, then the new
    /// full snapshot is appended. A failed append leaves local and remote
    /// state diverged: surfaced, logged, not rolled back.
    pub async fn add_node(&self, node: RawNode) -> Result<(), ServiceError> {
        let principal = self.require_admin()?;

        let mut node = node;
        node.is_manual = true;

        let raw = {
            let mut store = self.store.lock().await;
            store.add_node(node);
            store.raw().cloned().unwrap_or_default()
        };

        self.persist_edit(&principal.id, raw).await
    }

    pub async fn add_edge(&self, edge: RawEdge) -> Result<(), ServiceError> {
        let principal = self.require_admin()?;

        let raw = {
            let mut store = self.store.lock().await;
            for endpoint in [&edge.source, &edge.target] {
                if store.elements().node(endpoint).is_none() {
                    return Err(ServiceError::Validation(format!(
                        "unknown edge endpoint '{}'",
                        endpoint
                    )));
                }
            }
            store.add_edge(edge);
            store.raw().cloned().unwrap_or_default()
        };

        self.persist_edit(&principal.id, raw).await
    }

    pub async fn remove_element(&self, id: &str) -> Result<(), ServiceError> {
        let principal = self.require_admin()?;

        let raw = {
            let mut store = self.store.lock().await;
            if store.raw().is_none() {
                return Err(ServiceError::NotFound("active graph snapshot".to_string()));
            }
            if !store.remove_element(id) {
                return Err(ServiceError::NotFound(format!("element '{}'", id)));
            }
            store.raw().cloned().unwrap_or_default()
        };

        self.persist_edit(&principal.id, raw).await
    }

    async fn persist_edit(&self, uploader_id: &str, raw: RawGraph) -> Result<(), ServiceError> {
        let filename = match self.snapshots.latest().await {
            Ok(Some(previous)) => previous.filename,
            _ => "live-edit".to_string(),
        };

        match self.snapshots.append(uploader_id, &filename, raw).await {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(error = %err, "persisting optimistic edit failed; local state kept");
                Err(err.into())
            }
        }
    }

    pub async fn snapshots(&self) -> Result<Vec<SnapshotMeta>, ServiceError> {
        Ok(self.snapshots.list_metadata().await?)
    }

    // --- module taxonomy admin ---

    pub async fn modules(&self) -> Result<Vec<ModuleDef>, ServiceError> {
        Ok(self.directory.list_modules().await?)
    }

    pub async fn upsert_module(&self, module: ModuleDef) -> Result<ModuleDef, ServiceError> {
        self.require_admin()?;
        let module = self.directory.upsert_module(module).await?;
        self.refresh_module_colors().await?;
        Ok(module)
    }

    pub async fn delete_module(&self, name: &str) -> Result<(), ServiceError> {
        self.require_admin()?;
        self.directory.delete_module(name).await?;
        // No cascade: nodes keep the stale label and fall back to the
        // default color through the refreshed stylesheet.
        self.refresh_module_colors().await
    }

    async fn refresh_module_colors(&self) -> Result<(), ServiceError> {
        let modules = self.directory.list_modules().await?;
        let mut store = self.store.lock().await;
        store.set_module_colors(modules.into_iter().map(|m| (m.name, m.color)).collect());
        Ok(())
    }

    // --- tenants, users, policies ---

    pub async fn tenants(&self) -> Result<Vec<Tenant>, ServiceError> {
        Ok(self.directory.list_tenants().await?)
    }

    pub async fn upsert_tenant(&self, tenant: Tenant) -> Result<Tenant, ServiceError> {
        self.require_admin()?;
        Ok(self.directory.upsert_tenant(tenant).await?)
    }

    pub async fn delete_tenant(&self, id: &str) -> Result<(), ServiceError> {
        self.require_admin()?;
        Ok(self.directory.delete_tenant(id).await?)
    }

    pub async fn users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.directory.list_users().await?)
    }

    pub async fn set_user_role(&self, id: &str, role: Role) -> Result<(), ServiceError> {
        self.require_admin()?;
        Ok(self.directory.set_user_role(id, role).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        self.require_admin()?;
        Ok(self.directory.delete_user(id).await?)
    }

    pub async fn policy(&self, tenant_id: &str, module: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.directory.get_policy(tenant_id, module).await?)
    }

    pub async fn set_policy(&self, policy: Policy) -> Result<(), ServiceError> {
        self.require_admin()?;
        Ok(self.directory.set_policy(policy).await?)
    }

    /// Switch tenant context. `None` selects the administrative view over
    /// the full taxonomy.
    pub async fn select_company(&self, tenant_id: Option<String>) -> Result<(), ServiceError> {
        match tenant_id {
            Some(id) => {
                let tenant = self
                    .directory
                    .get_tenant(&id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("company '{}'", id)))?;
                self.store
                    .lock()
                    .await
                    .set_company_context(Some(tenant.id), tenant.allowed_modules);
            }
            None => {
                self.store.lock().await.set_company_context(None, Vec::new());
            }
        }
        Ok(())
    }

    // --- view payload ---

    pub async fn graph_payload(&self) -> GraphPayload {
        let store = self.store.lock().await;

        let mut allowed: Vec<String> = store.allowed_modules().iter().cloned().collect();
        allowed.sort();
        let mut filters: Vec<String> = store.active_filters().iter().cloned().collect();
        filters.sort();

        GraphPayload {
            elements: store.elements().clone(),
            stylesheet: store.stylesheet(),
            node_count: store.node_count(),
            edge_count: store.edge_count(),
            allowed_modules: allowed,
            active_filters: filters,
            positions: store.positions().clone(),
        }
    }

    /// The preference subset to persist at session end.
    pub async fn prefs(&self) -> SessionPrefs {
        self.store.lock().await.prefs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{InMemoryDirectory, InMemorySnapshotLog, StaticAuth, StoreResult};
    use crate::taxonomy;
    use async_trait::async_trait;

    const UPLOAD: &str = r#"{
        "nodes": [
            {"data": {"id": "payroll_a", "label": "PayrollA"}},
            {"data": {"id": "chat_b", "label": "ChatB"}}
        ],
        "edges": [
            {"data": {"source": "payroll_a", "target": "chat_b"}}
        ]
    }"#;

    fn admin_service() -> GraphService {
        GraphService::new(
            Arc::new(InMemorySnapshotLog::new()),
            Arc::new(InMemoryDirectory::with_taxonomy_modules()),
            Arc::new(StaticAuth::admin("admin-1")),
        )
    }

    #[tokio::test]
    async fn test_upload_hydrates_store() {
        let service = admin_service();
        service.init().await.unwrap();

        let meta = service.upload_graph("demo.json", UPLOAD).await.unwrap();
        assert_eq!(meta.node_count, 2);

        let payload = service.graph_payload().await;
        assert_eq!(payload.node_count, 2);
        assert_eq!(payload.edge_count, 1);
        assert!(payload.elements.group("g_HRMS").is_some());
    }

    #[tokio::test]
    async fn test_malformed_upload_is_validation_error() {
        let service = admin_service();
        let err = service
            .upload_graph("bad.json", r#"{"nodes": []}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        // Nothing was persisted.
        assert!(service.snapshots().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_mutation_aborts_before_any_write() {
        let service = GraphService::new(
            Arc::new(InMemorySnapshotLog::new()),
            Arc::new(InMemoryDirectory::with_taxonomy_modules()),
            Arc::new(StaticAuth::member("user-1")),
        );

        let err = service
            .add_node(RawNode::new("x", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(service.graph_payload().await.node_count, 0);
        assert!(service.snapshots().await.unwrap().is_empty());

        // Anonymous callers fail the same way.
        let service = GraphService::new(
            Arc::new(InMemorySnapshotLog::new()),
            Arc::new(InMemoryDirectory::new()),
            Arc::new(StaticAuth::anonymous()),
        );
        assert!(matches!(
            service.upload_graph("f.json", UPLOAD).await.unwrap_err(),
            ServiceError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn test_every_edit_appends_a_full_snapshot() {
        let service = admin_service();
        service.upload_graph("demo.json", UPLOAD).await.unwrap();
        service.add_node(RawNode::new("invoice_c", "InvoiceC")).await.unwrap();
        service
            .add_edge(RawEdge::new("invoice_c", "chat_b"))
            .await
            .unwrap();

        let metas = service.snapshots().await.unwrap();
        assert_eq!(metas.len(), 3);
        // Newest first, and each snapshot is the full graph.
        assert_eq!(metas[0].node_count, 3);
        assert_eq!(metas[0].edge_count, 2);
        assert_eq!(metas[2].node_count, 2);
    }

    #[tokio::test]
    async fn test_manual_node_keeps_explicit_module() {
        let service = admin_service();
        service.upload_graph("demo.json", UPLOAD).await.unwrap();

        let mut node = RawNode::new("payroll_widget", "PayrollWidget");
        node.module = Some("CRM".to_string());
        service.add_node(node).await.unwrap();

        let payload = service.graph_payload().await;
        assert_eq!(payload.elements.node("payroll_widget").unwrap().module, "CRM");
    }

    #[tokio::test]
    async fn test_remove_without_active_snapshot_is_not_found() {
        let service = admin_service();
        let err = service.remove_element("anything").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_edge_with_unknown_endpoint_is_rejected_before_mutation() {
        let service = admin_service();
        service.upload_graph("demo.json", UPLOAD).await.unwrap();

        let err = service
            .add_edge(RawEdge::new("payroll_a", "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(service.graph_payload().await.edge_count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_module_is_conflict_with_specific_message() {
        let service = admin_service();
        let err = service
            .upsert_module(ModuleDef {
                name: "crm".to_string(),
                color: "#000000".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        let shaped = OpOutcome::from_error(&err);
        assert!(!shaped.success);
        assert!(shaped.message.contains("already exists"));
    }

    #[tokio::test]
    async fn test_select_company_scopes_and_null_restores() {
        let directory = InMemoryDirectory::with_taxonomy_modules();
        directory
            .seed_tenant(Tenant {
                id: "t1".to_string(),
                name: "Acme".to_string(),
                allowed_modules: vec!["HRMS".to_string()],
            })
            .await;
        let service = GraphService::new(
            Arc::new(InMemorySnapshotLog::new()),
            Arc::new(directory),
            Arc::new(StaticAuth::admin("admin-1")),
        );
        service.init().await.unwrap();

        service.select_company(Some("t1".to_string())).await.unwrap();
        let payload = service.graph_payload().await;
        assert_eq!(payload.allowed_modules, vec!["HRMS".to_string()]);

        service.select_company(None).await.unwrap();
        let payload = service.graph_payload().await;
        assert_eq!(payload.allowed_modules.len(), taxonomy::MODULES.len());

        assert!(matches!(
            service.select_company(Some("ghost".to_string())).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    struct FailingSnapshots;

    #[async_trait]
    impl SnapshotStore for FailingSnapshots {
        async fn latest(&self) -> StoreResult<Option<crate::model::GraphSnapshot>> {
            Ok(None)
        }

        async fn append(
            &self,
            _uploader_id: &str,
            _filename: &str,
            _content: RawGraph,
        ) -> StoreResult<crate::model::GraphSnapshot> {
            Err(StoreError::Io("connection reset".to_string()))
        }

        async fn list_metadata(&self) -> StoreResult<Vec<SnapshotMeta>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_optimistic_local_state() {
        let mut store = GraphStore::new();
        store.set_graph_data(RawGraph::default());
        let service = GraphService::with_store(
            Arc::new(FailingSnapshots),
            Arc::new(InMemoryDirectory::with_taxonomy_modules()),
            Arc::new(StaticAuth::admin("admin-1")),
            store,
        );

        let err = service
            .add_node(RawNode::new("orphan_x", "OrphanX"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transient(_)));

        // The generic message does not leak the storage cause.
        assert!(!err.to_string().contains("connection reset"));

        // Local state diverged deliberately: the node is still there.
        assert_eq!(service.graph_payload().await.node_count, 1);
    }

    #[tokio::test]
    async fn test_outcome_shaping() {
        let ok = outcome(Ok("Graph uploaded".to_string()));
        assert!(ok.success);

        let err = outcome(Err(ServiceError::Unauthorized));
        assert!(!err.success);
        assert_eq!(err.message, "Unauthorized");
    }
}
