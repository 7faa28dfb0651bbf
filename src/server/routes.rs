use super::assets::INDEX_HTML;
use crate::fs::FileSystem;
use crate::model::{ModuleDef, RawEdge, RawNode, SnapshotMeta, Tenant, User};
use crate::service::{outcome, GraphPayload, GraphService, OpOutcome, ServiceError};
use crate::store::Position;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Application state shared across handlers.
pub struct AppState {
    pub service: Arc<GraphService>,
    pub fs: Arc<dyn FileSystem>,
    pub prefs_path: PathBuf,
}

/// Service errors mapped onto HTTP statuses; the body is always the
/// uniform `{success, message}` shape.
struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Transient(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(OpOutcome::from_error(&self.0))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/graph/upload", post(upload_handler))
        .route("/api/nodes", post(add_node_handler))
        .route("/api/edges", post(add_edge_handler))
        .route("/api/elements/{id}", delete(remove_element_handler))
        .route("/api/snapshots", get(snapshots_handler))
        .route("/api/modules", get(modules_handler).post(upsert_module_handler))
        .route("/api/modules/{name}", delete(delete_module_handler))
        .route("/api/tenants", get(tenants_handler).post(upsert_tenant_handler))
        .route("/api/tenants/{id}", delete(delete_tenant_handler))
        .route("/api/tenants/select", post(select_company_handler))
        .route("/api/users", get(users_handler))
        .route("/api/view/theme", post(toggle_theme_handler))
        .route("/api/view/positions", post(patch_position_handler))
        .route("/api/view/filters/toggle", post(toggle_filter_handler))
        .route("/api/view/filters/reset", post(reset_filters_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for the graph viewer.
pub async fn serve(
    state: Arc<AppState>,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    println!("Starting depviz visualization server...");
    println!("Open in browser: {}", url);
    println!("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            eprintln!("Warning: Could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphPayload> {
    Json(state.service.graph_payload().await)
}

#[derive(Deserialize)]
struct UploadRequest {
    filename: String,
    content: serde_json::Value,
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> ApiResult<OpOutcome> {
    let json = req.content.to_string();
    let meta = state.service.upload_graph(&req.filename, &json).await?;
    Ok(Json(OpOutcome::ok(format!(
        "Uploaded '{}': {} nodes, {} edges",
        meta.filename, meta.node_count, meta.edge_count
    ))))
}

async fn add_node_handler(
    State(state): State<Arc<AppState>>,
    Json(node): Json<RawNode>,
) -> ApiResult<OpOutcome> {
    let id = node.id.clone();
    state.service.add_node(node).await?;
    Ok(Json(OpOutcome::ok(format!("Node '{}' added", id))))
}

async fn add_edge_handler(
    State(state): State<Arc<AppState>>,
    Json(edge): Json<RawEdge>,
) -> ApiResult<OpOutcome> {
    state.service.add_edge(edge).await?;
    Ok(Json(OpOutcome::ok("Edge added")))
}

async fn remove_element_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<OpOutcome> {
    state.service.remove_element(&id).await?;
    Ok(Json(OpOutcome::ok(format!("Element '{}' removed", id))))
}

async fn snapshots_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SnapshotMeta>> {
    Ok(Json(state.service.snapshots().await?))
}

async fn modules_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ModuleDef>> {
    Ok(Json(state.service.modules().await?))
}

async fn upsert_module_handler(
    State(state): State<Arc<AppState>>,
    Json(module): Json<ModuleDef>,
) -> ApiResult<OpOutcome> {
    let module = state.service.upsert_module(module).await?;
    Ok(Json(OpOutcome::ok(format!("Module '{}' saved", module.name))))
}

async fn delete_module_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<OpOutcome> {
    state.service.delete_module(&name).await?;
    Ok(Json(OpOutcome::ok(format!("Module '{}' deleted", name))))
}

async fn tenants_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Tenant>> {
    Ok(Json(state.service.tenants().await?))
}

async fn upsert_tenant_handler(
    State(state): State<Arc<AppState>>,
    Json(tenant): Json<Tenant>,
) -> ApiResult<OpOutcome> {
    let tenant = state.service.upsert_tenant(tenant).await?;
    Ok(Json(OpOutcome::ok(format!("Company '{}' saved", tenant.name))))
}

async fn delete_tenant_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<OpOutcome> {
    state.service.delete_tenant(&id).await?;
    Ok(Json(OpOutcome::ok("Company deleted")))
}

#[derive(Deserialize)]
struct SelectCompanyRequest {
    tenant_id: Option<String>,
}

async fn select_company_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectCompanyRequest>,
) -> ApiResult<OpOutcome> {
    state.service.select_company(req.tenant_id).await?;
    save_prefs(&state).await;
    Ok(Json(OpOutcome::ok("Company context switched")))
}

async fn users_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<User>> {
    Ok(Json(state.service.users().await?))
}

async fn toggle_theme_handler(State(state): State<Arc<AppState>>) -> Json<OpOutcome> {
    let theme = {
        let mut store = state.service.store().await;
        store.toggle_theme()
    };
    save_prefs(&state).await;
    Json(OpOutcome::ok(format!("Theme switched to {:?}", theme)))
}

#[derive(Deserialize)]
struct PositionPatch {
    id: String,
    x: f64,
    y: f64,
}

async fn patch_position_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<PositionPatch>,
) -> Json<OpOutcome> {
    {
        let mut store = state.service.store().await;
        store.patch_position(&patch.id, Position { x: patch.x, y: patch.y });
    }
    save_prefs(&state).await;
    Json(OpOutcome::ok("Position saved"))
}

#[derive(Deserialize)]
struct FilterToggle {
    key: String,
}

async fn toggle_filter_handler(
    State(state): State<Arc<AppState>>,
    Json(toggle): Json<FilterToggle>,
) -> Json<OpOutcome> {
    let mut store = state.service.store().await;
    store.toggle_filter(&toggle.key);
    Json(outcome(Ok(format!("Filter '{}' toggled", toggle.key))))
}

async fn reset_filters_handler(State(state): State<Arc<AppState>>) -> Json<OpOutcome> {
    let mut store = state.service.store().await;
    store.reset_filters();
    Json(OpOutcome::ok("Filters reset"))
}

/// Best-effort preference persistence; failures are logged, never surfaced.
async fn save_prefs(state: &AppState) {
    let prefs = state.service.prefs().await;
    if let Err(e) = prefs.save(state.fs.as_ref(), &state.prefs_path) {
        warn!(error = %e, "failed to save session preferences");
    }
}
