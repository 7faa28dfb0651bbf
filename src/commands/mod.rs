mod import;
mod init;
mod inspect;
mod serve;

pub use import::cmd_import;
pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use serve::cmd_serve;

use crate::config::Config;
use crate::fs::{default_fs, FileSystem};
use crate::model::ModuleDef;
use crate::persist::{DirectoryStore, InMemoryDirectory, JsonSnapshotLog, StaticAuth};
use crate::service::GraphService;
use crate::store::{GraphStore, SessionPrefs};
use crate::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Create a new command context by resolving the path and loading config.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(path: &Path) -> Result<Self, i32> {
        let resolved_path = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                style::error(&format!("Could not resolve path: {}", style::path(path)));
                return Err(1);
            }
        };

        let config = Config::load(&resolved_path).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        Ok(Self {
            path: resolved_path,
            config,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join(&self.config.storage.data_dir)
    }
}

/// A wired service plus the paths it persists to.
pub(crate) struct ServiceParts {
    pub service: Arc<GraphService>,
    pub fs: Arc<dyn FileSystem>,
    pub prefs_path: PathBuf,
}

/// Wire the service the way every command does: file-backed snapshot log
/// under the data dir, taxonomy-seeded directory with config color
/// overrides, and an admin principal for the local session.
pub(crate) async fn open_service(ctx: &CommandContext, user: &str) -> Result<ServiceParts, String> {
    let fs: Arc<dyn FileSystem> = Arc::new(*default_fs());
    let data_dir = ctx.data_dir();
    let prefs_path = data_dir.join("prefs.json");

    let snapshots = JsonSnapshotLog::open(data_dir.join("snapshots.json"), fs.clone())
        .map_err(|e| format!("Could not open snapshot log: {}", e))?;

    let directory = InMemoryDirectory::with_taxonomy_modules();
    for (name, color) in &ctx.config.colors {
        directory
            .upsert_module(ModuleDef {
                name: name.clone(),
                color: color.clone(),
            })
            .await
            .map_err(|e| format!("Invalid color override for '{}': {}", name, e))?;
    }

    let mut store = GraphStore::new();
    store.apply_prefs(SessionPrefs::load(fs.as_ref(), &prefs_path));

    let service = Arc::new(GraphService::with_store(
        Arc::new(snapshots),
        Arc::new(directory),
        Arc::new(StaticAuth::admin(user)),
        store,
    ));

    service
        .init()
        .await
        .map_err(|e| format!("Failed to hydrate graph state: {}", e))?;

    Ok(ServiceParts {
        service,
        fs,
        prefs_path,
    })
}
