//! The user-preference subset that survives across sessions: theme, manual
//! node positions, and the selected tenant. Everything else in the store
//! is rebuilt on load.

use crate::fs::FileSystem;
use crate::stylesheet::Theme;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Manual position override for one node, in layout coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionPrefs {
    pub theme: Theme,
    pub positions: HashMap<String, Position>,
    pub selected_tenant: Option<String>,
}

impl SessionPrefs {
    /// Missing or unreadable preference files fall back to defaults;
    /// preferences are a convenience, never an error source.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Self {
        if !fs.exists(path) {
            return Self::default();
        }
        fs.read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, fs: &dyn FileSystem, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs.write(path, &json)
    }
}
