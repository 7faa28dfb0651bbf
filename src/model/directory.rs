//! Tenant, user, and module-definition records managed through the
//! directory collaborator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" | "user" => Ok(Role::Member),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The authenticated caller, as reported by the authorization collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// A company whose `allowed_modules` restricts which taxonomy categories
/// its users may view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub allowed_modules: Vec<String>,
}

/// Tenant-configurable taxonomy entry. Name uniqueness is case-insensitive
/// and enforced by the directory store. Deleting one does not cascade to
/// existing graph nodes; they keep the stale module label and fall back to
/// the default color at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleDef {
    pub name: String,
    pub color: String,
}

/// Per-tenant, per-module feature grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Policy {
    pub tenant_id: String,
    pub module: String,
    pub features: Vec<String>,
}
