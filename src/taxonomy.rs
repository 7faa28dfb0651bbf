//! Built-in module taxonomy: category names, display colors, and the
//! filter-key categories shared by the classifier, style resolver, and
//! interaction engine.

/// Built-in taxonomy categories and their default display colors.
/// Tenant-configured module colors override these at style resolution.
pub const MODULES: &[(&str, &str)] = &[
    ("HRMS", "#4e79a7"),
    ("ATS", "#f28e2b"),
    ("CRM", "#e15759"),
    ("Projects", "#76b7b2"),
    ("Comm", "#59a14f"),
    ("AI", "#edc948"),
    ("Core", "#b07aa1"),
    ("Utils", "#9c755f"),
];

/// Color used when a node's module has no taxonomy entry and no override
/// (e.g. after an administrator deletes the module definition).
pub const FALLBACK_COLOR: &str = "#bab0ac";

/// Category assigned when no classification rule matches.
pub const FALLBACK_MODULE: &str = "Utils";

/// Degree above which a node counts as a hub (and defaults to high
/// complexity when none was supplied).
pub const HUB_DEGREE: usize = 5;

/// Rendered labels longer than this are truncated.
pub const LABEL_MAX: usize = 20;

/// Characters kept before the ".." suffix on truncation.
pub const LABEL_KEEP: usize = 18;

/// Prefix for synthetic group-container ids.
pub const GROUP_PREFIX: &str = "g_";

pub const COMPLEXITY_KEYS: &[&str] = &["high", "normal"];
pub const ARCHETYPE_KEYS: &[&str] = &["Controller", "Service", "Model"];
pub const TOPOLOGY_KEYS: &[&str] = &["orphan", "hub", "normal"];

/// All taxonomy category names, in table order.
pub fn module_names() -> impl Iterator<Item = &'static str> {
    MODULES.iter().map(|(name, _)| *name)
}

/// Default color for a taxonomy category, if it has one.
pub fn builtin_color(module: &str) -> Option<&'static str> {
    MODULES
        .iter()
        .find(|(name, _)| *name == module)
        .map(|(_, color)| *color)
}

/// Synthetic container id for a module's group node.
pub fn group_id(module: &str) -> String {
    format!("{}{}", GROUP_PREFIX, module)
}
