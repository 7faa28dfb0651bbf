//! Pure style resolution: (theme, tenant color overrides) → an ordered
//! rule set for the rendering layer.
//!
//! Rule order is the precedence model: state-class rules (dimmed,
//! highlighted, selected) sit after every base rule so they override by
//! evaluation order. Reordering the output is a behavior change.

use crate::taxonomy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Resolved visual properties for one rule. Unset fields inherit from
/// earlier rules.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct StyleProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub props: StyleProps,
}

/// Ordered rule set. Precedence is vector order, never alphabetical.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stylesheet {
    pub theme: Theme,
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Position of a selector's rule, for precedence assertions.
    pub fn rule_index(&self, selector: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.selector == selector)
    }
}

/// Color for a module: tenant override, then taxonomy default, then the
/// fallback (stale modules land here after an admin deletes them).
pub fn module_color(module: &str, overrides: &HashMap<String, String>) -> String {
    overrides
        .get(module)
        .cloned()
        .or_else(|| taxonomy::builtin_color(module).map(String::from))
        .unwrap_or_else(|| taxonomy::FALLBACK_COLOR.to_string())
}

struct Palette {
    surface: &'static str,
    text: &'static str,
    edge: &'static str,
    group_border: &'static str,
    highlight: &'static str,
    selection: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                surface: "#16213e",
                text: "#eeeeee",
                edge: "#556080",
                group_border: "#333a56",
                highlight: "#00d9ff",
                selection: "#ffd166",
            },
            Theme::Light => Palette {
                surface: "#f7f7fb",
                text: "#1a1a2e",
                edge: "#9aa3b5",
                group_border: "#d0d4e0",
                highlight: "#0077b6",
                selection: "#e07b00",
            },
        }
    }
}

fn rule(selector: &str, props: StyleProps) -> StyleRule {
    StyleRule {
        selector: selector.to_string(),
        props,
    }
}

/// Resolve the complete rule set for a theme and the current tenant color
/// overrides. Pure; callers recompute whenever either input changes.
pub fn resolve(theme: Theme, overrides: &HashMap<String, String>) -> Stylesheet {
    let palette = Palette::for_theme(theme);
    let mut rules = Vec::new();

    // Base element rules.
    rules.push(rule(
        "group",
        StyleProps {
            background: Some(palette.surface.to_string()),
            border: Some(palette.group_border.to_string()),
            text: Some(palette.text.to_string()),
            opacity: Some(0.35),
            ..Default::default()
        },
    ));
    rules.push(rule(
        "node",
        StyleProps {
            text: Some(palette.text.to_string()),
            border: Some(palette.group_border.to_string()),
            opacity: Some(1.0),
            width: Some(1.0),
            ..Default::default()
        },
    ));
    rules.push(rule(
        "node.high",
        StyleProps {
            border: Some(palette.highlight.to_string()),
            width: Some(2.5),
            ..Default::default()
        },
    ));
    rules.push(rule(
        "edge",
        StyleProps {
            line: Some(palette.edge.to_string()),
            line_style: Some("solid".to_string()),
            width: Some(1.0),
            opacity: Some(0.8),
            ..Default::default()
        },
    ));
    rules.push(rule(
        "edge.inheritance",
        StyleProps {
            line_style: Some("dashed".to_string()),
            ..Default::default()
        },
    ));
    rules.push(rule(
        "edge.usage",
        StyleProps {
            line_style: Some("dotted".to_string()),
            ..Default::default()
        },
    ));

    // Per-module color rules: taxonomy categories first, then any
    // override-only modules in sorted order for determinism.
    let mut modules: Vec<&str> = taxonomy::module_names().collect();
    let extras: BTreeSet<&str> = overrides
        .keys()
        .map(String::as_str)
        .filter(|m| taxonomy::builtin_color(m).is_none())
        .collect();
    modules.extend(extras);

    for module in modules {
        let color = module_color(module, overrides);
        rules.push(rule(
            &format!("node[module={}]", module),
            StyleProps {
                background: Some(color.clone()),
                ..Default::default()
            },
        ));
        rules.push(rule(
            &format!("group[module={}]", module),
            StyleProps {
                border: Some(color),
                ..Default::default()
            },
        ));
    }

    // State classes last: they must win over every base rule.
    rules.push(rule(
        ".dimmed",
        StyleProps {
            opacity: Some(0.15),
            ..Default::default()
        },
    ));
    rules.push(rule(
        ".highlight",
        StyleProps {
            border: Some(palette.highlight.to_string()),
            opacity: Some(1.0),
            width: Some(3.0),
            ..Default::default()
        },
    ));
    rules.push(rule(
        ":selected",
        StyleProps {
            border: Some(palette.selection.to_string()),
            width: Some(3.0),
            ..Default::default()
        },
    ));

    Stylesheet { theme, rules }
}
