//! Lexical classification of raw nodes: module category, architectural
//! archetype, and complexity tier.
//!
//! Module classification is a fixed-priority keyword scan over the
//! lower-cased id + label. Priority order is the tie-break: an identifier
//! matching both CRM and Comm keywords resolves to CRM because CRM is
//! tested first. The order here is load-bearing; tests pin it.

use crate::model::{Archetype, Complexity, RawNode};
use crate::taxonomy;
use regex::Regex;
use std::sync::LazyLock;

static MODULE_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("HRMS", r"hrms|payroll|employee|attendance|leave|onboard|salar"),
        ("ATS", r"ats|recruit|candidate|applicant|interview|vacanc|resume"),
        ("CRM", r"crm|invoice|billing|sales|customer|lead|deal|pipeline"),
        ("Projects", r"project|task|sprint|milestone|kanban|backlog"),
        ("Comm", r"chat|messag|mail|notif|comment|inbox"),
        (
            "AI",
            r"(^|[^a-z])ai([^a-z]|$)|assistant|bot|embedding|llm|predict",
        ),
        (
            "Core",
            r"user|auth|login|role|permission|account|setting|profile|identity",
        ),
    ]
    .into_iter()
    .map(|(module, pattern)| (module, Regex::new(pattern).expect("static pattern")))
    .collect()
});

/// Assign a taxonomy category from lexical heuristics over id and label.
/// Pure: same input always yields the same module.
pub fn classify_module(id: &str, label: &str) -> &'static str {
    let haystack = format!("{} {}", id, label).to_lowercase();

    for (module, pattern) in MODULE_RULES.iter() {
        if pattern.is_match(&haystack) {
            return module;
        }
    }

    taxonomy::FALLBACK_MODULE
}

/// Resolve a raw node's module: manually created nodes with an explicit
/// module bypass classification.
pub fn resolve_module(node: &RawNode) -> String {
    if node.is_manual {
        if let Some(module) = &node.module {
            return module.clone();
        }
    }
    classify_module(&node.id, &node.label).to_string()
}

/// Archetype from naming convention. Ordered substring test, not a
/// classifier: "Controller" is checked before "Service".
pub fn archetype_of(label: &str) -> Archetype {
    if label.contains("Controller") {
        Archetype::Controller
    } else if label.contains("Service") {
        Archetype::Service
    } else {
        Archetype::Model
    }
}

/// Explicit complexity wins; otherwise degree above the hub threshold
/// defaults to high.
pub fn complexity_of(explicit: Option<Complexity>, degree: usize) -> Complexity {
    match explicit {
        Some(c) => c,
        None if degree > taxonomy::HUB_DEGREE => Complexity::High,
        None => Complexity::Normal,
    }
}
