//! Architectural role classification for classes and callables.

use callwire_core::config::ConventionsConfig;
use serde::{Deserialize, Serialize};

/// Role of a node in the application's architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Module,
    Controller,
    Service,
    Provider,
    Helper,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Controller => "controller",
            Self::Service => "service",
            Self::Provider => "provider",
            Self::Helper => "helper",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What role rules get to look at.
#[derive(Debug, Clone, Copy)]
pub struct ClassFacts<'a> {
    pub name: &'a str,
    pub decorators: &'a [&'a str],
    pub file_path: &'a str,
}

type RoleRule = fn(&ClassFacts<'_>, &ConventionsConfig) -> Option<Role>;

/// Rules in priority order; the first that answers wins.
const CLASS_ROLE_RULES: &[RoleRule] = &[role_from_decorator, role_from_name_suffix, role_from_file_name];

/// Name suffixes checked after decorators, in order.
const NAME_SUFFIXES: &[(&str, Role)] = &[
    ("Module", Role::Module),
    ("Controller", Role::Controller),
    ("Service", Role::Service),
    ("Provider", Role::Provider),
];

/// Classify a class. `None` means no rule matched.
pub fn classify_class(facts: &ClassFacts<'_>, conventions: &ConventionsConfig) -> Option<Role> {
    CLASS_ROLE_RULES
        .iter()
        .find_map(|rule| rule(facts, conventions))
}

fn has_decorator(facts: &ClassFacts<'_>, names: &[&str]) -> bool {
    facts.decorators.iter().any(|d| names.contains(d))
}

fn role_from_decorator(facts: &ClassFacts<'_>, conventions: &ConventionsConfig) -> Option<Role> {
    if has_decorator(facts, &conventions.effective_module_decorators()) {
        Some(Role::Module)
    } else if has_decorator(facts, &conventions.effective_controller_decorators()) {
        Some(Role::Controller)
    } else if has_decorator(facts, &conventions.effective_injectable_decorators()) {
        if facts.name.ends_with("Service") {
            Some(Role::Service)
        } else {
            Some(Role::Provider)
        }
    } else {
        None
    }
}

fn role_from_name_suffix(facts: &ClassFacts<'_>, _: &ConventionsConfig) -> Option<Role> {
    NAME_SUFFIXES
        .iter()
        .find(|(suffix, _)| facts.name.ends_with(suffix))
        .map(|(_, role)| *role)
}

fn role_from_file_name(facts: &ClassFacts<'_>, conventions: &ConventionsConfig) -> Option<Role> {
    is_module_file(facts.file_path, conventions).then_some(Role::Module)
}

/// Whether a file name follows the module-file convention (`*.module.*`).
pub fn is_module_file(path: &str, conventions: &ConventionsConfig) -> bool {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    conventions
        .effective_module_file_markers()
        .iter()
        .any(|marker| file_name.contains(marker))
}

/// Whether a class declares a module: a module decorator or a module file.
pub fn is_module_class(facts: &ClassFacts<'_>, conventions: &ConventionsConfig) -> bool {
    has_decorator(facts, &conventions.effective_module_decorators())
        || is_module_file(facts.file_path, conventions)
}

/// Role of a class referenced from module metadata.
pub fn wiring_role(decorators: &[&str], conventions: &ConventionsConfig) -> Role {
    let has = |names: Vec<&str>| decorators.iter().any(|d| names.contains(d));
    if has(conventions.effective_controller_decorators()) {
        Role::Controller
    } else if has(conventions.effective_injectable_decorators()) {
        Role::Service
    } else {
        Role::Provider
    }
}
