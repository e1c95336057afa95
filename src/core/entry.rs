//! Entry point declarations and entry resolution for modules.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::host::{Host, ModuleId};

/// Entry name used when entries are declared without names.
pub const DEFAULT_ENTRY_NAME: &str = "main";

/// Upper bound on issuer hops when resolving a module's entry.
///
/// Well-formed module graphs are acyclic, but the issuer links come from the
/// host and are not trusted to be.
pub const MAX_ISSUER_DEPTH: usize = 4096;

/// Root module(s) of one named entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EntryRoots {
    One(String),
    Many(Vec<String>),
}

impl EntryRoots {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            EntryRoots::One(root) => vec![root.clone()],
            EntryRoots::Many(roots) => roots.clone(),
        }
    }
}

/// Entry declaration as written in configuration.
///
/// ```json
/// "entry": "./src/index.js"
/// "entry": ["./src/polyfills.js", "./src/index.js"]
/// "entry": { "app": "./src/app.js", "admin": ["./src/admin.js"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EntrySetting {
    Single(String),
    List(Vec<String>),
    Named(IndexMap<String, EntryRoots>),
}

/// Normalized entry points: every entry name owns a list of root requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoints {
    entries: IndexMap<String, Vec<String>>,
    /// Root request → entry name.
    reverse: HashMap<String, String>,
}

impl EntryPoints {
    pub fn new(entries: IndexMap<String, Vec<String>>) -> Self {
        let mut reverse = HashMap::new();
        for (name, roots) in &entries {
            for root in roots {
                reverse.insert(root.clone(), name.clone());
            }
        }
        Self { entries, reverse }
    }

    pub fn from_setting(setting: &EntrySetting) -> Self {
        let entries = match setting {
            EntrySetting::Single(root) => {
                IndexMap::from([(DEFAULT_ENTRY_NAME.to_string(), vec![root.clone()])])
            }
            EntrySetting::List(roots) => {
                IndexMap::from([(DEFAULT_ENTRY_NAME.to_string(), roots.clone())])
            }
            EntrySetting::Named(named) => named
                .iter()
                .map(|(name, roots)| (name.clone(), roots.to_vec()))
                .collect(),
        };
        Self::new(entries)
    }

    /// Entry name owning a root request, if it is one.
    pub fn entry_for_root(&self, raw_request: &str) -> Option<&str> {
        self.reverse.get(raw_request).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, roots)| (name.as_str(), roots.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the table identifier a module contributes to.
    ///
    /// Walks the issuer chain starting at `module` and returns the entry name of
    /// the first module whose raw request is a declared root. Without a match,
    /// the raw request of the last module reached is returned instead.
    pub fn resolve<H: Host + ?Sized>(&self, host: &H, module: ModuleId) -> String {
        let mut current = module;
        for _ in 0..MAX_ISSUER_DEPTH {
            let raw_request = host.raw_request(current);
            if let Some(name) = self.entry_for_root(raw_request) {
                return name.to_string();
            }
            match host.issuer(current) {
                Some(issuer) => current = issuer,
                None => return raw_request.to_string(),
            }
        }

        warn!(
            module = host.raw_request(module),
            max_depth = MAX_ISSUER_DEPTH,
            "issuer chain too deep, using last visited module as entry"
        );
        host.raw_request(current).to_string()
    }
}
