use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::core::host::{Host, ModuleId, Rewrite};
use crate::issues::KeyError;

/// Extensions probed, in order, when a request omits one.
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// One module discovered while walking the dependency graph.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// The request string this module was included by (or the entry root).
    pub raw_request: String,
    /// Normalized absolute path.
    pub path: PathBuf,
    /// The module that first requested this one; `None` for entry roots.
    pub issuer: Option<ModuleId>,
    /// Source text as parsed, without a leading byte order mark; empty until
    /// the module is loaded.
    pub source: String,
    /// The file on disk starts with a UTF-8 byte order mark.
    pub has_bom: bool,
    pub errors: Vec<KeyError>,
    pub rewrites: Vec<Rewrite>,
}

/// Arena of modules keyed by [`ModuleId`], deduplicated by path.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: Vec<ModuleRecord>,
    by_path: HashMap<PathBuf, ModuleId>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module unless one with the same path exists.
    ///
    /// Returns the module id and whether it was newly added.
    pub fn add_module(
        &mut self,
        raw_request: &str,
        path: &Path,
        issuer: Option<ModuleId>,
    ) -> (ModuleId, bool) {
        let path = normalize_path(path);
        if let Some(&id) = self.by_path.get(&path) {
            return (id, false);
        }
        let id = self.modules.len();
        self.modules.push(ModuleRecord {
            raw_request: raw_request.to_string(),
            path: path.clone(),
            issuer,
            source: String::new(),
            has_bom: false,
            errors: Vec::new(),
            rewrites: Vec::new(),
        });
        self.by_path.insert(path, id);
        (id, true)
    }

    pub fn get(&self, id: ModuleId) -> &ModuleRecord {
        &self.modules[id]
    }

    pub fn get_mut(&mut self, id: ModuleId) -> &mut ModuleRecord {
        &mut self.modules[id]
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &ModuleRecord)> {
        self.modules.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Host for ModuleGraph {
    fn raw_request(&self, module: ModuleId) -> &str {
        &self.modules[module].raw_request
    }

    fn issuer(&self, module: ModuleId) -> Option<ModuleId> {
        self.modules[module].issuer
    }

    fn push_error(&mut self, module: ModuleId, error: KeyError) {
        self.modules[module].errors.push(error);
    }

    fn add_rewrite(&mut self, module: ModuleId, rewrite: Rewrite) {
        self.modules[module].rewrites.push(rewrite);
    }
}

/// Resolve a relative request against the requesting file.
///
/// Bare requests (packages) are not followed and return `None`, as do
/// requests that do not point at an existing file.
pub fn resolve_import_path(current_file: &Path, request: &str) -> Option<PathBuf> {
    if !request.starts_with('.') {
        return None;
    }
    let base_dir = current_file.parent()?;
    resolve_file(&base_dir.join(request))
}

/// Find the file a path refers to, probing extensions and `index` files.
pub fn resolve_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(normalize_path(path));
    }

    for ext in RESOLVE_EXTENSIONS {
        let mut candidate = path.as_os_str().to_owned();
        candidate.push(".");
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);
        if candidate.is_file() {
            return Some(normalize_path(&candidate));
        }
    }

    for ext in RESOLVE_EXTENSIONS {
        let index_path = path.join(format!("index.{}", ext));
        if index_path.is_file() {
            return Some(normalize_path(&index_path));
        }
    }

    None
}

/// Lexically remove `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
