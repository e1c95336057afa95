//! Build driver: walks the module graph from the entry roots, feeds every
//! translation call to the [`Extractor`] and emits the results.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use swc_common::{SourceMap, sync::Lrc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::host::ModuleId;
use crate::core::{Completion, EntryPoints, Extractor};
use crate::issues::Diagnostic;
use crate::pipeline::graph::{ModuleGraph, normalize_path, resolve_file, resolve_import_path};
use crate::pipeline::parser::parse_source;
use crate::pipeline::rewrite::apply_rewrites;
use crate::pipeline::visitor::CallCollector;

const UTF8_BOM: char = '\u{feff}';

/// Outcome of one build.
#[derive(Debug)]
pub struct BuildReport {
    pub completion: Completion,
    /// Sorted by module, then position.
    pub diagnostics: Vec<Diagnostic>,
    pub module_count: usize,
    /// Rewritten module sources written under `outDir`.
    pub emitted: Vec<PathBuf>,
}

impl BuildReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Run a complete extraction for the project at `root`.
///
/// Unreadable or unparsable modules are reported as diagnostics and skipped.
/// A missing entry root, a failed mapping write or a failed source emit is
/// fatal.
pub fn run_build(config: &Config, root: &Path) -> Result<BuildReport> {
    let root = normalize_path(root);
    let entries = EntryPoints::from_setting(&config.entry);
    let mut extractor = Extractor::new(config.extractor_options(&root), entries.clone());
    let function_name = extractor.function_name().to_string();

    let source_map: Lrc<SourceMap> = Default::default();
    let mut graph = ModuleGraph::new();
    let mut queue = VecDeque::new();
    let mut diagnostics = Vec::new();
    let mut loaded: Vec<ModuleId> = Vec::new();

    for (name, roots) in entries.iter() {
        for request in roots {
            let Some(path) = resolve_file(&root.join(request)) else {
                bail!("Entry root \"{}\" of entry \"{}\" not found", request, name);
            };
            let (id, added) = graph.add_module(request, &path, None);
            if added {
                queue.push_back(id);
            }
        }
    }

    while let Some(id) = queue.pop_front() {
        let path = graph.get(id).path.clone();
        let relative = relative_display(&root, &path);

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                diagnostics.push(Diagnostic::parse_error(
                    &relative,
                    format!("Failed to read {}: {}", relative, err),
                ));
                continue;
            }
        };
        // swc skips a leading BOM, so argument ranges are relative to the text after it.
        let has_bom = source.starts_with(UTF8_BOM);
        let source = if has_bom {
            source[UTF8_BOM.len_utf8()..].to_string()
        } else {
            source
        };
        let record = graph.get_mut(id);
        record.source = source.clone();
        record.has_bom = has_bom;

        let parsed = match parse_source(source, &path, &source_map) {
            Ok(parsed) => parsed,
            Err(err) => {
                diagnostics.push(Diagnostic::parse_error(&relative, err.to_string()));
                continue;
            }
        };
        loaded.push(id);

        let scan = CallCollector::new(&function_name, &source_map, &parsed.source_file)
            .collect(&parsed.module);
        debug!(
            module = %relative,
            calls = scan.calls.len(),
            requests = scan.requests.len(),
            "scanned module"
        );

        for call in &scan.calls {
            extractor.on_matched_call(&mut graph, id, call);
        }

        for request in &scan.requests {
            if let Some(resolved) = resolve_import_path(&path, request) {
                let (child, added) = graph.add_module(request, &resolved, Some(id));
                if added {
                    queue.push_back(child);
                }
            }
        }
    }

    for (_, record) in graph.modules() {
        let relative = relative_display(&root, &record.path);
        diagnostics.extend(
            record
                .errors
                .iter()
                .map(|err| Diagnostic::from_key_error(&relative, err)),
        );
    }
    diagnostics.sort();

    let completion = extractor
        .on_complete()
        .context("Failed to write key mapping")?;

    let mut emitted = Vec::new();
    if let Some(out_dir) = &config.out_dir {
        let out_dir = root.join(out_dir);
        for id in loaded {
            if let Some(target) = emit_module(&graph, id, &root, &out_dir)? {
                emitted.push(target);
            }
        }
    }

    info!(
        modules = graph.len(),
        keys = completion.extraction.key_count(),
        diagnostics = diagnostics.len(),
        emitted = emitted.len(),
        "build finished"
    );

    Ok(BuildReport {
        completion,
        diagnostics,
        module_count: graph.len(),
        emitted,
    })
}

fn emit_module(
    graph: &ModuleGraph,
    id: ModuleId,
    root: &Path,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let record = graph.get(id);
    let Ok(relative) = record.path.strip_prefix(root) else {
        warn!(module = %record.path.display(), "module outside project root, not emitted");
        return Ok(None);
    };

    let mut rewritten = String::new();
    if record.has_bom {
        rewritten.push(UTF8_BOM);
    }
    rewritten.push_str(
        &apply_rewrites(&record.source, &record.rewrites)
            .with_context(|| format!("Failed to rewrite {}", relative.display()))?,
    );

    let target = out_dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&target, rewritten)
        .with_context(|| format!("Failed to write file: {}", target.display()))?;
    debug!(path = %target.display(), rewrites = record.rewrites.len(), "emitted module");

    Ok(Some(target))
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
