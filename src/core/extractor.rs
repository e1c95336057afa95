//! The key collection and mangling engine.
//!
//! An [`Extractor`] receives every matched translation call from a [`Host`],
//! validates its key, assigns an output value in the right [`KeyTable`] and,
//! when mangling, asks the host to rewrite the call's first argument. Once the
//! host has visited every module, [`Extractor::on_complete`] finalizes the
//! tables, hands them to the `done` callback and writes the configured files.
//!
//! # Example
//!
//! ```ignore
//! let mut extractor = Extractor::new(options, entries);
//! for (module, call) in matched_calls {
//!     extractor.on_matched_call(&mut host, module, &call);
//! }
//! let completion = extractor.on_complete()?;
//! ```

use std::path::PathBuf;

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::core::entry::EntryPoints;
use crate::core::host::{ArgumentValue, CallExpression, Host, ModuleId, Rewrite};
use crate::core::key_table::{KeyTable, Mapping};
use crate::core::mangle::KeyGenerator;
use crate::core::output::{
    JsonFormat, MappingWriter, OutputSetting, entry_path, is_per_entry_path,
};
use crate::issues::KeyError;

/// Translation function name scanned when none is configured.
pub const DEFAULT_FUNCTION_NAME: &str = "__";

/// Receives the final mapping(s): `(None, merged)` in global mode, or
/// `(Some(entry), mapping)` once per entry in per-entry mode.
pub type DoneCallback = Box<dyn FnMut(Option<&str>, &Mapping)>;

/// Options recognized by the engine.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    pub function_name: String,
    /// Replace keys with generated short values and rewrite call sites.
    pub mangle: bool,
    pub output: OutputSetting,
    /// Merge into existing files at the destination instead of overwriting.
    pub merge: bool,
    pub format: JsonFormat,
    /// Base directory for relative output paths.
    pub root: PathBuf,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            mangle: false,
            output: OutputSetting::default(),
            merge: false,
            format: JsonFormat::default(),
            root: PathBuf::from("."),
        }
    }
}

/// Key tables of one build.
#[derive(Debug)]
enum Tables {
    /// One table for the whole build.
    Global(KeyTable),
    /// One table per resolved entry, in first-seen order.
    PerEntry(IndexMap<String, KeyTable>),
}

/// Final mapping(s) produced by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Global(Mapping),
    PerEntry(IndexMap<String, Mapping>),
}

impl Extraction {
    /// Every table folded into one mapping; later tables win on key collision.
    pub fn merged(&self) -> Mapping {
        match self {
            Extraction::Global(mapping) => mapping.clone(),
            Extraction::PerEntry(entries) => {
                let mut merged = Mapping::new();
                for mapping in entries.values() {
                    for (key, value) in mapping {
                        merged.insert(key.clone(), value.clone());
                    }
                }
                merged
            }
        }
    }

    /// Number of keys across all tables, counting a key once per table.
    pub fn key_count(&self) -> usize {
        match self {
            Extraction::Global(mapping) => mapping.len(),
            Extraction::PerEntry(entries) => entries.values().map(Mapping::len).sum(),
        }
    }
}

/// Outcome of [`Extractor::on_complete`].
#[derive(Debug)]
pub struct Completion {
    pub extraction: Extraction,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

pub struct Extractor {
    options: ExtractorOptions,
    entries: EntryPoints,
    tables: Tables,
    /// Present only when mangling; shared by every table.
    generator: Option<KeyGenerator>,
    done: Option<DoneCallback>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("entries", &self.entries)
            .field("tables", &self.tables)
            .field("generator", &self.generator)
            .field("done", &self.done.is_some())
            .finish()
    }
}

impl Extractor {
    pub fn new(options: ExtractorOptions, entries: EntryPoints) -> Self {
        let tables = if options.output.is_per_entry() {
            Tables::PerEntry(IndexMap::new())
        } else {
            Tables::Global(KeyTable::new())
        };
        let generator = options.mangle.then(KeyGenerator::new);
        Self {
            options,
            entries,
            tables,
            generator,
            done: None,
        }
    }

    /// Install the callback invoked with the final mapping(s).
    pub fn with_done<F>(mut self, done: F) -> Self
    where
        F: FnMut(Option<&str>, &Mapping) + 'static,
    {
        self.done = Some(Box::new(done));
        self
    }

    pub fn function_name(&self) -> &str {
        &self.options.function_name
    }

    pub fn is_per_entry(&self) -> bool {
        matches!(self.tables, Tables::PerEntry(_))
    }

    /// Handle one matched call of the translation function in `module`.
    ///
    /// Invalid calls record a [`KeyError`] on the module and are skipped. The
    /// host keeps processing the expression and module normally afterwards.
    pub fn on_matched_call<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        module: ModuleId,
        call: &CallExpression,
    ) {
        let Some(argument) = call.arguments.first() else {
            host.push_error(module, KeyError::MissingKey { loc: call.loc });
            return;
        };

        let key = match &argument.value {
            ArgumentValue::String(key) => key,
            ArgumentValue::Dynamic { name } => {
                host.push_error(
                    module,
                    KeyError::DynamicKey {
                        loc: call.loc,
                        name: name.clone(),
                    },
                );
                return;
            }
        };

        let table = match &mut self.tables {
            Tables::Global(table) => table,
            Tables::PerEntry(tables) => {
                let entry = self.entries.resolve(&*host, module);
                tables.entry(entry).or_default()
            }
        };

        let generator = &mut self.generator;
        let value = table.get_or_insert_with(key, || {
            let value = match generator.as_mut() {
                Some(generator) => generator.next_key(),
                None => key.clone(),
            };
            debug!(key = %key, value = %value, "assigned translation key");
            value
        });

        if self.generator.is_some() {
            let replacement = Value::String(value.to_string()).to_string();
            host.add_rewrite(
                module,
                Rewrite {
                    range: argument.range,
                    replacement,
                    loc: argument.loc,
                },
            );
        }
    }

    /// Finalize the tables, invoke `done` and write every configured output.
    pub fn on_complete(mut self) -> Result<Completion> {
        let extraction = match self.tables {
            Tables::Global(table) => Extraction::Global(table.into_mapping()),
            Tables::PerEntry(tables) => Extraction::PerEntry(
                tables
                    .into_iter()
                    .map(|(entry, table)| (entry, table.into_mapping()))
                    .collect(),
            ),
        };

        let merged = extraction.merged();

        if let Some(done) = self.done.as_mut() {
            match &extraction {
                Extraction::Global(mapping) => done(None, mapping),
                Extraction::PerEntry(entries) => {
                    for (entry, mapping) in entries {
                        done(Some(entry.as_str()), mapping);
                    }
                }
            }
        }

        let writer = MappingWriter::new(self.options.merge, self.options.format);
        let mut written = Vec::new();
        for path in self.options.output.paths() {
            if is_per_entry_path(path) {
                if let Extraction::PerEntry(entries) = &extraction {
                    for (entry, mapping) in entries {
                        let target = self.options.root.join(entry_path(path, entry));
                        written.push(writer.write(&target, mapping)?);
                    }
                }
            } else {
                let target = self.options.root.join(path);
                written.push(writer.write(&target, &merged)?);
            }
        }

        Ok(Completion {
            extraction,
            written,
        })
    }
}
