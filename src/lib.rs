//! Transkey - translation key extraction and mangling
//!
//! Transkey walks the module graph of a JavaScript or TypeScript project from
//! its entry points, collects the string keys passed to a translation function
//! (`__("key")` by default) and writes them to JSON mapping files, one global
//! mapping or one per entry. With mangling enabled every key is replaced by a
//! short generated value and call sites are rewritten to match.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, report)
//! - `config`: Configuration file loading and parsing
//! - `core`: The extraction engine, independent of any particular build host
//! - `issues`: Key errors and reportable diagnostics
//! - `pipeline`: Filesystem build host that parses modules and drives the engine

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod pipeline;
