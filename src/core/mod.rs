//! Key collection and mangling engine.
//!
//! ## Module Structure
//!
//! - `mangle`: short key generation
//! - `key_table`: write-once key tables
//! - `entry`: entry point normalization and issuer-chain resolution
//! - `host`: the interface a build host implements
//! - `output`: mapping serialization and merge-on-write
//! - `extractor`: the engine itself

pub mod entry;
pub mod extractor;
pub mod host;
pub mod key_table;
pub mod mangle;
pub mod output;

#[cfg(test)]
pub(crate) mod test_utils;

pub use entry::{EntryPoints, EntrySetting};
pub use extractor::{Completion, Extraction, Extractor, ExtractorOptions};
pub use host::{ArgumentValue, CallArgument, CallExpression, Host, ModuleId, Rewrite};
pub use key_table::{KeyTable, Mapping};
pub use mangle::KeyGenerator;
pub use output::{JsonFormat, OutputSetting};
