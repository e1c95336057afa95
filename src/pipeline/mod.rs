//! Host pipeline: a filesystem build that drives the extraction engine.
//!
//! Modules are discovered breadth-first from the entry roots by following
//! relative `import`, `export ... from`, `require` and `import()` requests.

pub mod build;
pub mod graph;
pub mod parser;
pub mod rewrite;
pub mod visitor;

pub use build::{BuildReport, run_build};
