//! The boundary between the extraction engine and whatever drives it.
//!
//! A host walks modules, recognizes calls to the translation function and
//! hands each one to [`Extractor::on_matched_call`](crate::core::Extractor::on_matched_call)
//! as a [`CallExpression`]. In return it answers questions about the module
//! graph and accepts errors and source rewrites for a module.

use crate::issues::KeyError;

/// Index of a module inside the host's module graph.
pub type ModuleId = usize;

/// 1-based line and column of a source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Half-open byte range `[start, end)` relative to the start of a module's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Statically evaluated value of a call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// A compile-time constant string: `"key"`, `` `key` ``, `"a" + "b"`
    String(String),
    /// Anything that cannot be proven constant.
    Dynamic {
        /// Identifier name when the argument is a plain variable: `__(name)`
        name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgument {
    pub value: ArgumentValue,
    pub range: SourceRange,
    pub loc: SourceLocation,
}

impl CallArgument {
    pub fn string(value: impl Into<String>, range: SourceRange, loc: SourceLocation) -> Self {
        Self {
            value: ArgumentValue::String(value.into()),
            range,
            loc,
        }
    }

    pub fn dynamic(name: Option<String>, range: SourceRange, loc: SourceLocation) -> Self {
        Self {
            value: ArgumentValue::Dynamic { name },
            range,
            loc,
        }
    }
}

/// One matched call site of the translation function (an occurrence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpression {
    pub arguments: Vec<CallArgument>,
    /// Location of the call itself, used for error reporting.
    pub loc: SourceLocation,
}

/// Replace `range` in the module's source with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub range: SourceRange,
    pub replacement: String,
    /// Location of the replaced argument.
    pub loc: SourceLocation,
}

/// Services a build host provides to the extraction engine.
pub trait Host {
    /// The request string a module was included by, or the entry root it was declared as.
    fn raw_request(&self, module: ModuleId) -> &str;

    /// The module that caused `module` to be included, if any.
    fn issuer(&self, module: ModuleId) -> Option<ModuleId>;

    /// Attach a non-fatal key error to a module.
    fn push_error(&mut self, module: ModuleId, error: KeyError);

    /// Register a source rewrite for a module's compiled output.
    fn add_rewrite(&mut self, module: ModuleId, rewrite: Rewrite);
}
