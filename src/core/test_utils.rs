//! In-memory host used by the core unit tests.

use crate::core::host::{
    CallArgument, CallExpression, Host, ModuleId, Rewrite, SourceLocation, SourceRange,
};
use crate::issues::KeyError;

#[derive(Debug, Default)]
pub struct FakeModule {
    pub raw_request: String,
    pub issuer: Option<ModuleId>,
    pub errors: Vec<KeyError>,
    pub rewrites: Vec<Rewrite>,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub modules: Vec<FakeModule>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, raw_request: &str, issuer: Option<ModuleId>) -> ModuleId {
        self.modules.push(FakeModule {
            raw_request: raw_request.to_string(),
            issuer,
            ..Default::default()
        });
        self.modules.len() - 1
    }

    pub fn error_count(&self) -> usize {
        self.modules.iter().map(|m| m.errors.len()).sum()
    }
}

impl Host for FakeHost {
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

pub fn loc(line: usize, column: usize) -> SourceLocation {
    SourceLocation { line, column }
}

/// `__("key")` on the given line, with the argument at bytes 3..3+len+2.
pub fn string_call(key: &str, line: usize) -> CallExpression {
    let end = 3 + key.len() as u32 + 2;
    CallExpression {
        arguments: vec![CallArgument::string(
            key,
            SourceRange::new(3, end),
            loc(line, 4),
        )],
        loc: loc(line, 1),
    }
}

/// `__(name)` on the given line.
pub fn dynamic_call(name: Option<&str>, line: usize) -> CallExpression {
    CallExpression {
        arguments: vec![CallArgument::dynamic(
            name.map(str::to_string),
            SourceRange::new(3, 8),
            loc(line, 4),
        )],
        loc: loc(line, 1),
    }
}

/// `__()` on the given line.
pub fn empty_call(line: usize) -> CallExpression {
    CallExpression {
        arguments: Vec::new(),
        loc: loc(line, 1),
    }
}
