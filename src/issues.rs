//! Diagnostics produced while extracting translation keys.
//!
//! Key errors are attached to the module they occur in and never abort a
//! build. The CLI turns them, together with parse failures, into
//! [`Diagnostic`]s for reporting.

use thiserror::Error;

use crate::core::host::SourceLocation;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Rule identifier for each diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingKey,
    DynamicKey,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingKey => write!(f, "missing-key"),
            Rule::DynamicKey => write!(f, "dynamic-key"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Key errors
// ============================================================

/// A translation call that cannot contribute a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The translation function was called without arguments: `__()`
    #[error("{loc}: translation function called without a key")]
    MissingKey { loc: SourceLocation },

    /// The first argument is not a constant string: `__(someVar)`
    #[error("{loc}: {} is not supported as a translation key", describe_dynamic(.name))]
    DynamicKey {
        loc: SourceLocation,
        /// Identifier name when the argument is a plain variable.
        name: Option<String>,
    },
}

fn describe_dynamic(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("dynamic variable \"{}\"", name),
        None => "dynamic expression".to_string(),
    }
}

impl KeyError {
    pub fn rule(&self) -> Rule {
        match self {
            KeyError::MissingKey { .. } => Rule::MissingKey,
            KeyError::DynamicKey { .. } => Rule::DynamicKey,
        }
    }

    pub fn loc(&self) -> SourceLocation {
        match self {
            KeyError::MissingKey { loc } | KeyError::DynamicKey { loc, .. } => *loc,
        }
    }

    /// The message without its location prefix.
    pub fn summary(&self) -> String {
        match self {
            KeyError::MissingKey { .. } => "translation function called without a key".to_string(),
            KeyError::DynamicKey { name, .. } => format!(
                "{} is not supported as a translation key",
                describe_dynamic(name)
            ),
        }
    }
}

// ============================================================
// Diagnostic
// ============================================================

/// A reportable problem in one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Module path relative to the project root.
    pub module: String,
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
    /// Absent for whole-file problems such as parse failures.
    pub loc: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn from_key_error(module: &str, error: &KeyError) -> Self {
        Self {
            module: module.to_string(),
            rule: error.rule(),
            severity: Severity::Error,
            message: error.summary(),
            loc: Some(error.loc()),
        }
    }

    pub fn parse_error(module: &str, message: impl Into<String>) -> Self {
        Self {
            module: module.to_string(),
            rule: Rule::ParseError,
            severity: Severity::Error,
            message: message.into(),
            loc: None,
        }
    }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let position = |d: &Diagnostic| d.loc.map(|l| (l.line, l.column));
        self.module
            .cmp(&other.module)
            .then_with(|| position(self).cmp(&position(other)))
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.message.cmp(&other.message))
    }
}
