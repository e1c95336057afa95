//! Report formatting and printing utilities.
//!
//! Diagnostics are displayed cargo-style, followed by a summary of what the
//! build produced. Kept apart from the pipeline so transkey can be used as a
//! library.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::issues::{Diagnostic, Severity};
use crate::pipeline::BuildReport;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a build report to stdout.
pub fn print(build: &BuildReport, root: &Path, verbose: bool) {
    print_to(build, root, verbose, &mut io::stdout().lock());
}

/// Print a build report to a custom writer.
pub fn print_to<W: Write>(build: &BuildReport, root: &Path, verbose: bool, writer: &mut W) {
    report_to(&build.diagnostics, root, writer);
    print_outcome(build, root, verbose, writer);
}

/// Print diagnostics followed by a problem count; prints nothing when empty.
///
/// Source lines are read from `root` joined with each diagnostic's module.
pub fn report_to<W: Write>(diagnostics: &[Diagnostic], root: &Path, writer: &mut W) {
    if diagnostics.is_empty() {
        return;
    }

    let mut sources = SourceLines::new(root);
    let max_line_width = diagnostics
        .iter()
        .filter_map(|d| d.loc.map(|l| l.line))
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for diagnostic in diagnostics {
        print_diagnostic(diagnostic, &mut sources, writer, max_line_width);
    }

    print_summary(diagnostics, writer);
}

fn print_diagnostic<W: Write>(
    diagnostic: &Diagnostic,
    sources: &mut SourceLines,
    writer: &mut W,
    max_line_width: usize,
) {
    let (severity_str, caret_char) = match diagnostic.severity {
        Severity::Error => ("error".bold().red(), "^".red()),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        diagnostic.message,
        diagnostic.rule.to_string().dimmed().cyan()
    );

    let Some(loc) = diagnostic.loc else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), diagnostic.module);
        let _ = writeln!(writer);
        return;
    };

    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        diagnostic.module,
        loc.line,
        loc.column
    );

    if let Some(source_line) = sources.line(&diagnostic.module, loc.line) {
        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            loc.line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        let prefix: String = source_line.chars().take(loc.column.saturating_sub(1)).collect();
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = UnicodeWidthStr::width(prefix.as_str())
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(diagnostics: &[Diagnostic], writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} {}",
        FAILURE_MARK.red(),
        diagnostics.len(),
        plural(diagnostics.len(), "problem", "problems").red()
    );
}

fn print_outcome<W: Write>(build: &BuildReport, root: &Path, verbose: bool, writer: &mut W) {
    let keys = build.completion.extraction.key_count();
    let msg = format!(
        "Extracted {} {} from {} {}",
        keys,
        plural(keys, "key", "keys"),
        build.module_count,
        plural(build.module_count, "module", "modules")
    );
    if build.has_diagnostics() {
        let _ = writeln!(writer, "{}", msg);
    } else {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
    }

    for path in &build.completion.written {
        let _ = writeln!(writer, "  {} {}", "wrote".bold(), display_relative(root, path));
    }

    if build.emitted.is_empty() {
        return;
    }
    if verbose {
        for path in &build.emitted {
            let _ = writeln!(writer, "  {} {}", "emitted".bold(), display_relative(root, path));
        }
    } else {
        let _ = writeln!(
            writer,
            "  {} {} rewritten {} (use {} to list)",
            "emitted".bold(),
            build.emitted.len(),
            plural(build.emitted.len(), "module", "modules"),
            "-v".cyan()
        );
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Lazily loaded source lines, keyed by module path.
struct SourceLines<'a> {
    root: &'a Path,
    files: HashMap<String, Option<Vec<String>>>,
}

impl<'a> SourceLines<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            files: HashMap::new(),
        }
    }

    /// 1-based line of a module, if the file can still be read.
    fn line(&mut self, module: &str, line: usize) -> Option<&str> {
        let root = self.root;
        let lines = self.files.entry(module.to_string()).or_insert_with(|| {
            fs::read_to_string(root.join(module))
                .ok()
                .map(|content| content.lines().map(str::to_string).collect())
        });
        lines
            .as_ref()?
            .get(line.checked_sub(1)?)
            .map(String::as_str)
    }
}
