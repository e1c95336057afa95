use std::path::Path;

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceFile, SourceMap, sync::Lrc};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedSource {
    pub module: Module,
    pub source_file: Lrc<SourceFile>,
}

/// Pick the parser syntax from a file extension.
///
/// `.ts`, `.mts` and `.cts` parse as TypeScript without JSX (so `<T>expr`
/// assertions work), `.tsx` as TypeScript with JSX, everything else as
/// JavaScript with JSX.
pub fn syntax_for(path: &Path) -> Syntax {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax::default()),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
    }
}

/// Parse a module's source code into an AST.
///
/// The file is registered in the shared `source_map`, so positions in the
/// returned module can be looked up there and made relative to
/// `source_file.start_pos`.
pub fn parse_source(
    code: String,
    file_path: &Path,
    source_map: &Lrc<SourceMap>,
) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(
            FileName::Real(file_path.to_path_buf()).into(),
            code,
        );

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path.display(), e.kind()))?;

        Ok(ParsedSource {
            module,
            source_file,
        })
    })
}
