//! AST visitor that finds translation calls and module requests in one pass.

use swc_common::{BytePos, SourceFile, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    BinaryOp, CallExpr, Callee, ExportAll, Expr, ExprOrSpread, ImportDecl, Lit, NamedExport,
    Tpl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::host::{
    ArgumentValue, CallArgument, CallExpression, SourceLocation, SourceRange,
};

/// Everything the pipeline needs from one parsed module.
#[derive(Debug, Default)]
pub struct ModuleScan {
    /// Calls to the translation function, in source order.
    pub calls: Vec<CallExpression>,
    /// Module specifiers this module requests, in source order.
    pub requests: Vec<String>,
}

/// Collects translation calls and import/require requests from a module.
pub struct CallCollector<'a> {
    function_name: &'a str,
    source_map: &'a SourceMap,
    /// Global position of the module's first byte.
    start_pos: BytePos,
    scan: ModuleScan,
}

impl<'a> CallCollector<'a> {
    pub fn new(function_name: &'a str, source_map: &'a SourceMap, source_file: &SourceFile) -> Self {
        Self {
            function_name,
            source_map,
            start_pos: source_file.start_pos,
            scan: ModuleScan::default(),
        }
    }

    pub fn collect<N: VisitWith<Self>>(mut self, node: &N) -> ModuleScan {
        node.visit_with(&mut self);
        self.scan
    }

    fn location(&self, pos: BytePos) -> SourceLocation {
        let loc = self.source_map.lookup_char_pos(pos);
        SourceLocation {
            line: loc.line,
            column: loc.col_display + 1,
        }
    }

    fn range(&self, span: Span) -> SourceRange {
        SourceRange::new(
            span.lo.0.saturating_sub(self.start_pos.0),
            span.hi.0.saturating_sub(self.start_pos.0),
        )
    }

    fn make_argument(&self, arg: &ExprOrSpread) -> CallArgument {
        let span = arg.expr.span();
        let value = if arg.spread.is_some() {
            ArgumentValue::Dynamic { name: None }
        } else {
            evaluate_argument(&arg.expr)
        };
        CallArgument {
            value,
            range: self.range(span),
            loc: self.location(span.lo),
        }
    }

    fn push_request(&mut self, specifier: Option<&str>) {
        if let Some(specifier) = specifier {
            self.scan.requests.push(specifier.to_string());
        }
    }
}

impl Visit for CallCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        match &node.callee {
            Callee::Expr(expr) => {
                if let Expr::Ident(ident) = &**expr {
                    let name = ident.sym.as_str();
                    if name == self.function_name {
                        let call = CallExpression {
                            arguments: node.args.iter().map(|a| self.make_argument(a)).collect(),
                            loc: self.location(node.span.lo),
                        };
                        self.scan.calls.push(call);
                    } else if name == "require" {
                        self.push_request(first_string_argument(node).as_deref());
                    }
                }
            }
            Callee::Import(_) => self.push_request(first_string_argument(node).as_deref()),
            Callee::Super(_) => {}
        }

        node.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if !node.type_only {
            self.push_request(node.src.value.as_str());
        }
    }

    fn visit_named_export(&mut self, node: &NamedExport) {
        if let Some(src) = &node.src
            && !node.type_only
        {
            self.push_request(src.value.as_str());
        }
    }

    fn visit_export_all(&mut self, node: &ExportAll) {
        if !node.type_only {
            self.push_request(node.src.value.as_str());
        }
    }
}

fn first_string_argument(node: &CallExpr) -> Option<String> {
    let arg = node.args.first()?;
    if arg.spread.is_some() {
        return None;
    }
    match evaluate_argument(&arg.expr) {
        ArgumentValue::String(value) => Some(value),
        ArgumentValue::Dynamic { .. } => None,
    }
}

/// Unwrap parentheses and TypeScript type assertions.
/// Handles: `(expr)`, `expr as T`, `expr as const`, `expr satisfies T`, `<T>expr`
pub fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_paren(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_paren(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_paren(&ts_sat.expr),
        Expr::TsTypeAssertion(ts_assert) => unwrap_paren(&ts_assert.expr),
        _ => expr,
    }
}

/// Statically evaluate a call argument to a constant string.
///
/// Number and boolean literals fold into `+` chains and template
/// interpolations the way JavaScript converts them; on their own they are
/// not keys.
///
/// ```ignore
/// __("key")              → String("key")
/// __(`key`)              → String("key")
/// __("a." + "b")         → String("a.b")
/// __(`a.${"b"}`)         → String("a.b")
/// __("a" + 1)            → String("a1")
/// __("n" + (1 + 2))      → String("n3")
/// __(`x${true}`)         → String("xtrue")
/// __(1)                  → Dynamic { name: None }
/// __(name)               → Dynamic { name: Some("name") }
/// __(obj.key)            → Dynamic { name: None }
/// ```
pub fn evaluate_argument(expr: &Expr) -> ArgumentValue {
    match evaluate_constant(expr) {
        Some(Constant::Str(value)) => ArgumentValue::String(value),
        _ => ArgumentValue::Dynamic {
            name: match unwrap_paren(expr) {
                Expr::Ident(ident) => Some(ident.sym.to_string()),
                _ => None,
            },
        },
    }
}

/// A statically known primitive.
#[derive(Debug, Clone, PartialEq)]
enum Constant {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Constant {
    fn into_string(self) -> String {
        match self {
            Constant::Str(value) => value,
            Constant::Num(value) => format_number(value),
            Constant::Bool(value) => value.to_string(),
        }
    }

    fn to_number(&self) -> Option<f64> {
        match self {
            Constant::Str(_) => None,
            Constant::Num(value) => Some(*value),
            Constant::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
        }
    }

    /// JavaScript `+`: concatenation when either side is a string.
    fn plus(self, other: Constant) -> Option<Constant> {
        match (&self, &other) {
            (Constant::Str(_), _) | (_, Constant::Str(_)) => {
                let mut value = self.into_string();
                value.push_str(&other.into_string());
                Some(Constant::Str(value))
            }
            _ => Some(Constant::Num(self.to_number()? + other.to_number()?)),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        // Integral values print without a fraction; -0 prints as 0.
        format!("{}", value as i128)
    } else {
        value.to_string()
    }
}

fn evaluate_constant(expr: &Expr) -> Option<Constant> {
    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|v| Constant::Str(v.to_string())),
        Expr::Lit(Lit::Num(n)) => Some(Constant::Num(n.value)),
        Expr::Lit(Lit::Bool(b)) => Some(Constant::Bool(b.value)),
        Expr::Tpl(tpl) => evaluate_template(tpl).map(Constant::Str),
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            evaluate_constant(&bin.left)?.plus(evaluate_constant(&bin.right)?)
        }
        _ => None,
    }
}

fn evaluate_template(tpl: &Tpl) -> Option<String> {
    let mut value = String::new();
    for (index, quasi) in tpl.quasis.iter().enumerate() {
        value.push_str(quasi.cooked.as_ref()?.as_str()?);
        if let Some(expr) = tpl.exprs.get(index) {
            value.push_str(&evaluate_constant(expr)?.into_string());
        }
    }
    Some(value)
}
