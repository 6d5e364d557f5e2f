//! Syntax-tree-to-FormatIR walker.
//!
//! Statements and blocks become IR so that indentation is decided by the
//! printer. Expressions never span lines and are rendered straight to text.
//!
//! Layout rules:
//!
//! - Opening and closing keywords of a block construct share the
//!   construct's indentation; the block itself is indented one level.
//! - Simple statements end with `;`. Block constructs end with `;` after
//!   their closing keyword and are separated from the next statement of
//!   the same block by a blank line.
//! - Only functions and procedures are printed at module scope.

use bsl_ast::{
    BinaryExpr, BinaryOp, CallChain, FunctionOrProcedure, IfStmt, LoopHeader, LoopStmt, Markers,
    Module, Parameter, Statement, TryStmt,
};
use tracing::warn;

use crate::ir::{concat, hardline, indent, text, FormatIR};

// ── Module and functions ────────────────────────────────────────────────

/// Lower every top-level function and procedure, separated by blank lines.
pub fn walk_module(module: &Module) -> FormatIR {
    let mut parts = Vec::new();
    for func in module.functions() {
        if !parts.is_empty() {
            parts.push(hardline());
            parts.push(hardline());
        }
        parts.push(walk_function(func));
    }
    if parts.is_empty() {
        FormatIR::Empty
    } else {
        concat(parts)
    }
}

/// Lower one function or procedure, from directive to end keyword.
pub fn walk_function(func: &FunctionOrProcedure) -> FormatIR {
    let sig = &func.signature;
    let mut parts = Vec::new();

    if let Some(directive) = &sig.directive {
        parts.push(text(directive.as_str()));
        parts.push(hardline());
    }

    let params: Vec<String> = sig.params.iter().map(param_text).collect();
    let mut header = format!("{} {}({})", sig.kind.keyword(), sig.name, params.join(", "));
    if sig.export {
        header.push_str(" Экспорт");
    }
    parts.push(text(header));
    parts.push(walk_block(&func.body));
    parts.push(hardline());
    parts.push(text(sig.kind.end_keyword()));

    concat(parts)
}

fn param_text(param: &Parameter) -> String {
    let mut out = String::new();
    if param.by_value {
        out.push_str("Знач ");
    }
    out.push_str(&param.name);
    if param.has_default() {
        out.push_str(" = ");
        write_expr(&mut out, &param.default);
    }
    out
}

// ── Blocks and statements ───────────────────────────────────────────────

/// Lower a block: each statement on its own line, one level deeper than
/// the owning construct.
pub fn walk_block(stmts: &[Statement]) -> FormatIR {
    if stmts.is_empty() {
        return FormatIR::Empty;
    }
    let mut parts = Vec::with_capacity(stmts.len() * 2);
    for (i, stmt) in stmts.iter().enumerate() {
        parts.push(hardline());
        parts.push(walk_statement(stmt));
        if stmt.is_compound() && i + 1 < stmts.len() {
            parts.push(hardline());
        }
    }
    indent(concat(parts))
}

/// Lower a single statement.
pub fn walk_statement(stmt: &Statement) -> FormatIR {
    match stmt {
        Statement::If(stmt) => walk_if(stmt),
        Statement::Loop(stmt) => walk_loop(stmt),
        Statement::Try(stmt) => walk_try(stmt),
        Statement::Function(func) => walk_function(func),
        Statement::Break => text("Прервать;"),
        Statement::Continue => text("Продолжить;"),
        Statement::Throw(value) => keyword_statement("ВызватьИсключение", value.as_deref()),
        Statement::Return(value) => keyword_statement("Возврат", value.as_deref()),
        Statement::GoTo(label) => text(format!("Перейти ~{label};")),
        Statement::GoToLabel(label) => text(format!("~{label}:")),
        Statement::Var(_)
        | Statement::Item(_)
        | Statement::CallChain(_)
        | Statement::Method(_)
        | Statement::NewObject(_)
        | Statement::Binary(_)
        | Statement::Ternary(_)
        | Statement::Undefined
        | Statement::Number(_)
        | Statement::String(_)
        | Statement::Bool(_)
        | Statement::Date(_) => {
            let mut line = expression(stmt);
            line.push(';');
            text(line)
        }
    }
}

fn keyword_statement(keyword: &str, value: Option<&Statement>) -> FormatIR {
    let mut line = keyword.to_string();
    if let Some(value) = value {
        line.push(' ');
        write_expr(&mut line, value);
    }
    line.push(';');
    text(line)
}

fn walk_if(stmt: &IfStmt) -> FormatIR {
    let mut parts = vec![
        text(format!("Если {} Тогда", expression(&stmt.condition))),
        walk_block(&stmt.then_block),
    ];
    for clause in &stmt.else_ifs {
        let Statement::If(clause) = clause else {
            warn!(kind = clause.kind_name(), "else-if clause is not an if, skipped");
            continue;
        };
        parts.push(hardline());
        parts.push(text(format!("ИначеЕсли {} Тогда", expression(&clause.condition))));
        parts.push(walk_block(&clause.then_block));
    }
    if let Some(block) = &stmt.else_block {
        parts.push(hardline());
        parts.push(text("Иначе"));
        parts.push(walk_block(block));
    }
    parts.push(hardline());
    parts.push(text("КонецЕсли;"));
    concat(parts)
}

fn walk_loop(stmt: &LoopStmt) -> FormatIR {
    let header = match &stmt.header {
        LoopHeader::While { condition } => format!("Пока {} Цикл", expression(condition)),
        LoopHeader::ForEach {
            variable,
            collection,
        } => format!("Для Каждого {} Из {} Цикл", variable, expression(collection)),
        LoopHeader::ForTo { counter, bound } => {
            format!("Для {} По {} Цикл", expression(counter), expression(bound))
        }
    };
    concat(vec![
        text(header),
        walk_block(&stmt.body),
        hardline(),
        text("КонецЦикла;"),
    ])
}

/// An empty try or catch block still gets its own (blank) line.
fn walk_try(stmt: &TryStmt) -> FormatIR {
    concat(vec![
        text("Попытка"),
        try_block(&stmt.body),
        hardline(),
        text("Исключение"),
        try_block(&stmt.catch),
        hardline(),
        text("КонецПопытки;"),
    ])
}

fn try_block(stmts: &[Statement]) -> FormatIR {
    if stmts.is_empty() {
        hardline()
    } else {
        walk_block(stmts)
    }
}

// ── Expressions ─────────────────────────────────────────────────────────

/// Render an expression as single-line source text.
pub fn expression(stmt: &Statement) -> String {
    let mut out = String::new();
    write_expr(&mut out, stmt);
    out
}

fn write_prefix(out: &mut String, markers: Markers) {
    if markers.not {
        out.push_str("Не ");
    }
    if markers.minus {
        out.push('-');
    }
}

fn write_expr(out: &mut String, stmt: &Statement) {
    match stmt {
        Statement::Binary(expr) => write_binary(out, expr),
        Statement::Var(var) => {
            write_prefix(out, var.markers);
            out.push_str(&var.name);
        }
        Statement::CallChain(chain) => {
            write_prefix(out, chain.markers);
            write_chain(out, chain);
        }
        Statement::Method(method) => {
            if method.not {
                out.push_str("Не ");
            }
            out.push_str(&method.name);
            write_args(out, &method.args);
        }
        Statement::Item(item) => {
            write_expr(out, &item.object);
            out.push('[');
            write_expr(out, &item.index);
            out.push(']');
        }
        Statement::NewObject(new) => {
            out.push_str("Новый ");
            out.push_str(&new.constructor);
            write_args(out, &new.args);
        }
        Statement::Ternary(ternary) => {
            out.push_str("?(");
            write_expr(out, &ternary.condition);
            out.push_str(", ");
            write_expr(out, &ternary.then);
            out.push_str(", ");
            write_expr(out, &ternary.otherwise);
            out.push(')');
        }
        Statement::Number(n) => out.push_str(&format_number(*n)),
        Statement::String(s) => write_string(out, s),
        Statement::Bool(b) => out.push_str(if *b { "Истина" } else { "Ложь" }),
        Statement::Date(date) => {
            out.push('\'');
            out.push_str(&date.to_string());
            out.push('\'');
        }
        Statement::Undefined => out.push_str("Неопределено"),
        Statement::If(_)
        | Statement::Loop(_)
        | Statement::Try(_)
        | Statement::Break
        | Statement::Continue
        | Statement::Throw(_)
        | Statement::Return(_)
        | Statement::GoTo(_)
        | Statement::GoToLabel(_)
        | Statement::Function(_) => {
            warn!(kind = stmt.kind_name(), "statement in expression position, skipped");
        }
    }
}

fn write_binary(out: &mut String, expr: &BinaryExpr) {
    let wrapped = !expr.markers.is_empty();
    write_prefix(out, expr.markers);
    if wrapped {
        out.push('(');
    }
    let prec = precedence(expr.op);
    write_operand(out, &expr.left, prec, false);
    out.push(' ');
    out.push_str(expr.op.as_str());
    out.push(' ');
    write_operand(out, &expr.right, prec, true);
    if wrapped {
        out.push(')');
    }
}

/// Binding strength of an operator; higher binds tighter.
fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Gt
        | BinaryOp::Le
        | BinaryOp::Ge => 3,
        BinaryOp::Plus | BinaryOp::Minus => 4,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 5,
    }
}

/// `Не` binds looser than comparisons and arithmetic.
const NOT_PRECEDENCE: u8 = 2;

/// Write an operand of an operator with precedence `parent`.
///
/// An unmarked binary child is grouped when it binds more loosely than the
/// parent, or equally on the right. A `Не`-prefixed operand is grouped when
/// the parent binds tighter than `Не`.
fn write_operand(out: &mut String, operand: &Statement, parent: u8, right: bool) {
    let negated = match operand {
        Statement::Binary(expr) => expr.markers.not,
        Statement::Var(var) => var.markers.not,
        Statement::CallChain(chain) => chain.markers.not,
        Statement::Method(method) => method.not,
        _ => false,
    };
    let grouped = match operand {
        _ if negated => NOT_PRECEDENCE < parent,
        Statement::Binary(expr) if expr.markers.is_empty() => {
            let child = precedence(expr.op);
            child < parent || (right && child == parent)
        }
        _ => false,
    };
    if grouped {
        out.push('(');
        write_expr(out, operand);
        out.push(')');
    } else {
        write_expr(out, operand);
    }
}

/// Chains are linked back to front, so the previous links are written
/// first. Only the outermost link's markers apply.
fn write_chain(out: &mut String, chain: &CallChain) {
    match chain.call.as_deref() {
        Some(Statement::CallChain(previous)) => {
            write_chain(out, previous);
            out.push('.');
        }
        Some(root) => {
            write_expr(out, root);
            out.push('.');
        }
        None => {}
    }
    write_expr(out, &chain.unit);
}

fn write_args(out: &mut String, args: &[Statement]) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, arg);
    }
    out.push(')');
}

/// Shortest decimal text that parses back to the same value.
///
/// NaN and infinities have no literal form; they are printed as `Display`
/// renders them, which does not parse back.
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        warn!(value = %n, "non-finite number has no source form");
    }
    format!("{n}")
}

/// Quotes are escaped by doubling them; line breaks continue the literal
/// on a `|` line.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '\n' => out.push_str("\n|"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
