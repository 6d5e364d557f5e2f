//! BSL source printer.
//!
//! Regenerates 1C:Enterprise source text from a `bsl-ast` syntax tree. It
//! works in two steps:
//!
//! 1. Walking the tree to produce a `FormatIR` document
//! 2. Printing the IR to a string with the configured indentation
//!
//! No source text is consulted, so the output is canonical: keywords,
//! operator spacing and block terminators are always written the same way.

pub mod ir;
pub mod printer;
pub mod walker;

use bsl_ast::{FunctionOrProcedure, Module, Statement};
use tracing::debug;

pub use printer::FormatConfig;

/// Print every top-level function and procedure of `module`.
///
/// Bare module-body statements are not printed. A module without functions
/// prints as an empty string.
///
/// # Example
///
/// ```
/// use bsl_ast::{FunctionOrProcedure, Module, Statement};
/// use bsl_fmt::{print_module, FormatConfig};
///
/// let mut module = Module::new("Пример");
/// module.body.push(
///     FunctionOrProcedure::procedure("Привет")
///         .with_body(vec![Statement::call("Сообщить", vec![Statement::String("Привет".into())])])
///         .into(),
/// );
/// let text = print_module(&module, &FormatConfig::default());
/// assert_eq!(text, "Процедура Привет()\n    Сообщить(\"Привет\");\nКонецПроцедуры\n");
/// ```
pub fn print_module(module: &Module, config: &FormatConfig) -> String {
    debug!(
        module = %module.name,
        statements = module.body.len(),
        indent = config.indent_size,
        "printing module"
    );
    let doc = walker::walk_module(module);
    printer::print(&doc, config)
}

/// Print a single function or procedure.
pub fn print_function(func: &FunctionOrProcedure, config: &FormatConfig) -> String {
    let doc = walker::walk_function(func);
    printer::print(&doc, config)
}

/// Render one expression on a single line, without a terminator.
pub fn print_expression(expr: &Statement) -> String {
    walker::expression(expr)
}
