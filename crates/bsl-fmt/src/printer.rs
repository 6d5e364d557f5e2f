//! Printer for the BSL layout IR.
//!
//! Walks the IR with an explicit work stack. Indentation is written lazily,
//! right before the first text of a line, so blank lines stay empty.

use serde::{Deserialize, Serialize};

use crate::ir::FormatIR;

/// Configuration for the printer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Number of spaces per nesting level. Default: 4. Zero disables
    /// indentation.
    pub indent_size: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_size: 4 }
    }
}

impl FormatConfig {
    pub fn with_indent(indent_size: usize) -> Self {
        Self { indent_size }
    }
}

/// A command on the printer's work stack.
#[derive(Debug)]
struct PrintCmd<'a> {
    indent: usize,
    ir: &'a FormatIR,
}

/// Render a `FormatIR` tree as a string.
///
/// Non-empty output always ends with a newline.
pub fn print(ir: &FormatIR, config: &FormatConfig) -> String {
    let mut out = String::new();
    let mut pending_indent: Option<usize> = None;
    let mut stack: Vec<PrintCmd> = vec![PrintCmd { indent: 0, ir }];

    while let Some(cmd) = stack.pop() {
        match cmd.ir {
            FormatIR::Empty => {}

            FormatIR::Text(s) => {
                if s.is_empty() {
                    continue;
                }
                if let Some(width) = pending_indent.take() {
                    out.push_str(&" ".repeat(width));
                }
                out.push_str(s);
            }

            FormatIR::Hardline => {
                out.push('\n');
                pending_indent = Some(cmd.indent);
            }

            FormatIR::Indent(child) => {
                stack.push(PrintCmd {
                    indent: cmd.indent + config.indent_size,
                    ir: child,
                });
            }

            FormatIR::Concat(parts) => {
                // Push in reverse order so the first element is processed first.
                for part in parts.iter().rev() {
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        ir: part,
                    });
                }
            }
        }
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    out
}
