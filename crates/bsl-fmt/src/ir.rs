//! Layout IR for BSL source printing.
//!
//! The walker lowers the syntax tree into this document tree and the
//! printer turns it into text. Indentation is relative: `Indent` adds one
//! level to whatever its parent is at.

/// A document IR node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatIR {
    /// Literal text to emit verbatim.
    Text(String),
    /// A newline followed by the current indentation.
    Hardline,
    /// Increase indentation for the child IR by the configured indent size.
    Indent(Box<FormatIR>),
    /// A sequence of IR nodes rendered in order.
    Concat(Vec<FormatIR>),
    /// Produces no output.
    Empty,
}

// ── Helper constructors ─────────────────────────────────────────────────

/// Create a `Text` node from a string-like value.
pub fn text(s: impl Into<String>) -> FormatIR {
    FormatIR::Text(s.into())
}

/// Create a `Hardline` node.
pub fn hardline() -> FormatIR {
    FormatIR::Hardline
}

/// Create an `Indent` wrapper that increases indentation for its child.
pub fn indent(ir: FormatIR) -> FormatIR {
    FormatIR::Indent(Box::new(ir))
}

/// Create a `Concat` from a vector of IR nodes.
pub fn concat(parts: Vec<FormatIR>) -> FormatIR {
    FormatIR::Concat(parts)
}
