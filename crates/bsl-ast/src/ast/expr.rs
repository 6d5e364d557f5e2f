//! Expression nodes: references, indexing, call chains, method calls,
//! object construction, binary and ternary expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Statement;

// ── Markers ──────────────────────────────────────────────────────────────

/// Prefix markers recorded by the parser on a reference or expression:
/// logical negation (`Не`) and unary minus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default, skip_serializing_if = "is_false")]
    pub not: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub minus: bool,
}

impl Markers {
    pub const NONE: Markers = Markers { not: false, minus: false };

    pub fn is_empty(&self) -> bool {
        !self.not && !self.minus
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ── Variable reference ───────────────────────────────────────────────────

/// A bare identifier reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
}

impl VarRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Markers::NONE,
        }
    }

    /// Mark the reference as negated with `Не`.
    pub fn negated(mut self) -> Self {
        self.markers.not = true;
        self
    }

    /// Mark the reference with a unary minus.
    pub fn minus(mut self) -> Self {
        self.markers.minus = true;
        self
    }
}

// ── Indexed access ───────────────────────────────────────────────────────

/// `Object[Index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub object: Box<Statement>,
    pub index: Box<Statement>,
}

impl Item {
    pub fn new(object: Statement, index: Statement) -> Self {
        Self {
            object: Box::new(object),
            index: Box::new(index),
        }
    }
}

// ── Call chain ───────────────────────────────────────────────────────────

/// One link of a dotted member/method chain such as `Источник.Ссылка.Получить()`.
///
/// Chains are linked back to front: `unit` is the rightmost link and `call`
/// holds everything to its left, either another `CallChain` or the root
/// reference. The first link of a chain has no `call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallChain {
    pub unit: Box<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<Box<Statement>>,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
}

impl CallChain {
    /// Start a chain with its first link.
    pub fn root(unit: Statement) -> Self {
        Self {
            unit: Box::new(unit),
            call: None,
            markers: Markers::NONE,
        }
    }

    /// Append `unit` after `previous`, which is either a chain or a plain
    /// reference.
    pub fn link(previous: Statement, unit: Statement) -> Self {
        Self {
            unit: Box::new(unit),
            call: Some(Box::new(previous)),
            markers: Markers::NONE,
        }
    }

    pub fn negated(mut self) -> Self {
        self.markers.not = true;
        self
    }

    pub fn minus(mut self) -> Self {
        self.markers.minus = true;
        self
    }

    /// True for `Блокировка.Заблокировать()`, false for `Источник.Ссылка`.
    pub fn is_method(&self) -> bool {
        matches!(*self.unit, Statement::Method(_))
    }

    /// Number of links in the chain, counting a non-chain root as one link.
    pub fn link_count(&self) -> usize {
        match self.call.as_deref() {
            None => 1,
            Some(Statement::CallChain(prev)) => prev.link_count() + 1,
            Some(_) => 2,
        }
    }
}

// ── Method call ──────────────────────────────────────────────────────────

/// A procedure or function invocation `Name(args)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Statement>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub not: bool,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            args,
            not: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.not = true;
        self
    }
}

// ── Object construction ──────────────────────────────────────────────────

/// `Новый Constructor(args)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObject {
    pub constructor: String,
    #[serde(default)]
    pub args: Vec<Statement>,
}

impl NewObject {
    pub fn new(constructor: impl Into<String>, args: Vec<Statement>) -> Self {
        Self {
            constructor: constructor.into(),
            args,
        }
    }
}

// ── Binary expression ────────────────────────────────────────────────────

/// Binary operators. `Eq` doubles as assignment in statement position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Eq,
    Gt,
    Lt,
    Ne,
    Le,
    Ge,
    Mod,
    Or,
    And,
}

impl BinaryOp {
    /// The operator as it appears in source.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::Ne => "<>",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Mod => "%",
            BinaryOp::Or => "ИЛИ",
            BinaryOp::And => "И",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `left OP right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Box<Statement>,
    pub right: Box<Statement>,
    pub op: BinaryOp,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
}

impl BinaryExpr {
    pub fn new(left: Statement, op: BinaryOp, right: Statement) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            op,
            markers: Markers::NONE,
        }
    }

    pub fn negated(mut self) -> Self {
        self.markers.not = true;
        self
    }

    pub fn minus(mut self) -> Self {
        self.markers.minus = true;
        self
    }
}

// ── Ternary ──────────────────────────────────────────────────────────────

/// `?(Condition, Then, Otherwise)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ternary {
    pub condition: Box<Statement>,
    pub then: Box<Statement>,
    pub otherwise: Box<Statement>,
}

impl Ternary {
    pub fn new(condition: Statement, then: Statement, otherwise: Statement) -> Self {
        Self {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
}
