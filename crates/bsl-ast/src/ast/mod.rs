//! The BSL syntax tree.
//!
//! A parser produces a [`Module`] by feeding [`ModuleItem`]s into
//! [`Module::append`]. Every node is a variant of the closed [`Statement`]
//! enum; expressions and statements share it because the language allows
//! calls, assignments and chains in both positions.
//!
//! # Ownership
//!
//! Each composite node owns its children. The only back-reference is the
//! [`CallChain`] link to the previous part of the chain, which is built
//! bottom-up and never forms a cycle.

pub mod expr;
pub mod item;
pub mod stmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bsl_common::{AssemblyError, Diagnostics};

use crate::date::Date;
use crate::walk::walk;

pub use expr::{BinaryExpr, BinaryOp, CallChain, Item, Markers, Method, NewObject, Ternary, VarRef};
pub use item::{FunctionKind, FunctionOrProcedure, GlobalVariable, Parameter, Signature};
pub use stmt::{IfStmt, LoopHeader, LoopHeaderError, LoopStmt, TryStmt};

// ── Statement enum ───────────────────────────────────────────────────────

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Var(VarRef),
    Item(Item),
    CallChain(CallChain),
    Method(Method),
    NewObject(NewObject),
    Binary(BinaryExpr),
    Ternary(Ternary),
    If(IfStmt),
    Loop(LoopStmt),
    Try(TryStmt),
    Break,
    Continue,
    Throw(Option<Box<Statement>>),
    Return(Option<Box<Statement>>),
    Undefined,
    Number(f64),
    String(String),
    Bool(bool),
    Date(Date),
    GoTo(String),
    GoToLabel(String),
    Function(Box<FunctionOrProcedure>),
}

impl Statement {
    /// Shorthand for a plain identifier reference.
    pub fn var(name: impl Into<String>) -> Self {
        Statement::Var(VarRef::new(name))
    }

    /// Shorthand for `left OP right`.
    pub fn binary(left: Statement, op: BinaryOp, right: Statement) -> Self {
        Statement::Binary(BinaryExpr::new(left, op, right))
    }

    /// Shorthand for the assignment `target = value`.
    pub fn assign(target: Statement, value: Statement) -> Self {
        Self::binary(target, BinaryOp::Eq, value)
    }

    pub fn call(name: impl Into<String>, args: Vec<Statement>) -> Self {
        Statement::Method(Method::new(name, args))
    }

    pub fn ret(value: Option<Statement>) -> Self {
        Statement::Return(value.map(Box::new))
    }

    pub fn throw(value: Option<Statement>) -> Self {
        Statement::Throw(value.map(Box::new))
    }

    /// Apply a `Не` prefix recorded by the parser. Boolean literals are
    /// folded into the opposite literal.
    ///
    /// Other nodes cannot carry the marker; they are returned unchanged and
    /// a warning is logged.
    pub fn negated(self) -> Self {
        match self {
            Statement::Var(v) => Statement::Var(v.negated()),
            Statement::Binary(e) => Statement::Binary(e.negated()),
            Statement::CallChain(c) => Statement::CallChain(c.negated()),
            Statement::Method(m) => Statement::Method(m.negated()),
            Statement::Bool(b) => Statement::Bool(!b),
            other => {
                warn!(kind = other.kind_name(), "node cannot be negated, marker dropped");
                other
            }
        }
    }

    /// Apply a unary minus recorded by the parser. Number literals are
    /// folded into a negative literal.
    ///
    /// Other nodes cannot carry the marker; they are returned unchanged and
    /// a warning is logged.
    pub fn minus(self) -> Self {
        match self {
            Statement::Var(v) => Statement::Var(v.minus()),
            Statement::Binary(e) => Statement::Binary(e.minus()),
            Statement::CallChain(c) => Statement::CallChain(c.minus()),
            Statement::Number(n) => Statement::Number(-n),
            other => {
                warn!(kind = other.kind_name(), "node cannot take unary minus, marker dropped");
                other
            }
        }
    }

    /// Whether this node owns a nested block and prints as a multi-line
    /// construct.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Statement::If(_) | Statement::Loop(_) | Statement::Try(_) | Statement::Function(_)
        )
    }

    /// Stable name of the variant, used in logs and tool output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Var(_) => "Var",
            Statement::Item(_) => "Item",
            Statement::CallChain(_) => "CallChain",
            Statement::Method(_) => "Method",
            Statement::NewObject(_) => "NewObject",
            Statement::Binary(_) => "Binary",
            Statement::Ternary(_) => "Ternary",
            Statement::If(_) => "If",
            Statement::Loop(_) => "Loop",
            Statement::Try(_) => "Try",
            Statement::Break => "Break",
            Statement::Continue => "Continue",
            Statement::Throw(_) => "Throw",
            Statement::Return(_) => "Return",
            Statement::Undefined => "Undefined",
            Statement::Number(_) => "Number",
            Statement::String(_) => "String",
            Statement::Bool(_) => "Bool",
            Statement::Date(_) => "Date",
            Statement::GoTo(_) => "GoTo",
            Statement::GoToLabel(_) => "GoToLabel",
            Statement::Function(_) => "Function",
        }
    }
}

impl From<FunctionOrProcedure> for Statement {
    fn from(func: FunctionOrProcedure) -> Self {
        Statement::Function(Box::new(func))
    }
}

// ── Module ───────────────────────────────────────────────────────────────

/// Input unit for [`Module::append`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleItem {
    Global(GlobalVariable),
    Globals(Vec<GlobalVariable>),
    Statement(Statement),
    Statements(Vec<Statement>),
}

impl From<GlobalVariable> for ModuleItem {
    fn from(var: GlobalVariable) -> Self {
        ModuleItem::Global(var)
    }
}

impl From<Vec<GlobalVariable>> for ModuleItem {
    fn from(vars: Vec<GlobalVariable>) -> Self {
        ModuleItem::Globals(vars)
    }
}

impl From<Statement> for ModuleItem {
    fn from(stmt: Statement) -> Self {
        ModuleItem::Statement(stmt)
    }
}

impl From<Vec<Statement>> for ModuleItem {
    fn from(stmts: Vec<Statement>) -> Self {
        ModuleItem::Statements(stmts)
    }
}

impl From<FunctionOrProcedure> for ModuleItem {
    fn from(func: FunctionOrProcedure) -> Self {
        ModuleItem::Statement(func.into())
    }
}

/// The root of a parsed module.
///
/// Global declarations come first, then functions and procedures, then
/// free module-body statements. [`Module::append`] enforces that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub global_variables: FxHashMap<String, GlobalVariable>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            global_variables: FxHashMap::default(),
            body: Vec::new(),
        }
    }

    /// Assemble a module from a sequence of parser items.
    pub fn assemble<I>(name: impl Into<String>, items: I) -> (Module, Diagnostics)
    where
        I: IntoIterator,
        I::Item: Into<ModuleItem>,
    {
        let mut module = Module::new(name);
        let mut diagnostics = Diagnostics::new();
        for item in items {
            module.append(item, &mut diagnostics);
        }
        debug!(
            module = %module.name,
            statements = module.body.len(),
            globals = module.global_variables.len(),
            errors = diagnostics.len(),
            "assembled module"
        );
        (module, diagnostics)
    }

    /// Add parser output to the module.
    ///
    /// Structural violations are reported to `diagnostics` and the offending
    /// item is dropped; assembly can continue afterwards. Batches are applied
    /// element by element under the same rules.
    pub fn append(&mut self, item: impl Into<ModuleItem>, diagnostics: &mut Diagnostics) {
        match item.into() {
            ModuleItem::Global(var) => self.declare_global(var, diagnostics),
            ModuleItem::Globals(vars) => {
                for var in vars {
                    self.declare_global(var, diagnostics);
                }
            }
            ModuleItem::Statement(stmt) => self.push_statement(stmt, diagnostics),
            ModuleItem::Statements(stmts) => {
                for stmt in stmts {
                    self.push_statement(stmt, diagnostics);
                }
            }
        }
    }

    fn declare_global(&mut self, var: GlobalVariable, diagnostics: &mut Diagnostics) {
        if !self.body.is_empty() {
            warn!(module = %self.name, name = %var.name, "declaration after module body");
            diagnostics.push(AssemblyError::DeclarationAfterBody { name: var.name });
            return;
        }
        if self.global_variables.contains_key(&var.name) {
            warn!(module = %self.name, name = %var.name, "duplicate global variable");
            diagnostics.push(AssemblyError::DuplicateVariable { name: var.name });
            return;
        }
        self.global_variables.insert(var.name.clone(), var);
    }

    fn push_statement(&mut self, stmt: Statement, diagnostics: &mut Diagnostics) {
        if let Statement::Function(func) = &stmt {
            let after_body = self
                .body
                .last()
                .is_some_and(|last| !matches!(last, Statement::Function(_)));
            if after_body {
                warn!(module = %self.name, name = %func.name(), "function after module body");
                diagnostics.push(AssemblyError::FunctionAfterBody {
                    name: func.name().to_string(),
                });
                return;
            }
        }
        self.body.push(stmt);
    }

    /// Functions and procedures defined at the top of the module.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionOrProcedure> {
        self.body.iter().filter_map(|stmt| match stmt {
            Statement::Function(func) => Some(func.as_ref()),
            _ => None,
        })
    }

    /// Look up a top-level function or procedure by name.
    pub fn function(&self, name: &str) -> Option<&FunctionOrProcedure> {
        self.functions().find(|f| f.name() == name)
    }

    /// Walk every statement of the module body. See [`crate::walk::walk`].
    pub fn walk<F>(&mut self, visitor: F)
    where
        F: FnMut(Option<&Signature>, &mut Statement),
    {
        debug!(module = %self.name, "walking module");
        walk(&mut self.body, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_before_body_are_kept() {
        let mut module = Module::new("Модуль");
        let mut diags = Diagnostics::new();
        module.append(
            vec![GlobalVariable::new("А"), GlobalVariable::new("Б").exported()],
            &mut diags,
        );
        assert!(diags.is_empty());
        assert_eq!(module.global_variables.len(), 2);
        assert!(module.global_variables["Б"].export);
    }

    #[test]
    fn duplicate_global_keeps_original() {
        let mut module = Module::new("Модуль");
        let mut diags = Diagnostics::new();
        module.append(GlobalVariable::new("А").exported(), &mut diags);
        module.append(GlobalVariable::new("А").with_directive("&НаКлиенте"), &mut diags);

        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next(),
            Some(&AssemblyError::DuplicateVariable { name: "А".into() })
        );
        let kept = &module.global_variables["А"];
        assert!(kept.export);
        assert_eq!(kept.directive, None);
    }

    #[test]
    fn global_after_body_is_rejected() {
        let mut module = Module::new("Модуль");
        let mut diags = Diagnostics::new();
        module.append(FunctionOrProcedure::procedure("П"), &mut diags);
        module.append(GlobalVariable::new("Поздно"), &mut diags);

        assert!(module.global_variables.is_empty());
        assert_eq!(
            diags.into_vec(),
            vec![AssemblyError::DeclarationAfterBody {
                name: "Поздно".into()
            }]
        );
    }

    #[test]
    fn function_after_statement_is_rejected() {
        let mut module = Module::new("Модуль");
        let mut diags = Diagnostics::new();
        module.append(FunctionOrProcedure::procedure("Первая"), &mut diags);
        module.append(Statement::call("Сообщить", vec![]), &mut diags);
        module.append(FunctionOrProcedure::function("Вторая"), &mut diags);

        assert_eq!(module.body.len(), 2);
        assert!(module.function("Вторая").is_none());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().map(AssemblyError::name), Some("Вторая"));
    }

    #[test]
    fn consecutive_functions_are_accepted() {
        let (module, diags) = Module::assemble(
            "Модуль",
            vec![
                ModuleItem::from(FunctionOrProcedure::procedure("А")),
                ModuleItem::from(FunctionOrProcedure::function("Б")),
                ModuleItem::from(Statement::call("А", vec![])),
            ],
        );
        assert!(diags.is_empty());
        let names: Vec<&str> = module.functions().map(FunctionOrProcedure::name).collect();
        assert_eq!(names, vec!["А", "Б"]);
        assert_eq!(module.body.len(), 3);
    }

    #[test]
    fn statement_batches_are_checked_per_element() {
        let mut module = Module::new("Модуль");
        let mut diags = Diagnostics::new();
        module.append(
            vec![
                Statement::call("Инициализировать", vec![]),
                FunctionOrProcedure::procedure("Поздняя").into(),
                Statement::Break,
            ],
            &mut diags,
        );
        assert_eq!(module.body.len(), 2);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn negation_markers() {
        let stmt = Statement::var("Х").negated();
        match stmt {
            Statement::Var(v) => assert!(v.markers.not),
            other => panic!("expected Var, got {other:?}"),
        }
        assert_eq!(Statement::Number(2.5).minus(), Statement::Number(-2.5));
        assert_eq!(Statement::Break.negated(), Statement::Break);
    }

    #[test]
    fn negated_bool_folds_into_opposite_literal() {
        assert_eq!(Statement::Bool(true).negated(), Statement::Bool(false));
        assert_eq!(Statement::Bool(false).negated(), Statement::Bool(true));
        let item = Statement::Item(Item::new(Statement::var("М"), Statement::Number(0.0)));
        assert_eq!(item.clone().negated(), item);
    }

    #[test]
    fn compound_statements() {
        assert!(Statement::Try(TryStmt::default()).is_compound());
        assert!(!Statement::Break.is_compound());
        assert_eq!(Statement::Undefined.kind_name(), "Undefined");
    }
}
