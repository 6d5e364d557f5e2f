//! Syntax tree for BSL, the 1C:Enterprise scripting language.
//!
//! This crate holds the tree a parser builds ([`ast`]), the calendar date
//! literal type ([`date`]) and a depth-first walker that reports every
//! statement together with its enclosing function ([`walk`]). Source text
//! is regenerated from the tree by the `bsl-fmt` crate.

pub mod ast;
pub mod date;
pub mod walk;

pub use ast::{
    BinaryExpr, BinaryOp, CallChain, FunctionKind, FunctionOrProcedure, GlobalVariable,
    IfStmt, Item, LoopHeader, LoopHeaderError, LoopStmt, Markers, Method, Module, ModuleItem,
    NewObject, Parameter, Signature, Statement, Ternary, TryStmt, VarRef,
};
pub use bsl_common::{AssemblyError, Diagnostics};
pub use date::{Date, DateError};
pub use walk::walk;
