//! Depth-first walker over statement sequences.
//!
//! [`walk`] calls the visitor once for every statement slot, children
//! before the node that owns them, together with the header of the
//! function the statement is attributed to.
//!
//! # Function context
//!
//! Inside a function body the context is that function. Once the walker
//! has passed a function definition, the definition also becomes the
//! context for the statements that follow it in the same sequence, so free
//! module-body statements after the last procedure are attributed to that
//! procedure. Call-graph consumers rely on this attribution.
//!
//! The context is a snapshot of the [`Signature`] taken when the walker
//! reaches the function, which leaves the function's body free to be
//! handed to the visitor mutably.
//!
//! # Recursion
//!
//! | Node       | Walked children, in order                              |
//! |------------|--------------------------------------------------------|
//! | `If`       | condition, then block, else block, `ИначеЕсли` clauses |
//! | `Try`      | body, catch                                            |
//! | `Loop`     | body (header expressions are not walked)               |
//! | `Function` | body                                                   |
//! | `Method`   | arguments                                              |
//! | `Binary`   | right operand, then left operand                       |
//! | `Ternary`  | condition, then, otherwise                             |
//! | `Return`   | value, if present                                      |
//!
//! Every other node is a leaf: it is visited but not descended into.

use tracing::trace;

use crate::ast::{Signature, Statement};

/// Walk `statements` and every statement nested in them.
///
/// The visitor receives the enclosing function (or `None` at module scope
/// before any function) and a mutable reference to the slot, which it may
/// overwrite in place. The children of a node are walked before the
/// visitor sees the node itself, so a replacement is not descended into.
pub fn walk<F>(statements: &mut [Statement], mut visitor: F)
where
    F: FnMut(Option<&Signature>, &mut Statement),
{
    trace!(statements = statements.len(), "walk");
    walk_sequence(None, statements, &mut visitor, 0);
}

fn walk_sequence<F>(
    parent: Option<&Signature>,
    statements: &mut [Statement],
    visitor: &mut F,
    depth: usize,
) where
    F: FnMut(Option<&Signature>, &mut Statement),
{
    let mut carried: Option<Signature> = None;

    for slot in statements.iter_mut() {
        trace!(depth, kind = slot.kind_name(), "visit");

        match slot {
            Statement::If(stmt) => {
                let current = carried.as_ref().or(parent);
                walk_one(current, &mut stmt.condition, visitor, depth + 1);
                walk_sequence(current, &mut stmt.then_block, visitor, depth + 1);
                if let Some(block) = stmt.else_block.as_mut() {
                    walk_sequence(current, block, visitor, depth + 1);
                }
                walk_sequence(current, &mut stmt.else_ifs, visitor, depth + 1);
            }
            Statement::Try(stmt) => {
                let current = carried.as_ref().or(parent);
                walk_sequence(current, &mut stmt.body, visitor, depth + 1);
                walk_sequence(current, &mut stmt.catch, visitor, depth + 1);
            }
            Statement::Loop(stmt) => {
                let current = carried.as_ref().or(parent);
                walk_sequence(current, &mut stmt.body, visitor, depth + 1);
            }
            Statement::Function(func) => {
                let signature = func.signature.clone();
                walk_sequence(Some(&signature), &mut func.body, visitor, depth + 1);
                carried = Some(signature);
            }
            Statement::Method(method) => {
                let current = carried.as_ref().or(parent);
                walk_sequence(current, &mut method.args, visitor, depth + 1);
            }
            Statement::Binary(expr) => {
                let current = carried.as_ref().or(parent);
                walk_one(current, &mut expr.right, visitor, depth + 1);
                walk_one(current, &mut expr.left, visitor, depth + 1);
            }
            Statement::Ternary(expr) => {
                let current = carried.as_ref().or(parent);
                walk_one(current, &mut expr.condition, visitor, depth + 1);
                walk_one(current, &mut expr.then, visitor, depth + 1);
                walk_one(current, &mut expr.otherwise, visitor, depth + 1);
            }
            Statement::Return(Some(value)) => {
                let current = carried.as_ref().or(parent);
                walk_one(current, value, visitor, depth + 1);
            }
            Statement::Var(_)
            | Statement::Item(_)
            | Statement::CallChain(_)
            | Statement::NewObject(_)
            | Statement::Break
            | Statement::Continue
            | Statement::Throw(_)
            | Statement::Return(None)
            | Statement::Undefined
            | Statement::Number(_)
            | Statement::String(_)
            | Statement::Bool(_)
            | Statement::Date(_)
            | Statement::GoTo(_)
            | Statement::GoToLabel(_) => {}
        }

        visitor(carried.as_ref().or(parent), slot);
    }
}

fn walk_one<F>(parent: Option<&Signature>, slot: &mut Statement, visitor: &mut F, depth: usize)
where
    F: FnMut(Option<&Signature>, &mut Statement),
{
    walk_sequence(parent, std::slice::from_mut(slot), visitor, depth);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionOrProcedure, LoopHeader, LoopStmt};

    fn kinds(statements: &mut [Statement]) -> Vec<&'static str> {
        let mut seen = Vec::new();
        walk(statements, |_, slot| seen.push(slot.kind_name()));
        seen
    }

    #[test]
    fn children_before_parent() {
        let mut stmts = vec![Statement::assign(
            Statement::var("А"),
            Statement::Number(1.0),
        )];
        assert_eq!(kinds(&mut stmts), vec!["Number", "Var", "Binary"]);
    }

    #[test]
    fn loop_header_is_not_walked() {
        let mut stmts = vec![Statement::Loop(LoopStmt::new(
            LoopHeader::while_(Statement::var("Условие")),
            vec![Statement::Break],
        ))];
        assert_eq!(kinds(&mut stmts), vec!["Break", "Loop"]);
    }

    #[test]
    fn visitor_can_replace_slot() {
        let mut stmts = vec![Statement::ret(Some(Statement::var("Старое")))];
        walk(&mut stmts, |_, slot| {
            if matches!(slot, Statement::Var(v) if v.name == "Старое") {
                *slot = Statement::var("Новое");
            }
        });
        assert_eq!(stmts, vec![Statement::ret(Some(Statement::var("Новое")))]);
    }

    #[test]
    fn module_scope_has_no_context() {
        let mut stmts = vec![Statement::Break, Statement::Continue];
        let mut contexts = Vec::new();
        walk(&mut stmts, |func, _| contexts.push(func.is_none()));
        assert_eq!(contexts, vec![true, true]);
    }

    #[test]
    fn function_slot_reports_itself() {
        let mut stmts = vec![FunctionOrProcedure::procedure("П").into()];
        let mut seen = Vec::new();
        walk(&mut stmts, |func, slot| {
            seen.push((func.map(|f| f.name.clone()), slot.kind_name()));
        });
        assert_eq!(seen, vec![(Some("П".to_string()), "Function")]);
    }
}
