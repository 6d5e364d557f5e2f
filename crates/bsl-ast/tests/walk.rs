//! Walker traversal order and function-context attribution.

use bsl_ast::{
    BinaryOp, FunctionOrProcedure, IfStmt, LoopHeader, LoopStmt, Method, Module, Statement,
    Ternary, TryStmt,
};

// ── Helpers ────────────────────────────────────────────────────────────

/// Record `(enclosing function name, statement kind)` for every visit.
fn trace(module: &mut Module) -> Vec<(Option<String>, &'static str)> {
    let mut seen = Vec::new();
    module.walk(|func, slot| {
        seen.push((func.map(|f| f.name.clone()), slot.kind_name()));
    });
    seen
}

fn ctx(name: &str, kind: &'static str) -> (Option<String>, &'static str) {
    (Some(name.to_string()), kind)
}

fn module_of(body: Vec<Statement>) -> Module {
    let mut module = Module::new("Тест");
    module.body = body;
    module
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn procedure_with_single_return() {
    let proc_p = FunctionOrProcedure::procedure("P")
        .with_body(vec![Statement::ret(Some(Statement::var("Результат")))]);
    let mut module = module_of(vec![proc_p.into()]);

    assert_eq!(
        trace(&mut module),
        vec![ctx("P", "Var"), ctx("P", "Return"), ctx("P", "Function")]
    );
}

#[test]
fn bare_return_has_no_value_slot() {
    let proc_p = FunctionOrProcedure::procedure("P").with_body(vec![Statement::ret(None)]);
    let mut module = module_of(vec![proc_p.into()]);

    assert_eq!(
        trace(&mut module),
        vec![ctx("P", "Return"), ctx("P", "Function")]
    );
}

#[test]
fn later_siblings_inherit_last_function() {
    let mut module = module_of(vec![
        Statement::Break,
        FunctionOrProcedure::procedure("Первая").into(),
        FunctionOrProcedure::function("Вторая").into(),
        Statement::call("Сообщить", vec![]),
    ]);

    assert_eq!(
        trace(&mut module),
        vec![
            (None, "Break"),
            ctx("Первая", "Function"),
            ctx("Вторая", "Function"),
            ctx("Вторая", "Method"),
        ]
    );
}

#[test]
fn if_walks_condition_then_else_then_else_if_clauses() {
    let stmt = IfStmt::new(Statement::var("Условие"), vec![Statement::Break])
        .else_if(Statement::Bool(true), vec![Statement::Continue])
        .otherwise(vec![Statement::ret(None)]);
    let mut module = module_of(vec![Statement::If(stmt)]);

    let kinds: Vec<&str> = trace(&mut module).into_iter().map(|(_, k)| k).collect();
    assert_eq!(
        kinds,
        vec!["Var", "Break", "Return", "Bool", "Continue", "If", "If"]
    );
}

#[test]
fn else_if_clause_is_its_own_slot() {
    let stmt = IfStmt::new(Statement::var("X"), vec![])
        .else_if(Statement::var("Y"), vec![Statement::Break]);
    let proc_p = FunctionOrProcedure::procedure("P").with_body(vec![Statement::If(stmt)]);
    let mut module = module_of(vec![proc_p.into()]);

    let mut clauses = 0;
    module.walk(|func, slot| {
        if let Statement::If(clause) = slot {
            if matches!(clause.condition.as_ref(), Statement::Var(v) if v.name == "Y") {
                clauses += 1;
                assert_eq!(func.map(|f| f.name.as_str()), Some("P"));
            }
        }
    });
    assert_eq!(clauses, 1);

    assert_eq!(
        trace(&mut module),
        vec![
            ctx("P", "Var"),
            ctx("P", "Var"),
            ctx("P", "Break"),
            ctx("P", "If"),
            ctx("P", "If"),
            ctx("P", "Function"),
        ]
    );
}

#[test]
fn try_walks_body_then_catch() {
    let stmt = TryStmt::new(
        vec![Statement::call("Записать", vec![])],
        vec![Statement::throw(None)],
    );
    let mut module = module_of(vec![Statement::Try(stmt)]);

    let kinds: Vec<&str> = trace(&mut module).into_iter().map(|(_, k)| k).collect();
    assert_eq!(kinds, vec!["Method", "Throw", "Try"]);
}

#[test]
fn method_arguments_and_ternary_are_walked() {
    let call = Method::new(
        "Сообщить",
        vec![Statement::Ternary(Ternary::new(
            Statement::var("Флаг"),
            Statement::String("да".into()),
            Statement::String("нет".into()),
        ))],
    );
    let mut module = module_of(vec![Statement::Method(call)]);

    let kinds: Vec<&str> = trace(&mut module).into_iter().map(|(_, k)| k).collect();
    assert_eq!(kinds, vec!["Var", "String", "String", "Ternary", "Method"]);
}

#[test]
fn nested_blocks_keep_function_context() {
    let body = vec![Statement::Loop(LoopStmt::new(
        LoopHeader::for_each("Элемент", Statement::var("Коллекция")),
        vec![Statement::If(IfStmt::new(
            Statement::binary(Statement::var("Элемент"), BinaryOp::Gt, Statement::Number(0.0)),
            vec![Statement::Continue],
        ))],
    ))];
    let func = FunctionOrProcedure::function("Обход").with_body(body);
    let mut module = module_of(vec![func.into()]);

    let seen = trace(&mut module);
    assert_eq!(seen.len(), 7);
    assert!(seen.iter().all(|(f, _)| f.as_deref() == Some("Обход")));
    assert_eq!(seen.last().map(|(_, k)| *k), Some("Function"));
}

#[test]
fn leaves_are_not_descended() {
    // CallChain, NewObject, Item and Throw payloads are not walked.
    let mut module = module_of(vec![
        Statement::throw(Some(Statement::var("Ошибка"))),
        Statement::Item(bsl_ast::Item::new(Statement::var("Массив"), Statement::Number(0.0))),
    ]);
    let kinds: Vec<&str> = trace(&mut module).into_iter().map(|(_, k)| k).collect();
    assert_eq!(kinds, vec!["Throw", "Item"]);
}
