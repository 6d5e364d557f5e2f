//! Module-level items: functions, procedures, their parameters and
//! global variable declarations.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Statement, VarRef};

/// Whether a routine returns a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Procedure,
    Function,
}

impl FunctionKind {
    /// Opening keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            FunctionKind::Procedure => "Процедура",
            FunctionKind::Function => "Функция",
        }
    }

    /// Closing keyword.
    pub fn end_keyword(self) -> &'static str {
        match self {
            FunctionKind::Procedure => "КонецПроцедуры",
            FunctionKind::Function => "КонецФункции",
        }
    }
}

/// A declared parameter.
///
/// `default` is always populated: a parameter declared without a default
/// value carries [`Statement::Undefined`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub by_value: bool,
    #[serde(default = "undefined")]
    pub default: Statement,
}

fn undefined() -> Statement {
    Statement::Undefined
}

impl Parameter {
    /// A parameter declared with or without the `Знач` keyword.
    pub fn new(by_value: bool, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_value,
            default: Statement::Undefined,
        }
    }

    /// Attach the default value; `None` keeps the `Undefined` marker.
    pub fn with_default(mut self, value: Option<Statement>) -> Self {
        self.default = value.unwrap_or(Statement::Undefined);
        self
    }

    /// Whether a default other than the synthesised `Undefined` is present.
    pub fn has_default(&self) -> bool {
        !matches!(self.default, Statement::Undefined)
    }
}

/// The header of a function or procedure: everything except its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub kind: FunctionKind,
    pub name: String,
    /// Compiler directive such as `&НаСервере`, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    #[serde(default)]
    pub export: bool,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl Signature {
    pub fn new(kind: FunctionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            directive: None,
            export: false,
            params: Vec::new(),
        }
    }
}

/// A function or procedure definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOrProcedure {
    pub signature: Signature,
    /// Locals declared with `Перем` inside the routine.
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub explicit_variables: FxHashMap<String, VarRef>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

impl FunctionOrProcedure {
    pub fn new(kind: FunctionKind, name: impl Into<String>) -> Self {
        Self {
            signature: Signature::new(kind, name),
            explicit_variables: FxHashMap::default(),
            body: Vec::new(),
        }
    }

    pub fn procedure(name: impl Into<String>) -> Self {
        Self::new(FunctionKind::Procedure, name)
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(FunctionKind::Function, name)
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.signature.directive = Some(directive.into());
        self
    }

    pub fn exported(mut self) -> Self {
        self.signature.export = true;
        self
    }

    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.signature.params = params;
        self
    }

    pub fn with_body(mut self, body: Vec<Statement>) -> Self {
        self.body = body;
        self
    }

    /// Record a local `Перем` declaration. Later declarations of the same
    /// name replace earlier ones.
    pub fn declare_local(&mut self, var: VarRef) {
        self.explicit_variables.insert(var.name.clone(), var);
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.signature.kind
    }
}

/// A module-level `Перем` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    pub name: String,
    #[serde(default)]
    pub export: bool,
}

impl GlobalVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            directive: None,
            name: name.into(),
            export: false,
        }
    }

    pub fn exported(mut self) -> Self {
        self.export = true;
        self
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_without_default_is_undefined() {
        let param = Parameter::new(true, "Значение").with_default(None);
        assert_eq!(param.default, Statement::Undefined);
        assert!(!param.has_default());
        assert!(param.by_value);
    }

    #[test]
    fn parameter_with_default() {
        let param = Parameter::new(false, "Лимит").with_default(Some(Statement::Number(10.0)));
        assert!(param.has_default());
        assert_eq!(param.default, Statement::Number(10.0));
    }

    #[test]
    fn function_builders() {
        let mut func = FunctionOrProcedure::function("Сумма")
            .with_directive("&НаСервере")
            .exported()
            .with_params(vec![Parameter::new(false, "А")]);
        func.declare_local(VarRef::new("Итог"));

        assert_eq!(func.name(), "Сумма");
        assert_eq!(func.kind(), FunctionKind::Function);
        assert_eq!(func.signature.directive.as_deref(), Some("&НаСервере"));
        assert!(func.signature.export);
        assert!(func.explicit_variables.contains_key("Итог"));
        assert_eq!(FunctionKind::Function.end_keyword(), "КонецФункции");
    }
}
