use std::fmt;

use serde::Serialize;

/// A structural violation found while assembling a module from parser output.
///
/// Violations are collected rather than raised, so one assembly pass can
/// report every misplaced declaration at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssemblyError {
    /// A global variable was declared after the module body had started.
    DeclarationAfterBody { name: String },
    /// A global variable with this name is already declared.
    DuplicateVariable { name: String },
    /// A function or procedure follows an ordinary module-body statement.
    FunctionAfterBody { name: String },
}

impl AssemblyError {
    /// Name of the declaration the error refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::DeclarationAfterBody { name }
            | Self::DuplicateVariable { name }
            | Self::FunctionAfterBody { name } => name,
        }
    }

    /// Stable short code, used for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DeclarationAfterBody { .. } => "A0001",
            Self::DuplicateVariable { .. } => "A0002",
            Self::FunctionAfterBody { .. } => "A0003",
        }
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclarationAfterBody { .. } => {
                write!(f, "variable declarations must be placed at the beginning of the module")
            }
            Self::DuplicateVariable { name } => {
                write!(f, "variable already defined: with the specified name {name:?}")
            }
            Self::FunctionAfterBody { .. } => write!(
                f,
                "procedure and function definitions should be placed before the module body statements"
            ),
        }
    }
}

impl std::error::Error for AssemblyError {}

/// Ordered collector of assembly errors.
///
/// Passed by `&mut` into module assembly and handed back to the caller, who
/// decides whether any of the collected errors are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    errors: Vec<AssemblyError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn push(&mut self, error: AssemblyError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssemblyError> {
        self.errors.iter()
    }

    /// Human-readable messages in the order they were reported.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_vec(self) -> Vec<AssemblyError> {
        self.errors
    }
}

impl IntoIterator for Diagnostics {
    type Item = AssemblyError;
    type IntoIter = std::vec::IntoIter<AssemblyError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a AssemblyError;
    type IntoIter = std::slice::Iter<'a, AssemblyError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_error_display() {
        let err = AssemblyError::DuplicateVariable {
            name: "Счетчик".into(),
        };
        assert_eq!(
            err.to_string(),
            "variable already defined: with the specified name \"Счетчик\""
        );
    }

    #[test]
    fn assembly_error_display_all_variants() {
        assert_eq!(
            AssemblyError::DeclarationAfterBody { name: "А".into() }.to_string(),
            "variable declarations must be placed at the beginning of the module"
        );
        assert_eq!(
            AssemblyError::FunctionAfterBody { name: "П".into() }.to_string(),
            "procedure and function definitions should be placed before the module body statements"
        );
    }

    #[test]
    fn assembly_error_name_and_code() {
        let err = AssemblyError::FunctionAfterBody { name: "Тест".into() };
        assert_eq!(err.name(), "Тест");
        assert_eq!(err.code(), "A0003");
    }

    #[test]
    fn diagnostics_preserve_order() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.push(AssemblyError::DuplicateVariable { name: "А".into() });
        diags.push(AssemblyError::DeclarationAfterBody { name: "Б".into() });
        assert_eq!(diags.len(), 2);

        let names: Vec<&str> = diags.iter().map(AssemblyError::name).collect();
        assert_eq!(names, vec!["А", "Б"]);
        assert_eq!(diags.messages().len(), 2);
        assert_eq!(diags.into_vec()[1].code(), "A0001");
    }
}
