//! Control-flow statements: branching, the three loop forms and
//! exception handling.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Statement;

// ── If ───────────────────────────────────────────────────────────────────

/// `Если ... Тогда ... ИначеЕсли ... Иначе ... КонецЕсли`.
///
/// Each `ИначеЕсли` clause is held as a `Statement::If` of its own, with
/// the clause condition and block and no else part. That makes every
/// clause a slot the walker reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub condition: Box<Statement>,
    #[serde(default)]
    pub then_block: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub else_ifs: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_block: Option<Vec<Statement>>,
}

impl IfStmt {
    pub fn new(condition: Statement, then_block: Vec<Statement>) -> Self {
        Self {
            condition: Box::new(condition),
            then_block,
            else_ifs: Vec::new(),
            else_block: None,
        }
    }

    pub fn else_if(mut self, condition: Statement, block: Vec<Statement>) -> Self {
        self.else_ifs.push(Statement::If(IfStmt::new(condition, block)));
        self
    }

    pub fn otherwise(mut self, block: Vec<Statement>) -> Self {
        self.else_block = Some(block);
        self
    }
}

// ── Loops ────────────────────────────────────────────────────────────────

/// The header of a loop. Exactly one shape is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoopHeader {
    /// `Пока Condition Цикл`
    While { condition: Box<Statement> },
    /// `Для Каждого Variable Из Collection Цикл`
    ForEach {
        variable: String,
        collection: Box<Statement>,
    },
    /// `Для Counter По Bound Цикл`, where `counter` is the initialising
    /// assignment (`Индекс = 1`).
    ForTo {
        counter: Box<Statement>,
        bound: Box<Statement>,
    },
}

impl LoopHeader {
    pub fn while_(condition: Statement) -> Self {
        LoopHeader::While {
            condition: Box::new(condition),
        }
    }

    pub fn for_each(variable: impl Into<String>, collection: Statement) -> Self {
        LoopHeader::ForEach {
            variable: variable.into(),
            collection: Box::new(collection),
        }
    }

    pub fn for_to(counter: Statement, bound: Statement) -> Self {
        LoopHeader::ForTo {
            counter: Box::new(counter),
            bound: Box::new(bound),
        }
    }

    /// Build a header from the loose field groups a parser collects.
    ///
    /// Exactly one of the three groups must be present.
    pub fn from_parts(
        while_condition: Option<Statement>,
        for_each: Option<(String, Statement)>,
        for_to: Option<(Statement, Statement)>,
    ) -> Result<Self, LoopHeaderError> {
        let populated = [
            while_condition.is_some(),
            for_each.is_some(),
            for_to.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();

        match (while_condition, for_each, for_to) {
            (Some(condition), None, None) => Ok(Self::while_(condition)),
            (None, Some((variable, collection)), None) => Ok(Self::for_each(variable, collection)),
            (None, None, Some((counter, bound))) => Ok(Self::for_to(counter, bound)),
            (None, None, None) => Err(LoopHeaderError::Empty),
            _ => Err(LoopHeaderError::Ambiguous { populated }),
        }
    }
}

/// Rejected loop header shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopHeaderError {
    /// None of while / for-each / for-to was supplied.
    Empty,
    /// More than one header shape was supplied.
    Ambiguous { populated: usize },
}

impl fmt::Display for LoopHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "loop header has no while, for-each or for-to part"),
            Self::Ambiguous { populated } => {
                write!(f, "loop header mixes {populated} of while, for-each and for-to")
            }
        }
    }
}

impl std::error::Error for LoopHeaderError {}

/// A loop of any of the three forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStmt {
    pub header: LoopHeader,
    #[serde(default)]
    pub body: Vec<Statement>,
}

impl LoopStmt {
    pub fn new(header: LoopHeader, body: Vec<Statement>) -> Self {
        Self { header, body }
    }
}

// ── Try ──────────────────────────────────────────────────────────────────

/// `Попытка ... Исключение ... КонецПопытки`. Either block may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TryStmt {
    #[serde(default)]
    pub body: Vec<Statement>,
    #[serde(default)]
    pub catch: Vec<Statement>,
}

impl TryStmt {
    pub fn new(body: Vec<Statement>, catch: Vec<Statement>) -> Self {
        Self { body, catch }
    }
}
