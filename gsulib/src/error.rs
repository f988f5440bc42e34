//! Единый тип ошибок публичного API.

use crate::reconcile::Violation;
use thiserror::Error;

/// Ошибка декодера отдельного поля (без контекста строки).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("not a decimal number: [{0}]")]
    Number(String),

    #[error("should start with $: [{0}]")]
    Currency(String),

    #[error("expected parentheses: [{0}]")]
    Parentheses(String),

    #[error("not a DD-Mon-YYYY date: [{0}]")]
    Date(String),

    #[error("missing separator [{sep}] in [{text}]")]
    Separator { sep: &'static str, text: String },

    #[error("not a percentage: [{0}]")]
    Rate(String),

    #[error("expected prefix [{prefix}] in [{text}]")]
    Prefix { prefix: &'static str, text: String },
}

#[derive(Debug, Error)]
pub enum GsuError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("line {line_no} (stage {stage}, field {field}): [{line}] expected [{expected}]")]
    StructuralMismatch {
        stage: usize,
        field: usize,
        line_no: usize,
        line: String,
        expected: String,
    },

    #[error("line {line_no} (stage {stage}, field {field}, {name}): {source}")]
    Decode {
        stage: usize,
        field: usize,
        line_no: usize,
        name: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error("line {line_no}: {name} old value [{old}] does not match new [{new}]")]
    ConsistencyConflict {
        name: &'static str,
        line_no: usize,
        old: String,
        new: String,
    },

    #[error("reconciliation failed: {0}")]
    ReconciliationFailure(#[from] Violation),

    #[error("input ended in stage {stage} while waiting for {expected}")]
    TruncatedInput { stage: usize, expected: String },

    #[error("layout {0} is not supported")]
    UnsupportedLayout(&'static str),

    #[error("record has no field {0}")]
    MissingField(&'static str),

    #[error("field {name} is not {expected}")]
    FieldType {
        name: &'static str,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, GsuError>;
