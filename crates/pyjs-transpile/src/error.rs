use std::fmt;

use pyjs_common::{Diagnostic, Loc};

use crate::registry::{Arity, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct TranspileError {
    pub kind: TranspileErrorKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranspileErrorKind {
    UndefinedVariable { name: String },
    ArityMismatch { name: String, expected: Arity, found: usize },
    TypeMismatch { name: String, arg_index: usize, expected: Type },
    UnknownProperty { object: String, prop: String },
    SelfOutsideClass,
    BreakOutsideLoop,
    ReturnOutsideFunction,
}

impl TranspileError {
    pub fn new(kind: TranspileErrorKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

impl fmt::Display for TranspileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TranspileErrorKind::UndefinedVariable { name } => {
                write!(f, "Undefined variable '{}'", name)
            }
            TranspileErrorKind::ArityMismatch { name, expected, found } => write!(
                f,
                "Function '{}' expects {} argument(s), found {}",
                name, expected, found
            ),
            TranspileErrorKind::TypeMismatch { name, arg_index, expected } => write!(
                f,
                "Function '{}' expected '{}' for argument {}",
                name,
                expected,
                arg_index + 1
            ),
            TranspileErrorKind::UnknownProperty { object, prop } => {
                write!(f, "Unknown property '{}' on '{}'", prop, object)
            }
            TranspileErrorKind::SelfOutsideClass => write!(f, "'self' used outside a class"),
            TranspileErrorKind::BreakOutsideLoop => write!(f, "'break' used outside a loop"),
            TranspileErrorKind::ReturnOutsideFunction => {
                write!(f, "'return' used outside a function")
            }
        }
    }
}

impl std::error::Error for TranspileError {}

impl From<&TranspileError> for Diagnostic {
    fn from(e: &TranspileError) -> Self {
        Diagnostic::new(e.to_string(), e.loc)
    }
}
