use std::fmt;

use pyjs_common::{Diagnostic, Loc};

/// A lexical error encountered while scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnknownCharacter(char),
    InconsistentDedent,
}

impl LexError {
    pub fn new(kind: LexErrorKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedString => write!(f, "Unterminated string"),
            LexErrorKind::UnknownCharacter(c) => write!(f, "Unknown character '{}'", c),
            LexErrorKind::InconsistentDedent => write!(f, "Inconsistent dedent"),
        }
    }
}

impl std::error::Error for LexError {}

impl From<&LexError> for Diagnostic {
    fn from(e: &LexError) -> Self {
        Diagnostic::new(e.to_string(), e.loc)
    }
}
