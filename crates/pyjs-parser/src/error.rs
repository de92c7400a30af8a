use std::fmt;

use pyjs_common::{Diagnostic, Loc};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken { found: String },
    MissingColon,
    MissingClosingBracket { delim: char },
    InvalidAssignmentTarget,
    MixedListAndObjectEntries,
    DuplicateInit { class_name: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { found } => write!(f, "Unexpected token '{}'", found),
            ParseErrorKind::MissingColon => write!(f, "Missing ':'"),
            ParseErrorKind::MissingClosingBracket { delim } => {
                write!(f, "Missing closing '{}'", delim)
            }
            ParseErrorKind::InvalidAssignmentTarget => write!(f, "Invalid assignment target"),
            ParseErrorKind::MixedListAndObjectEntries => {
                write!(f, "Cannot mix list and object entries")
            }
            ParseErrorKind::DuplicateInit { class_name } => {
                write!(f, "Duplicate 'init' in class '{}'", class_name)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<&ParseError> for Diagnostic {
    fn from(e: &ParseError) -> Self {
        Diagnostic::new(e.to_string(), e.loc)
    }
}
