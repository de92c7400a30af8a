use serde::Serialize;

use crate::loc::Loc;

/// A single diagnostic, the shape every stage's errors flatten into.
///
/// `message` is the stable, caller-facing contract: callers may match on
/// prefixes (e.g. `"Undefined variable"`) but there are no error codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub error: String,
    pub loc: Loc,
}

impl Diagnostic {
    pub fn new(error: impl Into<String>, loc: Loc) -> Self {
        Self {
            error: error.into(),
            loc,
        }
    }
}
