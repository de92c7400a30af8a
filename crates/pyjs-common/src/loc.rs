use serde::Serialize;

/// Source position: 1-indexed line, 0-indexed column, column span.
///
/// Unlike a byte-offset span, `Loc` is measured directly while scanning --
/// there is no separate line index to resolve, since line and column are
/// exactly what the lexer already tracks as it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Loc {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Loc {
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-length marker location, used by synthetic tokens
    /// (`INDENT`/`DEDENT`/`NEWLINE`/`EOF`) that have no source text of their own.
    pub fn synthetic(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }
}
