//! Recursive-descent parser with precedence-climbing expressions: turns a
//! pyjs-lexer token stream into a plain tagged-sum AST plus parse
//! diagnostics. Recovers from errors by synchronizing to statement
//! boundaries; never panics on malformed input.

mod ast;
mod error;
mod parser;

pub use ast::{AssignOp, BinaryOp, Expr, ForStep, LambdaBody, LitValue, LogicalOp, Stmt, UnaryOp};
pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
