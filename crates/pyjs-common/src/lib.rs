//! Shared types used across every stage of the pyjs transpiler: source
//! locations and the flattened diagnostic shape the façade returns.

mod diagnostic;
mod loc;

pub use diagnostic::Diagnostic;
pub use loc::Loc;
