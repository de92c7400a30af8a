//! Semantic validator and JS/TS emitter: walks a pyjs-parser AST once
//! against a host-declared registration table, producing emitted source
//! text plus a flat list of semantic diagnostics. Never raises; every
//! statement is visited even after errors so batched feedback stays
//! complete.

mod error;
mod registry;
mod scope;
mod transpile;

pub use error::{TranspileError, TranspileErrorKind};
pub use registry::{Arity, FunctionEntry, ObjectSchema, PropSchema, RegistrationTable, Type};
pub use scope::ScopeStack;
pub use transpile::{Transpiler, TranspileOutput};
