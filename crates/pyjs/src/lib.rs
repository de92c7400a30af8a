//! The pyjs compiler façade.
//!
//! `Compiler` owns the host's registration table (declared functions,
//! builtin objects, reserved names, reserved-function mappings, and the
//! boilerplate string) and drives the lexer -> parser -> transpiler
//! pipeline on each call to [`Compiler::compile`]. This is the crate a
//! host application depends on; `pyjs-lexer`/`pyjs-parser`/`pyjs-transpile`
//! are implementation detail crates consumed only through this surface.

use serde::Serialize;

use pyjs_common::Diagnostic;
pub use pyjs_lexer::Dialect;
use pyjs_lexer::{Lexer, Token};
pub use pyjs_parser::Stmt;
use pyjs_parser::Parser;
pub use pyjs_transpile::{Arity, ObjectSchema, PropSchema, Type};
use pyjs_transpile::{RegistrationTable, Transpiler};

/// The three diagnostic streams produced by one `compile` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub lexer: Vec<Diagnostic>,
    pub parser: Vec<Diagnostic>,
    pub transpiler: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.lexer.is_empty() && self.parser.is_empty() && self.transpiler.is_empty()
    }
}

/// The result record returned by [`Compiler::compile`].
///
/// `final` is a reserved word in Rust, so the field carrying spec.md's
/// `final` is named `final_text` here and serializes back to `"final"`.
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    pub success: bool,
    pub output: String,
    pub raw: Option<String>,
    #[serde(rename = "final")]
    pub final_text: Option<String>,
    pub tokens: Vec<Token>,
    pub ast: Vec<Stmt>,
    pub errors: Diagnostics,
    pub source: String,
}

/// Owns the registration table and boilerplate string across calls;
/// `compile` itself is pure with respect to its `source` argument and
/// deterministic given the current registrations.
pub struct Compiler {
    table: RegistrationTable,
    dialect: Dialect,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            table: RegistrationTable::new(),
            dialect,
        }
    }

    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        arity: i32,
        arg_types: Option<Vec<Type>>,
    ) {
        self.table
            .register_function(name, Arity::from_i32(arity), arg_types);
    }

    pub fn register_builtin_object(&mut self, name: impl Into<String>, schema: ObjectSchema) {
        self.table.register_builtin_object(name, schema);
    }

    pub fn register_reserved_declaration(&mut self, name: impl Into<String>) {
        self.table.register_reserved_declaration(name);
    }

    pub fn register_reserved_function(
        &mut self,
        dsl_name: impl Into<String>,
        js_name: impl Into<String>,
    ) {
        self.table.register_reserved_function(dsl_name, js_name);
    }

    pub fn define_boilerplate(&mut self, code: impl Into<String>) {
        self.table.define_boilerplate(code);
    }

    pub fn clear_custom_registrations(&mut self) {
        self.table.clear_custom_registrations();
    }

    /// Lex, parse, and transpile `source`, assembling the result record.
    /// `success` is true iff all three diagnostic lists are empty; in
    /// that case `output == final == boilerplate + "\n" + raw`. On
    /// failure `raw`/`final` are omitted and `output` is just the
    /// boilerplate, per spec.md \u00a74.4's result-record contract.
    pub fn compile(&self, source: &str) -> CompileResult {
        let (tokens, lex_errors) = Lexer::tokenize(source, self.dialect);
        let (ast, parse_errors) = Parser::parse(tokens.clone());
        let transpiled = Transpiler::new(&self.table).transpile(&ast);

        let errors = Diagnostics {
            lexer: lex_errors.iter().map(Diagnostic::from).collect(),
            parser: parse_errors.iter().map(Diagnostic::from).collect(),
            transpiler: transpiled.errors.iter().map(Diagnostic::from).collect(),
        };
        let success = errors.is_empty();

        if success {
            let raw = transpiled.code;
            let final_text = format!("{}\n{}", self.table.boilerplate, raw);
            CompileResult {
                success: true,
                output: final_text.clone(),
                raw: Some(raw),
                final_text: Some(final_text),
                tokens,
                ast,
                errors,
                source: source.to_string(),
            }
        } else {
            CompileResult {
                success: false,
                output: self.table.boilerplate.clone(),
                raw: None,
                final_text: None,
                tokens,
                ast,
                errors,
                source: source.to_string(),
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
