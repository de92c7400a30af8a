use rustc_hash::{FxHashMap, FxHashSet};

/// A literal-deducible type used for argument checking. `Unknown` always
/// passes -- it covers any argument that is not a literal of a checkable
/// kind (variables, calls, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Type::String => "string",
            Type::Number => "number",
            Type::Boolean => "boolean",
            Type::Null => "null",
            Type::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Number of parameters a registered callable expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn from_i32(n: i32) -> Self {
        if n < 0 {
            Arity::Variadic
        } else {
            Arity::Fixed(n as usize)
        }
    }

    pub fn accepts(&self, found: usize) -> bool {
        match self {
            Arity::Variadic => true,
            Arity::Fixed(n) => *n == found,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{n}"),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub arity: Arity,
    pub arg_types: Option<Vec<Type>>,
}

#[derive(Debug, Clone)]
pub struct PropSchema {
    pub is_function: bool,
    pub arity: Option<Arity>,
    pub arg_types: Option<Vec<Type>>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub props: FxHashMap<String, PropSchema>,
}

/// The host-declared registration table: everything the transpiler
/// consults to resolve identifiers and validate calls. Owned by the
/// compiler façade and mutated only through its registration API.
#[derive(Debug, Clone, Default)]
pub struct RegistrationTable {
    pub functions: FxHashMap<String, FunctionEntry>,
    pub objects: FxHashMap<String, ObjectSchema>,
    pub reserved_declarations: FxHashSet<String>,
    pub reserved_functions: FxHashMap<String, String>,
    pub boilerplate: String,
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_function(&mut self, name: impl Into<String>, arity: Arity, arg_types: Option<Vec<Type>>) {
        self.functions.insert(name.into(), FunctionEntry { arity, arg_types });
    }

    pub fn register_builtin_object(&mut self, name: impl Into<String>, schema: ObjectSchema) {
        self.objects.insert(name.into(), schema);
    }

    pub fn register_reserved_declaration(&mut self, name: impl Into<String>) {
        self.reserved_declarations.insert(name.into());
    }

    pub fn register_reserved_function(&mut self, dsl_name: impl Into<String>, js_name: impl Into<String>) {
        self.reserved_functions.insert(dsl_name.into(), js_name.into());
    }

    pub fn define_boilerplate(&mut self, code: impl Into<String>) {
        self.boilerplate = code.into();
    }

    pub fn clear_custom_registrations(&mut self) {
        self.functions.clear();
        self.objects.clear();
        self.reserved_declarations.clear();
        self.reserved_functions.clear();
        self.boilerplate.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_overwrites_last_write_wins() {
        let mut table = RegistrationTable::new();
        table.register_function("wait", Arity::Fixed(1), None);
        table.register_function("wait", Arity::Variadic, None);
        assert_eq!(table.functions["wait"].arity, Arity::Variadic);
    }

    #[test]
    fn clear_resets_to_fresh_state() {
        let mut table = RegistrationTable::new();
        table.register_function("f", Arity::Fixed(0), None);
        table.register_reserved_declaration("engine");
        table.define_boilerplate("// boilerplate");
        table.clear_custom_registrations();
        assert!(table.functions.is_empty());
        assert!(table.reserved_declarations.is_empty());
        assert!(table.boilerplate.is_empty());
    }

    #[test]
    fn variadic_arity_accepts_any_count() {
        assert!(Arity::Variadic.accepts(0));
        assert!(Arity::Variadic.accepts(7));
        assert!(Arity::Fixed(1).accepts(1));
        assert!(!Arity::Fixed(1).accepts(0));
    }
}
