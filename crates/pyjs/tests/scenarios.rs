//! End-to-end scenarios S1-S7 from the compiler's testable properties,
//! exercised through the public façade rather than any single stage.

use pyjs::{Compiler, ObjectSchema, PropSchema, Type};

#[test]
fn s1_local_assignment_and_print() {
    let mut c = Compiler::default();
    c.register_function("print", -1, None);
    let r = c.compile("x = 10\nprint(x)\n");
    assert!(r.success, "{:?}", r.errors);
    let raw = r.raw.unwrap();
    assert!(raw.contains("var x = 10;"));
    assert!(raw.contains("console.log(x);"));
}

#[test]
fn s2_variadic_and_arity_check() {
    let mut c = Compiler::default();
    c.register_function("wait", 1, None);
    let r = c.compile("wait()\n");
    assert!(!r.success);
    assert_eq!(r.errors.transpiler.len(), 1);
    assert!(r.errors.transpiler[0].error.contains("expects 1 argument"));
}

#[test]
fn s3_builtin_object_property_check() {
    let mut schema = ObjectSchema::default();
    schema.props.insert(
        "x".into(),
        PropSchema {
            is_function: false,
            arity: None,
            arg_types: None,
        },
    );
    schema.props.insert(
        "setCostume".into(),
        PropSchema {
            is_function: true,
            arity: Some(pyjs::Arity::Fixed(1)),
            arg_types: Some(vec![Type::String]),
        },
    );

    let mut c = Compiler::default();
    c.register_builtin_object("sprite", schema);

    let ok = c.compile("sprite.x = 100\nsprite.setCostume(\"idle\")\n");
    assert!(ok.success, "{:?}", ok.errors);

    let bad_type = c.compile("sprite.setCostume(42)\n");
    assert!(!bad_type.success);
    assert!(bad_type.errors.transpiler.iter().any(|e| e.error.contains("expected 'string'")));

    let bad_prop = c.compile("sprite.bogus = 1\n");
    assert!(!bad_prop.success);
    assert!(bad_prop.errors.transpiler.iter().any(|e| e.error.contains("Unknown property")));
}

#[test]
fn s4_reserved_function_transformation() {
    let mut c = Compiler::default();
    c.register_reserved_function("_forever", "forever");
    let r = c.compile("def _forever():\n    pass\n");
    assert!(r.success, "{:?}", r.errors);
    let raw = r.raw.unwrap();
    assert!(raw.contains("forever(("));
    assert!(raw.contains(") => {"));
    assert!(!raw.contains("function _forever"));
}

#[test]
fn s5_for_loop_with_global() {
    let mut c = Compiler::default();
    c.register_function("print", -1, None);
    let r = c.compile("for global i = 0, i < 3, i += 1:\n    print(i)\n");
    assert!(r.success, "{:?}", r.errors);
    let raw = r.raw.unwrap();
    assert!(raw.contains("globals.i = 0"));
    assert!(raw.contains("globals.i < 3"));
    assert!(raw.contains("globals.i += 1"));
    assert!(raw.contains("console.log(globals.i);"));
}

#[test]
fn s6_class_with_inheritance() {
    let src = "\
class Animal:
    def init(name):
        self.name = name
    def speak():
        print(self.name)
class Dog implements Animal:
    def init(name, breed):
        self.breed = breed
d = Dog(\"Rex\", \"lab\")
d.speak()
";
    let mut c = Compiler::default();
    c.register_function("print", -1, None);
    let r = c.compile(src);
    assert!(r.success, "{:?}", r.errors);
    let raw = r.raw.unwrap();
    assert!(raw.contains("function Dog(name, breed) {"));
    assert!(raw.contains("Animal.call(this, name, breed);"));
    assert!(raw.contains("Object.setPrototypeOf(Dog.prototype, Animal.prototype);"));
    assert!(raw.contains("Animal.prototype.speak = function() {"));
}

#[test]
fn s7_brace_disambiguation() {
    let c = Compiler::default();
    let list = c.compile("a = {1, 2, 3}\n");
    assert!(list.success, "{:?}", list.errors);
    assert!(list.raw.unwrap().contains("var a = [1, 2, 3];"));

    let obj = c.compile("a = {x = 1, y = 2}\n");
    assert!(obj.success, "{:?}", obj.errors);
    assert!(obj.raw.unwrap().contains("{ x: 1, y: 2 }"));

    let mixed = c.compile("a = {1, x = 2}\n");
    assert!(!mixed.success);
    assert!(mixed.errors.parser.iter().any(|e| e.error.contains("Cannot mix list and object entries")));
}
