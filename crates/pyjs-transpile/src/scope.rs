use rustc_hash::FxHashSet;

/// One lexical frame: the set of names declared directly in it, plus the
/// two flags the validator needs to answer "am I inside a function?" and
/// "am I inside a class method?" without a full closure analysis.
struct Frame {
    declared: FxHashSet<String>,
    is_function_body: bool,
    is_class_body: bool,
}

/// A stack of lexical frames, mirroring the type-environment pattern this
/// compiler's validator is built on: push on entry to any nested body,
/// pop on exit, lookup searches from the innermost frame outward.
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                declared: FxHashSet::default(),
                is_function_body: false,
                is_class_body: false,
            }],
        }
    }

    pub fn push(&mut self, is_function_body: bool, is_class_body: bool) {
        self.frames.push(Frame {
            declared: FxHashSet::default(),
            is_function_body,
            is_class_body,
        });
    }

    /// # Panics
    /// Panics if called when only the top-level frame remains.
    pub fn pop(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the top-level frame");
        self.frames.pop();
    }

    pub fn declare(&mut self, name: &str) {
        self.frames
            .last_mut()
            .expect("frame stack never empty")
            .declared
            .insert(name.to_string());
    }

    pub fn declared_in_current(&self, name: &str) -> bool {
        self.frames
            .last()
            .expect("frame stack never empty")
            .declared
            .contains(name)
    }

    /// Search every frame, innermost first, for a declaration of `name`.
    pub fn resolve(&self, name: &str) -> bool {
        self.frames.iter().rev().any(|f| f.declared.contains(name))
    }

    /// Whether the nearest enclosing function/method frame (if any) is a
    /// class method body. `None` means we are not inside any function.
    pub fn nearest_function_is_class_method(&self) -> Option<bool> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.is_function_body)
            .map(|f| f.is_class_body)
    }

    pub fn in_function(&self) -> bool {
        self.nearest_function_is_class_method().is_some()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
