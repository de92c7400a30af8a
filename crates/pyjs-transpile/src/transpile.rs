use std::fmt::Write as _;

use pyjs_common::Loc;
use pyjs_parser::{AssignOp, BinaryOp, Expr, ForStep, LambdaBody, LitValue, LogicalOp, Stmt};
use rustc_hash::FxHashSet;

use crate::error::{TranspileError, TranspileErrorKind};
use crate::registry::{RegistrationTable, Type};
use crate::scope::ScopeStack;

/// Result of walking and emitting a program: the emitted JS/TS text and
/// whatever semantic errors were recorded along the way. Emission never
/// stops at the first error -- every statement is still visited so later,
/// independent problems are reported too.
pub struct TranspileOutput {
    pub code: String,
    pub errors: Vec<TranspileError>,
}

/// Walks a parsed program once, maintaining a scope stack against a
/// registration table, and emits target source text.
pub struct Transpiler<'a> {
    table: &'a RegistrationTable,
    scope: ScopeStack,
    globals: FxHashSet<String>,
    declared_classes: FxHashSet<String>,
    errors: Vec<TranspileError>,
    loop_depth: u32,
}

impl<'a> Transpiler<'a> {
    pub fn new(table: &'a RegistrationTable) -> Self {
        Self {
            table,
            scope: ScopeStack::new(),
            globals: FxHashSet::default(),
            declared_classes: FxHashSet::default(),
            errors: Vec::new(),
            loop_depth: 0,
        }
    }

    pub fn transpile(mut self, program: &[Stmt]) -> TranspileOutput {
        let mut out = String::new();
        self.emit_block(&mut out, program, 0);
        TranspileOutput {
            code: out,
            errors: self.errors,
        }
    }

    fn write_indent(out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str("    ");
        }
    }

    /// Emits a sequence of statements one level deeper, dropping a bare
    /// string-literal expression statement at the top of the block (a
    /// docstring).
    fn emit_block(&mut self, out: &mut String, stmts: &[Stmt], level: usize) {
        for (i, stmt) in stmts.iter().enumerate() {
            if i == 0 {
                if let Stmt::Expression {
                    expression: Expr::Literal { value: LitValue::Str(_), .. },
                    ..
                } = stmt
                {
                    continue;
                }
            }
            self.emit_stmt(out, stmt, level);
        }
    }

    fn is_resolvable(&self, name: &str) -> bool {
        if self.globals.contains(name) {
            return true;
        }
        if self.scope.resolve(name) {
            return true;
        }
        if name == "print" || name == "str" {
            return true;
        }
        if self.table.functions.contains_key(name) {
            return true;
        }
        if self.table.objects.contains_key(name) {
            return true;
        }
        if self.table.reserved_declarations.contains(name) {
            return true;
        }
        if self.table.reserved_functions.contains_key(name) {
            return true;
        }
        if name == "Object" && self.declared_classes.contains("Object") {
            return true;
        }
        false
    }

    fn check_resolvable(&mut self, name: &str, loc: Loc) {
        if !self.is_resolvable(name) {
            self.errors.push(TranspileError::new(
                TranspileErrorKind::UndefinedVariable { name: name.to_string() },
                loc,
            ));
        }
    }

    fn var_text(&mut self, name: &str, loc: Loc) -> String {
        self.check_resolvable(name, loc);
        if self.globals.contains(name) {
            format!("globals.{}", name)
        } else {
            name.to_string()
        }
    }

    fn literal_type(expr: &Expr) -> Type {
        match expr {
            Expr::Literal { value, .. } => match value {
                LitValue::Number(_) => Type::Number,
                LitValue::Str(_) => Type::String,
                LitValue::Bool(_) => Type::Boolean,
                LitValue::Null => Type::Null,
            },
            _ => Type::Unknown,
        }
    }

    fn check_arg_types(&mut self, name: &str, expected: &[Type], args: &[Expr]) {
        for (i, expected_ty) in expected.iter().enumerate() {
            if let Some(arg) = args.get(i) {
                let found = Self::literal_type(arg);
                if found != Type::Unknown && found != *expected_ty {
                    self.errors.push(TranspileError::new(
                        TranspileErrorKind::TypeMismatch {
                            name: name.to_string(),
                            arg_index: i,
                            expected: *expected_ty,
                        },
                        arg.loc(),
                    ));
                }
            }
        }
    }

    fn validate_call(&mut self, name: &str, args: &[Expr], loc: Loc) {
        if let Some(entry) = self.table.functions.get(name).cloned() {
            if !entry.arity.accepts(args.len()) {
                self.errors.push(TranspileError::new(
                    TranspileErrorKind::ArityMismatch {
                        name: name.to_string(),
                        expected: entry.arity,
                        found: args.len(),
                    },
                    loc,
                ));
            }
            if let Some(types) = &entry.arg_types {
                self.check_arg_types(name, types, args);
            }
        }
    }

    fn validate_method_call(&mut self, object: &str, prop: &str, args: &[Expr], loc: Loc) {
        let Some(schema) = self.table.objects.get(object).cloned() else {
            return;
        };
        let Some(p) = schema.props.get(prop) else {
            return;
        };
        if !p.is_function {
            return;
        }
        let qualified = format!("{}.{}", object, prop);
        if let Some(arity) = p.arity {
            if !arity.accepts(args.len()) {
                self.errors.push(TranspileError::new(
                    TranspileErrorKind::ArityMismatch {
                        name: qualified.clone(),
                        expected: arity,
                        found: args.len(),
                    },
                    loc,
                ));
            }
        }
        if let Some(types) = &p.arg_types {
            self.check_arg_types(&qualified, types, args);
        }
    }

    /// Emits `object.prop`, checking the property against a registered
    /// builtin object's schema when the object resolves to one. Returns
    /// the emitted text and, when the object is a bare identifier, its name
    /// (used by call sites to look up method schemas).
    fn member_text(&mut self, object: &Expr, prop: &str, loc: Loc) -> (String, Option<String>) {
        let obj_text = self.expr_text(object);
        let obj_name = match object {
            Expr::Var { name, .. } => Some(name.clone()),
            _ => None,
        };
        if let Some(obj_name) = &obj_name {
            if let Some(schema) = self.table.objects.get(obj_name) {
                if !schema.props.contains_key(prop) {
                    self.errors.push(TranspileError::new(
                        TranspileErrorKind::UnknownProperty {
                            object: obj_name.clone(),
                            prop: prop.to_string(),
                        },
                        loc,
                    ));
                }
            }
        }
        (format!("{}.{}", obj_text, prop), obj_name)
    }

    fn call_text(&mut self, callee: &Expr, args: &[Expr], loc: Loc) -> String {
        let arg_texts: Vec<String> = args.iter().map(|a| self.expr_text(a)).collect();
        match callee {
            Expr::Var { name, loc: vloc } => {
                self.check_resolvable(name, *vloc);
                self.validate_call(name, args, loc);
                let callee_text = if name == "print" {
                    "console.log".to_string()
                } else if self.globals.contains(name) {
                    format!("globals.{}", name)
                } else {
                    name.clone()
                };
                format!("{}({})", callee_text, arg_texts.join(", "))
            }
            Expr::Member { object, name, loc: mloc } => {
                let (obj_text, obj_name) = self.member_text(object, name, *mloc);
                if let Some(obj_name) = &obj_name {
                    self.validate_method_call(obj_name, name, args, loc);
                }
                format!("{}({})", obj_text, arg_texts.join(", "))
            }
            other => {
                let callee_text = self.expr_text(other);
                format!("{}({})", callee_text, arg_texts.join(", "))
            }
        }
    }

    fn lambda_text(&mut self, params: &[String], body: &LambdaBody) -> String {
        let enclosing_is_method = self.scope.nearest_function_is_class_method().unwrap_or(false);
        self.scope.push(true, enclosing_is_method);
        for p in params {
            self.scope.declare(p);
        }
        let old_loop_depth = self.loop_depth;
        self.loop_depth = 0;
        let text = match body {
            LambdaBody::Expr(e) => {
                let inner = self.expr_text(e);
                format!("({}) => {}", params.join(", "), inner)
            }
            LambdaBody::Block(stmts) => {
                let mut body_out = String::new();
                self.emit_block(&mut body_out, stmts, 1);
                format!("({}) => {{\n{}}}", params.join(", "), body_out)
            }
        };
        self.loop_depth = old_loop_depth;
        self.scope.pop();
        text
    }

    fn literal_text(value: &LitValue) -> String {
        match value {
            LitValue::Number(n) => Self::format_number(*n),
            LitValue::Str(s) => format!("\"{}\"", Self::escape_js_string(s)),
            LitValue::Bool(b) => b.to_string(),
            LitValue::Null => "null".to_string(),
        }
    }

    fn format_number(n: f64) -> String {
        if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            n.to_string()
        }
    }

    fn escape_js_string(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                _ => out.push(c),
            }
        }
        out
    }

    fn binary_op_js(op: BinaryOp) -> &'static str {
        match op {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => unreachable!("Pow is emitted via Math.pow, not an infix operator"),
            BinaryOp::Eq => "===",
            BinaryOp::Ne => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }

    fn for_step_text(&mut self, step: &ForStep) -> String {
        match step {
            ForStep::Expr(e) => self.expr_text(e),
            ForStep::Assign { target, op, value } => {
                let value_text = self.expr_text(value);
                match target.as_ref() {
                    Expr::Var { name, loc } => {
                        self.check_resolvable(name, *loc);
                        let lhs = if self.globals.contains(name) {
                            format!("globals.{}", name)
                        } else {
                            name.clone()
                        };
                        format!("{} {} {}", lhs, Self::assign_op_js(*op), value_text)
                    }
                    Expr::Member { object, name, loc } => {
                        let (obj_text, _) = self.member_text(object, name, *loc);
                        format!("{} {} {}", obj_text, Self::assign_op_js(*op), value_text)
                    }
                    Expr::Index { object, index, .. } => {
                        let obj_text = self.expr_text(object);
                        let idx_text = self.expr_text(index);
                        format!("{}[{}] {} {}", obj_text, idx_text, Self::assign_op_js(*op), value_text)
                    }
                    other => {
                        let target_text = self.expr_text(other);
                        format!("{} {} {}", target_text, Self::assign_op_js(*op), value_text)
                    }
                }
            }
        }
    }

    fn assign_op_js(op: AssignOp) -> &'static str {
        match op {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
        }
    }

    fn expr_text(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value, .. } => Self::literal_text(value),
            Expr::Var { name, loc } => self.var_text(name, *loc),
            Expr::SelfRef { loc } => {
                if self.scope.nearest_function_is_class_method() != Some(true) {
                    self.errors
                        .push(TranspileError::new(TranspileErrorKind::SelfOutsideClass, *loc));
                }
                "this".to_string()
            }
            Expr::Binary { left, op, right, .. } => {
                let l = self.expr_text(left);
                let r = self.expr_text(right);
                if *op == BinaryOp::Pow {
                    format!("Math.pow({}, {})", l, r)
                } else {
                    format!("({} {} {})", l, Self::binary_op_js(*op), r)
                }
            }
            Expr::Unary { op, operand, .. } => {
                let o = self.expr_text(operand);
                match op {
                    pyjs_parser::UnaryOp::Neg => format!("-{}", o),
                    pyjs_parser::UnaryOp::Not => format!("!{}", o),
                }
            }
            Expr::Logical { left, op, right, .. } => {
                let l = self.expr_text(left);
                let r = self.expr_text(right);
                let js_op = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                };
                format!("({} {} {})", l, js_op, r)
            }
            Expr::Call { callee, args, loc } => self.call_text(callee, args, *loc),
            Expr::Member { object, name, loc } => self.member_text(object, name, *loc).0,
            Expr::Index { object, index, .. } => {
                let o = self.expr_text(object);
                let i = self.expr_text(index);
                format!("{}[{}]", o, i)
            }
            Expr::Group { inner, .. } => format!("({})", self.expr_text(inner)),
            Expr::ObjectLiteral { entries, .. } => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, self.expr_text(v)))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Expr::ListLiteral { elements, .. } => {
                let parts: Vec<String> = elements.iter().map(|e| self.expr_text(e)).collect();
                format!("[{}]", parts.join(", "))
            }
            Expr::Lambda { params, body, .. } => self.lambda_text(params, body),
        }
    }

    fn emit_function_decl(&mut self, out: &mut String, name: &str, params: &[String], body: &[Stmt], level: usize) {
        self.scope.push(true, false);
        for p in params {
            self.scope.declare(p);
        }
        let old_loop = self.loop_depth;
        self.loop_depth = 0;
        let mut body_out = String::new();
        self.emit_block(&mut body_out, body, level + 1);
        self.loop_depth = old_loop;
        self.scope.pop();

        Self::write_indent(out, level);
        let _ = writeln!(out, "function {}({}) {{", name, params.join(", "));
        out.push_str(&body_out);
        Self::write_indent(out, level);
        out.push_str("}\n");
    }

    fn emit_reserved_function(&mut self, out: &mut String, js_name: &str, params: &[String], body: &[Stmt], level: usize) {
        self.scope.push(true, false);
        for p in params {
            self.scope.declare(p);
        }
        let old_loop = self.loop_depth;
        self.loop_depth = 0;
        let mut body_out = String::new();
        self.emit_block(&mut body_out, body, level + 1);
        self.loop_depth = old_loop;
        self.scope.pop();

        Self::write_indent(out, level);
        let _ = writeln!(out, "{}(({}) => {{", js_name, params.join(", "));
        out.push_str(&body_out);
        Self::write_indent(out, level);
        out.push_str("});\n");
    }

    fn init_starts_with_parent_call(body: &[Stmt], parent: &str) -> bool {
        matches!(
            body.first(),
            Some(Stmt::Expression {
                expression: Expr::Call { callee, .. },
                ..
            }) if matches!(&**callee, Expr::Var { name, .. } if name == parent)
        )
    }

    fn emit_class(
        &mut self,
        out: &mut String,
        name: &str,
        parent: &Option<String>,
        members: &[Stmt],
        level: usize,
    ) {
        self.scope.declare(name);
        self.declared_classes.insert(name.to_string());
        self.scope.push(false, true);

        let init = members.iter().find_map(|m| match m {
            Stmt::Function { name: n, params, body, .. } if n == "init" => {
                Some((params.clone(), body.clone()))
            }
            _ => None,
        });
        let methods: Vec<(String, Vec<String>, Vec<Stmt>)> = members
            .iter()
            .filter_map(|m| match m {
                Stmt::Function { name: n, params, body, .. } if n != "init" => {
                    Some((n.clone(), params.clone(), body.clone()))
                }
                _ => None,
            })
            .collect();

        let (init_params, init_body) = init.unwrap_or_default();

        self.scope.push(true, true);
        for p in &init_params {
            self.scope.declare(p);
        }
        let old_loop = self.loop_depth;
        self.loop_depth = 0;
        let mut ctor_out = String::new();
        if let Some(parent_name) = parent {
            if !Self::init_starts_with_parent_call(&init_body, parent_name) && !init_body.is_empty() {
                Self::write_indent(&mut ctor_out, level + 1);
                let forwarded: String = init_params.iter().map(|p| format!(", {}", p)).collect();
                let _ = writeln!(ctor_out, "{}.call(this{});", parent_name, forwarded);
            }
        }
        self.emit_block(&mut ctor_out, &init_body, level + 1);
        self.loop_depth = old_loop;
        self.scope.pop();

        Self::write_indent(out, level);
        let _ = writeln!(out, "function {}({}) {{", name, init_params.join(", "));
        out.push_str(&ctor_out);
        Self::write_indent(out, level);
        out.push_str("}\n");

        if let Some(parent_name) = parent {
            Self::write_indent(out, level);
            let _ = writeln!(
                out,
                "Object.setPrototypeOf({}.prototype, {}.prototype);",
                name, parent_name
            );
        }

        for (mname, mparams, mbody) in &methods {
            self.scope.push(true, true);
            for p in mparams {
                self.scope.declare(p);
            }
            let old_loop = self.loop_depth;
            self.loop_depth = 0;
            let mut mbody_out = String::new();
            self.emit_block(&mut mbody_out, mbody, level + 1);
            self.loop_depth = old_loop;
            self.scope.pop();

            Self::write_indent(out, level);
            let _ = writeln!(out, "{}.prototype.{} = function({}) {{", name, mname, mparams.join(", "));
            out.push_str(&mbody_out);
            Self::write_indent(out, level);
            out.push_str("};\n");
        }

        self.scope.pop();
    }

    fn emit_stmt(&mut self, out: &mut String, stmt: &Stmt, level: usize) {
        match stmt {
            Stmt::Variable { name, value, is_local, .. } => {
                let value_text = self.expr_text(value);
                if *is_local {
                    self.scope.declare(name);
                    Self::write_indent(out, level);
                    let _ = writeln!(out, "var {} = {};", name, value_text);
                } else {
                    self.globals.insert(name.clone());
                    Self::write_indent(out, level);
                    let _ = writeln!(out, "globals.{} = {};", name, value_text);
                }
            }
            Stmt::Function { name, params, body, .. } => {
                if let Some(js_name) = self.table.reserved_functions.get(name).cloned() {
                    self.emit_reserved_function(out, &js_name, params, body, level);
                } else {
                    self.scope.declare(name);
                    self.emit_function_decl(out, name, params, body, level);
                }
            }
            Stmt::Class { name, parent, members, .. } => {
                self.emit_class(out, name, parent, members, level);
            }
            Stmt::If { branches, else_body, .. } => {
                for (i, (cond, body)) in branches.iter().enumerate() {
                    let cond_text = self.expr_text(cond);
                    Self::write_indent(out, level);
                    if i == 0 {
                        let _ = writeln!(out, "if ({}) {{", cond_text);
                    } else {
                        let _ = writeln!(out, "else if ({}) {{", cond_text);
                    }
                    self.scope.push(false, false);
                    self.emit_block(out, body, level + 1);
                    self.scope.pop();
                    Self::write_indent(out, level);
                    out.push_str("}\n");
                }
                if let Some(else_body) = else_body {
                    Self::write_indent(out, level);
                    out.push_str("else {\n");
                    self.scope.push(false, false);
                    self.emit_block(out, else_body, level + 1);
                    self.scope.pop();
                    Self::write_indent(out, level);
                    out.push_str("}\n");
                }
            }
            Stmt::While { cond, body, .. } => {
                let cond_text = self.expr_text(cond);
                Self::write_indent(out, level);
                let _ = writeln!(out, "while ({}) {{", cond_text);
                self.scope.push(false, false);
                self.loop_depth += 1;
                self.emit_block(out, body, level + 1);
                self.loop_depth -= 1;
                self.scope.pop();
                Self::write_indent(out, level);
                out.push_str("}\n");
            }
            Stmt::For {
                init_name,
                init_value,
                init_is_local,
                cond,
                step,
                body,
                ..
            } => {
                self.scope.push(false, false);
                if *init_is_local {
                    self.scope.declare(init_name);
                } else {
                    self.globals.insert(init_name.clone());
                }
                let init_val_text = self.expr_text(init_value);
                let cond_text = self.expr_text(cond);
                let step_text = self.for_step_text(step);
                let init_decl = if *init_is_local {
                    format!("var {} = {}", init_name, init_val_text)
                } else {
                    format!("globals.{} = {}", init_name, init_val_text)
                };
                Self::write_indent(out, level);
                let _ = writeln!(out, "for ({}; {}; {}) {{", init_decl, cond_text, step_text);
                self.loop_depth += 1;
                self.emit_block(out, body, level + 1);
                self.loop_depth -= 1;
                self.scope.pop();
                Self::write_indent(out, level);
                out.push_str("}\n");
            }
            Stmt::Return { value, loc } => {
                if !self.scope.in_function() {
                    self.errors
                        .push(TranspileError::new(TranspileErrorKind::ReturnOutsideFunction, *loc));
                }
                Self::write_indent(out, level);
                match value {
                    Some(e) => {
                        let t = self.expr_text(e);
                        let _ = writeln!(out, "return {};", t);
                    }
                    None => out.push_str("return;\n"),
                }
            }
            Stmt::Break { loc } => {
                if self.loop_depth == 0 {
                    self.errors
                        .push(TranspileError::new(TranspileErrorKind::BreakOutsideLoop, *loc));
                }
                Self::write_indent(out, level);
                out.push_str("break;\n");
            }
            Stmt::Pass { .. } => {}
            Stmt::Expression { expression, .. } => {
                let text = self.expr_text(expression);
                Self::write_indent(out, level);
                let _ = writeln!(out, "{};", text);
            }
            Stmt::Assign { target, op, value, .. } => {
                let value_text = self.expr_text(value);
                match target {
                    Expr::Var { name, loc } => {
                        if *op == AssignOp::Assign {
                            if self.scope.declared_in_current(name) || self.globals.contains(name) {
                                let lhs = if self.globals.contains(name) {
                                    format!("globals.{}", name)
                                } else {
                                    name.clone()
                                };
                                Self::write_indent(out, level);
                                let _ = writeln!(out, "{} = {};", lhs, value_text);
                            } else {
                                self.scope.declare(name);
                                Self::write_indent(out, level);
                                let _ = writeln!(out, "var {} = {};", name, value_text);
                            }
                        } else {
                            self.check_resolvable(name, *loc);
                            let lhs = if self.globals.contains(name) {
                                format!("globals.{}", name)
                            } else {
                                name.clone()
                            };
                            Self::write_indent(out, level);
                            let _ = writeln!(out, "{} {} {};", lhs, Self::assign_op_js(*op), value_text);
                        }
                    }
                    Expr::Member { object, name, loc } => {
                        let (obj_text, _) = self.member_text(object, name, *loc);
                        Self::write_indent(out, level);
                        let _ = writeln!(out, "{} {} {};", obj_text, Self::assign_op_js(*op), value_text);
                    }
                    Expr::Index { object, index, .. } => {
                        let obj_text = self.expr_text(object);
                        let idx_text = self.expr_text(index);
                        Self::write_indent(out, level);
                        let _ = writeln!(
                            out,
                            "{}[{}] {} {};",
                            obj_text,
                            idx_text,
                            Self::assign_op_js(*op),
                            value_text
                        );
                    }
                    other => {
                        // Parser already reported an invalid-target error; emit
                        // a best-effort placeholder so later errors still surface.
                        let target_text = self.expr_text(other);
                        Self::write_indent(out, level);
                        let _ = writeln!(out, "{} {} {};", target_text, Self::assign_op_js(*op), value_text);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Arity;
    use pyjs_lexer::{Dialect, Lexer};
    use pyjs_parser::Parser;

    fn compile(table: &RegistrationTable, src: &str) -> TranspileOutput {
        let (tokens, lex_errors) = Lexer::tokenize(src, Dialect::PySelf);
        assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
        let (stmts, parse_errors) = Parser::parse(tokens);
        assert!(parse_errors.is_empty(), "parse errors: {parse_errors:?}");
        Transpiler::new(table).transpile(&stmts)
    }

    #[test]
    fn s1_local_assignment_and_print() {
        let mut table = RegistrationTable::new();
        table.register_function("print", Arity::Variadic, None);
        let out = compile(&table, "x = 10\nprint(x)\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert!(out.code.contains("var x = 10;"));
        assert!(out.code.contains("console.log(x);"));
    }

    #[test]
    fn s2_arity_mismatch_reported() {
        let mut table = RegistrationTable::new();
        table.register_function("wait", Arity::Fixed(1), None);
        let out = compile(&table, "wait()\n");
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].to_string().contains("expects 1 argument"));
    }

    #[test]
    fn s3_builtin_object_property_and_type_checks() {
        use crate::registry::{ObjectSchema, PropSchema};
        let mut schema = ObjectSchema::default();
        schema.props.insert(
            "x".to_string(),
            PropSchema { is_function: false, arity: None, arg_types: None },
        );
        schema.props.insert(
            "setCostume".to_string(),
            PropSchema {
                is_function: true,
                arity: Some(Arity::Fixed(1)),
                arg_types: Some(vec![Type::String]),
            },
        );
        let mut table = RegistrationTable::new();
        table.register_builtin_object("sprite", schema);

        let ok = compile(&table, "sprite.x = 100\nsprite.setCostume(\"idle\")\n");
        assert!(ok.errors.is_empty(), "{:?}", ok.errors);

        let bad_type = compile(&table, "sprite.setCostume(42)\n");
        assert!(bad_type
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::TypeMismatch { .. })));

        let bad_prop = compile(&table, "sprite.bogus = 1\n");
        assert!(bad_prop
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::UnknownProperty { .. })));
    }

    #[test]
    fn s4_reserved_function_transformation() {
        let mut table = RegistrationTable::new();
        table.register_reserved_function("_forever", "forever");
        let out = compile(&table, "def _forever():\n    pass\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert!(out.code.contains("forever(("));
        assert!(out.code.contains(") => {"));
        assert!(!out.code.contains("function _forever"));
    }

    #[test]
    fn s5_for_loop_with_global() {
        let mut table = RegistrationTable::new();
        table.register_function("print", Arity::Variadic, None);
        let out = compile(&table, "for global i = 0, i < 3, i += 1:\n    print(i)\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert!(out.code.contains("globals.i = 0"));
        assert!(out.code.contains("globals.i < 3"));
        assert!(out.code.contains("globals.i += 1"));
        assert!(out.code.contains("console.log(globals.i);"));
    }

    #[test]
    fn s6_class_with_inheritance_inserts_parent_call() {
        let table = RegistrationTable::new();
        let src = "class Animal:\n    def init(name):\n        self.name = name\n    def speak():\n        print(self.name)\nclass Dog implements Animal:\n    def init(name, breed):\n        self.breed = breed\n";
        let out = compile(&table, src);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert!(out.code.contains("function Animal(name) {"));
        assert!(out.code.contains("function Dog(name, breed) {"));
        assert!(out.code.contains("Animal.call(this, name, breed);"));
        assert!(out.code.contains("Object.setPrototypeOf(Dog.prototype, Animal.prototype);"));
    }

    #[test]
    fn break_outside_loop_is_reported() {
        let table = RegistrationTable::new();
        let out = compile(&table, "break\n");
        assert!(out
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::BreakOutsideLoop)));
    }

    #[test]
    fn return_outside_function_is_reported() {
        let table = RegistrationTable::new();
        let out = compile(&table, "return 1\n");
        assert!(out
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::ReturnOutsideFunction)));
    }

    #[test]
    fn self_outside_class_is_reported() {
        let table = RegistrationTable::new();
        let out = compile(&table, "x = self\n");
        assert!(out
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::SelfOutsideClass)));
    }

    #[test]
    fn undefined_variable_is_reported() {
        let table = RegistrationTable::new();
        let out = compile(&table, "print(y)\n");
        assert!(out
            .errors
            .iter()
            .any(|e| matches!(e.kind, TranspileErrorKind::UndefinedVariable { name } if name == "y")));
    }

    #[test]
    fn variadic_registration_never_errors_on_arity() {
        let mut table = RegistrationTable::new();
        table.register_function("print", Arity::Variadic, None);
        let out = compile(&table, "print(1, 2, 3, 4, 5)\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
    }

    #[test]
    fn docstring_at_top_of_block_is_dropped() {
        let table = RegistrationTable::new();
        let out = compile(&table, "\"\"\"a docstring\"\"\"\nx = 1\n");
        assert!(!out.code.contains("a docstring"));
        assert!(out.code.contains("var x = 1;"));
    }
}
