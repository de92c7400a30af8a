use pyjs_lexer::{Dialect, Lexer};
use pyjs_parser::{
    AssignOp, BinaryOp, Expr, ForStep, LambdaBody, LitValue, LogicalOp, Parser, Stmt, UnaryOp,
};

fn parse(src: &str) -> Vec<Stmt> {
    let (tokens, lex_errors) = Lexer::tokenize(src, Dialect::PySelf);
    assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
    let (stmts, errors) = Parser::parse(tokens);
    assert!(errors.is_empty(), "parse errors: {errors:?}");
    stmts
}

fn parse_errors(src: &str) -> String {
    let (tokens, lex_errors) = Lexer::tokenize(src, Dialect::PySelf);
    assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
    let (_, errors) = Parser::parse(tokens);
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a parsed program as an indented tree of S-expression-style lines,
/// the way `debug_tree` renders a CST for this grammar's token/tree shape.
fn render_program(src: &str) -> String {
    let stmts = parse(src);
    let mut out = String::new();
    for s in &stmts {
        render_stmt(s, 0, &mut out);
    }
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn render_block(body: &[Stmt], level: usize, out: &mut String) {
    for s in body {
        render_stmt(s, level, out);
    }
}

fn render_stmt(stmt: &Stmt, level: usize, out: &mut String) {
    indent(out, level);
    match stmt {
        Stmt::Variable { name, value, is_local, .. } => {
            out.push_str(&format!(
                "{} {} = {}\n",
                if *is_local { "let" } else { "global" },
                name,
                render_expr(value)
            ));
        }
        Stmt::Function { name, params, body, .. } => {
            out.push_str(&format!("def {}({})\n", name, params.join(", ")));
            render_block(body, level + 1, out);
        }
        Stmt::Class { name, parent, members, .. } => {
            match parent {
                Some(p) => out.push_str(&format!("class {} implements {}\n", name, p)),
                None => out.push_str(&format!("class {}\n", name)),
            }
            render_block(members, level + 1, out);
        }
        Stmt::If { branches, else_body, .. } => {
            for (i, (cond, body)) in branches.iter().enumerate() {
                if i > 0 {
                    indent(out, level);
                }
                out.push_str(&format!(
                    "{} {}\n",
                    if i == 0 { "if" } else { "elif" },
                    render_expr(cond)
                ));
                render_block(body, level + 1, out);
            }
            if let Some(eb) = else_body {
                indent(out, level);
                out.push_str("else\n");
                render_block(eb, level + 1, out);
            }
        }
        Stmt::While { cond, body, .. } => {
            out.push_str(&format!("while {}\n", render_expr(cond)));
            render_block(body, level + 1, out);
        }
        Stmt::For { init_name, init_value, init_is_local, cond, step, body, .. } => {
            out.push_str(&format!(
                "for {}{} = {}, {}, {}\n",
                if *init_is_local { "" } else { "global " },
                init_name,
                render_expr(init_value),
                render_expr(cond),
                render_for_step(step),
            ));
            render_block(body, level + 1, out);
        }
        Stmt::Return { value, .. } => match value {
            Some(v) => out.push_str(&format!("return {}\n", render_expr(v))),
            None => out.push_str("return\n"),
        },
        Stmt::Break { .. } => out.push_str("break\n"),
        Stmt::Pass { .. } => out.push_str("pass\n"),
        Stmt::Expression { expression, .. } => {
            out.push_str(&format!("expr {}\n", render_expr(expression)));
        }
        Stmt::Assign { target, op, value, .. } => {
            out.push_str(&format!(
                "assign {} {} {}\n",
                render_expr(target),
                assign_op_str(*op),
                render_expr(value)
            ));
        }
    }
}

fn render_for_step(step: &ForStep) -> String {
    match step {
        ForStep::Expr(e) => render_expr(e),
        ForStep::Assign { target, op, value } => {
            format!("{} {} {}", render_expr(target), assign_op_str(*op), render_expr(value))
        }
    }
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "**",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
    }
}

fn logical_op_str(op: LogicalOp) -> &'static str {
    match op {
        LogicalOp::And => "and",
        LogicalOp::Or => "or",
    }
}

fn unary_op_str(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "not",
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => render_lit(value),
        Expr::Var { name, .. } => name.clone(),
        Expr::SelfRef { .. } => "self".to_string(),
        Expr::Binary { left, op, right, .. } => {
            format!("({} {} {})", binary_op_str(*op), render_expr(left), render_expr(right))
        }
        Expr::Unary { op, operand, .. } => format!("({} {})", unary_op_str(*op), render_expr(operand)),
        Expr::Logical { left, op, right, .. } => {
            format!("({} {} {})", logical_op_str(*op), render_expr(left), render_expr(right))
        }
        Expr::Call { callee, args, .. } => format!(
            "(call {} [{}])",
            render_expr(callee),
            args.iter().map(render_expr).collect::<Vec<_>>().join(", ")
        ),
        Expr::Member { object, name, .. } => format!("(member {} {})", render_expr(object), name),
        Expr::Index { object, index, .. } => format!("(index {} {})", render_expr(object), render_expr(index)),
        Expr::Group { inner, .. } => format!("(group {})", render_expr(inner)),
        Expr::ObjectLiteral { entries, .. } => format!(
            "(object {{{}}})",
            entries
                .iter()
                .map(|(k, v)| format!("{}: {}", k, render_expr(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Expr::ListLiteral { elements, .. } => format!(
            "(list [{}])",
            elements.iter().map(render_expr).collect::<Vec<_>>().join(", ")
        ),
        Expr::Lambda { params, body, .. } => format!(
            "(lambda [{}] {})",
            params.join(", "),
            match body {
                LambdaBody::Expr(e) => render_expr(e),
                LambdaBody::Block(stmts) => {
                    let mut s = String::new();
                    render_block(stmts, 0, &mut s);
                    format!("{{{}}}", s.trim_end())
                }
            }
        ),
    }
}

fn render_lit(value: &LitValue) -> String {
    match value {
        LitValue::Number(n) => format!("{n}"),
        LitValue::Str(s) => format!("{s:?}"),
        LitValue::Bool(b) => b.to_string(),
        LitValue::Null => "null".to_string(),
    }
}

#[test]
fn local_assignment() {
    insta::assert_snapshot!(render_program("x = 10\n"));
}

#[test]
fn call_expression_statement() {
    insta::assert_snapshot!(render_program("print(x)\n"));
}

#[test]
fn precedence_multiplication_binds_tighter_than_addition() {
    insta::assert_snapshot!(render_program("x = 1 + 2 * 3\n"));
}

#[test]
fn power_is_right_associative() {
    insta::assert_snapshot!(render_program("x = 2 ** 3 ** 2\n"));
}

#[test]
fn object_literal_disambiguation() {
    insta::assert_snapshot!(render_program("a = {x = 1, y = 2}\n"));
}

#[test]
fn list_literal_disambiguation() {
    insta::assert_snapshot!(render_program("a = {1, 2, 3}\n"));
}

#[test]
fn for_loop_head_fields() {
    insta::assert_snapshot!(render_program(
        "for global i = 0, i < 3, i += 1:\n    pass\n"
    ));
}

#[test]
fn class_with_implements_and_members() {
    insta::assert_snapshot!(render_program(
        "class Dog implements Animal:\n    def init(name):\n        self.name = name\n"
    ));
}

#[test]
fn mixed_entries_is_a_hard_error() {
    insta::assert_snapshot!(parse_errors("a = {1, x = 2}\n"));
}

#[test]
fn invalid_assignment_target_reported() {
    insta::assert_snapshot!(parse_errors("1 = 2\n"));
}

#[test]
fn duplicate_init_reported() {
    insta::assert_snapshot!(parse_errors(
        "class C:\n    def init():\n        pass\n    def init():\n        pass\n"
    ));
}
