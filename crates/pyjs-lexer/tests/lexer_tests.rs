use pyjs_lexer::{Dialect, Lexer};

/// Render a token stream as `Kind "lexeme"` lines, followed by an
/// `--- errors ---` block if scanning produced any diagnostics.
fn render(source: &str) -> String {
    let (tokens, errors) = Lexer::tokenize(source, Dialect::PySelf);
    let mut out = String::new();
    for tok in &tokens {
        out.push_str(&format!("{:?} {:?}\n", tok.kind, tok.lexeme));
    }
    if !errors.is_empty() {
        out.push_str("--- errors ---\n");
        for e in &errors {
            out.push_str(&format!("{}\n", e));
        }
    }
    out
}

#[test]
fn keywords_and_indentation() {
    insta::assert_snapshot!(render("if True:\n    x = 1\ny = 2\n"));
}

#[test]
fn newline_suppressed_inside_brackets() {
    insta::assert_snapshot!(render("a = [1,\n2,\n3]\n"));
}

#[test]
fn arithmetic_operators() {
    insta::assert_snapshot!(render("a + b - c * d / e % f ** g\n"));
}

#[test]
fn augmented_assignment_operators() {
    insta::assert_snapshot!(render("x += 1\nx -= 1\nx *= 1\nx /= 1\nx %= 1\n"));
}

#[test]
fn comparison_operators() {
    insta::assert_snapshot!(render(
        "a == b\na != b\na < b\na <= b\na > b\na >= b\n"
    ));
}

#[test]
fn string_literal_with_escape_sequence() {
    insta::assert_snapshot!(render(
        r#"x = "a\nb"
"#
    ));
}

#[test]
fn unterminated_string_reports_error() {
    insta::assert_snapshot!(render("x = \"abc\n"));
}

#[test]
fn inconsistent_dedent_is_reported() {
    insta::assert_snapshot!(render("if True:\n        x = 1\n    y = 2\n"));
}
