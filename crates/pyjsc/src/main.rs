//! The pyjs compiler CLI.
//!
//! Provides the `pyjsc` command with one subcommand:
//!
//! - `pyjsc check <file>` - compile a file and print either the emitted
//!   JS (to stdout) or `ariadne`-rendered diagnostics (to stderr).
//!
//! This binary is explicitly ambient tooling, not part of the embeddable
//! `pyjs::Compiler` contract: it contains no compiler logic of its own,
//! only a thin drive-and-report harness over the façade.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pyjsc", version, about = "The pyjs compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single pyjs source file and print its emitted JS.
    Check {
        /// Path to the source file.
        file: PathBuf,

        /// Use the `this`-spelled self-reference dialect instead of `self`.
        #[arg(long)]
        this_dialect: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check { file, this_dialect } => {
            if let Err(code) = check(&file, this_dialect) {
                process::exit(code);
            }
        }
    }
}

fn check(path: &std::path::Path, this_dialect: bool) -> Result<(), i32> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read '{}': {}", path.display(), e);
        1
    })?;

    let dialect = if this_dialect {
        pyjs::Dialect::JsThis
    } else {
        pyjs::Dialect::PySelf
    };
    let compiler = pyjs::Compiler::new(dialect);
    let result = compiler.compile(&source);

    if result.success {
        println!("{}", result.final_text.as_deref().unwrap_or_default());
        Ok(())
    } else {
        report_diagnostics(&source, &result);
        Err(1)
    }
}

/// Render every diagnostic from all three stages with `ariadne`, in
/// lexer/parser/transpiler order.
fn report_diagnostics(source: &str, result: &pyjs::CompileResult) {
    use ariadne::{Label, Report, ReportKind, Source};

    let all = result
        .errors
        .lexer
        .iter()
        .chain(result.errors.parser.iter())
        .chain(result.errors.transpiler.iter());

    for diag in all {
        let start = byte_offset(source, diag.loc.line, diag.loc.col);
        let end = start + (diag.loc.len as usize).max(1);
        let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start..end)
            .with_message(&diag.error)
            .with_label(Label::new(start..end).with_message(&diag.error))
            .finish()
            .eprint(Source::from(source));
    }
}

/// Resolve a 1-indexed line / 0-indexed column pair back to a byte offset,
/// for `ariadne`'s byte-range-based span model.
fn byte_offset(source: &str, line: u32, col: u32) -> usize {
    let mut offset = 0usize;
    for (i, l) in source.split('\n').enumerate() {
        if i as u32 + 1 == line {
            let col_offset: usize = l.chars().take(col as usize).map(|c| c.len_utf8()).sum();
            return offset + col_offset;
        }
        offset += l.len() + 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offset_finds_start_of_line_two() {
        let src = "abc\ndef\n";
        assert_eq!(byte_offset(src, 2, 0), 4);
        assert_eq!(byte_offset(src, 2, 2), 6);
    }

    #[test]
    fn byte_offset_first_line() {
        let src = "abcdef\n";
        assert_eq!(byte_offset(src, 1, 3), 3);
    }
}
