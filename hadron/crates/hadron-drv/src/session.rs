//! One run of the driver.
//!
//! A [`Session`] owns the diagnostic [`Handler`] and the two output
//! streams. Every input file and every REPL line is an independent unit:
//! it gets its own arena, lexer, parser, chunk and VM. Unit failures are
//! reported as diagnostics on the error stream; only failures of the
//! streams themselves are returned as [`DriverError`].

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use hadron_bc::format::{is_compiled, output_path, unit_name};
use hadron_bc::{disassemble, read_unit_file, write_unit_file, Chunk};
use hadron_lex::{FileInput, Lexer, StringInput};
use hadron_par::compile;
use hadron_util::{Diagnostic, ErrorMode, Handler, Limits, Span, ToDiagnostic};
use hadron_vm::{InterpretResult, RuntimeError, Vm};
use tracing::debug;

use crate::error::{DriverError, DriverResult};

/// Prompt printed before each REPL line.
pub const PROMPT: &str = "> ";

/// What the session does with its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Ceilings for every unit
    pub limits: Limits,
    /// Stop at the first error or keep going
    pub mode: ErrorMode,
    /// Print each source's tokens before compiling it
    pub dump_tokens: bool,
    /// List `.hbc` inputs instead of running them
    pub disassemble: bool,
    /// Run sources directly instead of writing `.hbc` files
    pub run_sources: bool,
    /// Where `.hbc` files go; next to the source when unset
    pub out_dir: Option<PathBuf>,
}

/// Driver state for one invocation.
pub struct Session<O, E> {
    options: Options,
    handler: Handler,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Session<O, E> {
    /// Session writing program output to `out` and diagnostics to `err`.
    pub fn new(options: Options, out: O, err: E) -> Self {
        Self {
            handler: Handler::new(options.mode),
            options,
            out,
            err,
        }
    }

    /// Diagnostics reported so far.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Give back the output streams.
    pub fn into_streams(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Process `files` in order. Returns whether every unit succeeded.
    ///
    /// In strict mode the first failing unit stops the run.
    pub fn run_files(&mut self, files: &[PathBuf]) -> DriverResult<bool> {
        for path in files {
            let result = self.run_file(path)?;
            debug!(path = %path.display(), ?result, "unit done");
            if self.handler.should_abort() {
                break;
            }
        }
        Ok(!self.handler.has_errors())
    }

    /// Process one file: `.hbc` files are run or listed, anything else is
    /// compiled.
    pub fn run_file(&mut self, path: &Path) -> DriverResult<InterpretResult> {
        if is_compiled(path) {
            self.run_compiled(path)
        } else {
            self.compile_file(path)
        }
    }

    /// Load a `.hbc` file and disassemble or execute it.
    pub fn run_compiled(&mut self, path: &Path) -> DriverResult<InterpretResult> {
        let unit = match read_unit_file(path, self.options.limits.chunk_capacity) {
            Ok(unit) => unit,
            Err(err) => {
                self.report(err.to_diagnostic().in_unit(path.display()))?;
                return Ok(InterpretResult::CompileError);
            },
        };

        if self.options.disassemble {
            write!(self.out, "{}", disassemble(&unit.chunk, &unit.name))?;
            return Ok(InterpretResult::Ok);
        }
        self.execute(&unit.chunk, Some(path))
    }

    /// Compile a source file, write its `.hbc` and print the listing.
    pub fn compile_file(&mut self, path: &Path) -> DriverResult<InterpretResult> {
        debug!(path = %path.display(), "compile");

        if self.options.dump_tokens && !self.dump_tokens(path)? {
            return Ok(InterpretResult::CompileError);
        }

        let input = match FileInput::open(path) {
            Ok(input) => input,
            Err(source) => {
                let err = DriverError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                self.report(err.to_diagnostic())?;
                return Ok(InterpretResult::CompileError);
            },
        };

        let compiled = match compile(input, &self.options.limits) {
            Ok(compiled) => compiled,
            Err(err) => {
                self.report(err.to_diagnostic().in_unit(path.display()))?;
                return Ok(InterpretResult::CompileError);
            },
        };
        debug!(
            statements = compiled.statements,
            symbols = compiled.symbols.len(),
            bytes = compiled.chunk.len(),
            "compiled"
        );

        if self.options.run_sources {
            return self.execute(&compiled.chunk, Some(path));
        }

        let name = unit_name(path);
        let target = output_path(path, self.options.out_dir.as_deref());
        if let Some(dir) = &self.options.out_dir {
            if let Err(source) = fs::create_dir_all(dir) {
                let err = DriverError::Create {
                    path: dir.clone(),
                    source,
                };
                self.report(err.to_diagnostic())?;
                return Ok(InterpretResult::CompileError);
            }
        }
        if let Err(err) = write_unit_file(&target, &name, &compiled.chunk) {
            self.report(err.to_diagnostic().in_unit(target.display()))?;
            return Ok(InterpretResult::CompileError);
        }

        write!(self.out, "{}", disassemble(&compiled.chunk, &name))?;
        Ok(InterpretResult::Ok)
    }

    /// Compile and run one line of input. Blank lines are skipped.
    pub fn run_line(&mut self, line: &str) -> DriverResult<InterpretResult> {
        if line.trim().is_empty() {
            return Ok(InterpretResult::Ok);
        }
        match compile(StringInput::new(line), &self.options.limits) {
            Ok(compiled) => self.execute(&compiled.chunk, None),
            Err(err) => {
                self.report(err.to_diagnostic())?;
                Ok(InterpretResult::CompileError)
            },
        }
    }

    /// Read-eval-print loop over `input`, one unit per line, until end of
    /// input. Returns whether every line succeeded.
    pub fn repl<R: BufRead>(&mut self, mut input: R) -> DriverResult<bool> {
        let mut line = String::new();
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                break;
            }
            self.run_line(&line)?;
            if self.handler.should_abort() {
                break;
            }
        }
        Ok(!self.handler.has_errors())
    }

    fn execute(&mut self, chunk: &Chunk, unit: Option<&Path>) -> DriverResult<InterpretResult> {
        let mut vm = Vm::new(&self.options.limits);
        let result = vm.interpret(chunk, &mut self.out);
        let outcome = InterpretResult::from(&result);
        match result {
            Ok(_) => {},
            Err(RuntimeError::Output(err)) => return Err(DriverError::Io(err)),
            Err(err) => {
                let diag = err.to_diagnostic();
                let diag = match unit {
                    Some(path) => diag.in_unit(path.display()),
                    None => diag,
                };
                self.report(diag)?;
            },
        }
        Ok(outcome)
    }

    /// Print every token of `path`. Returns `false` after a lex error.
    fn dump_tokens(&mut self, path: &Path) -> DriverResult<bool> {
        let input = FileInput::open(path).map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        });
        let input = match input {
            Ok(input) => input,
            Err(err) => {
                self.report(err.to_diagnostic())?;
                return Ok(false);
            },
        };

        let arena = Bump::new();
        for token in Lexer::with_limits(input, &arena, &self.options.limits) {
            match token {
                Ok(token) if token.is_end() => break,
                Ok(token) => writeln!(
                    self.out,
                    "{:>4}:{:<4} {}",
                    token.span.line, token.span.col_start, token
                )?,
                Err(err) => {
                    self.report(err.to_diagnostic().in_unit(path.display()))?;
                    return Ok(false);
                },
            }
        }
        Ok(true)
    }

    /// Report a warning on the error stream. Warnings never fail the run.
    pub fn warn(&mut self, message: impl Into<String>) -> DriverResult<()> {
        self.report(Diagnostic::warning(message, Span::DUMMY))
    }

    fn report(&mut self, diagnostic: Diagnostic) -> DriverResult<()> {
        writeln!(self.err, "{}", diagnostic)?;
        self.handler.emit_diagnostic(diagnostic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(options: Options) -> Session<Vec<u8>, Vec<u8>> {
        Session::new(options, Vec::new(), Vec::new())
    }

    fn output(session: Session<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = session.into_streams();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_repl_prints_results() {
        let mut s = session(Options::default());
        let ok = s.repl("1 + 2\n2 ** 10\n".as_bytes()).unwrap();
        assert!(ok);
        let (out, err) = output(s);
        assert_eq!(out, "> 3\n> 1024\n> \n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_warnings_do_not_fail_the_run() {
        let mut s = session(Options::default());
        s.warn("--compile is deprecated: compiling is the default").unwrap();
        assert!(!s.handler().should_abort());
        assert!(s.repl("5\n".as_bytes()).unwrap());
        assert_eq!(s.handler().warning_count(), 1);
        let (out, err) = output(s);
        assert_eq!(out, "> 5\n> \n");
        assert_eq!(err, "warning: --compile is deprecated: compiling is the default\n");
    }

    #[test]
    fn test_string_only_line_is_a_runtime_error() {
        let mut s = session(Options::default());
        assert_eq!(s.run_line("\"abc\"").unwrap(), InterpretResult::RuntimeError);
        assert_eq!(s.handler().error_count(), 1);
        let (out, err) = output(s);
        assert!(out.is_empty());
        assert_eq!(
            err,
            "error[E0401]: stack underflow in RET\n  = note: at offset 0x0000\n"
        );
    }

    #[test]
    fn test_repl_skips_blank_lines() {
        let mut s = session(Options::default());
        assert!(s.repl("\n   \n7\n".as_bytes()).unwrap());
        assert_eq!(output(s).0, "> > > 7\n> \n");
    }

    #[test]
    fn test_repl_strict_stops_at_first_error() {
        let mut s = session(Options::default());
        let ok = s.repl("1 +\n5\n".as_bytes()).unwrap();
        assert!(!ok);
        let (out, err) = output(s);
        assert_eq!(out, "> ");
        assert!(err.starts_with("error[E0201]"));
    }

    #[test]
    fn test_repl_keep_going_continues() {
        let mut s = session(Options {
            mode: ErrorMode::Accumulate,
            ..Options::default()
        });
        let ok = s.repl("\"abc\n5\n".as_bytes()).unwrap();
        assert!(!ok);
        assert_eq!(s.handler().error_count(), 1);
        let (out, err) = output(s);
        assert_eq!(out, "> > 5\n> \n");
        assert_eq!(err, "error[E0102]: unterminated string literal at 1:1\n");
    }

    #[test]
    fn test_runtime_error_is_reported() {
        let mut s = session(Options::default());
        let result = s.run_line("0.5 & 1").unwrap();
        assert_eq!(result, InterpretResult::RuntimeError);
        let (_, err) = output(s);
        assert!(err.starts_with("error[E0406]: B_AND needs integer operands, got 0.5"));
    }

    #[test]
    fn test_compile_writes_unit_and_listing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("answer.hd");
        fs::write(&source, "42;\n").unwrap();

        let mut s = session(Options::default());
        assert_eq!(s.compile_file(&source).unwrap(), InterpretResult::Ok);
        let (out, _) = output(s);
        assert!(out.starts_with("=== answer ===\n"));
        assert!(out.contains("MOVE #0 42"));
        assert!(dir.path().join("answer.hbc").exists());
    }

    #[test]
    fn test_compiled_unit_runs_and_disassembles() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("sum.hd");
        fs::write(&source, "(1 + 2) * 3\n").unwrap();
        let out_dir = dir.path().join("build");

        let mut s = session(Options {
            out_dir: Some(out_dir.clone()),
            ..Options::default()
        });
        s.run_file(&source).unwrap();
        let compiled = out_dir.join("sum.hbc");
        assert!(compiled.exists());

        let mut s = session(Options::default());
        assert_eq!(s.run_file(&compiled).unwrap(), InterpretResult::Ok);
        assert_eq!(output(s).0, "9\n");

        let mut s = session(Options {
            disassemble: true,
            ..Options::default()
        });
        s.run_file(&compiled).unwrap();
        assert!(output(s).0.starts_with("=== sum ===\n"));
    }

    #[test]
    fn test_run_sources_directly() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("direct.hd");
        fs::write(&source, "2 + 3 * 4").unwrap();

        let mut s = session(Options {
            run_sources: true,
            ..Options::default()
        });
        s.run_file(&source).unwrap();
        assert_eq!(output(s).0, "14\n");
        assert!(!dir.path().join("direct.hbc").exists());
    }

    #[test]
    fn test_dump_tokens() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("tokens.hd");
        fs::write(&source, "1 + x").unwrap();

        let mut s = session(Options {
            dump_tokens: true,
            run_sources: true,
            ..Options::default()
        });
        s.run_file(&source).unwrap();
        let (out, _) = output(s);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "   1:1    decimal number 1");
        assert_eq!(lines[1], "   1:3    +");
        assert_eq!(lines[2], "   1:5    name x");
    }

    #[test]
    fn test_bad_magic_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.hbc");
        fs::write(&path, b"not bytecode").unwrap();

        let mut s = session(Options::default());
        assert_eq!(s.run_file(&path).unwrap(), InterpretResult::CompileError);
        let (_, err) = output(s);
        assert!(err.starts_with("error[E0302]: file header magic not correct\n  = note: in "));
    }

    #[test]
    fn test_strict_files_stop_early() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.hd");
        let good = dir.path().join("good.hd");
        fs::write(&bad, "1 ` 2").unwrap();
        fs::write(&good, "1").unwrap();

        let mut s = session(Options::default());
        assert!(!s.run_files(&[bad.clone(), good.clone()]).unwrap());
        assert!(!dir.path().join("good.hbc").exists());

        let mut s = session(Options {
            mode: ErrorMode::Accumulate,
            ..Options::default()
        });
        assert!(!s.run_files(&[bad, good]).unwrap());
        assert!(dir.path().join("good.hbc").exists());
    }

    #[test]
    fn test_missing_source() {
        let mut s = session(Options::default());
        let result = s.run_file(Path::new("/nonexistent/prog.hd")).unwrap();
        assert_eq!(result, InterpretResult::CompileError);
        assert!(output(s).1.starts_with("error[E0501]: cannot read '/nonexistent/prog.hd'"));
    }
}
