//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use hadron_util::ErrorMode;

use crate::config::Config;
use crate::session::Options;

/// hadronc - compile and run Hadron programs
///
/// Source files are compiled to `.hbc` next to the source (or into
/// `--out`) and their listing is printed. `.hbc` files are run, or listed
/// with `--disassemble`. Without files, a REPL reads one unit per line.
#[derive(Parser, Debug)]
#[command(name = "hadronc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile and run Hadron programs", long_about = None)]
pub struct Cli {
    /// Source or `.hbc` files; none starts the REPL
    pub files: Vec<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long, env = "HADRON_VERBOSE")]
    pub verbose: bool,

    /// Print each source's token stream before compiling it
    #[arg(short, long)]
    pub lang: bool,

    /// Directory for compiled `.hbc` files (default: next to the source)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Disassemble `.hbc` inputs instead of running them
    #[arg(short, long)]
    pub disassemble: bool,

    /// Report every failing unit instead of stopping at the first
    #[arg(short, long)]
    pub keep_going: bool,

    /// Path to configuration file
    #[arg(long, env = "HADRON_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, env = "HADRON_NO_COLOR")]
    pub no_color: bool,

    /// Deprecated: compiling sources is the default
    #[arg(short, long, hide = true)]
    pub compile: bool,

    /// Deprecated: run sources without writing `.hbc` files
    #[arg(short, long, hide = true)]
    pub interpret: bool,
}

impl Cli {
    /// Merge the flags over the file configuration.
    pub fn options(&self, config: &Config) -> Options {
        Options {
            limits: config.limits,
            mode: ErrorMode::from_keep_going(self.keep_going || config.keep_going),
            dump_tokens: self.lang,
            disassemble: self.disassemble,
            run_sources: self.interpret,
            out_dir: self.out.clone(),
        }
    }

    /// Whether debug logging is on, from the flag or the file.
    pub fn verbose(&self, config: &Config) -> bool {
        self.verbose || config.verbose
    }

    /// Deprecated flags that were given, with their replacement advice.
    pub fn deprecated_flags(&self) -> Vec<(&'static str, &'static str)> {
        let mut flags = Vec::new();
        if self.compile {
            flags.push(("--compile", "compiling is the default"));
        }
        if self.interpret {
            flags.push(("--interpret", "compile to .hbc and run that instead"));
        }
        flags
    }
}
