use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hadron_drv::{logging, Cli, Config, Session};
use tracing::debug;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        },
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let (config, config_path) = Config::resolve(cli.config.as_deref())?;
    logging::init(cli.verbose(&config), cli.no_color)
        .context("failed to initialize logging")?;
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "using configuration");
    }

    let stdout = io::stdout();
    let mut session = Session::new(cli.options(&config), BufWriter::new(stdout.lock()), io::stderr());
    for (flag, advice) in cli.deprecated_flags() {
        session.warn(format!("{} is deprecated: {}", flag, advice))?;
    }

    let ok = if cli.files.is_empty() {
        session.repl(io::stdin().lock())?
    } else {
        session.run_files(&cli.files)?
    };
    let (mut out, _) = session.into_streams();
    io::Write::flush(&mut out)?;
    Ok(ok)
}
