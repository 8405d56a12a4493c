//! wolfc - compiler for wolf component files.

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod orchestrator;
mod output;

use cli::Args;
use orchestrator::Orchestrator;

fn main() -> ExitCode {
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    init_tracing(args.verbose);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default from `info` to `debug`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "wolfc=debug,wolf_codegen=debug" } else { "wolfc=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let orchestrator = Orchestrator::new(&workspace, &args).into_diagnostic()?;

    if args.watch {
        orchestrator.run_watch().into_diagnostic()?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = orchestrator.run_once().into_diagnostic()?;
    if result.failed(orchestrator.config().fail_on_warning) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
