use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use fair_cli::{init_logging, run, Cli};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout with success; usage errors exit 1.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let guard = match init_logging(cli.verbose, cli.quiet, cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "fair-score: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|rt| rt.block_on(run(cli.command)));

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            let _ = writeln!(std::io::stderr(), "fair-score: {err:#}");
            ExitCode::FAILURE
        }
    };
    drop(guard);
    code
}
