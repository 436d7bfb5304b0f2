//! # farmhand
//!
//! Command-line front end for the farmhand data proxy: sign in, pick a farm,
//! call backend functions and fan out bulk calls in batches.

use std::process::ExitCode;

use clap::Parser;
use error_stack::Report;
use farmhand_rpc::Error;

mod args;
mod commands;
mod logging;

use args::Cli;
use commands::Context;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // -vvv also keeps a trace file unless one was named explicitly
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| (cli.verbose > 2).then(logging::default_log_path));
    logging::init_tracing(cli.tracing_level(), log_file);

    let ctx = match Context::from_cli(&cli) {
        Ok(ctx) => ctx,
        Err(report) => return failure(&report),
    };

    match commands::run(cli.command, ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => failure(&report),
    }
}

/// Top-level error for the user; the full report goes to the debug log
fn failure(report: &Report<Error>) -> ExitCode {
    eprintln!("{}", error_line(report));
    tracing::debug!("{report:?}");
    ExitCode::FAILURE
}

fn error_line(report: &Report<Error>) -> String {
    format!("Error: {}", report.current_context())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line_omits_attachments() {
        let report = Report::new(Error::Configuration("bad proxy URL".to_string()))
            .attach("URL: not a url".to_string());
        assert_eq!(error_line(&report), "Error: Configuration error: bad proxy URL");
    }
}
