use std::process::ExitCode;

use clap::Parser;
use icon_badger::cli::{Cli, ProcessEnv};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = cli
        .into_job(&ProcessEnv::from_env())
        .and_then(|(job, settings)| job.run(&settings));

    match result {
        Ok(report) => {
            log::info!("done: {report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
