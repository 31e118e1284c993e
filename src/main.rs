// Entrypoint for the deploy CLI.
// - Keeps `main` small: set up logging, parse arguments, hand off to `cli::run`.
// - Unhandled failures (network, malformed responses) propagate as
//   `anyhow::Error` and exit non-zero.

use clap::Parser;
use deploy_worker::{
    cli::{parse_exit_code, run, Cli},
    credentials::EnvResolver,
};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::from(parse_exit_code(&err)));
        }
    };
    let code = run(&cli, &EnvResolver, &mut std::io::stdout())?;
    Ok(ExitCode::from(code))
}
