// Command-line surface and the deploy run itself.
//
// `run` walks the steps in order: credentials, account id, script, upload.
// Handled failures are printed and turn into exit code 1; transport and
// parsing failures are returned as errors for `main` to surface.

use crate::api::{DeployClient, DeployResult, DEFAULT_API_BASE};
use crate::credentials::CredentialResolver;
use crate::error::DeployError;
use crate::script::locate_script;
use crate::ui;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Upload a Worker script through the Cloudflare API, without wrangler.
#[derive(Parser, Debug, Clone)]
#[command(name = "deploy_worker", version)]
pub struct Cli {
    /// Name of the worker to create or replace
    pub worker_name: Option<String>,

    /// Script file or script directory [default: ./src]
    pub script_path: Option<PathBuf>,

    /// Account id, overrides CLOUDFLARE_ACCOUNT_ID and the wrangler config
    pub account_id: Option<String>,

    /// Ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,

    #[arg(long, env = "CLOUDFLARE_API_BASE_URL", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base_url: String,
}

/// Exit code for a failed argument parse. Help and version output are not
/// failures; every other parse error exits 1 like the other usage errors.
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Run one deploy and return the process exit code. An upload whose
/// response carries no subdomain still exits 1.
pub fn run<R, W>(cli: &Cli, resolver: &R, out: &mut W) -> anyhow::Result<u8>
where
    R: CredentialResolver + ?Sized,
    W: Write,
{
    let Some(worker_name) = cli.worker_name.as_deref() else {
        ui::print_usage(out)?;
        return Ok(EXIT_FAILURE);
    };

    match deploy(cli, worker_name, resolver, out) {
        Ok(DeployResult {
            public_url: Some(_),
        }) => Ok(EXIT_SUCCESS),
        Ok(DeployResult { public_url: None }) => Ok(EXIT_FAILURE),
        Err(err) if err.is_handled() => {
            ui::print_failure(out, &err)?;
            Ok(EXIT_FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn deploy<R, W>(
    cli: &Cli,
    worker_name: &str,
    resolver: &R,
    out: &mut W,
) -> Result<DeployResult, DeployError>
where
    R: CredentialResolver + ?Sized,
    W: Write,
{
    let creds = resolver.resolve();
    let token = creds.token.ok_or(DeployError::MissingToken)?;
    let account_id = cli
        .account_id
        .clone()
        .filter(|id| !id.is_empty())
        .or(creds.account_id)
        .ok_or(DeployError::MissingAccountId)?;

    let script_path = match &cli.script_path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?.join("src"),
    };
    let content = locate_script(&script_path)?;

    ui::print_plan(out, worker_name, &script_path, &account_id)?;

    let client = DeployClient::new(&token)?.with_base_url(&cli.api_base_url);
    let pb = ui::spinner("Uploading...");
    let uploaded = client.deploy(worker_name, &content, &account_id);
    pb.finish_and_clear();

    let uploaded = uploaded?;
    ui::print_uploaded(out)?;
    let result = uploaded.into_result()?;
    ui::print_deployed(out, &result)?;
    Ok(result)
}
