// UI layer: the console messages printed by a deploy run, plus the
// spinner shown while the API calls are in flight. Messages go to the
// writer the caller passes in (stdout in the binary); the spinner draws on
// stderr and stays hidden when that is not a terminal.

use crate::api::DeployResult;
use crate::error::DeployError;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

pub const USAGE: &str = "Usage: deploy_worker <worker_name> [script_path] [account_id]";

const CREDENTIAL_HINT: &str = "Set it as environment variable or in wrangler config";

pub fn print_usage(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", USAGE)?;
    writeln!(out, "\nIf script_path is not provided, will look for src/index.js")
}

/// Print a failure the CLI handles itself. Credential errors get a hint on
/// where to set them; a rejected upload prints the status and raw body.
pub fn print_failure(out: &mut impl Write, err: &DeployError) -> io::Result<()> {
    match err {
        DeployError::MissingToken | DeployError::MissingAccountId => {
            writeln!(out, "Error: {}", err)?;
            writeln!(out, "{}", CREDENTIAL_HINT)
        }
        DeployError::UploadRejected { body, .. } => {
            writeln!(out, "{}", err)?;
            writeln!(out, "{}", body)
        }
        _ => writeln!(out, "Error: {}", err),
    }
}

pub fn print_plan(
    out: &mut impl Write,
    worker_name: &str,
    script_path: &Path,
    account_id: &str,
) -> io::Result<()> {
    writeln!(out, "Deploying worker: {}", worker_name)?;
    writeln!(out, "Script path: {}", script_path.display())?;
    writeln!(out, "Account ID: {}", account_id)
}

pub fn print_uploaded(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Worker script uploaded successfully!")
}

/// Print the public URL, if the upload response gave one.
pub fn print_deployed(out: &mut impl Write, result: &DeployResult) -> io::Result<()> {
    if let Some(url) = &result.public_url {
        writeln!(out, "Worker URL: {}", url)?;
        writeln!(out, "\nDeployed at: {}", url)?;
    }
    Ok(())
}

/// Spinner for the upload. `finish_and_clear` it once the calls return.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
