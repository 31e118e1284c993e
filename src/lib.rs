// Library root
// -----------
// Deploys a Cloudflare Worker script straight through the HTTP management
// API. The binary (`main.rs`) only parses arguments and maps the outcome of
// `cli::run` to an exit code.
//
// Module responsibilities:
// - `credentials`: API token and account id from the environment or the
//   wrangler config file.
// - `script`: finds the script to upload from a file or project directory.
// - `api`: the blocking HTTP client (listing and upload calls).
// - `cli`: argument model and the deploy run.
// - `ui`: console messages and the upload spinner.
// - `error`: the error type shared by all of the above.
pub mod api;
pub mod cli;
pub mod credentials;
pub mod error;
pub mod script;
pub mod ui;
