// Credential lookup: environment first, then the wrangler config file.
// The lookup is behind `CredentialResolver` so the orchestrator can be run
// with fixed credentials in tests without touching the real environment.

use serde_json::Value;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";
pub const ACCOUNT_ENV: &str = "CLOUDFLARE_ACCOUNT_ID";

/// API token and account id, either of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub account_id: Option<String>,
}

impl Credentials {
    fn is_complete(&self) -> bool {
        self.token.is_some() && self.account_id.is_some()
    }
}

/// Anything able to produce credentials for a run.
pub trait CredentialResolver {
    fn resolve(&self) -> Credentials;
}

/// Reads the process environment and the wrangler config under the user's
/// home directory.
pub struct EnvResolver;

impl CredentialResolver for EnvResolver {
    fn resolve(&self) -> Credentials {
        let home = dirs::home_dir();
        resolve_credentials(|key| std::env::var(key).ok(), home.as_deref())
    }
}

/// Fixed credentials, handy for tests and for callers that already hold them.
pub struct StaticResolver(pub Credentials);

impl CredentialResolver for StaticResolver {
    fn resolve(&self) -> Credentials {
        self.0.clone()
    }
}

/// Wrangler config locations, in lookup order.
pub fn config_candidates(home: &Path) -> [PathBuf; 2] {
    [
        home.join(".config").join("wrangler").join("config.json"),
        home.join(".wrangler").join("config.json"),
    ]
}

/// Resolve credentials from `lookup` (environment) and, for whatever is
/// still missing, from the first existing config file under `home`.
pub fn resolve_credentials<F>(lookup: F, home: Option<&Path>) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let mut creds = Credentials {
        token: non_empty(lookup(TOKEN_ENV)),
        account_id: non_empty(lookup(ACCOUNT_ENV)),
    };
    if creds.is_complete() {
        return creds;
    }

    let Some(home) = home else {
        return creds;
    };
    // Only the first existing file is read, even if it lacks a field.
    if let Some(path) = config_candidates(home).into_iter().find(|p| p.exists()) {
        log::debug!("Reading credentials from {}", path.display());
        let config = read_config(&path);
        if creds.token.is_none() {
            creds.token = string_field(&config, "api_token");
        }
        if creds.account_id.is_none() {
            creds.account_id =
                string_field(&config, "default_account").or_else(|| string_field(&config, "account_id"));
        }
    }
    creds
}

fn read_config(path: &Path) -> Value {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            return Value::Null;
        }
    };
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed config {}: {}", path.display(), e);
        Value::Null
    })
}

fn string_field(config: &Value, key: &str) -> Option<String> {
    non_empty(config.get(key).and_then(Value::as_str).map(str::to_string))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
