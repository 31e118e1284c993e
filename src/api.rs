// API client module: a small blocking HTTP client for the Cloudflare
// Workers management API. It knows two endpoints, the script listing and
// the script upload, and nothing else.

use crate::error::DeployError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

const SCRIPT_CONTENT_TYPE: &str = "application/javascript";

/// Blocking client holding the HTTP client, the API base URL and the
/// bearer token used for every call.
#[derive(Clone)]
pub struct DeployClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Outcome of a successful upload. `public_url` is only set when the
/// response carried a `subdomain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    pub public_url: Option<String>,
}

/// An upload the API accepted (200/201), body not yet interpreted.
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub name: String,
    pub body: String,
}

impl Uploaded {
    /// Read the workers.dev URL out of the upload response.
    pub fn into_result(self) -> Result<DeployResult, DeployError> {
        let public_url = subdomain(&self.body)?.map(|sub| worker_url(&self.name, &sub));
        Ok(DeployResult { public_url })
    }
}

/// One entry of the script listing. Only the id matters here.
#[derive(Deserialize, Debug)]
pub struct ScriptSummary {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ListResponse {
    #[serde(default)]
    result: Option<Vec<ScriptSummary>>,
}

impl DeployClient {
    /// Create a client for the public API authorized by `token`.
    pub fn new(token: &str) -> Result<Self, DeployError> {
        let client = Client::builder().build()?;
        Ok(DeployClient {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            token: token.to_string(),
        })
    }

    /// Point the client at another API root.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn scripts_url(&self, account_id: &str) -> String {
        format!("{}/accounts/{}/workers/scripts", self.base_url, account_id)
    }

    fn auth_headers(&self) -> Result<HeaderMap, DeployError> {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&val)?);
        Ok(headers)
    }

    /// Whether the account already has a script called `name`. A non-200
    /// listing counts as "no".
    pub fn worker_exists(&self, account_id: &str, name: &str) -> Result<bool, DeployError> {
        let url = self.scripts_url(account_id);
        log::debug!("GET {}", url);
        let res = self.client.get(&url).headers(self.auth_headers()?).send()?;
        if res.status() != StatusCode::OK {
            return Ok(false);
        }
        let listing: ListResponse = serde_json::from_str(&res.text()?)?;
        Ok(listing
            .result
            .unwrap_or_default()
            .iter()
            .any(|s| s.id.as_deref() == Some(name)))
    }

    /// Upload `content` as the worker `name`, replacing any existing script.
    pub fn upload_script(
        &self,
        account_id: &str,
        name: &str,
        content: &str,
    ) -> Result<Uploaded, DeployError> {
        let url = format!("{}/{}", self.scripts_url(account_id), name);
        log::debug!("PUT {} ({} bytes)", url, content.len());

        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SCRIPT_CONTENT_TYPE));

        let res = self
            .client
            .put(&url)
            .headers(headers)
            .body(content.to_string())
            .send()?;

        let status = res.status();
        let body = res.text()?;
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(DeployError::UploadRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Uploaded {
            name: name.to_string(),
            body,
        })
    }

    /// Run the existence check, then upload unconditionally.
    pub fn deploy(
        &self,
        name: &str,
        content: &str,
        account_id: &str,
    ) -> Result<Uploaded, DeployError> {
        // Replace-or-create either way; the flag is only logged.
        let exists = self.worker_exists(account_id, name)?;
        log::debug!("Worker {} exists: {}", name, exists);
        self.upload_script(account_id, name, content)
    }
}

/// Public workers.dev URL for a worker on the given account subdomain.
pub fn worker_url(name: &str, subdomain: &str) -> String {
    format!("https://{}.{}.workers.dev", name, subdomain)
}

fn subdomain(body: &str) -> Result<Option<String>, DeployError> {
    let json: Value = serde_json::from_str(body)?;
    Ok(json
        .get("result")
        .and_then(|r| r.get("subdomain"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_url_format() {
        assert_eq!(worker_url("demo", "abc123"), "https://demo.abc123.workers.dev");
    }

    #[test]
    fn subdomain_is_read_from_result() {
        let body = r#"{"success":true,"result":{"id":"demo","subdomain":"abc123"}}"#;
        assert_eq!(subdomain(body).unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_subdomain_gives_none() {
        assert_eq!(subdomain(r#"{"result":{"id":"demo"}}"#).unwrap(), None);
        assert_eq!(subdomain(r#"{"result":null}"#).unwrap(), None);
        assert_eq!(subdomain("{}").unwrap(), None);
    }

    #[test]
    fn uploaded_builds_public_url() {
        let uploaded = Uploaded {
            name: "demo".into(),
            body: r#"{"result":{"subdomain":"abc123"}}"#.into(),
        };
        assert_eq!(
            uploaded.into_result().unwrap().public_url.as_deref(),
            Some("https://demo.abc123.workers.dev")
        );
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(subdomain("ok"), Err(DeployError::Json(_))));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = DeployClient::new("tok")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/client/v4/");
        assert_eq!(
            client.scripts_url("acct"),
            "http://127.0.0.1:9/client/v4/accounts/acct/workers/scripts"
        );
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let client = DeployClient::new("bad\ntoken").unwrap();
        assert!(matches!(
            client.auth_headers(),
            Err(DeployError::InvalidToken(_))
        ));
    }
}
