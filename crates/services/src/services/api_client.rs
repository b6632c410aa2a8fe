//! HTTP request helper for the LAPGEST-PRO REST API.

use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use utils::env::{self, ConfigError};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const API_URL_VAR: &str = "LAPGEST_API_URL";
pub const TIMEOUT_VAR: &str = "LAPGEST_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// Non-2xx response. `message` is the body text, or the status text when
    /// the body is empty.
    #[error("{status}: {message}")]
    Http { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// No timeout unless explicitly configured.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            user_agent: concat!("lapgest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Reads `LAPGEST_API_URL` and `LAPGEST_HTTP_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var_or(API_URL_VAR, DEFAULT_API_URL);
        let base_url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
            name: API_URL_VAR.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(base_url).with_timeout(env::duration_secs_var(TIMEOUT_VAR)?))
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Credentialed JSON client. Cloning shares the connection pool and the
/// cookie store, so a session cookie obtained by one clone is sent by all.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, RequestError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET path`, decoding the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.send::<(), T>(path, Method::GET, None).await
    }

    /// Issues `method path` with an optional JSON body and decodes the JSON
    /// response. An empty success body decodes as `null`.
    pub async fn send<B, T>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send_raw(path, method, body).await?;
        read_json(res).await
    }

    /// Same as [`send`](Self::send) but hands back the successful response
    /// untouched.
    pub async fn send_raw<B>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<Response, RequestError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        debug!(method = %method, url = %url, "api request");

        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let res = request.send().await.map_err(map_reqwest_error)?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let message = error_message(&body, status.canonical_reason());
        warn!(
            method = %method,
            path = path,
            status = status.as_u16(),
            message = %message,
            "api request failed"
        );
        Err(RequestError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// Resolves `path` under the base URL, keeping any path prefix the base
    /// carries (`http://host/lapgest/` + `/api/lapins` → `http://host/lapgest/api/lapins`).
    fn url(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RequestError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RequestError {
    if e.is_decode() {
        RequestError::Serde(e.to_string())
    } else {
        RequestError::Transport(e.to_string())
    }
}

fn error_message(body: &str, status_text: Option<&str>) -> String {
    if body.trim().is_empty() {
        status_text.unwrap_or("Unknown Status").to_string()
    } else {
        body.to_string()
    }
}

/// Decodes the body of a successful response. An empty body reads as `null`.
pub async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, RequestError> {
    let text = res.text().await.map_err(map_reqwest_error)?;
    parse_body(&text)
}

pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, RequestError> {
    if text.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(text)
    }
    .map_err(|e| RequestError::Serde(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn empty_body_decodes_as_null() {
        parse_body::<()>("").unwrap();
        let value: Value = parse_body("  ").unwrap();
        assert_eq!(value, Value::Null);
        let missing: Option<u32> = parse_body("").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn json_body_decodes() {
        let value: Value = parse_body(r#"{"id": 3}"#).unwrap();
        assert_eq!(value, json!({ "id": 3 }));
        assert!(matches!(
            parse_body::<Value>("<html>"),
            Err(RequestError::Serde(_))
        ));
    }

    #[test]
    fn error_message_falls_back_to_status_text() {
        assert_eq!(error_message("", Some("Not Found")), "Not Found");
        assert_eq!(
            error_message(r#"{"message":"Lapin introuvable"}"#, Some("Not Found")),
            r#"{"message":"Lapin introuvable"}"#
        );
    }

    #[test]
    fn http_error_display_and_status() {
        let err = RequestError::Http {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "401: Unauthorized");
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(RequestError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn paths_resolve_against_base_url() {
        let client =
            ApiClient::new(ApiConfig::new(Url::parse("http://farm.local:8080").unwrap())).unwrap();
        assert_eq!(
            client.url("/api/lapins/4/genealogy").unwrap().as_str(),
            "http://farm.local:8080/api/lapins/4/genealogy"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        for base in ["http://farm.local/lapgest", "http://farm.local/lapgest/"] {
            let client = ApiClient::new(ApiConfig::new(Url::parse(base).unwrap())).unwrap();
            assert_eq!(client.base_url().as_str(), "http://farm.local/lapgest/");
            assert_eq!(
                client.url("/api/lapins").unwrap().as_str(),
                "http://farm.local/lapgest/api/lapins"
            );
            assert_eq!(
                client.url("api/auth/user").unwrap().as_str(),
                "http://farm.local/lapgest/api/auth/user"
            );
        }
    }
}
