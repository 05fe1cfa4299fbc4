use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_EDUCATION: &str = "Not specified";
pub const DEFAULT_BUSINESS: &str = "None";
pub const DEFAULT_INTERESTS: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Self::default();
        }

        Self { base_url }
    }

    /// Joins an endpoint path onto the configured base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Profile payload for `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub education: String,
    pub business: String,
    pub interests: String,
}

impl RegisterRequest {
    /// Builds a registration with placeholder profile fields; `name` mirrors the username.
    pub fn with_placeholder_profile(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            name: username.clone(),
            username,
            education: DEFAULT_EDUCATION.to_string(),
            business: DEFAULT_BUSINESS.to_string(),
            interests: DEFAULT_INTERESTS.to_string(),
        }
    }
}

/// Payload for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub username: String,
    pub message: String,
}

impl ChatRequest {
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BackendError {
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("request to {url} failed on `{stage}`: {source}"))]
    Transport {
        stage: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("{url} returned status {status}: {body}"))]
    Status {
        stage: &'static str,
        url: String,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to decode response from {url} on `{stage}`: {source}"))]
    Decode {
        stage: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("request task ended before settling on `{stage}`: {details}"))]
    TaskAborted {
        stage: &'static str,
        details: String,
    },
}

/// Remote chat service seen by the client view.
pub trait ChatBackend: Send + Sync {
    fn base_url(&self) -> &str;

    /// Sends a registration. Only transport failures are reported; the reply body is ignored.
    fn register<'a>(&'a self, request: RegisterRequest) -> BoxFuture<'a, BackendResult<()>>;

    fn chat<'a>(&'a self, request: ChatRequest) -> BoxFuture<'a, BackendResult<ChatReply>>;
}
