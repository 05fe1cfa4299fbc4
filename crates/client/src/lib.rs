use std::sync::Arc;

mod backend;
mod http;

pub use backend::{
    BackendConfig, BackendError, BackendResult, ChatBackend, ChatReply, ChatRequest,
    DEFAULT_BACKEND_URL, DEFAULT_BUSINESS, DEFAULT_EDUCATION, DEFAULT_INTERESTS, RegisterRequest,
};
pub use http::{CHAT_PATH, HttpBackend, REGISTER_PATH};

pub fn create_backend(config: BackendConfig) -> BackendResult<Arc<dyn ChatBackend>> {
    tracing::info!(base_url = %config.base_url, "creating chat backend");
    Ok(Arc::new(HttpBackend::new(config)?))
}
