use futures::FutureExt;
use futures::future::BoxFuture;
use snafu::ResultExt;

use super::backend::{
    BackendConfig, BackendResult, BuildClientSnafu, ChatBackend, ChatReply, ChatRequest,
    DecodeSnafu, RegisterRequest, StatusSnafu, TransportSnafu,
};

pub const REGISTER_PATH: &str = "/register";
pub const CHAT_PATH: &str = "/chat";

/// JSON-over-HTTP backend. No timeout is configured; transport defaults apply.
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context(BuildClientSnafu {
                stage: "http-backend-new",
            })?;

        Ok(Self { config, client })
    }

    async fn post_register(&self, request: RegisterRequest) -> BackendResult<()> {
        let url = self.config.endpoint(REGISTER_PATH);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context(TransportSnafu {
                stage: "send-register-request",
                url: url.as_str(),
            })?;

        tracing::debug!(
            username = %request.username,
            status = response.status().as_u16(),
            "registration request settled"
        );
        Ok(())
    }

    async fn post_chat(&self, request: ChatRequest) -> BackendResult<ChatReply> {
        let url = self.config.endpoint(CHAT_PATH);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context(TransportSnafu {
                stage: "send-chat-request",
                url: url.as_str(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StatusSnafu {
                stage: "chat-http-status",
                url,
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        response.json::<ChatReply>().await.context(DecodeSnafu {
            stage: "decode-chat-response",
            url: url.as_str(),
        })
    }
}

impl ChatBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn register<'a>(&'a self, request: RegisterRequest) -> BoxFuture<'a, BackendResult<()>> {
        self.post_register(request).boxed()
    }

    fn chat<'a>(&'a self, request: ChatRequest) -> BoxFuture<'a, BackendResult<ChatReply>> {
        self.post_chat(request).boxed()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::backend::BackendError;

    /// Serves exactly one canned response and yields the raw request it received.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let address = listener.local_addr().expect("listener address");
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept test connection");
            let request = read_request(&mut socket).await;
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write canned response");
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{address}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let read = socket.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer);
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }

        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn request_body(raw: &str) -> serde_json::Value {
        let (_, body) = raw.split_once("\r\n\r\n").expect("request has a body");
        serde_json::from_str(body).expect("request body is json")
    }

    fn backend_for(base_url: &str) -> HttpBackend {
        HttpBackend::new(BackendConfig::new(base_url)).expect("build backend")
    }

    #[tokio::test]
    async fn chat_posts_identity_and_message_and_decodes_reply() {
        let (base_url, server) = serve_once("200 OK", r#"{"response":"Hi there"}"#).await;
        let backend = backend_for(&base_url);

        let reply = backend
            .chat(ChatRequest::new("alice", "hello"))
            .await
            .expect("chat succeeds");
        let raw = server.await.expect("server task");

        assert_eq!(reply.response, "Hi there");
        assert!(raw.starts_with("POST /chat "));
        assert_eq!(
            request_body(&raw),
            serde_json::json!({ "username": "alice", "message": "hello" })
        );
    }

    #[tokio::test]
    async fn register_posts_placeholder_profile_and_ignores_reply() {
        let (base_url, server) = serve_once("400 BAD REQUEST", r#"{"error":"nope"}"#).await;
        let backend = backend_for(&base_url);

        backend
            .register(RegisterRequest::with_placeholder_profile("alice"))
            .await
            .expect("register ignores response status");
        let raw = server.await.expect("server task");

        assert!(raw.starts_with("POST /register "));
        let body = request_body(&raw);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["name"], "alice");
        assert_eq!(body["interests"], "General");
    }

    #[tokio::test]
    async fn chat_reports_non_success_status() {
        let (base_url, server) =
            serve_once("404 NOT FOUND", r#"{"error":"User not found."}"#).await;
        let backend = backend_for(&base_url);

        let error = backend
            .chat(ChatRequest::new("ghost", "hello"))
            .await
            .expect_err("404 is a failure");
        server.await.expect("server task");

        assert!(matches!(error, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn chat_reports_body_without_response_field() {
        let (base_url, server) = serve_once("200 OK", r#"{"reply":"wrong shape"}"#).await;
        let backend = backend_for(&base_url);

        let error = backend
            .chat(ChatRequest::new("alice", "hello"))
            .await
            .expect_err("missing field is a failure");
        server.await.expect("server task");

        assert!(matches!(error, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind throwaway listener");
        let address = listener.local_addr().expect("listener address");
        drop(listener);

        let backend = backend_for(&format!("http://{address}"));
        let chat_error = backend
            .chat(ChatRequest::new("alice", "hello"))
            .await
            .expect_err("nothing is listening");
        let register_error = backend
            .register(RegisterRequest::with_placeholder_profile("alice"))
            .await
            .expect_err("nothing is listening");

        assert!(matches!(chat_error, BackendError::Transport { .. }));
        assert!(matches!(register_error, BackendError::Transport { .. }));
    }
}
