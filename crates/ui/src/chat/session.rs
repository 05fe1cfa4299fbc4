use gemini_chat_client::{BackendResult, ChatReply, ChatRequest, RegisterRequest};

use crate::chat::message::{Message, Transcript};

/// Fixed alert text shown when a chat request fails for any reason.
pub const CHAT_FAILURE_ALERT: &str = "Something went wrong. Check if the chat server is running.";

/// Registration lifecycle. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unregistered,
    /// Registration request issued, not yet settled.
    Registering,
    Registered,
}

/// Reason a session action was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    EmptyInput,
    AlreadyRegistered,
    NotRegistered,
    RequestInFlight,
    NoPendingRequest,
}

pub type SessionResult<T> = Result<T, SessionRejection>;

/// How a settled chat request should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Replied,
    Failed { alert: &'static str },
}

/// View-owned session state: identity, draft, transcript and the two flags.
///
/// Mutations go through guarded transitions. The transcript only grows, the phase never
/// moves backwards and the identity is assigned at most once.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    identity: Option<String>,
    draft: String,
    transcript: Transcript,
    loading: bool,
    phase: Phase,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_registered(&self) -> bool {
        self.phase == Phase::Registered
    }

    pub fn greeting(&self) -> Option<String> {
        self.identity
            .as_deref()
            .filter(|_| self.is_registered())
            .map(|identity| format!("Hello {identity} 👋"))
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Claims the identity and returns the registration payload to send.
    pub fn begin_registration(&mut self, candidate: &str) -> SessionResult<RegisterRequest> {
        if self.phase != Phase::Unregistered {
            return Err(SessionRejection::AlreadyRegistered);
        }

        if candidate.trim().is_empty() {
            return Err(SessionRejection::EmptyInput);
        }

        self.identity = Some(candidate.to_string());
        self.phase = Phase::Registering;
        Ok(RegisterRequest::with_placeholder_profile(candidate))
    }

    /// Completes registration. Any outcome, including a failure, enables chat.
    pub fn finish_registration(&mut self, result: BackendResult<()>) -> SessionResult<()> {
        if self.phase != Phase::Registering {
            return Err(SessionRejection::NoPendingRequest);
        }

        if let Err(error) = result {
            tracing::warn!(
                username = self.identity.as_deref().unwrap_or_default(),
                "registration request failed, continuing anyway: {error}"
            );
        }

        self.phase = Phase::Registered;
        tracing::info!(
            username = self.identity.as_deref().unwrap_or_default(),
            "session registered"
        );
        Ok(())
    }

    /// Moves the draft into the transcript and returns the chat payload to send.
    pub fn begin_send(&mut self) -> SessionResult<ChatRequest> {
        if self.phase != Phase::Registered {
            return Err(SessionRejection::NotRegistered);
        }

        let Some(identity) = self.identity.clone() else {
            return Err(SessionRejection::NotRegistered);
        };

        if self.loading {
            return Err(SessionRejection::RequestInFlight);
        }

        if self.draft.trim().is_empty() {
            return Err(SessionRejection::EmptyInput);
        }

        let text = std::mem::take(&mut self.draft);
        self.transcript.push(Message::user(text.clone()));
        self.loading = true;

        Ok(ChatRequest::new(identity, text))
    }

    /// Settles the in-flight chat request. Loading is cleared on every outcome.
    pub fn finish_send(&mut self, result: BackendResult<ChatReply>) -> SessionResult<SendOutcome> {
        if !self.loading {
            return Err(SessionRejection::NoPendingRequest);
        }

        self.loading = false;

        match result {
            Ok(reply) => {
                self.transcript.push(Message::bot(reply.response));
                Ok(SendOutcome::Replied)
            }
            Err(error) => {
                tracing::error!("chat request failed: {error}");
                Ok(SendOutcome::Failed {
                    alert: CHAT_FAILURE_ALERT,
                })
            }
        }
    }
}
