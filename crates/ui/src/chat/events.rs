/// Emitted when the user asks to start chatting with the typed username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartChat {
    pub username: String,
}

impl StartChat {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Emitted on every edit of the message draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEdited {
    pub text: String,
}

/// Emitted when the user triggers the send action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendRequested;
