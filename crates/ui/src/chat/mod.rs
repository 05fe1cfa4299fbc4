/// Event contracts for chat module wiring.
pub mod events;
/// Transcript entities.
pub mod message;
pub mod message_input;
pub mod message_list;
pub mod registration_form;
pub mod scroll_manager;
/// Session state machine behind the chat view.
pub mod session;
pub mod view;

pub use events::{DraftEdited, SendRequested, StartChat};
pub use message::{Message, Sender, Transcript};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use registration_form::RegistrationForm;
pub use scroll_manager::ScrollManager;
pub use session::{
    CHAT_FAILURE_ALERT, ChatSession, Phase, SendOutcome, SessionRejection, SessionResult,
};
pub use view::ChatView;
