use std::sync::Arc;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, label::Label, v_flex};
use gpui_tokio_bridge::Tokio;

use gemini_chat_client::{BackendError, BackendResult, ChatBackend, ChatReply};

use crate::chat::events::{DraftEdited, SendRequested, StartChat};
use crate::chat::session::{ChatSession, SendOutcome};
use crate::chat::{MessageInput, MessageList, RegistrationForm};

const ALERT_ANSWERS: [&str; 1] = ["OK"];

/// Coordinator for the registration form, transcript and draft input.
///
/// Owns the [`ChatSession`] and the backend handle. Requests run on the tokio runtime and
/// settle back on this entity, so every session mutation happens on the UI thread.
pub struct ChatView {
    session: ChatSession,
    backend: Arc<dyn ChatBackend>,
    registration_form: Entity<RegistrationForm>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    registration_task: Option<Task<()>>,
    chat_task: Option<Task<()>>,
}

impl ChatView {
    pub fn new(backend: Arc<dyn ChatBackend>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let registration_form = cx.new(|cx| RegistrationForm::new(window, cx));
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        cx.subscribe_in(
            &registration_form,
            window,
            |this, _, event: &StartChat, window, cx| {
                this.handle_start_chat(event, window, cx);
            },
        )
        .detach();

        cx.subscribe(&message_input, |this, _, event: &DraftEdited, _cx| {
            this.session.set_draft(event.text.clone());
        })
        .detach();

        cx.subscribe_in(
            &message_input,
            window,
            |this, _, _event: &SendRequested, window, cx| {
                this.handle_send(window, cx);
            },
        )
        .detach();

        Self {
            session: ChatSession::new(),
            backend,
            registration_form,
            message_list,
            message_input,
            registration_task: None,
            chat_task: None,
        }
    }

    fn handle_start_chat(
        &mut self,
        event: &StartChat,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let request = match self.session.begin_registration(&event.username) {
            Ok(request) => request,
            Err(rejection) => {
                tracing::debug!(?rejection, "ignored start chat");
                return;
            }
        };

        tracing::debug!(
            username = %request.username,
            base_url = self.backend.base_url(),
            "sending registration"
        );

        let backend = self.backend.clone();
        let request_task = Tokio::spawn(cx, async move { backend.register(request).await });

        self.registration_task = Some(cx.spawn_in(window, async move |this, cx| {
            let result = settle(request_task.await, "join-register-task");
            let _ = this.update(cx, |this, cx| {
                this.finish_registration(result, cx);
            });
        }));

        cx.notify();
    }

    fn finish_registration(&mut self, result: BackendResult<()>, cx: &mut Context<Self>) {
        self.registration_task = None;

        if let Err(rejection) = self.session.finish_registration(result) {
            tracing::debug!(?rejection, "ignored registration result");
        }

        cx.notify();
    }

    fn handle_send(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let request = match self.session.begin_send() {
            Ok(request) => request,
            Err(rejection) => {
                tracing::debug!(?rejection, "ignored send");
                return;
            }
        };

        // The user row and cleared draft must be on screen before the request leaves.
        self.message_input.update(cx, |input, cx| {
            input.clear(window, cx);
            input.set_loading(true, cx);
        });
        self.sync_transcript(cx);

        tracing::debug!(
            username = %request.username,
            base_url = self.backend.base_url(),
            "sending chat message"
        );

        let backend = self.backend.clone();
        let request_task = Tokio::spawn(cx, async move { backend.chat(request).await });

        self.chat_task = Some(cx.spawn_in(window, async move |this, cx| {
            let result = settle(request_task.await, "join-chat-task");
            let _ = this.update_in(cx, |this, window, cx| {
                this.finish_send(result, window, cx);
            });
        }));

        cx.notify();
    }

    fn finish_send(
        &mut self,
        result: BackendResult<ChatReply>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.chat_task = None;

        match self.session.finish_send(result) {
            Ok(SendOutcome::Replied) => {}
            Ok(SendOutcome::Failed { alert }) => {
                // Single "OK" answer; the dismissal carries no choice.
                let _answer = window.prompt(PromptLevel::Critical, alert, None, &ALERT_ANSWERS, cx);
            }
            Err(rejection) => {
                tracing::debug!(?rejection, "ignored chat result");
            }
        }

        let loading = self.session.is_loading();
        self.message_input.update(cx, |input, cx| {
            input.set_loading(loading, cx);
        });
        self.sync_transcript(cx);
        cx.notify();
    }

    fn sync_transcript(&self, cx: &mut Context<Self>) {
        let loading = self.session.is_loading();
        let messages = self.session.transcript().messages();
        self.message_list.update(cx, |list, cx| {
            list.sync(messages, loading, cx);
        });
    }
}

/// Folds a runtime join failure into the request's own error type.
fn settle<T>(
    joined: Result<BackendResult<T>, gpui_tokio_bridge::JoinError>,
    stage: &'static str,
) -> BackendResult<T> {
    joined.unwrap_or_else(|error| {
        Err(BackendError::TaskAborted {
            stage,
            details: error.to_string(),
        })
    })
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .when(!self.session.is_registered(), |view| {
                view.child(self.registration_form.clone())
            })
            .when_some(self.session.greeting(), |view, greeting| {
                view.p(px(20.))
                    .gap_2()
                    .child(Label::new(greeting).text_lg())
                    .child(self.message_list.clone())
                    .child(self.message_input.clone())
            })
    }
}
