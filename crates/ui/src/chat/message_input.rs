use gpui::*;
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};

use crate::chat::events::{DraftEdited, SendRequested};

/// Draft text box bound to the session's draft, plus the send action.
pub struct MessageInput {
    input_state: Entity<InputState>,
    is_loading: bool,
}

impl EventEmitter<DraftEdited> for MessageInput {}
impl EventEmitter<SendRequested> for MessageInput {}

impl MessageInput {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state =
            cx.new(|cx| InputState::new(window, cx).placeholder("Type your message..."));

        cx.subscribe_in(
            &input_state,
            window,
            |this, _, event: &InputEvent, _window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.handle_send(cx);
                    return;
                }

                let text = this.input_state.read(cx).value().to_string();
                cx.emit(DraftEdited { text });
            },
        )
        .detach();

        Self {
            input_state,
            is_loading: false,
        }
    }

    pub fn set_loading(&mut self, loading: bool, cx: &mut Context<Self>) {
        self.is_loading = loading;
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    fn handle_send(&mut self, cx: &mut Context<Self>) {
        if self.is_loading {
            return;
        }

        cx.emit(SendRequested);
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .mt(px(10.))
            .gap(px(10.))
            .items_center()
            .child(
                div()
                    .w(relative(0.8))
                    .rounded_lg()
                    .border_1()
                    .border_color(theme.border)
                    .child(Input::new(&self.input_state)),
            )
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .icon(IconName::ArrowUp)
                    .child("Send")
                    .disabled(self.is_loading)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.handle_send(cx);
                    })),
            )
    }
}
