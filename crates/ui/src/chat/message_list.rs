use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, h_flex, label::Label, v_flex};

use crate::chat::message::{Message, Sender};
use crate::chat::scroll_manager::ScrollManager;

pub const TRANSCRIPT_HEIGHT: Pixels = px(300.);
pub const TYPING_INDICATOR: &str = "Typing...";

/// Fixed-height transcript pane with its own scroll region.
pub struct MessageList {
    messages: Vec<Message>,
    is_loading: bool,
    scroll_manager: ScrollManager,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            is_loading: false,
            scroll_manager: ScrollManager::new(),
        }
    }

    /// Mirrors the session transcript. Rows are only ever appended.
    pub fn sync(&mut self, messages: &[Message], is_loading: bool, cx: &mut Context<Self>) {
        let grew = messages.len() > self.messages.len() || (is_loading && !self.is_loading);
        if messages.len() > self.messages.len() {
            self.messages.extend_from_slice(&messages[self.messages.len()..]);
        }
        self.is_loading = is_loading;

        if grew {
            self.scroll_manager.request_scroll_to_bottom_if_following();
        }

        cx.notify();
    }

    fn render_row(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .when(message.sender == Sender::User, |row| row.justify_end())
            .when(message.sender == Sender::Bot, |row| row.justify_start())
            .child(
                h_flex()
                    .gap_1()
                    .child(
                        Label::new(format!("{}:", message.sender.label()))
                            .text_sm()
                            .font_weight(FontWeight::BOLD)
                            .text_color(theme.foreground),
                    )
                    .child(Label::new(message.text.clone()).text_sm()),
            )
            .into_any_element()
    }
}

impl Render for MessageList {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.scroll_manager.update_follow_state();
        self.scroll_manager.apply_pending_scroll();

        let theme = cx.theme();
        let rows = self
            .messages
            .iter()
            .map(|message| self.render_row(message, cx))
            .collect::<Vec<_>>();

        div()
            .id("transcript")
            .w_full()
            .h(TRANSCRIPT_HEIGHT)
            .overflow_y_scroll()
            .track_scroll(self.scroll_manager.handle())
            .border_1()
            .border_color(theme.border)
            .p(px(10.))
            .child(
                v_flex()
                    .w_full()
                    .gap_2()
                    .children(rows)
                    .when(self.is_loading, |column| {
                        column.child(
                            Label::new(TYPING_INDICATOR)
                                .text_sm()
                                .text_color(theme.foreground.opacity(0.65)),
                        )
                    }),
            )
    }
}
