use std::path::PathBuf;
use std::sync::Arc;

use gemini_chat_client::ChatBackend;
use gpui::*;
use gpui_component::{ActiveTheme, v_flex};

use crate::chat::ChatView;

/// Returns the default themes directory path.
pub fn default_themes_path() -> PathBuf {
    PathBuf::from("./themes")
}

/// Height reserved for the client-drawn title area.
pub const TITLEBAR_HEIGHT: f32 = 32.0;

gpui::actions!(shell, [Quit]);

/// Root layout: a title strip above the chat view.
pub struct ChatAppShell {
    chat_view: Entity<ChatView>,
}

impl ChatAppShell {
    pub fn new(backend: Arc<dyn ChatBackend>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let chat_view = cx.new(|cx| ChatView::new(backend, window, cx));
        Self { chat_view }
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .bg(theme.background)
            .child(
                div()
                    .id("titlebar")
                    .w_full()
                    .h(px(TITLEBAR_HEIGHT))
                    .flex_shrink_0(),
            )
            .child(
                div()
                    .id("main-content")
                    .flex_1()
                    .min_h_0()
                    .overflow_hidden()
                    .child(self.chat_view.clone()),
            )
    }
}
