use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};

use crate::chat::events::StartChat;

pub const WELCOME_HEADING: &str = "Welcome to Gemini AI";
pub const USERNAME_PROMPT: &str = "Enter a username to begin chatting:";

/// Unregistered branch: username prompt plus the "Start Chat" action.
pub struct RegistrationForm {
    username_input: Entity<InputState>,
    submitted: bool,
}

impl EventEmitter<StartChat> for RegistrationForm {}

impl RegistrationForm {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let username_input = cx.new(|cx| InputState::new(window, cx).placeholder("Username"));

        cx.subscribe_in(
            &username_input,
            window,
            |this, _, event: &InputEvent, _window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.handle_start(cx);
                }
            },
        )
        .detach();

        Self {
            username_input,
            submitted: false,
        }
    }

    fn handle_start(&mut self, cx: &mut Context<Self>) {
        if self.submitted {
            return;
        }

        let username = self.username_input.read(cx).value().to_string();
        if username.trim().is_empty() {
            return;
        }

        self.submitted = true;
        cx.emit(StartChat::new(username));
        cx.notify();
    }
}

impl Render for RegistrationForm {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("registration-form")
            .p(px(40.))
            .gap_3()
            .bg(theme.background)
            .child(Label::new(WELCOME_HEADING).text_xl())
            .child(Label::new(USERNAME_PROMPT).text_color(theme.foreground.opacity(0.75)))
            .child(
                h_flex()
                    .gap(px(10.))
                    .items_center()
                    .child(div().w(px(280.)).child(Input::new(&self.username_input)))
                    .child(
                        Button::new("start-chat")
                            .primary()
                            .small()
                            .loading(self.submitted)
                            .child("Start Chat")
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.handle_start(cx);
                            })),
                    ),
            )
    }
}
