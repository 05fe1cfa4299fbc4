#![deny(unsafe_code)]

/// Desktop chat client for the Gemini chat backend, built with GPUI and gpui-component.
///
/// The shell hosts a single chat view: a username form until registration settles, then
/// the transcript and draft input.
pub mod app;
/// Chat session state, transcript and views.
pub mod chat;
/// Settings loading.
pub mod settings;
