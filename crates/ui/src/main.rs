use gpui::*;
use gpui_component::{Root, ThemeRegistry};

use gemini_chat::app::{ChatAppShell, Quit, default_themes_path};
use gemini_chat::settings::SettingsStore;
use gemini_chat_client::create_backend;

/// Application entry point.
///
/// Loads settings and the HTTP backend first, then bootstraps GPUI:
/// 1. Asset loading via gpui-component-assets
/// 2. tokio bridge for the HTTP client
/// 3. gpui-component initialization (required for Root and themes)
/// 4. Theme loading from ./themes, falling back to the configured mode
/// 5. Window creation with Root wrapper
fn main() {
    tracing_subscriber::fmt::init();

    let settings = SettingsStore::load().settings();
    let backend = match create_backend(settings.backend_config()) {
        Ok(backend) => backend,
        Err(error) => {
            tracing::error!("failed to create chat backend: {error}");
            std::process::exit(1);
        }
    };

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_tokio_bridge::init(cx);
        gpui_component::init(cx);

        let theme_settings = settings.clone();
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, move |cx| {
            theme_settings.apply_theme(None, cx);
            tracing::info!("Theme directory watch initialized");
        }) {
            tracing::warn!(
                "Failed to watch themes directory: {}. Using default themes.",
                err
            );
            settings.apply_theme(None, cx);
        }

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });
        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(720.), px(640.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("Gemini Chat".into()),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                        ..Default::default()
                    }),
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                cx.open_window(options, |window, cx| {
                    let shell = cx.new(|cx| ChatAppShell::new(backend, window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
