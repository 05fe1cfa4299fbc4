use std::path::{Path, PathBuf};
use std::sync::Arc;

use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use gemini_chat_client::{BackendConfig, DEFAULT_BACKEND_URL};
use gpui::*;
use gpui_component::{Theme, ThemeMode, ThemeRegistry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "gemini-chat";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub theme_name: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            theme_mode: default_theme_mode(),
            theme_name: String::new(),
        }
    }
}

impl ClientSettings {
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new(&self.backend_url)
    }

    pub fn normalized(mut self) -> Self {
        self.backend_url = if self.backend_url.trim().is_empty() {
            default_backend_url()
        } else {
            self.backend_url.trim().to_string()
        };
        self.theme_name = self.theme_name.trim().to_string();
        self
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        if let Some(theme_config) = ThemeRegistry::global(cx)
            .themes()
            .get(&SharedString::from(self.theme_name.clone()))
            .cloned()
        {
            let mode = theme_config.mode;
            let theme = Theme::global_mut(cx);
            if mode.is_dark() {
                theme.dark_theme = theme_config;
            } else {
                theme.light_theme = theme_config;
            }
            Theme::change(mode, window, cx);
            return;
        }

        Theme::change(self.theme_mode, window, cx);
    }
}

/// Read-only settings loaded once at startup.
pub struct SettingsStore {
    settings: Arc<ClientSettings>,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".gemini-chat"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> Arc<ClientSettings> {
        self.settings.clone()
    }

    /// Layers the JSON file over defaults. Fails only when the file cannot be parsed.
    pub fn read(path: &Path) -> Result<ClientSettings, SettingsError> {
        Figment::from(Serialized::defaults(ClientSettings::default()))
            .merge(Json::file(path))
            .extract::<ClientSettings>()
            .map(ClientSettings::normalized)
            .context(ParseSettingsSnafu {
                stage: "extract-settings",
                path,
            })
    }

    fn load_from_disk(path: &Path) -> ClientSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return ClientSettings::default();
        }

        match Self::read(path) {
            Ok(settings) => {
                tracing::info!(
                    backend_url = %settings.backend_url,
                    "loaded settings from {:?}",
                    path
                );
                settings
            }
            Err(error) => {
                tracing::warn!("{error}. using defaults");
                ClientSettings::default()
            }
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to parse settings at {path:?} on `{stage}`: {source}"))]
    ParseSettings {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_local_backend() {
        Jail::expect_with(|jail| {
            let store = SettingsStore::new(jail.directory().join(SETTINGS_FILE_NAME));
            let settings = store.settings();

            assert_eq!(*settings, ClientSettings::default());
            assert_eq!(settings.backend_url, "http://127.0.0.1:5000");
            assert_eq!(
                settings.backend_config().endpoint("/chat"),
                "http://127.0.0.1:5000/chat"
            );
            Ok(())
        });
    }

    #[test]
    fn file_overrides_backend_and_theme() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE_NAME,
                r#"{ "backend_url": " http://chat.internal:8080/ ", "theme_mode": "Dark" }"#,
            )?;

            let store = SettingsStore::new(jail.directory().join(SETTINGS_FILE_NAME));
            let settings = store.settings();

            assert_eq!(settings.backend_url, "http://chat.internal:8080/");
            assert_eq!(settings.theme_mode, ThemeMode::Dark);
            assert_eq!(
                settings.backend_config().endpoint("register"),
                "http://chat.internal:8080/register"
            );
            Ok(())
        });
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE_NAME, r#"{ "theme_name": "  Ayu  " }"#)?;

            let settings = SettingsStore::read(&jail.directory().join(SETTINGS_FILE_NAME))
                .expect("partial settings parse");

            assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
            assert_eq!(settings.theme_mode, ThemeMode::Light);
            assert_eq!(settings.theme_name, "Ayu");
            Ok(())
        });
    }

    #[test]
    fn unparsable_file_is_reported_and_defaults_are_used() {
        Jail::expect_with(|jail| {
            jail.create_file(SETTINGS_FILE_NAME, r#"{ "backend_url": 42 "#)?;
            let path = jail.directory().join(SETTINGS_FILE_NAME);

            assert!(matches!(
                SettingsStore::read(&path),
                Err(SettingsError::ParseSettings { .. })
            ));
            assert_eq!(*SettingsStore::new(path).settings(), ClientSettings::default());
            Ok(())
        });
    }
}
