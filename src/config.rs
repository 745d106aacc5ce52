//! Layered configuration.
//!
//! Priority, highest first: CLI flag, the flag's env var, `TUTOR_*` env vars
//! (`__` separates sections, e.g. `TUTOR_SERVER__PORT=8000`), the config file,
//! built-in defaults. The config file comes from `--config`/`CONFIG_FILE`, or
//! `./config.yaml` when present.

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::ui::ExplanationMarkup;
use crate::widget::{DEFAULT_PLACEHOLDER, DEFAULT_WELCOME};

/// Env var prefix for config keys.
pub const ENV_PREFIX: &str = "TUTOR";
/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Ask endpoint of the tutor backend when run locally.
pub const DEFAULT_ASK_URL: &str = "http://127.0.0.1:5001/api/ask";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// URL of the backend ask endpoint
    #[arg(long, env = "ASK_URL")]
    pub ask_url: Option<String>,

    /// How explanation markup from the backend is rendered
    #[arg(long, env = "EXPLANATION_MARKUP", value_enum)]
    pub explanation_markup: Option<ExplanationMarkup>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub ask_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub placeholder: String,
    pub welcome_message: String,
    pub explanation_markup: ExplanationMarkup,
    /// Idle minutes before a session is dropped.
    pub session_idle_minutes: u64,
}

impl WidgetConfig {
    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                static_dir: "static".to_string(),
            },
            backend: BackendConfig {
                ask_url: DEFAULT_ASK_URL.to_string(),
            },
            widget: WidgetConfig {
                placeholder: DEFAULT_PLACEHOLDER.to_string(),
                welcome_message: DEFAULT_WELCOME.to_string(),
                explanation_markup: ExplanationMarkup::Restricted,
                session_idle_minutes: 30,
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Message(e.to_string()))?;
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.static_dir", defaults.server.static_dir)?
            .set_default("backend.ask_url", defaults.backend.ask_url)?
            .set_default("widget.placeholder", defaults.widget.placeholder)?
            .set_default("widget.welcome_message", defaults.widget.welcome_message)?
            .set_default(
                "widget.explanation_markup",
                defaults.widget.explanation_markup.as_str(),
            )?
            .set_default(
                "widget.session_idle_minutes",
                defaults.widget.session_idle_minutes,
            )?;

        match &cli.config {
            Some(path) => builder = builder.add_source(File::from(Path::new(path))),
            None => {
                builder =
                    builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.ask_url {
            builder = builder.set_override("backend.ask_url", url)?;
        }
        if let Some(markup) = cli.explanation_markup {
            builder = builder.set_override("widget.explanation_markup", markup.as_str())?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "exam-prep-chat",
            "--port",
            "8080",
            "--explanation-markup",
            "raw",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.explanation_markup, Some(ExplanationMarkup::Raw));
    }

    #[test]
    fn test_idle_timeout() {
        let config = AppConfig::default();
        assert_eq!(
            config.widget.session_idle_timeout(),
            Duration::from_secs(30 * 60)
        );
    }
}
