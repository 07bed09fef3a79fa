//! Server configuration, loaded from environment variables at startup and
//! optionally overridden from the command line.

use clap::Parser;
use serde::Serialize;

/// Runtime configuration for reportchat-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8501"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://reportchat.db?mode=rwc"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for a daily-rolling log file in addition to stdout.
    pub log_dir: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_api_docs: bool,

    pub ai: AiConfig,

    pub branding: AppBranding,
}

/// OpenAI-compatible chat-completions endpoint used for reports and answers.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL without the trailing `/chat/completions`.
    pub base_url: String,
    /// Bearer token; `None` leaves the AI collaborator unconfigured.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

/// Static page chrome: title, icon, logo and welcome copy.
#[derive(Debug, Clone, Serialize)]
pub struct AppBranding {
    pub name: String,
    pub tagline: String,
    pub description: String,
    /// Emoji or URL used as the favicon.
    pub icon: String,
    /// Image URL shown on the welcome screen and in the sidebar.
    pub logo: String,
}

impl Default for AppBranding {
    fn default() -> Self {
        Self {
            name: "ReportChat".into(),
            tagline: "Turn your data into a report, then ask it anything.".into(),
            description: "AI-assisted analysis reports".into(),
            icon: "📊".into(),
            logo: "/static/logo.svg".into(),
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = AppBranding::default();
        Self {
            bind_address: env_or("REPORTCHAT_BIND", "0.0.0.0:8501"),
            database_url: env_or("REPORTCHAT_DATABASE_URL", "sqlite://reportchat.db?mode=rwc"),
            log_level: env_or("REPORTCHAT_LOG", "info"),
            log_json: env_flag("REPORTCHAT_LOG_JSON", false),
            log_dir: env_opt("REPORTCHAT_LOG_DIR"),
            enable_api_docs: env_flag("REPORTCHAT_ENABLE_API_DOCS", true),
            ai: AiConfig {
                base_url: env_or("REPORTCHAT_AI_BASE_URL", "https://api.openai.com/v1"),
                api_key: env_opt("REPORTCHAT_AI_API_KEY"),
                model: env_or("REPORTCHAT_AI_MODEL", "gpt-4o-mini"),
                timeout_secs: parse_env("REPORTCHAT_AI_TIMEOUT_SECS", 120),
            },
            branding: AppBranding {
                name: env_or("REPORTCHAT_APP_NAME", &defaults.name),
                tagline: env_or("REPORTCHAT_APP_TAGLINE", &defaults.tagline),
                description: env_or("REPORTCHAT_APP_DESCRIPTION", &defaults.description),
                icon: env_or("REPORTCHAT_APP_ICON", &defaults.icon),
                logo: env_or("REPORTCHAT_APP_LOGO", &defaults.logo),
            },
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(bind) = cli.bind {
            self.bind_address = bind;
        }
        if let Some(url) = cli.database_url {
            self.database_url = url;
        }
        if cli.log_json {
            self.log_json = true;
        }
        self
    }
}

/// Command-line flags. Anything not given keeps its environment value.
#[derive(Debug, Parser)]
#[command(name = "reportchat-server", version, about)]
pub struct Cli {
    /// Address to listen on, e.g. `127.0.0.1:8501`.
    #[arg(long)]
    pub bind: Option<String>,

    /// sqlx database URL.
    #[arg(long)]
    pub database_url: Option<String>,

    /// Emit JSON log lines.
    #[arg(long)]
    pub log_json: bool,
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
