use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Grading endpoint. Optional at startup; grading fails with a config error without it.
    pub gemini_api_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub staging_dir: PathBuf,
    pub pdftotext_bin: PathBuf,
    pub soffice_bin: PathBuf,
    pub tool_timeout: Duration,
    pub grading_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_url: optional_env("GEMINI_API_URL"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            staging_dir: optional_env("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            pdftotext_bin: optional_env("PDFTOTEXT_BIN")
                .unwrap_or_else(|| "pdftotext".to_string())
                .into(),
            soffice_bin: optional_env("SOFFICE_BIN")
                .unwrap_or_else(|| "libreoffice".to_string())
                .into(),
            tool_timeout: Duration::from_secs(parse_env("TOOL_TIMEOUT_SECS", 60)?),
            grading_timeout: Duration::from_secs(parse_env("GRADING_TIMEOUT_SECS", 120)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
