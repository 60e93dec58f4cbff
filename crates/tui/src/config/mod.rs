use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Parser;
use insights::{
    DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_QUESTION_MODEL, DEFAULT_RECENT_TRANSACTIONS,
    GeminiConfig,
};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/fluxboard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gemini API key. Without it the insight screen reports a configuration
    /// error, unless `offline` is set.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub question_model: String,
    pub analysis_model: String,
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
    pub export_dir: PathBuf,
    pub export_prefix: String,
    /// Newest transactions included with a question.
    pub recent_transactions: usize,
    pub log_level: String,
    pub log_file: PathBuf,
    pub request_timeout_secs: u64,
    /// Serve canned insights instead of calling the model.
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            question_model: DEFAULT_QUESTION_MODEL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            timezone: "UTC".to_string(),
            export_dir: PathBuf::from("."),
            export_prefix: engine::DEFAULT_EXPORT_PREFIX.to_string(),
            recent_transactions: DEFAULT_RECENT_TRANSACTIONS,
            log_level: "info".to_string(),
            log_file: PathBuf::from("fluxboard.log"),
            request_timeout_secs: 60,
            offline: false,
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Setting(format!("unknown timezone: {}", self.timezone)))
    }

    /// Current calendar day in the configured zone, UTC if the zone is
    /// invalid.
    pub fn today(&self) -> NaiveDate {
        let now = chrono::Utc::now();
        match self.tz() {
            Ok(tz) => now.with_timezone(&tz).date_naive(),
            Err(_) => now.date_naive(),
        }
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_base_url.clone(),
            question_model: self.question_model.clone(),
            analysis_model: self.analysis_model.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "fluxboard", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the model API base URL.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Override the timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Directory CSV exports are written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Use canned insights instead of calling the model.
    #[arg(long)]
    offline: bool,
}

pub fn load() -> Result<AppConfig> {
    build(Args::parse())
}

fn build(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FLUXBOARD").try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if args.offline {
        settings.offline = true;
    }

    settings.tz()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<AppConfig> {
        let mut argv = vec!["fluxboard", "--config", "does/not/exist.toml"];
        argv.extend_from_slice(args);
        build(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults_apply_without_file() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.question_model, "gemini-3-flash-preview");
        assert_eq!(config.analysis_model, "gemini-3-pro-preview");
        assert_eq!(config.export_prefix, "fluxboard_transactions");
        assert_eq!(config.recent_transactions, 20);
    }

    #[test]
    fn cli_overrides_win() {
        let config = parse(&[
            "--timezone",
            "Europe/Rome",
            "--export-dir",
            "/tmp/exports",
            "--offline",
        ])
        .unwrap();
        assert_eq!(config.timezone, "Europe/Rome");
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert!(config.offline);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = parse(&["--timezone", "Mars/Olympus"]).unwrap_err();
        assert!(matches!(err, AppError::Setting(_)));
    }

    #[test]
    fn gemini_config_carries_models_and_timeout() {
        let config = AppConfig {
            api_key: Some("k".to_string()),
            request_timeout_secs: 5,
            ..AppConfig::default()
        };
        let gemini = config.gemini();
        assert_eq!(gemini.api_key.as_deref(), Some("k"));
        assert_eq!(gemini.timeout, Duration::from_secs(5));
    }
}
