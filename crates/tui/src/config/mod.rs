use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/iconbox.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            username: String::new(),
            download_dir: PathBuf::from("."),
            log_file: PathBuf::from("iconbox.log"),
            log_level: "info".to_string(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "iconbox", about = "Terminal client for the icon library service")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Pre-fill the login form (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Directory downloaded icons are written to.
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Log file path; the terminal itself is owned by the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

pub fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ICONBOX"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(download_dir) = args.download_dir {
        settings.download_dir = download_dir;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let args = Args::try_parse_from(["iconbox", "--config", "does/not/exist"]).unwrap();
        let settings = load_from(args).unwrap();
        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.request_timeout_secs, 15);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let args = Args::try_parse_from([
            "iconbox",
            "--config",
            "does/not/exist",
            "--base-url",
            "http://icons.local:8080",
            "--username",
            "admin",
            "--download-dir",
            "/tmp/icons",
        ])
        .unwrap();
        let settings = load_from(args).unwrap();
        assert_eq!(settings.base_url, "http://icons.local:8080");
        assert_eq!(settings.username, "admin");
        assert_eq!(settings.download_dir, PathBuf::from("/tmp/icons"));
    }
}
