//! Configuration for the `derma` front end.
//!
//! Priority: CLI args > environment > TOML config file > defaults.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use derma_analysis::AnalysisConfig;
use derma_detection::{DetectionConfig, DiseaseCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "derma.toml";
pub const DEFAULT_LOG_FILTER: &str =
    "derma=info,derma_cli=info,derma_detection=info,derma_analysis=info,derma_onnx_loader=info";

/// Key shipped in sample `.env` files; never a real credential.
const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";
const MIN_API_KEY_LEN: usize = 20;

#[derive(Parser, Debug, Clone)]
#[command(name = "derma")]
#[command(about = "Skin-condition detection with layered fallbacks and educational analysis")]
#[command(version)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH, env = "DERMA_CONFIG")]
    pub config: PathBuf,

    /// ONNX classifier artifact
    #[arg(long, env = "DERMA_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Condition catalog (JSON)
    #[arg(long, env = "DERMA_CATALOG_PATH")]
    pub catalog_path: Option<PathBuf>,

    /// Hosted detection endpoint used when the local model is unavailable
    #[arg(long, env = "DERMA_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Disable the hosted detection fallback
    #[arg(long)]
    pub no_remote: bool,

    /// Analysis service credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Analysis service API root
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Analysis model name
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// Log filter (tracing EnvFilter syntax)
    #[arg(long, default_value = DEFAULT_LOG_FILTER, env = "RUST_LOG")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Classify an image and print the result as JSON
    Analyze {
        /// PNG or JPEG image
        image: PathBuf,

        /// Skip the detailed analysis text
        #[arg(long)]
        no_analysis: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List the conditions the classifier can report
    Diseases,
    /// Validate configuration and report problems
    CheckConfig,
    /// Generate analysis text for a fixed sample condition
    TestAnalysis {
        #[arg(long)]
        pretty: bool,
    },
}

/// Full application configuration (merged from all sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load configuration from CLI args and the optional config file.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = if args.config.exists() {
            Self::from_file(&args.config)
                .with_context(|| format!("Failed to load config from {:?}", args.config))?
        } else {
            tracing::debug!(path = ?args.config, "No config file, using defaults");
            Self::default()
        };

        if let Some(ref path) = args.model_path {
            config.detection.model_path = path.clone();
        }
        if let Some(ref path) = args.catalog_path {
            config.detection.catalog_path = path.clone();
        }
        if let Some(ref url) = args.remote_url {
            config.detection.remote_url = Some(url.clone());
        }
        if args.no_remote {
            config.detection.remote_url = None;
        }
        if let Some(ref key) = args.api_key {
            config.analysis.api_key = Some(key.clone());
        }
        if let Some(ref base_url) = args.base_url {
            config.analysis.base_url = base_url.clone();
        }
        if let Some(ref model) = args.model {
            config.analysis.model = model.clone();
        }

        Ok(config.normalized())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config.normalized())
    }

    /// TOML has no null; an empty `remote_url` switches the fallback off.
    fn normalized(mut self) -> Self {
        if self
            .detection
            .remote_url
            .as_deref()
            .map_or(false, |url| url.trim().is_empty())
        {
            self.detection.remote_url = None;
        }
        self
    }

    /// Check the settings without touching the network.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match self.analysis.api_key.as_deref().map(str::trim) {
            None | Some("") => issues.push(ConfigIssue::warning(
                "OPENAI_API_KEY is not set; canned analysis text will be used",
            )),
            Some(PLACEHOLDER_API_KEY) => issues.push(ConfigIssue::warning(
                "OPENAI_API_KEY is still the placeholder value",
            )),
            Some(key) if key.len() < MIN_API_KEY_LEN => issues.push(ConfigIssue::warning(
                "OPENAI_API_KEY looks too short to be valid",
            )),
            Some(_) => {}
        }
        if self.analysis.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error("OPENAI_BASE_URL is blank"));
        }
        if self.analysis.model.trim().is_empty() {
            issues.push(ConfigIssue::error("OPENAI_MODEL is blank"));
        }

        if !self.detection.model_path.exists() {
            issues.push(ConfigIssue::warning(format!(
                "Model file {:?} not found; hosted detection fallback will be used",
                self.detection.model_path
            )));
        }
        match &self.detection.remote_url {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                issues.push(ConfigIssue::error(format!(
                    "Remote detection URL {:?} is not an http(s) URL",
                    url
                )));
            }
            None if !self.detection.model_path.exists() => issues.push(ConfigIssue::warning(
                "No local model and no remote fallback; every detection will be Unknown/Normal",
            )),
            _ => {}
        }

        if let Err(e) = DiseaseCatalog::load(&self.detection.catalog_path) {
            issues.push(ConfigIssue::error(e.to_string()));
        }

        issues
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_subcommands() {
        let args = parse(&["derma", "analyze", "lesion.jpg", "--no-analysis"]);
        assert_eq!(
            args.command,
            Command::Analyze {
                image: PathBuf::from("lesion.jpg"),
                no_analysis: true,
                pretty: false,
            }
        );
        assert_eq!(parse(&["derma", "diseases"]).command, Command::Diseases);
        assert_eq!(parse(&["derma", "check-config"]).command, Command::CheckConfig);
        assert!(CliArgs::try_parse_from(["derma"]).is_err());
    }

    #[test]
    fn test_toml_sections_merge_with_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [detection]
            catalog_path = "data/skindisease.json"
            remote_url = ""

            [analysis]
            model = "openai/gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.detection.catalog_path, PathBuf::from("data/skindisease.json"));
        assert_eq!(config.detection.remote_url, None);
        assert_eq!(config.detection.input_name, "input_1");
        assert_eq!(config.analysis.model, "openai/gpt-4o-mini");
        assert_eq!(config.analysis.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.analysis.max_tokens, 2000);
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert!(AppConfig::from_toml_str("[analysis]\nmax_tokens = \"many\"").is_err());
    }

    #[test]
    fn test_api_key_checks() {
        let mut config = AppConfig::default();
        let key_issues = |config: &AppConfig| {
            config
                .validate()
                .into_iter()
                .filter(|issue| issue.message.contains("OPENAI_API_KEY"))
                .count()
        };

        assert_eq!(key_issues(&config), 1);
        config.analysis.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert_eq!(key_issues(&config), 1);
        config.analysis.api_key = Some("sk-short".to_string());
        assert_eq!(key_issues(&config), 1);
        config.analysis.api_key = Some("sk-or-v1-0123456789abcdef0123".to_string());
        assert_eq!(key_issues(&config), 0);
    }

    #[test]
    fn test_default_log_filter_covers_every_crate() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in ["derma_cli", "derma_detection", "derma_analysis", "derma_onnx_loader"] {
            assert!(
                DEFAULT_LOG_FILTER.contains(&format!("{}=info", target)),
                "missing {}",
                target
            );
        }
    }

    #[test]
    fn test_blank_model_name_is_error() {
        let mut config = AppConfig::default();
        config.analysis.model = "  ".to_string();
        assert!(config
            .validate()
            .iter()
            .any(|issue| issue.is_error() && issue.message.contains("OPENAI_MODEL")));
    }
}
