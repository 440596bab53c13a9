use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CheckError;
use crate::format::{OPENTSDB_LINE, OutputFormat};

pub const PLUGIN_NAME: &str = "sensu-cluster-metrics";
pub const DEFAULT_URL: &str = "http://localhost:8080/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Command line for the check. Every flag with an `env` also reads that variable.
#[derive(Debug, Default, Parser)]
#[command(name = PLUGIN_NAME)]
#[command(about = "Sensu cluster metrics using GraphQL", long_about = None)]
#[command(version)]
pub struct CheckArgs {
    /// URL of the Sensu backend GraphQL endpoint [default: http://localhost:8080/graphql]
    #[arg(short = 'u', long, env = "CLUSTER_URL")]
    pub url: Option<String>,

    /// Sensu API key (prefer CLUSTER_API_KEY in production)
    #[arg(short = 'k', long, env = "CLUSTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Metrics output format: opentsdb_line or prometheus_text [default: opentsdb_line]
    #[arg(long, env = "CLUSTER_OUTPUT_FORMAT")]
    pub output_format: Option<String>,

    /// Skip TLS certificate verification (not recommended!)
    #[arg(long)]
    pub skip_insecure_verify: bool,

    /// PEM bundle of CAs trusted for the backend certificate
    #[arg(short = 't', long, env = "CLUSTER_TRUSTED_CA_FILE")]
    pub trusted_ca_file: Option<PathBuf>,

    /// HTTP request timeout in seconds [default: 15]
    #[arg(long = "timeout", env = "CLUSTER_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Exit WARNING when any cluster reports a fetch or forward error
    #[arg(long)]
    pub warn_on_cluster_error: bool,

    /// Optional TOML file with the same settings
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

/// Settings read from the optional TOML file. Flags and env take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub output_format: Option<String>,
    #[serde(default)]
    pub skip_insecure_verify: bool,
    pub trusted_ca_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub warn_on_cluster_error: bool,
}

impl FileConfig {
    /// Load from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CheckError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config: FileConfig = toml::from_str(&contents)
            .map_err(|e| CheckError::InvalidConfig(format!("{}: {e}", path.display())))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// Resolved settings for one run.
#[derive(Clone)]
pub struct CheckConfig {
    pub url: String,
    pub api_key: String,
    pub output_format: OutputFormat,
    pub skip_verify: bool,
    pub trusted_ca_file: Option<PathBuf>,
    pub timeout: Duration,
    pub warn_on_cluster_error: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: String::new(),
            output_format: OutputFormat::default(),
            skip_verify: false,
            trusted_ca_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            warn_on_cluster_error: false,
        }
    }
}

impl fmt::Debug for CheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckConfig")
            .field("url", &self.url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("output_format", &self.output_format)
            .field("skip_verify", &self.skip_verify)
            .field("trusted_ca_file", &self.trusted_ca_file)
            .field("timeout", &self.timeout)
            .field("warn_on_cluster_error", &self.warn_on_cluster_error)
            .finish()
    }
}

impl CheckConfig {
    /// Merge defaults, the optional config file, then env/flags.
    pub fn resolve(args: CheckArgs) -> Result<Self, CheckError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    pub fn merge(args: CheckArgs, file: FileConfig) -> Self {
        let defaults = Self::default();
        let selector = args
            .output_format
            .or(file.output_format)
            .unwrap_or_else(|| OPENTSDB_LINE.to_string());

        Self {
            url: args.url.or(file.url).unwrap_or(defaults.url),
            api_key: args.api_key.or(file.api_key).unwrap_or(defaults.api_key),
            output_format: OutputFormat::from_selector(&selector),
            skip_verify: args.skip_insecure_verify || file.skip_insecure_verify,
            trusted_ca_file: args.trusted_ca_file.or(file.trusted_ca_file),
            timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            warn_on_cluster_error: args.warn_on_cluster_error || file.warn_on_cluster_error,
        }
    }

    /// Required settings, checked before any network call.
    pub fn validate(&self) -> Result<(), CheckError> {
        if self.url.is_empty() {
            return Err(CheckError::MissingUrl);
        }
        if self.api_key.is_empty() {
            return Err(CheckError::MissingApiKey);
        }
        // reqwest treats a zero timeout as "expire immediately"
        if self.timeout.is_zero() {
            return Err(CheckError::InvalidConfig(
                "timeout must be greater than 0 seconds".to_string(),
            ));
        }
        Ok(())
    }
}
