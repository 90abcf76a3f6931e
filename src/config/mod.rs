use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::selector::SelectionPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Caption provider settings
    pub provider: ProviderConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Pause before each request to YouTube, in milliseconds
    pub request_delay_ms: u64,

    /// HTTP timeout per request, in seconds
    pub timeout_secs: u64,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// Optional User-Agent override
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preferred transcript languages, most preferred first
    pub languages: Vec<String>,

    /// Directory transcripts are written to (current directory if unset)
    pub output_dir: Option<PathBuf>,

    /// Default output format
    pub format: OutputFormat,

    /// Tie-break between manual and generated tracks of the same language
    pub selection_policy: SelectionPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 500,
            timeout_secs: 30,
            accept_language: "en-US".to_string(),
            user_agent: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            output_dir: None,
            format: OutputFormat::Text,
            selection_policy: SelectionPolicy::PreferManual,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. At the default location a missing file is created with
    /// default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let config_path = Self::config_path()?;
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        let config = Self::default();
        if let Err(e) = config.save_to(&config_path) {
            tracing::warn!("Could not write default config to {}: {:#}", config_path.display(), e);
        }
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcriber").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.languages.is_empty() {
            anyhow::bail!("At least one preferred language must be configured");
        }

        if self.app.languages.iter().any(|lang| lang.trim().is_empty()) {
            anyhow::bail!("Language codes must not be empty");
        }

        if self.provider.timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Directory transcripts are written to
    pub fn output_dir(&self) -> PathBuf {
        self.app.output_dir.clone().unwrap_or_default()
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Languages: {}", self.app.languages.join(", "));
        match &self.app.output_dir {
            Some(dir) => println!("  Output Directory: {}", dir.display()),
            None => println!("  Output Directory: (current directory)"),
        }
        println!("  Format: {}", self.app.format);
        println!("  Selection Policy: {:?}", self.app.selection_policy);
        println!("  Request Delay: {}ms", self.provider.request_delay_ms);
        println!("  Timeout: {}s", self.provider.timeout_secs);
        println!("  Accept-Language: {}", self.provider.accept_language);
        if let Some(agent) = &self.provider.user_agent {
            println!("  User-Agent: {}", agent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.app.languages, vec!["en"]);
        assert_eq!(config.app.selection_policy, SelectionPolicy::PreferManual);
        assert_eq!(config.output_dir(), PathBuf::new());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "app:\n  languages: [de, en]\n  format: json\n  selection_policy: provider_order\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.app.languages, vec!["de", "en"]);
        assert_eq!(config.app.format, OutputFormat::Json);
        assert_eq!(config.app.selection_policy, SelectionPolicy::ProviderOrder);
        assert_eq!(config.provider.timeout_secs, 30);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.app.languages.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.app.languages = vec![" ".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.provider.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.app.output_dir = Some(PathBuf::from("transcripts"));
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.app.output_dir, Some(PathBuf::from("transcripts")));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.yaml"))).is_err());
    }
}
