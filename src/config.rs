//! Configuration system for Pipelinr.
//!
//! Loaded from .pipelinr.yml or ~/.config/pipelinr/pipelinr.yml, with
//! environment-variable overrides applied after file load so a deployment
//! can point pipelines at a different API without editing config files.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default LLM model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default per-request catalog timeout in milliseconds.
pub const DEFAULT_CATALOG_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration for Pipelinr.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelinrConfig {
    /// Product catalog settings.
    pub catalog: CatalogConfig,

    /// LLM completion settings.
    pub llm: LlmConfig,

    /// Filter pipeline settings.
    pub filter: FilterConfig,
}

impl PipelinrConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .pipelinr.yml in current directory
    /// 3. ~/.config/pipelinr/pipelinr.yml
    /// 4. Defaults
    ///
    /// Environment overrides (BASE_API_URL, PRODUCT_API_KEY, SPACE_API_URL,
    /// SPACE_API_KEY) are applied after the file is loaded.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))?
        } else {
            Self::load_from_search_paths()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_search_paths() -> Self {
        // Try project config
        let project_config = PathBuf::from(".pipelinr.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .pipelinr.yml");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to load .pipelinr.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pipelinr").join("pipelinr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Self::default()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BASE_API_URL")
            && !url.is_empty()
        {
            self.catalog.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("PRODUCT_API_KEY")
            && !key.is_empty()
        {
            self.catalog.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("SPACE_API_URL")
            && !url.is_empty()
        {
            self.filter.space_api_url = Some(url);
        }
        if let Ok(key) = std::env::var("SPACE_API_KEY")
            && !key.is_empty()
        {
            self.filter.space_api_key = Some(key);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.timeout_ms == 0 {
            eyre::bail!("catalog.timeout-ms must be > 0");
        }
        if self.llm.timeout_ms == 0 {
            eyre::bail!("llm.timeout-ms must be > 0");
        }
        if self.llm.max_tokens == 0 {
            eyre::bail!("llm.max-tokens must be > 0");
        }
        if self.filter.timeout_ms == 0 {
            eyre::bail!("filter.timeout-ms must be > 0");
        }
        Ok(())
    }
}

/// Product catalog API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Base API URL; product IDs are appended to it. Retrieval is skipped
    /// entirely when unset.
    pub base_url: Option<String>,

    /// Optional bearer credential for the catalog API.
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Product IDs fetched when the caller does not supply any.
    pub product_ids: Vec<u32>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_ms: DEFAULT_CATALOG_TIMEOUT_MS,
            product_ids: vec![1, 2],
        }
    }
}

/// LLM completion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LlmConfig {
    /// Model used for the completion call.
    pub model: String,

    /// Max tokens for the assistant reply.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Timeout per completion call in milliseconds.
    pub timeout_ms: u64,

    /// Override for the completion API base URL.
    pub api_base: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_ms: 300_000,
            api_base: None,
        }
    }
}

/// Filter pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Roles allowed for data retrieval.
    pub target_user_roles: Vec<String>,

    /// Space listings API URL.
    pub space_api_url: Option<String>,

    /// Optional API key passed to the space API.
    pub space_api_key: Option<String>,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            target_user_roles: vec!["admin".to_string(), "user".to_string()],
            space_api_url: None,
            space_api_key: None,
            timeout_ms: DEFAULT_CATALOG_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelinrConfig::default();
        assert!(config.catalog.base_url.is_none());
        assert_eq!(config.catalog.timeout_ms, 5_000);
        assert_eq!(config.catalog.product_ids, vec![1, 2]);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.filter.target_user_roles, vec!["admin", "user"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
catalog:
  base-url: "https://catalog.example/data/"
  timeout-ms: 2500
  product-ids: [4, 5, 6]
llm:
  model: "gpt-4"
  max-tokens: 1024
filter:
  target-user-roles: ["admin"]
"#
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = PipelinrConfig::load(Some(&path)).unwrap();
        assert_eq!(config.catalog.base_url.as_deref(), Some("https://catalog.example/data/"));
        assert_eq!(config.catalog.timeout_ms, 2500);
        assert_eq!(config.catalog.product_ids, vec![4, 5, 6]);
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.filter.target_user_roles, vec!["admin"]);
        // Unspecified sections keep defaults
        assert_eq!(config.llm.timeout_ms, 300_000);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/pipelinr.yml");
        assert!(PipelinrConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_env_override_api_key() {
        // SAFETY: test sets and removes a variable no other test reads
        unsafe {
            std::env::set_var("PRODUCT_API_KEY", "test-credential");
        }

        let mut config = PipelinrConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.catalog.api_key.as_deref(), Some("test-credential"));

        // SAFETY: restoring the environment to its original state
        unsafe {
            std::env::remove_var("PRODUCT_API_KEY");
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = PipelinrConfig::default();
        config.catalog.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = PipelinrConfig::default();
        config.llm.max_tokens = 0;
        assert!(config.validate().is_err());
    }
}
