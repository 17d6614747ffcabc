//! Configuration loading and validation.
//!
//! Configuration is read once at startup from an optional TOML file layered
//! with `JTOOLS__*` environment variables (e.g. `JTOOLS__SERVER__PORT=9000`),
//! validated, and then shared read-only.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{find_tool, ToolStatus};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Operator-maintained state of one tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ToolConfig {
    #[serde(default)]
    pub status: ToolStatus,

    /// Shown to users when the tool is not fully available
    pub reason: Option<String>,

    /// Human readable update cadence of the tool's data, e.g. "每天 12:30"
    pub data_update_freq: Option<String>,

    /// Data source name -> URL
    #[serde(default)]
    pub data_source: BTreeMap<String, String>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    /// Keyed by tool slug (any ASCII case); tools without an entry are `normal`.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            tools: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (may be missing) and the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, None)
    }

    fn build(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("JTOOLS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if let Some(slug) = self.tools.keys().find(|slug| find_tool(slug).is_none()) {
            return Err(ConfigError::Validation(format!("Unknown tool: {}", slug)));
        }

        Ok(())
    }

    /// Operator state of a tool; the default when not configured.
    pub fn tool(&self, slug: &str) -> ToolConfig {
        self.tools
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(slug))
            .map(|(_, tool)| tool.clone())
            .unwrap_or_default()
    }

    /// Registry slugs of configured tools in the given status.
    pub fn tools_with_status(&self, status: ToolStatus) -> Vec<&'static str> {
        self.tools
            .iter()
            .filter(|(_, tool)| tool.status == status)
            .filter_map(|(slug, _)| find_tool(slug).map(|t| t.slug))
            .collect()
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(config.tools.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::build(&dir.path().join("absent.toml"), Some(HashMap::new())).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_tools_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
data_dir = "/srv/jtools"

[server]
port = 9000

[tools.lottery-analyzer]
status = "downgraded"
reason = "数据源维护中"
data_update_freq = "每 10 分钟"

[tools.lottery-analyzer.data_source]
"简书大转盘" = "https://www.jianshu.com/mobile/lottery"
"#,
        );

        let config = AppConfig::build(&path, Some(HashMap::new())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/jtools"));
        assert_eq!(config.server.port, 9000);

        let tool = config.tool("lottery-analyzer");
        assert_eq!(tool.status, ToolStatus::Downgraded);
        assert_eq!(tool.reason.as_deref(), Some("数据源维护中"));
        assert_eq!(tool.data_source.len(), 1);
        assert_eq!(config.tools_with_status(ToolStatus::Downgraded), vec!["lottery-analyzer"]);

        assert_eq!(config.tool("on-rank-article-viewer"), ToolConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[server]\nport = 9000\n");

        let env = HashMap::from([
            ("JTOOLS__SERVER__PORT".to_string(), "9100".to_string()),
            ("JTOOLS__LOG_LEVEL".to_string(), "debug".to_string()),
        ]);
        let config = AppConfig::build(&path, Some(env)).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_tool() {
        let mut config = AppConfig::default();
        config
            .tools
            .insert("article-wordcloud-generator".to_string(), ToolConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_to_toml_roundtrips() {
        let mut config = AppConfig::default();
        config.tools.insert(
            "LP-recommend-checker".to_string(),
            ToolConfig {
                status: ToolStatus::Unavailable,
                ..Default::default()
            },
        );

        let rendered = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.tool("LP-recommend-checker").status, ToolStatus::Unavailable);
    }
}
