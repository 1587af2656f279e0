use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use react_agent::oracle::OpperConfig;
use react_agent::runner::ControllerConfig;
use react_agent::tools::{DEFAULT_MAX_DIFF_CHARS, GITHUB_API_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub oracle: OracleConfig,
    pub agent: AgentLoopConfig,
    pub github: GithubConfig,
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: Option<String>,
    /// Zero disables the transport timeout
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: OpperConfig::default().base_url,
            model: None,
            timeout_ms: 0,
        }
    }
}

impl OracleConfig {
    pub fn to_opper_config(&self) -> OpperConfig {
        OpperConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout: millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLoopConfig {
    pub max_steps: u32,
    /// Zero disables the per-tool deadline
    pub tool_timeout_ms: u64,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_steps: ControllerConfig::default().max_steps,
            tool_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub max_diff_chars: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: GITHUB_API_URL.to_string(),
            max_diff_chars: DEFAULT_MAX_DIFF_CHARS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub jsonl_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            oracle: OracleConfig::default(),
            agent: AgentLoopConfig::default(),
            github: GithubConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Controller settings, with an optional step budget override from the command line
    pub fn controller_config(&self, max_steps: Option<u32>) -> ControllerConfig {
        ControllerConfig {
            max_steps: max_steps.unwrap_or(self.agent.max_steps),
            oracle_timeout: millis(self.oracle.timeout_ms),
            tool_timeout: millis(self.agent.tool_timeout_ms),
        }
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.agent.max_steps, 15);
        assert_eq!(config.github.max_diff_chars, 50_000);
        assert!(config.trace.jsonl_path.is_none());

        let controller = config.controller_config(None);
        assert!(controller.oracle_timeout.is_none());
        assert!(controller.tool_timeout.is_none());
    }

    #[test]
    fn test_load_explicit_file_with_partial_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "oracle:\n  model: gpt-4o\n  timeout_ms: 30000\nagent:\n  max_steps: 4\ntrace:\n  jsonl_path: /tmp/trace.jsonl"
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.oracle.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.oracle.base_url, "https://api.opper.ai/v2");
        assert_eq!(config.agent.max_steps, 4);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.trace.jsonl_path, Some(PathBuf::from("/tmp/trace.jsonl")));

        let opper = config.oracle.to_opper_config();
        assert_eq!(opper.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = PathBuf::from("/nonexistent/react-agent.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_max_steps_override() {
        let config = Config::default();
        assert_eq!(config.controller_config(Some(3)).max_steps, 3);
        assert_eq!(config.controller_config(None).max_steps, 15);
    }
}
