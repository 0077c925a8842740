use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main parley configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub model: ModelConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Bug history file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Gemini model name
    pub name: String,
    pub api_base: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bug_history.json"),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: 120,
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

        Ok(Self::load_chain(
            std::env::var_os("PARLEY_CONFIG").map(PathBuf::from),
            std::env::var_os("PARLEY_DIR").map(PathBuf::from),
            dirs::config_dir(),
            Path::new("."),
        ))
    }

    /// First loadable of PARLEY_CONFIG, $PARLEY_DIR/parley.yaml,
    /// <config_dir>/parley/parley.yaml and <cwd>/parley.yaml
    fn load_chain(
        env_config: Option<PathBuf>,
        parley_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
        cwd: &Path,
    ) -> Self {
        // Check PARLEY_CONFIG env var
        if let Some(path) = env_config
            && path.exists()
        {
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => log::warn!("Failed to load config from PARLEY_CONFIG: {}", e),
            }
        }

        // Try PARLEY_DIR/parley.yaml
        if let Some(dir) = parley_dir {
            let path = dir.join("parley.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        // Try ~/.config/parley/parley.yaml
        if let Some(dir) = config_dir {
            let path = dir.join("parley").join("parley.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        // Try ./parley.yaml (for development)
        let local_config = cwd.join("parley.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return config,
                Err(e) => log::warn!("Failed to load local config: {}", e),
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Self::default()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory searched for .env
    pub fn parley_dir() -> PathBuf {
        std::env::var("PARLEY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("parley"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Bug history path, with `override_path` taking precedence
    pub fn store_path(&self, override_path: Option<&PathBuf>) -> PathBuf {
        Self::expand_path(override_path.unwrap_or(&self.store.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.path, PathBuf::from("bug_history.json"));
        assert_eq!(config.model.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("model:\n  name: gemini-pro\nlog_level: debug\n").unwrap();
        assert_eq!(config.model.name, "gemini-pro");
        assert_eq!(config.model.timeout_secs, 120);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.store.path, PathBuf::from("bug_history.json"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "store:\n  path: /tmp/bugs.json\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/tmp/bugs.json"));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/parley.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }

    fn write_config(dir: &Path, store: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("parley.yaml"), format!("store:\n  path: {}\n", store)).unwrap();
    }

    #[test]
    fn test_chain_falls_back_to_config_dir() {
        let home = TempDir::new().unwrap();
        let parley_dir = home.path().join("empty");
        fs::create_dir_all(&parley_dir).unwrap();
        let config_dir = home.path().join("xdg");
        write_config(&config_dir.join("parley"), "/from/config_dir.json");

        let config = Config::load_chain(None, Some(parley_dir), Some(config_dir), home.path());
        assert_eq!(config.store.path, PathBuf::from("/from/config_dir.json"));
    }

    #[test]
    fn test_chain_order() {
        let home = TempDir::new().unwrap();
        let env_file = home.path().join("env.yaml");
        fs::write(&env_file, "store:\n  path: /from/env.json\n").unwrap();
        let parley_dir = home.path().join("parley_dir");
        write_config(&parley_dir, "/from/parley_dir.json");
        let config_dir = home.path().join("xdg");
        write_config(&config_dir.join("parley"), "/from/config_dir.json");
        let cwd = home.path().join("cwd");
        write_config(&cwd, "/from/cwd.json");

        let load = |env: bool, pd: bool, cd: bool| {
            Config::load_chain(
                env.then(|| env_file.clone()),
                pd.then(|| parley_dir.clone()),
                cd.then(|| config_dir.clone()),
                &cwd,
            )
            .store
            .path
        };
        assert_eq!(load(true, true, true), PathBuf::from("/from/env.json"));
        assert_eq!(load(false, true, true), PathBuf::from("/from/parley_dir.json"));
        assert_eq!(load(false, false, true), PathBuf::from("/from/config_dir.json"));
        assert_eq!(load(false, false, false), PathBuf::from("/from/cwd.json"));
    }

    #[test]
    fn test_chain_skips_broken_file() {
        let home = TempDir::new().unwrap();
        let parley_dir = home.path().join("parley_dir");
        fs::create_dir_all(&parley_dir).unwrap();
        fs::write(parley_dir.join("parley.yaml"), "log_level: loud\n").unwrap();
        let config_dir = home.path().join("xdg");
        write_config(&config_dir.join("parley"), "/from/config_dir.json");

        let config = Config::load_chain(None, Some(parley_dir), Some(config_dir), home.path());
        assert_eq!(config.store.path, PathBuf::from("/from/config_dir.json"));
    }

    #[test]
    fn test_chain_defaults_when_nothing_found() {
        let home = TempDir::new().unwrap();
        let config = Config::load_chain(Some(home.path().join("missing.yaml")), None, None, home.path());
        assert_eq!(config.store.path, PathBuf::from("bug_history.json"));
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/bin");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test");
        let expanded = Config::expand_path(&path);
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().contains("test"));
    }

    #[test]
    fn test_store_path_override_wins() {
        let config = Config::default();
        let override_path = PathBuf::from("/data/other.json");
        assert_eq!(config.store_path(Some(&override_path)), override_path);
        assert_eq!(config.store_path(None), PathBuf::from("bug_history.json"));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.as_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Off.as_filter(), log::LevelFilter::Off);
    }
}
