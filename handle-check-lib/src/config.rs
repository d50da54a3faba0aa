//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and environment
//! variables, and merging the layers with proper precedence rules. CLI
//! arguments (applied by the binary) sit above everything here.

use crate::error::HandleCheckError;
use crate::probes::PlatformSpec;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 25
/// timeout = "5s"
/// length = 3
/// output = "common_usernames.txt"
///
/// [[platforms]]
/// name = "github"
/// url_template = "https://github.com/{handle}"
/// available_status = 404
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Ordered platform probe set; replaces the built-in catalog when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<PlatformSpec>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default number of verifier workers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-probe timeout (as string, e.g. "5s", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default handle length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Default enumeration alphabet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,

    /// Default output file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Default bounded-queue capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, HandleCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HandleCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HandleCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            HandleCheckError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them,
    /// higher-precedence files winning field by field.
    pub fn discover_and_load(&self) -> Result<FileConfig, HandleCheckError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // 1. Load XDG config (lowest precedence)
        if let Some(xdg_path) = self.get_xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(xdg_path);
            }
        }

        // 2. Load global config
        if let Some(global_path) = self.get_global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(global_path);
            }
        }

        // 3. Load local config (highest precedence)
        if let Some(local_path) = self.get_local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "overridden"
                };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./handle-check.toml", "./.handle-check.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".handle-check.toml", "handle-check.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("handle-check").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` take precedence.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.length.is_some() {
                        lower_defaults.length = higher_defaults.length;
                    }
                    if higher_defaults.alphabet.is_some() {
                        lower_defaults.alphabet = higher_defaults.alphabet;
                    }
                    if higher_defaults.output.is_some() {
                        lower_defaults.output = higher_defaults.output;
                    }
                    if higher_defaults.queue_capacity.is_some() {
                        lower_defaults.queue_capacity = higher_defaults.queue_capacity;
                    }
                    Some(lower_defaults)
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
            // A platform list is replaced wholesale, not merged entry-wise:
            // probe order is part of the policy and splicing lists would
            // scramble it.
            platforms: higher.platforms.or(lower.platforms),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), HandleCheckError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(HandleCheckError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(HandleCheckError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(length) = defaults.length {
                if length == 0 {
                    return Err(HandleCheckError::config("Handle length must be at least 1"));
                }
            }

            if let Some(alphabet) = &defaults.alphabet {
                if alphabet.is_empty() {
                    return Err(HandleCheckError::config("Alphabet cannot be empty"));
                }
            }

            if let Some(capacity) = defaults.queue_capacity {
                if capacity == 0 {
                    return Err(HandleCheckError::config(
                        "Queue capacity must be at least 1",
                    ));
                }
            }
        }

        if let Some(platforms) = &config.platforms {
            if platforms.is_empty() {
                return Err(HandleCheckError::config(
                    "Platform list cannot be empty when specified",
                ));
            }
            for spec in platforms {
                spec.validate()?;
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// These are the values that can be set via HC_* environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub length: Option<u32>,
    pub alphabet: Option<String>,
    pub output: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from environment variables.
///
/// Parses the HC_* environment variables and returns a structured
/// configuration. Invalid values are logged as warnings (when verbose) and
/// ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // HC_CONCURRENCY - concurrent verifier workers
    if let Ok(val) = env::var("HC_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if concurrency > 0 && concurrency <= 100 => {
                env_config.concurrency = Some(concurrency);
                if verbose {
                    println!("Using HC_CONCURRENCY={}", concurrency);
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid HC_CONCURRENCY='{}', must be 1-100", val);
                }
            }
        }
    }

    // HC_TIMEOUT - per-probe timeout
    if let Ok(timeout_str) = env::var("HC_TIMEOUT") {
        if parse_timeout_string(&timeout_str).is_some() {
            env_config.timeout = Some(timeout_str.clone());
            if verbose {
                println!("Using HC_TIMEOUT={}", timeout_str);
            }
        } else if verbose {
            eprintln!(
                "Invalid HC_TIMEOUT='{}', use format like '5s', '30s', '2m'",
                timeout_str
            );
        }
    }

    // HC_LENGTH - handle length
    if let Ok(val) = env::var("HC_LENGTH") {
        match val.parse::<u32>() {
            Ok(length) if length > 0 => {
                env_config.length = Some(length);
                if verbose {
                    println!("Using HC_LENGTH={}", length);
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid HC_LENGTH='{}', must be a positive integer", val);
                }
            }
        }
    }

    // HC_ALPHABET - enumeration alphabet
    if let Ok(alphabet) = env::var("HC_ALPHABET") {
        if !alphabet.trim().is_empty() {
            env_config.alphabet = Some(alphabet.clone());
            if verbose {
                println!("Using HC_ALPHABET={}", alphabet);
            }
        }
    }

    // HC_OUTPUT - output file path
    if let Ok(output) = env::var("HC_OUTPUT") {
        if !output.trim().is_empty() {
            env_config.output = Some(output.clone());
            if verbose {
                println!("Using HC_OUTPUT={}", output);
            }
        }
    }

    // HC_CONFIG - explicit config file
    if let Ok(config_path) = env::var("HC_CONFIG") {
        if !config_path.trim().is_empty() {
            env_config.config = Some(config_path.clone());
            if verbose {
                println!("Using HC_CONFIG={}", config_path);
            }
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// Returns the number of seconds, or `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if timeout_str.ends_with('s') {
        timeout_str
            .strip_suffix('s')
            .and_then(|s| s.parse::<u64>().ok())
    } else if timeout_str.ends_with('m') {
        timeout_str
            .strip_suffix('m')
            .and_then(|s| s.parse::<u64>().ok())
            .map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[defaults]
concurrency = 25
length = 4
alphabet = "abcdef"
output = "found.txt"

[[platforms]]
name = "github"
url_template = "https://github.com/{handle}"

[[platforms]]
name = "gitlab"
url_template = "https://gitlab.com/{handle}"
available_status = 404
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.length, Some(4));
        assert_eq!(defaults.alphabet, Some("abcdef".to_string()));
        assert_eq!(defaults.output, Some("found.txt".to_string()));

        let platforms = config.platforms.unwrap();
        assert_eq!(platforms.len(), 2);
        assert_eq!(platforms[0].name, "github");
        assert_eq!(platforms[1].name, "gitlab");
    }

    #[test]
    fn test_invalid_concurrency() {
        let config_content = r#"
[defaults]
concurrency = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_platform_without_placeholder_rejected() {
        let config_content = r#"
[[platforms]]
name = "broken"
url_template = "https://example.com/profile"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_merge_configs_field_precedence() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                output: Some("low.txt".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.concurrency, Some(25)); // Higher wins
        assert_eq!(defaults.output, Some("low.txt".to_string())); // Lower preserved
    }

    #[test]
    fn test_merge_replaces_platform_list_wholesale() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            platforms: Some(vec![
                PlatformSpec::new("github", "https://github.com/{handle}"),
                PlatformSpec::new("twitter", "https://twitter.com/{handle}"),
            ]),
            ..Default::default()
        };

        let higher = FileConfig {
            platforms: Some(vec![PlatformSpec::new(
                "gitlab",
                "https://gitlab.com/{handle}",
            )]),
            ..Default::default()
        };

        let merged = manager.merge_configs(lower, higher);
        let platforms = merged.platforms.unwrap();
        assert_eq!(platforms.len(), 1);
        assert_eq!(platforms[0].name, "gitlab");
    }

    #[test]
    fn test_empty_platform_list_rejected() {
        let config_content = "platforms = []\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }
}
