use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DomainPatternError, Result};
use crate::pattern::SymbolAlphabet;

const CONFIG_FILE: &str = "domain-pattern.toml";

pub const DEFAULT_INPUT_DIR: &str = "domain-scan-results-combined";
pub const DEFAULT_OUTPUT_DIR: &str = "domain-check";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# domain-pattern configuration file
# Location: <base-dir>/domain-pattern.toml

[discovery]
# Directory holding the scan result lists (relative to base dir)
input_dir = "domain-scan-results-combined"
# Directory receiving one subdirectory per source (relative to base dir)
output_dir = "domain-check"

# Lists classified when domain-pattern runs without --input/--output.
# by_status = true also groups the list by its status column into <subdir>/by-status
[[discovery.sources]]
file = "registered_domains_all.txt"
subdir = "registered"

[[discovery.sources]]
file = "available_domains_all.txt"
subdir = "available"

[[discovery.sources]]
file = "special_status_domains_all.txt"
subdir = "special"
by_status = true

[pattern]
# Symbols for distinct characters: "literal" (A, B, ... continuing past Z
# into [ \ ] ^ _ ` a b ...) or "alphanumeric" (A-Z, a-z, 0-9)
alphabet = "literal"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub pattern: PatternConfig,
}

/// Where auto-discovery looks for lists and writes results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

/// One well-known input list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// File name under `discovery.input_dir`
    pub file: String,
    /// Subdirectory under `discovery.output_dir`
    pub subdir: String,
    /// Also group by the status column
    #[serde(default)]
    pub by_status: bool,
}

impl SourceConfig {
    pub fn new(file: &str, subdir: &str, by_status: bool) -> Self {
        Self {
            file: file.to_string(),
            subdir: subdir.to_string(),
            by_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PatternConfig {
    #[serde(default)]
    pub alphabet: SymbolAlphabet,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("registered_domains_all.txt", "registered", false),
        SourceConfig::new("available_domains_all.txt", "available", false),
        SourceConfig::new("special_status_domains_all.txt", "special", true),
    ]
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            sources: default_sources(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| DomainPatternError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content =
            toml::to_string_pretty(self).map_err(|e| DomainPatternError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "discovery.input_dir" => Some(self.discovery.input_dir.display().to_string()),
            "discovery.output_dir" => Some(self.discovery.output_dir.display().to_string()),
            "pattern.alphabet" => Some(self.pattern.alphabet.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "discovery.input_dir" => {
                self.discovery.input_dir = parse_dir(key, value)?;
                Ok(())
            }
            "discovery.output_dir" => {
                self.discovery.output_dir = parse_dir(key, value)?;
                Ok(())
            }
            "pattern.alphabet" => {
                self.pattern.alphabet = value.parse()?;
                Ok(())
            }
            _ => Err(DomainPatternError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["discovery.input_dir", "discovery.output_dir", "pattern.alphabet"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

fn parse_dir(key: &str, value: &str) -> Result<PathBuf> {
    let trimmed = value.trim().trim_matches('"').trim_matches('\'');
    if trimmed.is_empty() {
        return Err(DomainPatternError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(PathBuf::from(trimmed))
}
