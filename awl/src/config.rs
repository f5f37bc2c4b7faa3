use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use awl_linker::{DEFAULT_LINK_CLASS, DEFAULT_MAX_LINKS, LinkerOptions};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::AwlError;

/// Default TOML configuration written by `awl init`.
const DEFAULT_CONFIG_TOML: &str = r#"# awl configuration

# Path to the keyword table, a JSON array of keyword rows.
keywords_path = "keywords.json"

# Directory holding stored HTML documents, scanned by `awl batch`.
content_dir = "content"

# Class attribute set on every inserted anchor.
link_class = "awl-link"

# Most links inserted into a single document.
max_links = 3

# Elements whose text never receives links, matched against any ancestor.
skip_tags = ["a", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6"]

# Batch runs only touch files untouched for at least this many days.
batch_min_age_days = 7

# Most files rewritten per batch run.
batch_limit = 20

# Worker threads for batch runs. Defaults to the CPU count.
#jobs = 4
"#;

/// Default JSON configuration written by `awl init --format json`.
const DEFAULT_CONFIG_JSON: &str = r#"{
  "keywords_path": "keywords.json",
  "content_dir": "content",
  "link_class": "awl-link",
  "max_links": 3,
  "skip_tags": ["a", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6"],
  "batch_min_age_days": 7,
  "batch_limit": 20
}
"#;

/// Configuration for the awl keyword linker.
///
/// [`Config`] holds the keyword table location, how inserted anchors look,
/// and the batch reprocessing policy. Fields are typically loaded from a
/// TOML or JSON config file; every field falls back to a sensible default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Path to the keyword table file.
  pub keywords_path: PathBuf,

  /// Directory holding stored HTML documents.
  pub content_dir: PathBuf,

  /// Class attribute set on inserted anchors.
  pub link_class: String,

  /// Most links inserted into a single document.
  pub max_links: usize,

  /// Elements whose text never receives links.
  pub skip_tags: Vec<String>,

  /// Batch runs only touch files untouched for at least this many days.
  pub batch_min_age_days: u16,

  /// Most files rewritten per batch run.
  pub batch_limit: usize,

  /// Number of threads to use for parallel processing.
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      keywords_path:      PathBuf::from("keywords.json"),
      content_dir:        PathBuf::from("content"),
      link_class:         DEFAULT_LINK_CLASS.to_string(),
      max_links:          DEFAULT_MAX_LINKS,
      skip_tags:          awl_linker::DEFAULT_SKIP_TAGS
        .iter()
        .map(std::string::ToString::to_string)
        .collect(),
      batch_min_age_days: 7,
      batch_limit:        20,
      jobs:               None,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AwlError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      AwlError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|e| {
              AwlError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|e| {
              AwlError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(AwlError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(AwlError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from an explicit path, a discovered file, or
  /// defaults, in that order of preference.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file exists but cannot be loaded.
  pub fn load(config_file: Option<&Path>) -> Result<Self, AwlError> {
    if let Some(path) = config_file {
      debug!("Loading configuration from {}", path.display());
      return Self::from_file(path);
    }

    if let Some(path) = Self::find_config_file() {
      info!("Using configuration file: {}", path.display());
      return Self::from_file(&path);
    }

    debug!("No configuration file found, using defaults");
    Ok(Self::default())
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "awl.toml",
          "awl.json",
          ".awl.toml",
          ".awl.json",
          ".config/awl.toml",
          ".config/awl.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["awl.toml", "awl.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir = PathBuf::from(home).join(".config").join("awl");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), AwlError> {
    let config_content = match format.to_lowercase().as_str() {
      "toml" => DEFAULT_CONFIG_TOML,
      "json" => DEFAULT_CONFIG_JSON,
      other => {
        return Err(AwlError::Config(format!(
          "Unsupported config format: {other}"
        )));
      },
    };

    fs::write(path, config_content).map_err(|e| {
      AwlError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Linker options derived from this configuration.
  #[must_use]
  pub fn linker_options(&self) -> LinkerOptions {
    LinkerOptions {
      link_class: self.link_class.clone(),
      max_links:  self.max_links,
      skip_tags:  self.skip_tags.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_default_config_values() {
    let config = Config::default();

    assert_eq!(config.keywords_path, PathBuf::from("keywords.json"));
    assert_eq!(config.content_dir, PathBuf::from("content"));
    assert_eq!(config.link_class, "awl-link");
    assert_eq!(config.max_links, 3);
    assert_eq!(config.batch_min_age_days, 7);
    assert_eq!(config.batch_limit, 20);
    assert_eq!(config.jobs, None);
    assert!(config.skip_tags.iter().any(|tag| tag == "blockquote"));
  }

  #[test]
  fn test_from_file_reads_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("awl.toml");
    fs::write(&path, "max_links = 5\nlink_class = \"promo\"\n").unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.max_links, 5);
    assert_eq!(config.link_class, "promo");
    // Unspecified fields keep their defaults
    assert_eq!(config.batch_limit, 20);
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("awl.yaml");
    fs::write(&path, "max_links: 5\n").unwrap();

    let result = Config::from_file(&path);
    assert!(matches!(result, Err(AwlError::Config(_))));
  }

  #[test]
  fn test_generated_toml_template_matches_defaults() {
    let generated: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
    let defaults = Config::default();

    assert_eq!(generated.keywords_path, defaults.keywords_path);
    assert_eq!(generated.content_dir, defaults.content_dir);
    assert_eq!(generated.link_class, defaults.link_class);
    assert_eq!(generated.max_links, defaults.max_links);
    assert_eq!(generated.skip_tags, defaults.skip_tags);
    assert_eq!(generated.batch_min_age_days, defaults.batch_min_age_days);
    assert_eq!(generated.batch_limit, defaults.batch_limit);
  }

  #[test]
  fn test_generated_json_template_matches_defaults() {
    let generated: Config = serde_json::from_str(DEFAULT_CONFIG_JSON).unwrap();
    let defaults = Config::default();

    assert_eq!(generated.max_links, defaults.max_links);
    assert_eq!(generated.skip_tags, defaults.skip_tags);
    assert_eq!(generated.batch_limit, defaults.batch_limit);
  }

  #[test]
  fn test_linker_options_reflect_config() {
    let mut config = Config::default();
    config.link_class = "sponsored".to_string();
    config.max_links = 1;
    config.skip_tags = vec!["a".to_string(), "pre".to_string()];

    let options = config.linker_options();

    assert_eq!(options.link_class, "sponsored");
    assert_eq!(options.max_links, 1);
    assert_eq!(options.skip_tags, vec!["a", "pre"]);
  }
}
