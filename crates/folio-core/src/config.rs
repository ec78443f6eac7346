//! Configuration management for folio.
//!
//! Loads configuration from ${FOLIO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::blog::{LoadOptions, PipelineOptions, PostSource, SortMode};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for folio configuration.
    //!
    //! FOLIO_HOME resolution order:
    //! 1. FOLIO_HOME environment variable (if set)
    //! 2. ~/.config/folio (default)
    //! 3. ./.folio when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the folio home directory.
    pub fn folio_home() -> PathBuf {
        if let Ok(home) = std::env::var("FOLIO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".folio"),
            |h| h.join(".config").join("folio"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        folio_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default post index location (URL or path)
    pub posts_source: Option<String>,

    /// Category filter also matches tags
    pub match_tags: bool,

    /// Initial sort order
    pub default_sort: SortMode,

    /// Base path or URL for post pages
    pub posts_base: String,

    /// HTTP timeout for the post index in seconds (0 disables)
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            posts_source: None,
            match_tags: true,
            default_sort: SortMode::DateDesc,
            posts_base: Self::DEFAULT_POSTS_BASE.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    const DEFAULT_POSTS_BASE: &str = "./posts";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the post index source: explicit override first, then config.
    pub fn resolve_source(&self, override_source: Option<&str>) -> Option<PostSource> {
        fn non_blank(raw: &str) -> Option<&str> {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        override_source
            .and_then(non_blank)
            .or_else(|| self.posts_source.as_deref().and_then(non_blank))
            .map(PostSource::parse)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::with_timeout_secs(self.request_timeout_secs)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            match_tags: self.match_tags,
            default_sort: self.default_sort,
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for comments and overwrites its values
    /// with those of `Config::default()`. Unset options stay commented out.
    ///
    /// # Errors
    /// Returns an error if the defaults or the template fail to serialize/parse.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        // Config is flat, so each generated key overwrites the template value
        // in place and keeps its comment.
        for (key, item) in generated_doc.iter() {
            doc[key] = item.clone();
        }

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
