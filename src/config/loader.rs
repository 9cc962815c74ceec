//! Configuration loading functionality
//!
//! This module contains functions for loading and validating configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::debug;
use serde::Deserialize;
use serde_yaml::from_str;

use crate::utils::{expand_path, find_project_folder};

use super::model::Config;

/// Loads a configuration from a file
///
/// # Arguments
/// * `file` - Path to the configuration file
///
/// # Returns
/// * `Result<Config>` - The loaded configuration or an error
///
/// # Errors
/// Returns an error if the file cannot be read or if the configuration is invalid
pub fn load_config(file: PathBuf) -> Result<Config> {
    let config = parse_config_file(&file)?;
    config.validate(true)?;
    Ok(config)
}

/// Loads a configuration from a file without checking path existence
///
/// This is primarily used for testing.
pub fn load_config_for_testing(file: PathBuf) -> Result<Config> {
    let config = parse_config_file(&file)?;
    config.validate(false)?;
    Ok(config)
}

fn parse_config_file(file: &Path) -> Result<Config> {
    let file_content = fs::read(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let content_str = String::from_utf8(file_content).map_err(|e| {
        anyhow!(
            "Configuration file {} contains invalid UTF-8 characters: {}",
            file.display(),
            e
        )
    })?;

    // An empty document means "all defaults"
    if content_str.trim().is_empty() {
        return Ok(Config::default());
    }

    from_str(&content_str).map_err(|e| {
        anyhow!(
            "Failed to parse configuration file {}: {}\nPlease check the YAML syntax.",
            file.display(),
            e
        )
    })
}

/// Finds the configuration file to use
///
/// A path that exists is used as is; otherwise it is looked up in the
/// platform configuration directory.
///
/// # Errors
/// Returns an error if the configuration directory cannot be created
pub fn read_or_create(config: PathBuf) -> Result<PathBuf> {
    if config.exists() {
        Ok(config)
    } else {
        let folder = find_project_folder()?;
        Ok(folder.config_dir().join(config))
    }
}

/// Loads the configuration, falling back to defaults when no file exists
///
/// # Errors
/// Returns an error if an existing file cannot be read or is invalid
pub fn load_or_default(config: PathBuf) -> Result<Config> {
    let file = read_or_create(config)?;
    if file.is_file() {
        debug!("Loading configuration from {}", file.display());
        load_config(file)
    } else {
        debug!(
            "No configuration file at {}, using defaults",
            file.display()
        );
        Ok(Config::default())
    }
}

/// A path written either as a string or as a list of segments
#[derive(Deserialize)]
#[serde(untagged)]
enum PathSpec {
    Text(String),
    Segments(Vec<String>),
}

/// Deserializes an optional path from a string or an array of segments
///
/// `~` and environment variables are expanded.
pub fn deserialize_from_array_to_optional_pathbuf<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let written = Option::<PathSpec>::deserialize(deserializer)?;
    Ok(written.map(|written| {
        let path = match written {
            PathSpec::Text(text) => PathBuf::from(text),
            PathSpec::Segments(segments) => segments.iter().collect(),
        };
        expand_path(&path)
    }))
}
