//! Configuration data structures
//!
//! This module contains the data structures for configuration. Every section
//! and field is optional; missing values fall back to the adapter defaults.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_COMPRESS_PREFIX, DEFAULT_CROP_PREFIX, DEFAULT_DECOMPRESS_PREFIX,
    DEFAULT_NORMALIZE_PREFIX,
};
use crate::convert::ZeroVariance;
use crate::logging::LogLevel;

/// Configuration for the adapters
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Settings for `compress` and `decompress`
    pub compression: CompressionConfig,
    /// Settings for `crop`
    pub volume: VolumeConfig,
    /// Settings for `normalize`
    pub array: ArrayConfig,
    /// Settings for `rename`
    pub rename: RenameConfig,
    /// Log file name; empty or missing disables file logging
    pub log_file: Option<String>,
    /// Verbosity used when no `-v` flag is given (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: Option<String>,
}

/// Compression settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Prefix of decompressed files
    pub decompress_prefix: String,
    /// Prefix of compressed files
    pub compress_prefix: String,
    /// Directory outputs are written to instead of the input's directory
    #[serde(deserialize_with = "deserialize_from_array_to_optional_pathbuf")]
    pub output_directory: Option<PathBuf>,
    /// Whether `compress` deletes its input once done
    pub remove_original: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            decompress_prefix: DEFAULT_DECOMPRESS_PREFIX.to_string(),
            compress_prefix: DEFAULT_COMPRESS_PREFIX.to_string(),
            output_directory: None,
            remove_original: false,
        }
    }
}

/// Volume cropping settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VolumeConfig {
    /// Prefix of cropped volumes
    pub crop_prefix: String,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        VolumeConfig {
            crop_prefix: DEFAULT_CROP_PREFIX.to_string(),
        }
    }
}

/// Table normalisation settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Overwrite the input table
    pub in_place: bool,
    /// Prefix of the output table when not working in place
    pub prefix: String,
    /// Fail on zero-variance columns instead of writing `nan`
    pub reject_zero_variance: bool,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        ArrayConfig {
            in_place: true,
            prefix: DEFAULT_NORMALIZE_PREFIX.to_string(),
            reject_zero_variance: false,
        }
    }
}

impl ArrayConfig {
    /// The zero-variance policy this configuration asks for
    pub fn zero_variance(&self) -> ZeroVariance {
        if self.reject_zero_variance {
            ZeroVariance::Reject
        } else {
            ZeroVariance::Propagate
        }
    }
}

/// Rename settings
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    /// Whether an existing destination may be replaced
    pub overwrite: bool,
}

impl Config {
    /// Validates the configuration
    ///
    /// # Arguments
    /// * `check_paths` - Whether to check that configured directories exist
    ///
    /// # Errors
    /// Returns an error with a detailed message if validation fails
    pub fn validate(&self, check_paths: bool) -> Result<()> {
        if !self.array.in_place && self.array.prefix.is_empty() {
            return Err(anyhow!(
                "array.prefix is empty while array.in_place is false: {}",
                "the normalised table would overwrite its input."
            ));
        }

        if self.volume.crop_prefix.is_empty() {
            return Err(anyhow!(
                "volume.crop_prefix is empty: the cropped volume would overwrite its input."
            ));
        }

        if let Some(level) = &self.log_level {
            LogLevel::from_str(level).map_err(|e| anyhow!("log_level: {e}"))?;
        }

        if check_paths && let Some(directory) = &self.compression.output_directory {
            if !directory.exists() {
                return Err(anyhow!(
                    "Output directory does not exist: {}\n{}",
                    directory.display(),
                    "Please check the path and ensure it exists."
                ));
            }

            if !directory.is_dir() {
                return Err(anyhow!(
                    "Output path is not a directory: {}\n{}",
                    directory.display(),
                    "Please specify a valid directory path."
                ));
            }
        }

        Ok(())
    }
}

use super::loader::deserialize_from_array_to_optional_pathbuf;
