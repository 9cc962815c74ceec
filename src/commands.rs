//! Command dispatch
//!
//! Turns parsed command-line arguments plus the loaded configuration into a
//! call to one of the adapters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use log::debug;

use crate::config::Config;
use crate::convert::{
    ArrayOutput, NormalizeOptions, ZeroVariance, crop_volume_with, normalize_array_with,
};
use crate::file_ops::{compress_file, decompress_files, rename_file};
use crate::utils::{expand_patterns, file_name};

/// Runs the subcommand in `matches`
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - The files produced, in input order
///
/// # Errors
/// * Returns an error if the adapter fails or the subcommand is unknown
pub fn run_command(matches: &ArgMatches, config: &Config) -> Result<Vec<PathBuf>> {
    let (name, arguments) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No command given"))?;
    debug!("Running command: {name}");

    match name {
        "decompress" => decompress(arguments, config),
        "compress" => compress(arguments, config).map(|path| vec![path]),
        "normalize" => normalize(arguments, config).map(|path| vec![path]),
        "crop" => crop(arguments, config).map(|path| vec![path]),
        "rename" => rename(arguments, config).map(|path| vec![path]),
        other => Err(anyhow!("Unknown command: {other}")),
    }
}

fn required_path(arguments: &ArgMatches, id: &str) -> Result<PathBuf> {
    arguments
        .get_one::<String>(id)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing argument: {id}"))
}

fn output_directory(arguments: &ArgMatches, config: &Config) -> Option<PathBuf> {
    arguments
        .get_one::<String>("output_directory")
        .map(PathBuf::from)
        .or_else(|| config.compression.output_directory.clone())
}

fn prefix<'a>(arguments: &'a ArgMatches, configured: &'a str) -> &'a str {
    arguments
        .get_one::<String>("prefix")
        .map(String::as_str)
        .unwrap_or(configured)
}

fn decompress(arguments: &ArgMatches, config: &Config) -> Result<Vec<PathBuf>> {
    let patterns: Vec<String> = arguments
        .get_many::<String>("files")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let files = expand_patterns(&patterns);
    let directory = output_directory(arguments, config);

    decompress_files(
        &files,
        prefix(arguments, &config.compression.decompress_prefix),
        directory.as_deref(),
    )
    .context("Decompression failed")
}

fn compress(arguments: &ArgMatches, config: &Config) -> Result<PathBuf> {
    let file = required_path(arguments, "file")?;
    let directory = output_directory(arguments, config);
    let remove_original =
        arguments.get_flag("remove_original") || config.compression.remove_original;

    compress_file(
        &file,
        prefix(arguments, &config.compression.compress_prefix),
        directory.as_deref(),
        remove_original,
    )
    .with_context(|| format!("Compression of {} failed", file.display()))
}

fn normalize(arguments: &ArgMatches, config: &Config) -> Result<PathBuf> {
    let file = required_path(arguments, "file")?;

    let output = if let Some(path) = arguments.get_one::<String>("output") {
        ArrayOutput::Path(PathBuf::from(path))
    } else if arguments.get_flag("in_place") || config.array.in_place {
        ArrayOutput::InPlace
    } else {
        ArrayOutput::Prefixed(config.array.prefix.clone())
    };

    let zero_variance = if arguments.get_flag("reject_zero_variance") {
        ZeroVariance::Reject
    } else {
        config.array.zero_variance()
    };

    let options = NormalizeOptions {
        output,
        zero_variance,
    };
    normalize_array_with(&file, &options)
        .with_context(|| format!("Normalisation of {} failed", file.display()))
}

fn crop(arguments: &ArgMatches, config: &Config) -> Result<PathBuf> {
    let file = required_path(arguments, "file")?;
    let frames = *arguments
        .get_one::<usize>("frames")
        .ok_or_else(|| anyhow!("Missing argument: frames"))?;

    crop_volume_with(&file, frames, &config.volume.crop_prefix)
        .with_context(|| format!("Cropping of {} failed", file.display()))
}

fn rename(arguments: &ArgMatches, config: &Config) -> Result<PathBuf> {
    let source = required_path(arguments, "source")?;
    let destination = required_path(arguments, "destination")?;
    let overwrite = arguments.get_flag("overwrite") || config.rename.overwrite;

    rename_file(&source, &resolve_destination(&source, &destination)?, overwrite)
        .with_context(|| format!("Renaming of {} failed", source.display()))
}

/// A destination that is an existing directory receives the file under its own name
fn resolve_destination(source: &Path, destination: &Path) -> Result<PathBuf> {
    if destination.is_dir() {
        Ok(destination.join(file_name(source)?))
    } else {
        Ok(destination.to_path_buf())
    }
}
