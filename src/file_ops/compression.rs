//! Gzip compression and decompression
//!
//! Files are classified by extension only. A recognised gzip file is
//! decompressed next to (or away from) its source under a prefixed name; any
//! other file is compressed the same way. Calls that would not change the
//! format hand the input path back untouched.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::{debug, error, info};

use crate::constants::GZIP_EXTENSION;
use crate::errors::{Error, Result, file_operation_error, format_error};
use crate::utils::{
    ensure_file, file_name, file_stem, prefixed_path, publish_atomically,
    resolve_output_directory,
};

/// Format of a file as told by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// `.gz`, a single gzip member
    Gzip,
    /// Anything else, treated as plain content
    Unrecognized,
}

impl CompressionFormat {
    /// Classifies `path` by its last extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(GZIP_EXTENSION) => CompressionFormat::Gzip,
            _ => CompressionFormat::Unrecognized,
        }
    }

    /// Returns true when the format is a recognised compressed one
    pub fn is_compressed(&self) -> bool {
        matches!(self, CompressionFormat::Gzip)
    }
}

/// Path `decompress_file` writes to: `{output_directory}/{prefix}{stem}`
///
/// Returns `None` for a file that is not gzip, since nothing would be written.
pub fn decompressed_path(
    fname: &Path,
    prefix: &str,
    output_directory: &Path,
) -> Result<Option<PathBuf>> {
    match CompressionFormat::from_path(fname) {
        CompressionFormat::Gzip => Ok(Some(prefixed_path(
            output_directory,
            prefix,
            file_stem(fname)?,
        ))),
        CompressionFormat::Unrecognized => Ok(None),
    }
}

/// Path `compress_file` writes to: `{output_directory}/{prefix}{name}.gz`
///
/// Returns `None` for a file that is already gzip.
pub fn compressed_path(
    fname: &Path,
    prefix: &str,
    output_directory: &Path,
) -> Result<Option<PathBuf>> {
    match CompressionFormat::from_path(fname) {
        CompressionFormat::Gzip => Ok(None),
        CompressionFormat::Unrecognized => Ok(Some(prefixed_path(
            output_directory,
            prefix,
            &format!("{}.{GZIP_EXTENSION}", file_name(fname)?),
        ))),
    }
}

/// Decompresses a gzip file
///
/// The output is written to `output_directory` (the directory of `fname` by
/// default) and named after `fname` without its `.gz` extension, prefixed
/// with `prefix`. A file without the `.gz` extension is returned as is.
///
/// # Errors
/// * `Validation` when `fname` is not a file or `output_directory` is not a directory
/// * `Format` when the content is not a valid gzip stream
/// * `FileOperation` when reading or writing fails
pub fn decompress_file(
    fname: &Path,
    prefix: &str,
    output_directory: Option<&Path>,
) -> Result<PathBuf> {
    ensure_file(fname)?;
    let output_directory = resolve_output_directory(fname, output_directory)?;

    let Some(target) = decompressed_path(fname, prefix, &output_directory)? else {
        debug!("Not a gzip file, passing through: {}", fname.display());
        return Ok(fname.to_path_buf());
    };

    debug!(
        "Decompressing file: {} -> {}",
        fname.display(),
        target.display()
    );

    let source =
        File::open(fname).map_err(|e| file_operation_error(e, fname.to_path_buf(), "open"))?;
    let mut decoder = GzDecoder::new(BufReader::new(source));

    publish_atomically(&target, |output| {
        io::copy(&mut decoder, output).map_err(|e| stream_error(e, fname, "decompress"))?;
        Ok(())
    })?;

    info!("Decompressed {} into {}", fname.display(), target.display());
    Ok(target)
}

/// Decompresses every file of `fnames` in order
///
/// The returned list matches `fnames` item for item. The first failure stops
/// the batch; files already produced for earlier items are left on disk.
///
/// # Errors
/// * Any error of [`decompress_file`], for the first failing item
pub fn decompress_files(
    fnames: &[PathBuf],
    prefix: &str,
    output_directory: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::with_capacity(fnames.len());
    for (index, fname) in fnames.iter().enumerate() {
        let output = decompress_file(fname, prefix, output_directory).inspect_err(|e| {
            error!(
                "Batch decompression stopped at item {index} ({}): {e}",
                fname.display()
            );
        })?;
        outputs.push(output);
    }
    Ok(outputs)
}

/// Compresses a file into gzip
///
/// The output is written to `output_directory` (the directory of `fname` by
/// default) as `{prefix}{name}.gz`. A `.gz` file is returned as is and never
/// removed. With `remove_original`, the source is deleted once the
/// compressed file has been completely written.
///
/// # Errors
/// * `Validation` when `fname` is not a file or `output_directory` is not a directory
/// * `FileOperation` when reading, writing or removing fails
pub fn compress_file(
    fname: &Path,
    prefix: &str,
    output_directory: Option<&Path>,
    remove_original: bool,
) -> Result<PathBuf> {
    ensure_file(fname)?;
    let output_directory = resolve_output_directory(fname, output_directory)?;

    let Some(target) = compressed_path(fname, prefix, &output_directory)? else {
        debug!("Already a gzip file, passing through: {}", fname.display());
        return Ok(fname.to_path_buf());
    };

    debug!(
        "Compressing file: {} -> {}",
        fname.display(),
        target.display()
    );

    let source =
        File::open(fname).map_err(|e| file_operation_error(e, fname.to_path_buf(), "open"))?;
    let mut reader = BufReader::new(source);

    publish_atomically(&target, |output| {
        let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
        copy_attributed(&mut reader, &mut encoder, fname, &target)?;
        encoder
            .finish()
            .and_then(|mut writer| writer.flush())
            .map_err(|e| file_operation_error(e, target.clone(), "write"))?;
        Ok(())
    })?;

    info!("Compressed {} into {}", fname.display(), target.display());

    if remove_original {
        fs::remove_file(fname)
            .map_err(|e| file_operation_error(e, fname.to_path_buf(), "remove"))?;
        debug!("Removed original file: {}", fname.display());
    }

    Ok(target)
}

/// Copies `reader` into `writer`, blaming read failures on `source` and
/// write failures on `target`
fn copy_attributed<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    source: &Path,
    target: &Path,
) -> Result<u64> {
    let mut buffer = [0u8; 64 * 1024];
    let mut copied = 0;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(copied),
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(file_operation_error(e, source.to_path_buf(), "read")),
        };
        writer
            .write_all(&buffer[..read])
            .map_err(|e| file_operation_error(e, target.to_path_buf(), "write"))?;
        copied += read as u64;
    }
}

/// Tells corrupt gzip content apart from failing I/O
fn stream_error(err: io::Error, path: &Path, operation: &str) -> Error {
    match err.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            format_error(path.to_path_buf(), &format!("not a valid gzip stream ({err})"))
        }
        _ => file_operation_error(err, path.to_path_buf(), operation),
    }
}
