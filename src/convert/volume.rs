//! Cropping of 4D NIfTI volumes
//!
//! The leading frames along the fourth axis are dropped. The spatial grid
//! and every header field other than the dimensions and the scaling are
//! carried over to the new file. Unscaled volumes keep their voxel type;
//! volumes with a `scl_slope`/`scl_inter` pair are written as floats holding
//! the scaled values, since the writer always stores slope 1 and intercept 0.

use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::{Ix4, s};
use nifti::error::NiftiError;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};

use crate::constants::DEFAULT_CROP_PREFIX;
use crate::errors::{Error, Result, file_operation_error, format_error, validation_error};
use crate::utils::{ensure_file, file_name, prefixed_path, publish_atomically};

/// Path a cropped volume is written to: same directory, prefixed name
pub fn cropped_path(filepath: &Path, prefix: &str) -> Result<PathBuf> {
    let directory = filepath.parent().unwrap_or(Path::new(""));
    Ok(prefixed_path(directory, prefix, file_name(filepath)?))
}

/// Removes the first `n` frames of a 4D volume
///
/// The result is written next to `filepath` with a `d` prefix.
pub fn crop_volume(filepath: &Path, n: usize) -> Result<PathBuf> {
    crop_volume_with(filepath, n, DEFAULT_CROP_PREFIX)
}

/// Removes the first `n` frames of a 4D volume, naming the output with `prefix`
///
/// # Errors
/// * `Validation` when `filepath` is not a file or `n` leaves no frame
/// * `Format` when the file is not a 4D NIfTI volume of a supported voxel type
/// * `FileOperation` when reading or writing fails
pub fn crop_volume_with(filepath: &Path, n: usize, prefix: &str) -> Result<PathBuf> {
    ensure_file(filepath)?;
    let outfile = cropped_path(filepath, prefix)?;

    let object = ReaderOptions::new()
        .read_file(filepath)
        .map_err(|e| nifti_error(e, filepath))?;

    let header = object.header().clone();
    let frames = frame_count(&header, filepath)?;
    if n >= frames {
        return Err(validation_error(&format!(
            "Cannot remove {n} frame(s) from '{}', which has {frames}.",
            filepath.display()
        )));
    }

    let data_type = header
        .data_type()
        .map_err(|e| nifti_error(e, filepath))?;
    let voxel_type = output_type(&header, data_type);
    debug!(
        "Cropping {} ({frames} frames of {data_type:?}, written as {voxel_type:?}) -> {}",
        filepath.display(),
        outfile.display()
    );

    let volume = object.into_volume();

    macro_rules! crop_as {
        ($voxel:ty) => {{
            let data = volume
                .into_ndarray::<$voxel>()
                .map_err(|e| nifti_error(e, filepath))?
                .into_dimensionality::<Ix4>()
                .map_err(|e| format_error(filepath.to_path_buf(), &e.to_string()))?;
            let cropped = data.slice(s![.., .., .., n..]).to_owned();
            write_volume(&outfile, |path| {
                WriterOptions::new(path)
                    .reference_header(&header)
                    .write_nifti(&cropped)
            })
        }};
    }

    match voxel_type {
        NiftiType::Uint8 => crop_as!(u8),
        NiftiType::Int8 => crop_as!(i8),
        NiftiType::Uint16 => crop_as!(u16),
        NiftiType::Int16 => crop_as!(i16),
        NiftiType::Uint32 => crop_as!(u32),
        NiftiType::Int32 => crop_as!(i32),
        NiftiType::Uint64 => crop_as!(u64),
        NiftiType::Int64 => crop_as!(i64),
        NiftiType::Float32 => crop_as!(f32),
        NiftiType::Float64 => crop_as!(f64),
        other => Err(format_error(
            filepath.to_path_buf(),
            &format!("unsupported voxel type {other:?}"),
        )),
    }?;

    info!(
        "Cropped {n} frame(s) from {} into {}",
        filepath.display(),
        outfile.display()
    );
    Ok(outfile)
}

/// Whether reading applies a non-identity `scl_slope`/`scl_inter`
///
/// A zero slope means the volume is not scaled.
fn is_scaled(header: &NiftiHeader) -> bool {
    header.scl_slope != 0.0 && (header.scl_slope != 1.0 || header.scl_inter != 0.0)
}

/// Voxel type the cropped volume is written with
///
/// Scaled integers become floats wide enough for their scaled values.
fn output_type(header: &NiftiHeader, data_type: NiftiType) -> NiftiType {
    if !is_scaled(header) {
        return data_type;
    }
    match data_type {
        NiftiType::Uint8 | NiftiType::Int8 | NiftiType::Uint16 | NiftiType::Int16 => {
            NiftiType::Float32
        }
        NiftiType::Uint32
        | NiftiType::Int32
        | NiftiType::Uint64
        | NiftiType::Int64
        | NiftiType::Float64 => NiftiType::Float64,
        other => other,
    }
}

/// Number of frames along the fourth axis
fn frame_count(header: &NiftiHeader, filepath: &Path) -> Result<usize> {
    if header.dim[0] != 4 {
        return Err(format_error(
            filepath.to_path_buf(),
            &format!("expected a 4D volume, found {} dimension(s)", header.dim[0]),
        ));
    }
    Ok(usize::from(header.dim[4]))
}

/// Writes a volume, through a temporary file for single-file NIfTI
///
/// Header/image pairs are written in place since they span two files.
fn write_volume<F>(outfile: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::result::Result<(), NiftiError>,
{
    let name = file_name(outfile)?;
    if name.ends_with(".nii") || name.ends_with(".nii.gz") {
        publish_atomically(outfile, |temporary| {
            write(temporary.path()).map_err(|e| nifti_error(e, outfile))
        })
    } else {
        write(outfile).map_err(|e| nifti_error(e, outfile))
    }
}

fn nifti_error(err: NiftiError, path: &Path) -> Error {
    match err {
        NiftiError::Io(source) => file_operation_error(source, path.to_path_buf(), "access"),
        other => format_error(path.to_path_buf(), &other.to_string()),
    }
}
