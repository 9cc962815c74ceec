//! Column standardisation of numeric text tables
//!
//! A table is a whitespace-delimited matrix, one row per line. Each column is
//! rescaled to zero mean and unit variance using population statistics, and
//! written back with a fixed number of decimals.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ndarray::{Array1, Array2, Axis};

use crate::constants::{DEFAULT_NORMALIZE_PREFIX, NORMALIZE_PRECISION};
use crate::errors::{Result, file_operation_error, format_error, validation_error};
use crate::utils::{ensure_file, file_name, prefixed_path, publish_atomically};

/// What to do with a column whose standard deviation is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroVariance {
    /// Divide anyway; the column becomes `nan`
    #[default]
    Propagate,
    /// Fail before anything is written
    Reject,
}

/// Where the standardised table goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayOutput {
    /// Overwrite the input table
    InPlace,
    /// Same directory, file name prefixed with the given string
    Prefixed(String),
    /// An explicit path
    Path(PathBuf),
}

impl Default for ArrayOutput {
    fn default() -> Self {
        ArrayOutput::Prefixed(DEFAULT_NORMALIZE_PREFIX.to_string())
    }
}

/// Options for [`normalize_array_with`]
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub output: ArrayOutput,
    pub zero_variance: ZeroVariance,
}

impl NormalizeOptions {
    /// Options that overwrite the input table
    pub fn in_place() -> Self {
        NormalizeOptions {
            output: ArrayOutput::InPlace,
            ..Default::default()
        }
    }
}

/// Standardises the columns of the table in `filepath`, overwriting it
///
/// This is destructive: the original values are lost. Use
/// [`normalize_array_with`] to keep the input.
pub fn normalize_array(filepath: &Path) -> Result<PathBuf> {
    normalize_array_with(filepath, &NormalizeOptions::in_place())
}

/// Standardises the columns of the table in `filepath`
///
/// # Returns
/// * `Result<PathBuf>` - The path the standardised table was written to
///
/// # Errors
/// * `Validation` when `filepath` is not a file, or when a column has zero
///   variance under [`ZeroVariance::Reject`]
/// * `Format` when the content is not a rectangular numeric table
/// * `FileOperation` when reading or writing fails
pub fn normalize_array_with(filepath: &Path, options: &NormalizeOptions) -> Result<PathBuf> {
    ensure_file(filepath)?;

    let outfile = match &options.output {
        ArrayOutput::InPlace => filepath.to_path_buf(),
        ArrayOutput::Prefixed(prefix) => {
            let directory = filepath.parent().unwrap_or(Path::new(""));
            prefixed_path(directory, prefix, file_name(filepath)?)
        }
        ArrayOutput::Path(path) => path.clone(),
    };

    let matrix = load_matrix(filepath)?;
    debug!(
        "Loaded {}x{} table from {}",
        matrix.nrows(),
        matrix.ncols(),
        filepath.display()
    );

    let (means, deviations) = column_statistics(&matrix);
    let flat = zero_variance_columns(&deviations);
    if !flat.is_empty() {
        match options.zero_variance {
            ZeroVariance::Reject => {
                return Err(validation_error(&format!(
                    "Column(s) {flat:?} of '{}' have zero variance.",
                    filepath.display()
                )));
            }
            ZeroVariance::Propagate => warn!(
                "Column(s) {flat:?} of {} have zero variance and will be written as nan",
                filepath.display()
            ),
        }
    }

    let normalized = standardize_with(&matrix, &means, &deviations);
    write_matrix(&outfile, &normalized)?;

    info!("Normalized {} into {}", filepath.display(), outfile.display());
    Ok(outfile)
}

/// Loads a whitespace-delimited numeric table
///
/// Blank lines and `#` comments are skipped. Every row must have the same
/// number of columns.
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let content = fs::read_to_string(path)
        .map_err(|e| file_operation_error(e, path.to_path_buf(), "read"))?;

    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;

    for (number, line) in content.lines().enumerate() {
        let data = line.split('#').next().unwrap_or_default();
        let fields: Vec<&str> = data.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let expected = *columns.get_or_insert(fields.len());
        if fields.len() != expected {
            return Err(format_error(
                path.to_path_buf(),
                &format!(
                    "line {} has {} columns, expected {expected}",
                    number + 1,
                    fields.len()
                ),
            ));
        }

        for field in fields {
            let value = field.parse::<f64>().map_err(|_| {
                format_error(
                    path.to_path_buf(),
                    &format!("line {}: '{field}' is not a number", number + 1),
                )
            })?;
            values.push(value);
        }
        rows += 1;
    }

    let columns = columns.ok_or_else(|| format_error(path.to_path_buf(), "no data"))?;
    Array2::from_shape_vec((rows, columns), values)
        .map_err(|e| format_error(path.to_path_buf(), &e.to_string()))
}

/// Population mean and standard deviation of every column
fn column_statistics(matrix: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
    let means = matrix
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(matrix.ncols()));
    (means, matrix.std_axis(Axis(0), 0.0))
}

fn zero_variance_columns(deviations: &Array1<f64>) -> Vec<usize> {
    deviations
        .iter()
        .enumerate()
        .filter(|(_, std)| **std == 0.0)
        .map(|(column, _)| column)
        .collect()
}

fn standardize_with(
    matrix: &Array2<f64>,
    means: &Array1<f64>,
    deviations: &Array1<f64>,
) -> Array2<f64> {
    (matrix - means) / deviations
}

/// Rescales every column to mean 0 and standard deviation 1
///
/// A column with zero variance comes out as `nan`.
pub fn standardize_columns(matrix: &Array2<f64>) -> Array2<f64> {
    let (means, deviations) = column_statistics(matrix);
    standardize_with(matrix, &means, &deviations)
}

/// Writes a table with space separated values, one row per line
pub fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    let mut text = String::new();
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|value| format_value(*value)).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }

    publish_atomically(path, |file| {
        file.write_all(text.as_bytes())
            .map_err(|e| file_operation_error(e, path.to_path_buf(), "write"))
    })
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.*}", NORMALIZE_PRECISION, value)
    }
}
