//! File renaming functionality
//!
//! Moves a file to a new path with an explicit overwrite policy.

use std::fs;
use std::path::{Path, PathBuf};

use fs_extra::file::{CopyOptions, move_file};
use log::{debug, info};

use crate::errors::{Result, conflict_error, file_operation_error};

/// Renames (moves) a file
///
/// When `output_filepath` exists the call fails unless `overwrite` is set. An
/// existing target is replaced by a single `rename`, which is atomic on the
/// same filesystem, so a failure never leaves both files gone. When the
/// rename itself is refused (typically across filesystems) the file is
/// copied and the source removed instead.
///
/// # Arguments
/// * `input_filepath` - The file to move
/// * `output_filepath` - Where the file ends up
/// * `overwrite` - Whether an existing `output_filepath` may be replaced
///
/// # Returns
/// * `Result<PathBuf>` - `output_filepath`
///
/// # Errors
/// * `Conflict` when `output_filepath` exists and `overwrite` is false
/// * `FileOperation` when the move fails
pub fn rename_file(
    input_filepath: &Path,
    output_filepath: &Path,
    overwrite: bool,
) -> Result<PathBuf> {
    if output_filepath.exists() && !overwrite {
        return Err(conflict_error(output_filepath.to_path_buf()));
    }

    debug!(
        "Moving file: {} -> {}",
        input_filepath.display(),
        output_filepath.display()
    );

    if let Err(rename_error) = fs::rename(input_filepath, output_filepath) {
        if !input_filepath.is_file() {
            return Err(file_operation_error(
                rename_error,
                input_filepath.to_path_buf(),
                "move",
            ));
        }

        debug!("Rename refused ({rename_error}), falling back to copy and remove");
        let options = CopyOptions::new().overwrite(overwrite);
        move_file(input_filepath, output_filepath, &options).map_err(|e| {
            file_operation_error(std::io::Error::other(e), input_filepath.to_path_buf(), "move")
        })?;
    }

    info!(
        "Renamed {} to {}",
        input_filepath.display(),
        output_filepath.display()
    );
    Ok(output_filepath.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rename_into_new_path() {
        let temp_dir = tempdir().unwrap();
        let source = temp_dir.path().join("a.txt");
        let target = temp_dir.path().join("b.txt");
        fs::write(&source, "content").unwrap();

        let result = rename_file(&source, &target, false).unwrap();

        assert_eq!(result, target);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "content");
    }

    #[test]
    fn test_missing_source_is_a_file_operation_error() {
        let temp_dir = tempdir().unwrap();
        let error = rename_file(
            &temp_dir.path().join("missing.txt"),
            &temp_dir.path().join("b.txt"),
            false,
        )
        .unwrap_err();

        assert!(error.is_file_operation(), "unexpected error: {error}");
    }
}
