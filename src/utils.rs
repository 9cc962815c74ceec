use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glob::glob;
use tempfile::{Builder, NamedTempFile};

use crate::constants::{APPLICATION, ORGANIZATION, QUALIFIER};
use crate::errors::{
    Result, file_operation_error, invalid_directory_error, invalid_file_error, validation_error,
};

/// Fails unless `path` names an existing regular file
pub fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(invalid_file_error(path.to_path_buf()))
    }
}

/// Picks the directory a derived file is written to
///
/// An explicit directory must exist; otherwise the parent of `file` is used.
/// A bare file name has an empty parent, which joins like the current directory.
pub fn resolve_output_directory(file: &Path, output_directory: Option<&Path>) -> Result<PathBuf> {
    match output_directory {
        Some(directory) if !directory.is_dir() => {
            Err(invalid_directory_error(directory.to_path_buf()))
        }
        Some(directory) => Ok(directory.to_path_buf()),
        None => Ok(file.parent().map(Path::to_path_buf).unwrap_or_default()),
    }
}

/// Returns the final component of `path` as UTF-8
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            validation_error(&format!(
                "'{}' has no valid unicode file name.",
                path.display()
            ))
        })
}

/// Returns the file name without its last extension (`data.txt` for `data.txt.gz`)
pub fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| {
            validation_error(&format!(
                "'{}' has no valid unicode file name.",
                path.display()
            ))
        })
}

/// Joins `directory` with `prefix` + `name`
pub fn prefixed_path(directory: &Path, prefix: &str, name: &str) -> PathBuf {
    directory.join(format!("{prefix}{name}"))
}

/// Every extension of a file name, dot included (`.nii.gz` for `func.nii.gz`)
fn full_suffix(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.trim_start_matches('.'))
        .and_then(|name| name.find('.').map(|index| name[index..].to_string()))
        .unwrap_or_default()
}

/// Writes `target` through a temporary file in the same directory
///
/// The closure fills the temporary file; it is renamed onto `target` only
/// when the closure succeeds, so `target` never holds partial content.
/// A replaced `target` keeps its permissions; a new one gets the usual
/// umask-restricted mode of a freshly created file.
pub fn publish_atomically<F>(target: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let suffix = full_suffix(target);
    let mut builder = Builder::new();
    builder.prefix(".mmadapt-").suffix(&suffix);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temporary = builder
        .tempfile_in(directory)
        .map_err(|e| file_operation_error(e, directory.to_path_buf(), "create temporary"))?;

    if let Ok(existing) = fs::metadata(target) {
        fs::set_permissions(temporary.path(), existing.permissions())
            .map_err(|e| file_operation_error(e, target.to_path_buf(), "copy permissions of"))?;
    }

    write(&mut temporary)?;

    temporary
        .persist(target)
        .map_err(|e| file_operation_error(e.error, target.to_path_buf(), "publish"))?;
    Ok(())
}

/// Expands `~` and environment variables in a configured path
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => PathBuf::from(shellexpand::full(text).map_or_else(
            |_| text.to_string(),
            |expanded| expanded.into_owned(),
        )),
        None => path.to_path_buf(),
    }
}

/// Expands glob patterns given on the command line
///
/// Arguments that match nothing are kept verbatim so the adapter reports
/// them as missing files.
pub fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matched: Vec<PathBuf> = match glob(pattern) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
            Err(_) => Vec::new(),
        };
        if matched.is_empty() {
            files.push(PathBuf::from(pattern));
        } else {
            files.extend(matched);
        }
    }
    files
}

pub(crate) fn find_project_folder() -> Result<ProjectDirs> {
    let folder = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| validation_error("Failed to determine project directories"))?;

    if !folder.config_dir().exists() {
        create_dir_all(folder.config_dir()).map_err(|e| {
            file_operation_error(e, folder.config_dir().to_path_buf(), "create directory")
        })?;
    }
    Ok(folder)
}
