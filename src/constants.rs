/// Constants used throughout the application
///
/// This module centralises all constants used in the application to make
/// them easier to manage and update.

/// Extension (without the dot) of the only recognised compressed format
pub const GZIP_EXTENSION: &str = "gz";

/// Prefix added to the name of a decompressed file
pub const DEFAULT_DECOMPRESS_PREFIX: &str = "u";

/// Prefix added to the name of a compressed file
pub const DEFAULT_COMPRESS_PREFIX: &str = "g";

/// Prefix added to the name of a cropped volume
pub const DEFAULT_CROP_PREFIX: &str = "d";

/// Prefix added to the name of a normalised table when it is not written in place
pub const DEFAULT_NORMALIZE_PREFIX: &str = "n";

/// Digits written after the decimal point for normalised values
pub const NORMALIZE_PRECISION: usize = 8;

/// Qualifier string used for application identification
///
/// This is used as part of the application's unique identifier.
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
///
/// This is used as part of the application's unique identifier.
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// This is the name of the application used in various contexts like
/// configuration file paths and application identification.
pub const APPLICATION: &str = "mmadapt";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read from a specific config file";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Write the log to this file as well";

/// Help text for the local logging command-line option
pub const LOCAL_LOGGING_HELP: &str =
    "Keep the log file in the current directory instead of the config directory";

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "mmadapt.yaml";

/// Default log file name, empty disables file logging
pub const LOG_FILE_DEFAULT: &str = "";
