use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches, Command, command, value_parser};

use crate::constants::{
    CONFIG_HELP, DEFAULT_CONFIG_PATH, LOCAL_LOGGING_HELP, LOG_FILE_DEFAULT, LOG_FILE_HELP,
    VERBOSE_HELP,
};
use crate::errors::{Result, validation_error};
use crate::logging::LogLevel;
use crate::utils::find_project_folder;

/// Builds the command-line interface
///
/// Global arguments:
/// - `config`: Path to the configuration file
/// - `verbose`: Increase verbosity level
/// - `log_file` / `log_locally`: Where the log file goes
///
/// Subcommands: `decompress`, `compress`, `normalize`, `crop`, `rename`.
pub fn build_cli() -> Command {
    // define arg for reading from a specific config file
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .global(true)
        .default_value(DEFAULT_CONFIG_PATH);

    // define arg for verbosity level
    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .global(true)
        .action(ArgAction::Count);

    // define arg for log file
    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .global(true);

    // define arg for local logging
    let log_locally = Arg::new("log_locally")
        .short('L')
        .long("log-locally")
        .help(LOCAL_LOGGING_HELP)
        .global(true)
        .action(ArgAction::SetTrue);

    let output_directory = Arg::new("output_directory")
        .short('o')
        .long("output-directory")
        .help("Directory the result is written to (default: next to the input)");

    let decompress = Command::new("decompress")
        .about("Decompress .gz files; other files are passed through")
        .arg(
            Arg::new("files")
                .help("Files or glob patterns")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .help("Prefix of the decompressed file names"),
        )
        .arg(output_directory.clone());

    let compress = Command::new("compress")
        .about("Gzip a file; .gz files are passed through")
        .arg(Arg::new("file").required(true))
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .help("Prefix of the compressed file name"),
        )
        .arg(output_directory)
        .arg(
            Arg::new("remove_original")
                .long("remove-original")
                .help("Delete the input once it is compressed")
                .action(ArgAction::SetTrue),
        );

    let normalize = Command::new("normalize")
        .about("Standardise every column of a whitespace-delimited table")
        .arg(Arg::new("file").required(true))
        .arg(
            Arg::new("output")
                .long("output")
                .help("Write the result here instead of overwriting the input")
                .conflicts_with("in_place"),
        )
        .arg(
            Arg::new("in_place")
                .long("in-place")
                .help("Overwrite the input table")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("reject_zero_variance")
                .long("reject-zero-variance")
                .help("Fail when a column has zero variance")
                .action(ArgAction::SetTrue),
        );

    let crop = Command::new("crop")
        .about("Remove the first frames of a 4D NIfTI volume")
        .arg(Arg::new("file").required(true))
        .arg(
            Arg::new("frames")
                .help("Number of frames to remove")
                .required(true)
                .value_parser(value_parser!(usize)),
        );

    let rename = Command::new("rename")
        .about("Move a file to a new path")
        .arg(Arg::new("source").required(true))
        .arg(Arg::new("destination").required(true))
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("Replace an existing destination")
                .action(ArgAction::SetTrue),
        );

    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(arg_config)
        .arg(log_file)
        .arg(log_locally)
        .arg(arg_verbose)
        .subcommand(decompress)
        .subcommand(compress)
        .subcommand(normalize)
        .subcommand(crop)
        .subcommand(rename)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}

/// Gets the verbosity level
///
/// Any -v/--verbose flag wins; otherwise the configured level name is used,
/// falling back to warnings only.
pub fn get_verbosity(matches: &ArgMatches, configured: Option<&str>) -> Result<LogLevel> {
    let verbose_count = matches.get_count("verbose");
    match configured {
        Some(level) if verbose_count == 0 => {
            LogLevel::from_str(level).map_err(|e| validation_error(&e))
        }
        _ => Ok(LogLevel::from_occurrences(verbose_count)),
    }
}

/// Resolves the log file path
///
/// The file lives in the configuration directory unless `--log-locally` is
/// given. `configured` is the name from the configuration file, used when the
/// command line does not name one. An empty name disables file logging.
pub fn get_log_file(matches: &ArgMatches, configured: Option<&str>) -> Result<String> {
    let filename = matches
        .get_one::<String>("log_file")
        .map(String::as_str)
        .or(configured)
        .unwrap_or(LOG_FILE_DEFAULT);

    if filename.is_empty() || matches.get_flag("log_locally") {
        Ok(filename.to_string())
    } else {
        let folder = find_project_folder()?;
        let path = folder.config_dir().join(filename);
        Ok(path.to_string_lossy().into_owned())
    }
}
