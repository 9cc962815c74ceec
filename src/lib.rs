//! File adapters for processing pipelines
//!
//! Small, independent building blocks that a workflow engine strings
//! together: gzip (de)compression under a naming convention, singleton list
//! conversion, column standardisation of numeric tables, cropping of 4D NIfTI
//! volumes and renaming with an overwrite policy.
//!
//! Every adapter is synchronous and keeps no state between calls.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod convert;
pub mod errors;
pub mod file_ops;
pub mod list;
pub mod logging;
pub mod utils;

pub mod prelude {
    pub use crate::convert::{
        ArrayOutput, NormalizeOptions, ZeroVariance, crop_volume, crop_volume_with,
        normalize_array, normalize_array_with,
    };
    pub use crate::errors::{
        config_parsing_error, conflict_error, file_operation_error, format_error,
        invalid_directory_error, invalid_file_error, validation_error,
    };
    pub use crate::errors::{Error, Result};
    pub use crate::file_ops::{
        CompressionFormat, compress_file, decompress_file, decompress_files, rename_file,
    };
    pub use crate::list::{element_to_list, list_to_element, passthrough};
    pub use crate::logging::{LogLevel, format_message, init_logger};
}
