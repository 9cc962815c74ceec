//! File operations module
//!
//! This module contains the adapters that produce or move whole files:
//! gzip compression and renaming.

mod compression;
mod rename;

pub use compression::{
    CompressionFormat, compress_file, compressed_path, decompress_file, decompress_files,
    decompressed_path,
};
pub use rename::rename_file;
