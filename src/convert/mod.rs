//! Content conversion module
//!
//! This module contains the adapters that parse a file, transform its
//! content and write the result: table normalisation and volume cropping.

mod array;
mod volume;

pub use array::{
    ArrayOutput, NormalizeOptions, ZeroVariance, load_matrix, normalize_array,
    normalize_array_with, standardize_columns, write_matrix,
};
pub use volume::{crop_volume, crop_volume_with, cropped_path};
