//! Singleton list adapters
//!
//! Pipelines pass single values where a list is expected and the other way
//! round; these helpers convert between the two shapes.

use std::fmt::Debug;

use log::{debug, info};

use crate::errors::{Result, validation_error};

/// Wraps an element into a list holding only that element
pub fn element_to_list<T>(element: T) -> Vec<T> {
    vec![element]
}

/// Gets the element of a singleton list
///
/// A list whose length is not one is rejected unless `force` is set, in which
/// case the first element is returned. An empty list is rejected either way.
///
/// # Errors
/// * `Validation` when the list is not a singleton and `force` is false
/// * `Validation` when the list is empty
pub fn list_to_element<T>(list: Vec<T>, force: bool) -> Result<T> {
    if list.len() != 1 && !force {
        return Err(validation_error(&format!(
            "A list with '{}' element(s) is not a singleton list.",
            list.len()
        )));
    }

    if list.len() > 1 {
        debug!("Forcing first element out of a list of {}", list.len());
    }

    list.into_iter()
        .next()
        .ok_or_else(|| validation_error("Cannot take an element from an empty list."))
}

/// Returns the input unchanged
///
/// Used as the neutral branch of a switch; the value is logged.
pub fn passthrough<T: Debug>(value: T) -> T {
    info!("---------------------");
    info!("{value:?}");
    info!("---------------------");
    value
}
