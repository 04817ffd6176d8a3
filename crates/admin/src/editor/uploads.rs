//! Upload staging helpers.

use rand::{Rng, distributions::Alphanumeric};

use crate::{editor::ValidationError, sync::Payload};

/// Object storage folder for product images.
pub const PRODUCT_IMAGES_PREFIX: &str = "product-images/";

const STORAGE_NAME_LEN: usize = 12;

/// An image payload waiting to be uploaded on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub path: String,
    pub payload: Payload,
}

/// The extension after the last `.` of `file_name`.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyFileName`] for a blank name and
/// [`ValidationError::NoExtension`] when nothing follows a `.`.
pub fn file_extension(file_name: &str) -> Result<&str, ValidationError> {
    if file_name.trim().is_empty() {
        return Err(ValidationError::EmptyFileName);
    }

    match file_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => Ok(extension),
        _ => Err(ValidationError::NoExtension),
    }
}

/// A fresh `product-images/` path with a random 12 character name.
pub fn random_storage_path(extension: &str) -> String {
    let name: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STORAGE_NAME_LEN)
        .map(char::from)
        .collect();

    format!("{PRODUCT_IMAGES_PREFIX}{name}.{extension}")
}
