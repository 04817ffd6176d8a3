//! Editor errors.

use thiserror::Error;

use crate::{store::StoreError, sync::SyncError};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file name is empty")]
    EmptyFileName,

    #[error("file name has no extension")]
    NoExtension,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no product selected")]
    NoProductSelected,

    #[error("image index {index} is out of range for {len} images")]
    ImageIndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store request failed")]
    Store(#[source] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<StoreError> for EditorError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
