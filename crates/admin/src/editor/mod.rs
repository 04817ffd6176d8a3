//! Product editor
//!
//! Edits to the selected product accumulate locally and reach the store only
//! on [`ProductEditor::submit`], which runs them as one ordered
//! [`SyncPlan`](crate::sync::SyncPlan).

use std::{fmt, sync::Arc};

use tracing::{error, info, warn};

use storefront::{
    products::{
        Product, ProductChanges, ProductId, ProductImage, ProductImageUpdate, ProductVariant,
    },
    utils::{remove_at, replace_at},
};

use crate::{
    store::{ObjectStorage, ProductsStore},
    sync::{Payload, SyncPlan, SyncReport},
};

mod errors;
mod pending;
mod uploads;

pub use errors::*;
pub use uploads::{PRODUCT_IMAGES_PREFIX, StagedUpload, file_extension, random_storage_path};

use pending::EditSession;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditStatus {
    #[default]
    Idle,
    Pending,
    Saved,
    Failed(String),
}

/// Edits one product at a time against the store and object storage.
pub struct ProductEditor {
    products: Arc<dyn ProductsStore>,
    objects: Arc<dyn ObjectStorage>,
    session: Option<EditSession>,
    status: EditStatus,
}

impl ProductEditor {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsStore>, objects: Arc<dyn ObjectStorage>) -> Self {
        Self {
            products,
            objects,
            session: None,
            status: EditStatus::Idle,
        }
    }

    /// Load a product and its variants as the confirmed state.
    ///
    /// Pending state from the previous selection is discarded first.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Store`] if either document read fails; no
    /// product is selected afterwards.
    #[tracing::instrument(name = "editor.select", skip_all, fields(product = %product), err)]
    pub async fn select(&mut self, product: &ProductId) -> Result<(), EditorError> {
        self.session = None;
        self.status = EditStatus::Idle;

        let loaded = match self.products.get_product(product).await {
            Ok(loaded) => loaded,
            Err(error) => return Err(self.fail(error.into())),
        };

        let variants = match self.products.list_variants(product).await {
            Ok(variants) => variants,
            Err(error) => return Err(self.fail(error.into())),
        };

        self.session = Some(EditSession::new(loaded, variants));

        Ok(())
    }

    /// Merge `changes` into the pending diff.
    ///
    /// Replacing the image list drops staged payloads no slot points at
    /// anymore, and confirmed blobs the new list leaves out are deleted on
    /// submit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoProductSelected`] without a selection.
    pub fn edit(&mut self, changes: ProductChanges) -> Result<(), EditorError> {
        self.session_mut()?.edit(changes);
        self.mark_pending();

        Ok(())
    }

    /// Merge `update` into the image at `index` of the effective image list.
    ///
    /// When the slot moves to another path, a staged payload for the old path
    /// is dropped and a confirmed blob no other slot references is deleted on
    /// submit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ImageIndexOutOfRange`] if `index` is outside the
    /// effective image list; nothing is changed.
    pub fn edit_image(
        &mut self,
        index: usize,
        update: &ProductImageUpdate,
    ) -> Result<(), EditorError> {
        let session = self.session_mut()?;
        let images = session.effective().product_images;

        let current = images.get(index).ok_or(EditorError::ImageIndexOutOfRange {
            index,
            len: images.len(),
        })?;

        let updated = update.applied_to(current);

        let images = replace_at(&images, updated, index).ok_or(
            EditorError::ImageIndexOutOfRange {
                index,
                len: images.len(),
            },
        )?;

        session.set_images(images);
        self.mark_pending();

        Ok(())
    }

    /// Append an image slot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoProductSelected`] without a selection.
    pub fn add_image(&mut self, image: ProductImage) -> Result<(), EditorError> {
        let session = self.session_mut()?;
        let mut images = session.effective().product_images;

        images.push(image);
        session.set_images(images);
        self.mark_pending();

        Ok(())
    }

    /// Remove the image slot at `index`.
    ///
    /// A staged payload for the slot is dropped. A confirmed blob no other
    /// slot references is deleted on submit.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ImageIndexOutOfRange`] if `index` is outside the
    /// effective image list.
    pub fn remove_image(&mut self, index: usize) -> Result<(), EditorError> {
        let session = self.session_mut()?;
        let images = session.effective().product_images;

        if index >= images.len() {
            return Err(EditorError::ImageIndexOutOfRange {
                index,
                len: images.len(),
            });
        }

        session.set_images(remove_at(&images, index));
        self.mark_pending();

        Ok(())
    }

    /// Stage an image file for the slot at `index` and point the slot at it.
    ///
    /// Returns the generated storage path.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Validation`] if `file_name` has no extension and
    /// [`EditorError::ImageIndexOutOfRange`] if the slot does not exist. Either
    /// way nothing is staged.
    pub fn stage_upload(
        &mut self,
        index: usize,
        file_name: &str,
        payload: Vec<u8>,
    ) -> Result<String, EditorError> {
        let extension = file_extension(file_name)?;
        let len = self.session()?.effective().product_images.len();

        if index >= len {
            return Err(EditorError::ImageIndexOutOfRange { index, len });
        }

        let path = random_storage_path(extension);

        self.edit_image(index, &ProductImageUpdate::storage_path(path.clone()))?;
        let staged = self.session_mut()?.stage_upload(StagedUpload {
            path: path.clone(),
            payload: Payload::from(payload),
        });

        if !staged {
            warn!(%path, "upload path left the image list before staging");
        }

        info!(%path, file_name, "staged image upload");

        Ok(path)
    }

    /// Replace the edited variant list wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoProductSelected`] without a selection.
    pub fn stage_variants(&mut self, variants: Vec<ProductVariant>) -> Result<(), EditorError> {
        self.session_mut()?.stage_variants(variants);
        self.mark_pending();

        Ok(())
    }

    /// Persist every pending change.
    ///
    /// Returns `None` without touching the store when nothing is selected or
    /// pending. On failure the pending state is kept so the submit can be
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Sync`] carrying the step report if any step
    /// fails, or [`EditorError::Store`] if the stored variants cannot be read.
    #[tracing::instrument(name = "editor.submit", skip(self), err)]
    pub async fn submit(&mut self) -> Result<Option<SyncReport>, EditorError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };

        if !session.is_pending() {
            return Ok(None);
        }

        let product = session.product_id().clone();

        let stored_variants = if session.has_staged_variants() {
            match self.products.list_variants(&product).await {
                Ok(variants) => variants,
                Err(error) => return Err(self.fail(error.into())),
            }
        } else {
            Vec::new()
        };

        let plan = session.plan(&stored_variants);

        match plan.execute(&*self.products, &*self.objects).await {
            Ok(report) => {
                if let Some(session) = self.session.as_mut() {
                    session.commit();
                }

                self.status = EditStatus::Saved;

                info!(product = %product, steps = report.records.len(), "saved product");

                Ok(Some(report))
            }
            Err(sync_error) => {
                error!(product = %product, error = %sync_error, "failed to save product");

                Err(self.fail(sync_error.into()))
            }
        }
    }

    /// Discard every pending change without contacting the store.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }

        self.status = EditStatus::Idle;
    }

    /// Delete the selected product with its variants and image blobs.
    ///
    /// Variants are re-listed from the store and deleted one by one, then the
    /// confirmed images, then the product document. The selection is cleared
    /// only on success.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Sync`] if any deletion fails; earlier deletions
    /// stay applied.
    #[tracing::instrument(name = "editor.delete_product", skip(self), err)]
    pub async fn delete_product(&mut self) -> Result<SyncReport, EditorError> {
        let session = self.session()?;
        let product = session.product_id().clone();

        let variants = match self.products.list_variants(&product).await {
            Ok(variants) => variants,
            Err(error) => return Err(self.fail(error.into())),
        };

        let mut plan = SyncPlan::new();

        for variant in variants {
            plan.delete_variant(product.clone(), variant.id);
        }

        for path in session.confirmed().storage_paths() {
            plan.delete_object(path);
        }

        plan.delete_product(product.clone());

        match plan.execute(&*self.products, &*self.objects).await {
            Ok(report) => {
                self.session = None;
                self.status = EditStatus::Idle;

                info!(product = %product, "deleted product");

                Ok(report)
            }
            Err(sync_error) => {
                error!(product = %product, error = %sync_error, "failed to delete product");

                Err(self.fail(sync_error.into()))
            }
        }
    }

    pub fn selected(&self) -> Option<&ProductId> {
        self.session.as_ref().map(EditSession::product_id)
    }

    /// The selected product with pending changes applied.
    pub fn product(&self) -> Option<Product> {
        self.session.as_ref().map(EditSession::effective)
    }

    /// The selected product as last confirmed by the store.
    pub fn confirmed(&self) -> Option<&Product> {
        self.session.as_ref().map(EditSession::confirmed)
    }

    pub fn changes(&self) -> Option<&ProductChanges> {
        self.session.as_ref().map(EditSession::changes)
    }

    /// Edited variant list; empty without a selection.
    pub fn variants(&self) -> &[ProductVariant] {
        self.session.as_ref().map(EditSession::variants).unwrap_or_default()
    }

    pub fn staged_uploads(&self) -> &[StagedUpload] {
        self.session.as_ref().map(EditSession::uploads).unwrap_or_default()
    }

    /// Confirmed blob paths that submit will delete.
    pub fn staged_deletions(&self) -> Vec<String> {
        self.session.as_ref().map(EditSession::deletions).unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.session.as_ref().is_some_and(EditSession::is_pending)
    }

    pub fn status(&self) -> &EditStatus {
        &self.status
    }

    fn session(&self) -> Result<&EditSession, EditorError> {
        self.session.as_ref().ok_or(EditorError::NoProductSelected)
    }

    fn session_mut(&mut self) -> Result<&mut EditSession, EditorError> {
        self.session.as_mut().ok_or(EditorError::NoProductSelected)
    }

    fn mark_pending(&mut self) {
        self.status = EditStatus::Pending;
    }

    fn fail(&mut self, error: EditorError) -> EditorError {
        warn!(error = %error, "product editor request failed");

        self.status = EditStatus::Failed(error.to_string());

        error
    }
}

impl fmt::Debug for ProductEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductEditor")
            .field("session", &self.session)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
