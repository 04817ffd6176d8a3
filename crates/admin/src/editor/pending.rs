//! Pending edit state for the selected product.

use rustc_hash::FxHashSet;

use storefront::{
    overlay::Overlay,
    products::{Product, ProductChanges, ProductId, ProductImage, ProductVariant},
    utils::distinct_entries,
};

use crate::{
    editor::StagedUpload,
    sync::{SyncPlan, reconcile_variants},
};

/// Confirmed product and variants plus everything staged on top of them.
///
/// Staged uploads only ever cover paths the effective image list references;
/// blobs to delete are the confirmed paths it no longer references.
#[derive(Debug, Clone)]
pub(crate) struct EditSession {
    product: Overlay<ProductChanges>,
    variants: Vec<ProductVariant>,
    staged_variants: Option<Vec<ProductVariant>>,
    uploads: Vec<StagedUpload>,
}

impl EditSession {
    pub(crate) fn new(product: Product, variants: Vec<ProductVariant>) -> Self {
        Self {
            product: Overlay::new(product),
            variants,
            staged_variants: None,
            uploads: Vec::new(),
        }
    }

    pub(crate) fn product_id(&self) -> &ProductId {
        &self.product.base().id
    }

    pub(crate) fn confirmed(&self) -> &Product {
        self.product.base()
    }

    pub(crate) fn effective(&self) -> Product {
        self.product.effective()
    }

    pub(crate) fn changes(&self) -> &ProductChanges {
        self.product.changes()
    }

    /// The staged variant list, or the confirmed one when none is staged.
    pub(crate) fn variants(&self) -> &[ProductVariant] {
        self.staged_variants.as_deref().unwrap_or(&self.variants)
    }

    pub(crate) fn has_staged_variants(&self) -> bool {
        self.staged_variants.is_some()
    }

    pub(crate) fn uploads(&self) -> &[StagedUpload] {
        &self.uploads
    }

    /// Confirmed blob paths the effective image list no longer references.
    pub(crate) fn deletions(&self) -> Vec<String> {
        let referenced = self.referenced_paths();
        let confirmed: Vec<&str> = self.confirmed().storage_paths().collect();

        distinct_entries(&confirmed)
            .into_iter()
            .filter(|path| !referenced.contains(*path))
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.product.is_pending() || self.staged_variants.is_some()
    }

    pub(crate) fn edit(&mut self, changes: ProductChanges) {
        self.product.merge(changes);
        self.prune_uploads();
    }

    pub(crate) fn set_images(&mut self, images: Vec<ProductImage>) {
        self.edit(ProductChanges::images(images));
    }

    pub(crate) fn stage_variants(&mut self, variants: Vec<ProductVariant>) {
        self.staged_variants = Some(variants);
    }

    /// Stage a payload for a path the effective image list references.
    ///
    /// Returns `false` and stages nothing for an unreferenced path.
    pub(crate) fn stage_upload(&mut self, upload: StagedUpload) -> bool {
        if !self.referenced_paths().contains(upload.path.as_str()) {
            return false;
        }

        self.uploads.retain(|staged| staged.path != upload.path);
        self.uploads.push(upload);

        true
    }

    pub(crate) fn reset(&mut self) {
        self.product.reset();
        self.staged_variants = None;
        self.uploads.clear();
    }

    fn referenced_paths(&self) -> FxHashSet<String> {
        self.effective()
            .storage_paths()
            .map(str::to_string)
            .collect()
    }

    /// Drop staged payloads no image slot points at anymore.
    fn prune_uploads(&mut self) {
        let referenced = self.referenced_paths();

        self.uploads
            .retain(|upload| referenced.contains(upload.path.as_str()));
    }

    /// The ordered writes that persist every pending change.
    ///
    /// `stored_variants` is the variant sub-collection as currently stored.
    pub(crate) fn plan(&self, stored_variants: &[ProductVariant]) -> SyncPlan {
        let mut plan = SyncPlan::new();

        for path in self.deletions() {
            plan.delete_object(path);
        }

        for upload in &self.uploads {
            plan.upload_object(upload.path.clone(), upload.payload.clone());
        }

        if self.product.is_pending() {
            plan.update_product(self.product_id().clone(), self.changes().clone());
        }

        if let Some(desired) = &self.staged_variants {
            plan.reconcile_variants(
                self.product_id(),
                reconcile_variants(stored_variants, desired),
            );
        }

        plan
    }

    /// Fold every pending change into the confirmed state.
    pub(crate) fn commit(&mut self) {
        self.product.commit();

        if let Some(desired) = self.staged_variants.take() {
            self.variants = reconcile_variants(&[], &desired).writes;
        }

        self.uploads.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::sync::{Payload, SyncStep};

    use super::*;

    fn session() -> EditSession {
        let mut product = Product::new("p1", "Shirt");
        product.product_images = vec![ProductImage::at("product-images/old.png")];

        EditSession::new(product, vec![ProductVariant::new("v1", 0)])
    }

    fn upload(path: &str, byte: u8) -> StagedUpload {
        StagedUpload {
            path: path.to_string(),
            payload: Payload::from(vec![byte]),
        }
    }

    #[test]
    fn plan_orders_deletions_uploads_update_then_variants() {
        let mut session = session();

        session.edit(ProductChanges::name("Tee"));
        session.set_images(vec![ProductImage::at("product-images/new.jpg")]);
        assert!(session.stage_upload(upload("product-images/new.jpg", 1)));
        session.stage_variants(vec![ProductVariant::new("v2", 5)]);

        let plan = session.plan(&[ProductVariant::new("v1", 0)]);
        let kinds: Vec<&str> = plan
            .steps()
            .iter()
            .map(|step| match step {
                SyncStep::DeleteObject { .. } => "delete-object",
                SyncStep::UploadObject { .. } => "upload",
                SyncStep::UpdateProduct { .. } => "update",
                SyncStep::DeleteVariants { .. } => "delete-variants",
                SyncStep::WriteVariants { .. } => "write-variants",
                SyncStep::DeleteVariant { .. } | SyncStep::DeleteProduct { .. } => "other",
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                "delete-object",
                "upload",
                "update",
                "delete-variants",
                "write-variants"
            ]
        );
    }

    #[test]
    fn variants_only_edit_skips_product_update() {
        let mut session = session();

        session.stage_variants(vec![ProductVariant::new("v1", 0)]);

        assert!(session.is_pending());
        assert!(
            !session
                .plan(&[])
                .steps()
                .iter()
                .any(|step| matches!(step, SyncStep::UpdateProduct { .. }))
        );
    }

    #[test]
    fn commit_renumbers_variants_and_clears_staging() {
        let mut session = session();

        session.edit(ProductChanges::name("Tee"));
        session.stage_variants(vec![ProductVariant::new("b", 9), ProductVariant::new("a", 4)]);
        session.commit();

        assert!(!session.is_pending());
        assert_eq!(session.confirmed().name, "Tee");
        assert_eq!(
            session.variants(),
            &[ProductVariant::new("b", 0), ProductVariant::new("a", 1)]
        );
    }

    #[test]
    fn restaging_an_upload_replaces_it() {
        let mut session = session();

        session.set_images(vec![ProductImage::at("product-images/a.png")]);

        for byte in [1, 2] {
            assert!(session.stage_upload(upload("product-images/a.png", byte)));
        }

        assert_eq!(session.uploads().len(), 1);
        assert_eq!(
            session.uploads().first().map(|staged| staged.payload.as_bytes()),
            Some(&[2][..])
        );
    }

    #[test]
    fn unreferenced_paths_cannot_be_staged() {
        let mut session = session();

        assert!(!session.stage_upload(upload("product-images/stray.png", 1)));
        assert!(session.uploads().is_empty());
    }

    #[test]
    fn dropped_confirmed_paths_are_deleted() {
        let mut session = session();

        assert!(session.deletions().is_empty());

        session.set_images(vec![ProductImage::at("product-images/new.png")]);

        assert_eq!(session.deletions(), vec!["product-images/old.png".to_string()]);

        session.set_images(vec![ProductImage::at("product-images/old.png")]);

        assert!(session.deletions().is_empty());
    }

    #[test]
    fn image_edits_drop_orphaned_uploads() {
        let mut session = session();

        session.set_images(vec![ProductImage::at("product-images/new.png")]);
        assert!(session.stage_upload(upload("product-images/new.png", 1)));

        session.edit(ProductChanges::images(Vec::new()));

        assert!(session.uploads().is_empty());
        assert_eq!(session.deletions(), vec!["product-images/old.png".to_string()]);

        let uploads = session
            .plan(&[])
            .steps()
            .iter()
            .filter(|step| matches!(step, SyncStep::UploadObject { .. }))
            .count();

        assert_eq!(uploads, 0);
    }
}
