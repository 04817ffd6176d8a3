//! Variant reconciliation planning.

use rustc_hash::FxHashSet;

use storefront::{
    products::{ProductVariant, VariantId},
    utils::distinct_entries,
};

/// Store writes that turn the stored variant sub-collection into a desired
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantPlan {
    /// Stored variants missing from the desired list.
    pub deletions: Vec<VariantId>,

    /// Every desired variant, with `order` set to its position.
    pub writes: Vec<ProductVariant>,
}

impl VariantPlan {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.writes.is_empty()
    }
}

/// Plan the deletions and writes that make `stored` match `desired`.
///
/// Only ids of `desired` are significant; a repeated id keeps its first
/// position.
pub fn reconcile_variants(stored: &[ProductVariant], desired: &[ProductVariant]) -> VariantPlan {
    let desired_ids: Vec<VariantId> = desired.iter().map(|variant| variant.id.clone()).collect();
    let desired_ids = distinct_entries(&desired_ids);
    let keep: FxHashSet<&VariantId> = desired_ids.iter().collect();

    let deletions = stored
        .iter()
        .filter(|variant| !keep.contains(&variant.id))
        .map(|variant| variant.id.clone())
        .collect();

    let writes = desired_ids
        .into_iter()
        .enumerate()
        .map(|(order, id)| ProductVariant { id, order })
        .collect();

    VariantPlan { deletions, writes }
}
