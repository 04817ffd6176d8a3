//! Overlay
//!
//! A confirmed base value with a layer of pending changes on top. Readers see
//! the effective value (base with changes applied) while the base stays the
//! last state known to be persisted.

use std::fmt;

/// A partial update that can be layered over a value.
pub trait Changes: Clone + Default {
    /// The value these changes apply to.
    type Target: Clone;

    /// Merge `later` into `self`; fields set in `later` win.
    fn merge(&mut self, later: Self);

    /// Apply the set fields to `target`.
    fn apply_to(&self, target: &mut Self::Target);

    /// Whether no field is set.
    fn is_empty(&self) -> bool;
}

/// Base value plus pending changes.
pub struct Overlay<C: Changes> {
    base: C::Target,
    changes: C,
}

impl<C: Changes> Overlay<C> {
    /// Start a clean overlay over `base`.
    pub fn new(base: C::Target) -> Self {
        Self {
            base,
            changes: C::default(),
        }
    }

    /// The confirmed value, without pending changes.
    pub fn base(&self) -> &C::Target {
        &self.base
    }

    /// The pending changes.
    pub fn changes(&self) -> &C {
        &self.changes
    }

    /// The base with pending changes applied.
    pub fn effective(&self) -> C::Target {
        let mut value = self.base.clone();

        self.changes.apply_to(&mut value);

        value
    }

    /// Whether any change is pending.
    pub fn is_pending(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Layer more changes on top of the pending ones.
    pub fn merge(&mut self, changes: C) {
        self.changes.merge(changes);
    }

    /// Drop pending changes, keeping the base.
    pub fn reset(&mut self) {
        self.changes = C::default();
    }

    /// Fold pending changes into the base.
    pub fn commit(&mut self) {
        let changes = std::mem::take(&mut self.changes);

        changes.apply_to(&mut self.base);
    }
}

impl<C> Clone for Overlay<C>
where
    C: Changes,
{
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            changes: self.changes.clone(),
        }
    }
}

impl<C> fmt::Debug for Overlay<C>
where
    C: Changes + fmt::Debug,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("base", &self.base)
            .field("changes", &self.changes)
            .finish()
    }
}
