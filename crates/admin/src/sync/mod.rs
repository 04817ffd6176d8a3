//! Sync plans
//!
//! A write workflow is an ordered list of [`SyncStep`]s. Executing a plan
//! awaits each step before the next and stops at the first failure, leaving
//! the remaining steps unrun. Nothing is rolled back; the returned
//! [`SyncReport`] records what applied, what failed and what never ran.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::{debug, info, warn};

use storefront::products::{ProductChanges, ProductId, ProductVariant, VariantId};

use crate::store::{ContentType, ObjectStorage, ProductsStore, StoreError};

mod variants;

pub use variants::{VariantPlan, reconcile_variants};

/// Bytes of a staged upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

/// A single write against the store or object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    DeleteObject {
        path: String,
    },
    UploadObject {
        path: String,
        payload: Payload,
        content_type: ContentType,
    },
    UpdateProduct {
        product: ProductId,
        changes: ProductChanges,
    },
    /// Deletes every listed variant, collecting each result.
    DeleteVariants {
        product: ProductId,
        variants: Vec<VariantId>,
    },
    /// Writes every listed variant, collecting each result.
    WriteVariants {
        product: ProductId,
        variants: Vec<ProductVariant>,
    },
    DeleteVariant {
        product: ProductId,
        variant: VariantId,
    },
    DeleteProduct {
        product: ProductId,
    },
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteObject { path } => write!(f, "delete object {path}"),
            Self::UploadObject {
                path, content_type, ..
            } => write!(f, "upload {content_type} object {path}"),
            Self::UpdateProduct { product, .. } => write!(f, "update product {product}"),
            Self::DeleteVariants { product, variants } => {
                write!(f, "delete {} variants of {product}", variants.len())
            }
            Self::WriteVariants { product, variants } => {
                write!(f, "write {} variants of {product}", variants.len())
            }
            Self::DeleteVariant { product, variant } => {
                write!(f, "delete variant {variant} of {product}")
            }
            Self::DeleteProduct { product } => write!(f, "delete product {product}"),
        }
    }
}

/// A failed item within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Path or document id the failed write targeted.
    pub target: String,
    pub error: StoreError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Failed(Vec<StepFailure>),
    /// Not run because an earlier step failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: SyncStep,
    pub outcome: StepOutcome,
}

/// Per-step outcomes of an executed plan, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub records: Vec<StepRecord>,
}

impl SyncReport {
    /// Number of steps that applied.
    pub fn applied(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Applied))
    }

    /// Number of steps that were never run.
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Skipped))
    }

    /// Every failed item across all steps.
    pub fn failures(&self) -> impl Iterator<Item = &StepFailure> {
        self.records
            .iter()
            .filter_map(|record| match &record.outcome {
                StepOutcome::Failed(failures) => Some(failures),
                StepOutcome::Applied | StepOutcome::Skipped => None,
            })
            .flatten()
    }

    /// Whether every step applied.
    pub fn is_complete(&self) -> bool {
        self.applied() == self.records.len()
    }

    fn count(&self, predicate: impl Fn(&StepOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.outcome))
            .count()
    }
}

#[derive(Debug, Error)]
#[error("sync stopped at step {step} ({description}): {error}")]
pub struct SyncError {
    /// Zero-based index of the failed step.
    pub step: usize,
    pub description: String,

    /// First failure within the failed step.
    pub error: StoreError,

    pub report: SyncReport,
}

/// An ordered list of writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    steps: Vec<SyncStep>,
}

impl SyncPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: SyncStep) {
        self.steps.push(step);
    }

    pub fn delete_object(&mut self, path: impl Into<String>) {
        self.push(SyncStep::DeleteObject { path: path.into() });
    }

    /// Upload a payload, inferring its content type from the path.
    pub fn upload_object(&mut self, path: impl Into<String>, payload: Payload) {
        let path = path.into();
        let content_type = ContentType::from_path(&path);

        self.push(SyncStep::UploadObject {
            path,
            payload,
            content_type,
        });
    }

    pub fn update_product(&mut self, product: ProductId, changes: ProductChanges) {
        self.push(SyncStep::UpdateProduct { product, changes });
    }

    /// Append the two reconciliation phases; an empty phase adds no step.
    pub fn reconcile_variants(&mut self, product: &ProductId, plan: VariantPlan) {
        let VariantPlan { deletions, writes } = plan;

        if !deletions.is_empty() {
            self.push(SyncStep::DeleteVariants {
                product: product.clone(),
                variants: deletions,
            });
        }

        if !writes.is_empty() {
            self.push(SyncStep::WriteVariants {
                product: product.clone(),
                variants: writes,
            });
        }
    }

    pub fn delete_variant(&mut self, product: ProductId, variant: VariantId) {
        self.push(SyncStep::DeleteVariant { product, variant });
    }

    pub fn delete_product(&mut self, product: ProductId) {
        self.push(SyncStep::DeleteProduct { product });
    }

    pub fn steps(&self) -> &[SyncStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failed step.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] naming the failed step and carrying the report
    /// of every step, including those that applied before it.
    #[tracing::instrument(
        name = "sync.plan.execute",
        skip_all,
        fields(steps = self.steps.len()),
        err
    )]
    pub async fn execute(
        self,
        store: &dyn ProductsStore,
        objects: &dyn ObjectStorage,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let mut steps = self.steps.into_iter().enumerate();

        while let Some((index, step)) = steps.next() {
            let failures = run_step(&step, store, objects).await;

            if failures.is_empty() {
                debug!(step = index, %step, "applied sync step");

                report.records.push(StepRecord {
                    step,
                    outcome: StepOutcome::Applied,
                });

                continue;
            }

            for failure in &failures {
                warn!(
                    step = index,
                    %step,
                    target = %failure.target,
                    error = %failure.error,
                    "sync step failed"
                );
            }

            let description = step.to_string();
            let error = failures
                .first()
                .map_or_else(|| StoreError::backend("unknown failure"), |f| f.error.clone());

            report.records.push(StepRecord {
                step,
                outcome: StepOutcome::Failed(failures),
            });

            report
                .records
                .extend(steps.by_ref().map(|(_, step)| StepRecord {
                    step,
                    outcome: StepOutcome::Skipped,
                }));

            return Err(SyncError {
                step: index,
                description,
                error,
                report,
            });
        }

        info!(applied = report.applied(), "sync plan complete");

        Ok(report)
    }
}

async fn run_step(
    step: &SyncStep,
    store: &dyn ProductsStore,
    objects: &dyn ObjectStorage,
) -> Vec<StepFailure> {
    let mut failures = Vec::new();

    match step {
        SyncStep::DeleteObject { path } => match objects.delete(path).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                debug!(%path, "object already absent");
            }
            Err(error) => failures.push(failure(path, error)),
        },
        SyncStep::UploadObject {
            path,
            payload,
            content_type,
        } => {
            if let Err(error) = objects
                .upload(path, payload.as_bytes(), *content_type)
                .await
            {
                failures.push(failure(path, error));
            }
        }
        SyncStep::UpdateProduct { product, changes } => {
            if let Err(error) = store.update_product(product, changes).await {
                failures.push(failure(product, error));
            }
        }
        SyncStep::DeleteVariants { product, variants } => {
            for variant in variants {
                if let Err(error) = store.delete_variant(product, variant).await {
                    failures.push(failure(variant, error));
                }
            }
        }
        SyncStep::WriteVariants { product, variants } => {
            for variant in variants {
                if let Err(error) = store.set_variant(product, variant.clone()).await {
                    failures.push(failure(&variant.id, error));
                }
            }
        }
        SyncStep::DeleteVariant { product, variant } => {
            if let Err(error) = store.delete_variant(product, variant).await {
                failures.push(failure(variant, error));
            }
        }
        SyncStep::DeleteProduct { product } => {
            if let Err(error) = store.delete_product(product).await {
                failures.push(failure(product, error));
            }
        }
    }

    failures
}

fn failure(target: impl fmt::Display, error: StoreError) -> StepFailure {
    StepFailure {
        target: target.to_string(),
        error,
    }
}
