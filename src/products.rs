//! Products

use crate::{ids::TypedId, overlay::Changes};

/// Product document id.
pub type ProductId = TypedId<Product>;

/// Variant document id, unique within its parent product.
pub type VariantId = TypedId<ProductVariant>;

/// A product listed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Document id.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Long-form description.
    pub description: String,

    /// Unit price in minor units.
    pub price: u64,

    /// Size labels a buyer can pick from; empty when the product is unsized.
    pub sizes: Vec<String>,

    /// Whether a buyer can request a jersey-style number.
    pub allow_number: bool,

    /// Whether a buyer can request a custom printed name.
    pub allow_custom_name: bool,

    /// Display images, in display order.
    pub product_images: Vec<ProductImage>,
}

impl Product {
    /// A product with the given id and name and every other field empty.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: 0,
            sizes: Vec::new(),
            allow_number: false,
            allow_custom_name: false,
            product_images: Vec::new(),
        }
    }

    /// Storage paths of every image that has one.
    pub fn storage_paths(&self) -> impl Iterator<Item = &str> {
        self.product_images
            .iter()
            .map(|image| image.storage_path.as_str())
            .filter(|path| !path.is_empty())
    }
}

/// An image slot on a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductImage {
    /// Object storage key of the image payload; empty for an unfilled slot.
    pub storage_path: String,

    /// Accessible description of the image.
    pub alt_text: Option<String>,
}

impl ProductImage {
    /// An image stored at `storage_path`.
    pub fn at(storage_path: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
            alt_text: None,
        }
    }
}

/// Partial update of a single image slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductImageUpdate {
    /// New storage path.
    pub storage_path: Option<String>,

    /// New alt text.
    pub alt_text: Option<Option<String>>,
}

impl ProductImageUpdate {
    /// Update that only points the slot at a new storage path.
    pub fn storage_path(path: impl Into<String>) -> Self {
        Self {
            storage_path: Some(path.into()),
            alt_text: None,
        }
    }

    /// The image with this update merged over it.
    #[must_use]
    pub fn applied_to(&self, image: &ProductImage) -> ProductImage {
        let mut image = image.clone();

        if let Some(path) = &self.storage_path {
            image.storage_path.clone_from(path);
        }

        if let Some(alt_text) = &self.alt_text {
            image.alt_text.clone_from(alt_text);
        }

        image
    }
}

/// A variant entry in a product's `variants` sub-collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariant {
    /// Variant id.
    pub id: VariantId,

    /// Zero-based display position.
    pub order: usize,
}

impl ProductVariant {
    /// A variant at the given display position.
    pub fn new(id: impl Into<VariantId>, order: usize) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }
}

/// Pending field changes to a product; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    /// New display name.
    pub name: Option<String>,

    /// New description.
    pub description: Option<String>,

    /// New unit price in minor units.
    pub price: Option<u64>,

    /// New size labels.
    pub sizes: Option<Vec<String>>,

    /// New number toggle.
    pub allow_number: Option<bool>,

    /// New custom name toggle.
    pub allow_custom_name: Option<bool>,

    /// Full replacement image list.
    pub product_images: Option<Vec<ProductImage>>,
}

impl ProductChanges {
    /// Changes that only rename the product.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Changes that only replace the image list.
    #[must_use]
    pub fn images(images: Vec<ProductImage>) -> Self {
        Self {
            product_images: Some(images),
            ..Self::default()
        }
    }
}

impl Changes for ProductChanges {
    type Target = Product;

    fn merge(&mut self, later: Self) {
        let Self {
            name,
            description,
            price,
            sizes,
            allow_number,
            allow_custom_name,
            product_images,
        } = later;

        if name.is_some() {
            self.name = name;
        }

        if description.is_some() {
            self.description = description;
        }

        if price.is_some() {
            self.price = price;
        }

        if sizes.is_some() {
            self.sizes = sizes;
        }

        if allow_number.is_some() {
            self.allow_number = allow_number;
        }

        if allow_custom_name.is_some() {
            self.allow_custom_name = allow_custom_name;
        }

        if product_images.is_some() {
            self.product_images = product_images;
        }
    }

    fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }

        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }

        if let Some(price) = self.price {
            product.price = price;
        }

        if let Some(sizes) = &self.sizes {
            product.sizes.clone_from(sizes);
        }

        if let Some(allow_number) = self.allow_number {
            product.allow_number = allow_number;
        }

        if let Some(allow_custom_name) = self.allow_custom_name {
            product.allow_custom_name = allow_custom_name;
        }

        if let Some(images) = &self.product_images {
            product.product_images.clone_from(images);
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
