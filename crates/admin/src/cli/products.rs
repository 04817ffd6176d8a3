use std::io::Write;

use clap::{Args, Subcommand};
use rustc_hash::FxHashMap;

use storefront::{money::format_currency, products::ProductId, reports::write_products_table};
use storefront_admin::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List every product
    List,

    /// Show a product with its images and variants
    Show {
        /// Product id
        id: String,
    },
}

pub(crate) async fn run(
    app: &AppContext,
    command: ProductsCommand,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List => list(app, out).await,
        ProductsSubcommand::Show { id } => show(app, &ProductId::new(id), out).await,
    }
}

async fn list(app: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let products = app
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    let mut variant_counts = FxHashMap::default();

    for product in &products {
        let variants = app
            .products
            .list_variants(&product.id)
            .await
            .map_err(|error| format!("failed to list variants of {}: {error}", product.id))?;

        variant_counts.insert(product.id.clone(), variants.len());
    }

    write_products_table(out, &products, &variant_counts).map_err(|error| error.to_string())
}

async fn show(app: &AppContext, id: &ProductId, out: &mut impl Write) -> Result<(), String> {
    let mut editor = app.editor();

    editor
        .select(id)
        .await
        .map_err(|error| format!("failed to load product {id}: {error}"))?;

    let product = editor
        .confirmed()
        .ok_or_else(|| format!("product {id} is not selected"))?;

    let mut lines = vec![
        format!("id: {}", product.id),
        format!("name: {}", product.name),
        format!("price: {}", format_currency(product.price)),
        format!("sizes: {}", product.sizes.join(", ")),
        format!("allow_number: {}", product.allow_number),
        format!("allow_custom_name: {}", product.allow_custom_name),
    ];

    if !product.description.is_empty() {
        lines.push(format!("description: {}", product.description));
    }

    for image in &product.product_images {
        lines.push(format!(
            "image: {}{}",
            image.storage_path,
            image
                .alt_text
                .as_deref()
                .map_or_else(String::new, |alt| format!(" ({alt})"))
        ));
    }

    for variant in editor.variants() {
        lines.push(format!("variant {}: {}", variant.order, variant.id));
    }

    writeln!(out, "{}", lines.join("\n")).map_err(|error| error.to_string())
}
