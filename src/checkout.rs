//! Checkout cost summary

use std::io;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    money::{format_currency, line_total},
    orders::CartItem,
    products::{Product, ProductId},
};

/// Title row of the summary.
pub const SUMMARY_TITLE: &str = "Order Summary";

/// Label of the subtotal row.
pub const SUBTOTAL_LABEL: &str = "Subtotal";

/// Label of the shipping row.
pub const SHIPPING_LABEL: &str = "Shipping & Handling";

/// Label of the total row.
pub const TOTAL_LABEL: &str = "Order Total";

/// Errors raised while rendering a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Writing the output failed.
    #[error("failed to write summary")]
    Io(#[from] io::Error),
}

/// An item being checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutItem {
    /// Display name of the product.
    pub product_name: String,

    /// Units being bought.
    pub quantity: u32,

    /// Price per unit in minor units.
    pub unit_price: u64,
}

impl CheckoutItem {
    /// A checkout line for a cart item, named after its product or, when the
    /// product is unknown, its product id.
    #[must_use]
    pub fn from_cart_item(item: &CartItem, products: &FxHashMap<ProductId, Product>) -> Self {
        let product_name = products
            .get(&item.product_id)
            .map_or_else(|| item.product_id.to_string(), |product| product.name.clone());

        Self {
            product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }

    /// Cost of the whole line.
    #[must_use]
    pub fn cost(&self) -> u64 {
        line_total(self.unit_price, self.quantity)
    }
}

/// Payment amounts returned when a checkout is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentBreakdown {
    /// Sum of item costs.
    pub subtotal: u64,

    /// Shipping and handling, when charged.
    pub shipping: Option<u64>,

    /// Amount due.
    pub total: u64,
}

impl PaymentBreakdown {
    /// Price a list of items with optional shipping.
    #[must_use]
    pub fn for_items(items: &[CheckoutItem], shipping: Option<u64>) -> Self {
        let subtotal = items
            .iter()
            .fold(0_u64, |sum, item| sum.saturating_add(item.cost()));

        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping.unwrap_or_default()),
        }
    }

    /// Shipping amount when it is charged and non-zero.
    #[must_use]
    pub fn charged_shipping(&self) -> Option<u64> {
        self.shipping.filter(|amount| *amount > 0)
    }
}

/// One rendered row of a cost summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryRow {
    /// Heading.
    Title,

    /// Section separator.
    Divider,

    /// Labelled amount.
    Line {
        /// Row label.
        label: String,

        /// Amount in minor units.
        amount: u64,
    },

    /// Final amount due.
    Total {
        /// Amount in minor units.
        amount: u64,
    },
}

/// The cost summary shown beside a checkout form.
#[derive(Debug, Clone)]
pub struct CostSummary<'a> {
    items: &'a [CheckoutItem],
    payment: PaymentBreakdown,
}

impl<'a> CostSummary<'a> {
    /// Summarise `items` with the given payment breakdown.
    #[must_use]
    pub fn new(items: &'a [CheckoutItem], payment: PaymentBreakdown) -> Self {
        Self { items, payment }
    }

    /// Rows in display order.
    ///
    /// The subtotal and shipping rows only appear when shipping is charged.
    #[must_use]
    pub fn rows(&self) -> Vec<SummaryRow> {
        let mut rows = Vec::with_capacity(self.items.len() + 6);

        rows.push(SummaryRow::Title);
        rows.push(SummaryRow::Divider);

        rows.extend(self.items.iter().map(|item| SummaryRow::Line {
            label: item.product_name.clone(),
            amount: item.cost(),
        }));

        if let Some(shipping) = self.payment.charged_shipping() {
            rows.push(SummaryRow::Divider);
            rows.push(SummaryRow::Line {
                label: SUBTOTAL_LABEL.to_string(),
                amount: self.payment.subtotal,
            });
            rows.push(SummaryRow::Line {
                label: SHIPPING_LABEL.to_string(),
                amount: shipping,
            });
        }

        rows.push(SummaryRow::Divider);
        rows.push(SummaryRow::Total {
            amount: self.payment.total,
        });

        rows
    }

    /// Formatted amount due.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_currency(self.payment.total)
    }

    /// Render the summary as a terminal table.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Io`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();
        let mut divider_rows: SmallVec<[usize; 4]> = SmallVec::new();
        let mut record_count = 0_usize;

        for row in self.rows() {
            match row {
                SummaryRow::Title => {
                    builder.push_record([SUMMARY_TITLE.to_string(), String::new()]);
                }
                SummaryRow::Divider => {
                    divider_rows.push(record_count);
                    continue;
                }
                SummaryRow::Line { label, amount } => {
                    builder.push_record([label, format_currency(amount)]);
                }
                SummaryRow::Total { amount } => {
                    builder.push_record([TOTAL_LABEL.to_string(), format_currency(amount)]);
                }
            }

            record_count += 1;
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();

        for &row in &divider_rows {
            if row > 0 && row < record_count {
                theme.insert_horizontal_line(row, separator);
            }
        }

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Rows::one(record_count.saturating_sub(1)), Color::BOLD);
        table.modify(Columns::one(1), Alignment::right());

        writeln!(out, "{table}")?;

        Ok(())
    }
}
