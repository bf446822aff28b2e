//! # Pricing
//!
//! Turns a submitted cart into a priced [`Order`]: catalog lookup, size
//! parsing, subtotal and volume accumulation, then the shipping line.
//! A single unknown product rejects the whole cart.

use crate::error::{PaymentError, PaymentResult};
use crate::order::{CartLine, LineItem, Order};
use crate::product::ProductCatalog;
use crate::shipping::ShippingPolicy;
use crate::size::parse_size_to_milliliters;

/// Catalog plus shipping table, immutable once built
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    catalog: ProductCatalog,
    shipping: ShippingPolicy,
}

impl PricingEngine {
    pub fn new(catalog: ProductCatalog, shipping: ShippingPolicy) -> Self {
        Self { catalog, shipping }
    }

    /// Build both the catalog and the shipping table from one TOML document
    pub fn from_toml(toml_str: &str) -> PaymentResult<Self> {
        let catalog = ProductCatalog::from_toml(toml_str)?;
        let shipping = ShippingPolicy::from_toml(toml_str)?;
        Ok(Self::new(catalog, shipping))
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn shipping(&self) -> &ShippingPolicy {
        &self.shipping
    }

    /// Price a cart.
    ///
    /// The returned order holds one line per cart line followed by exactly one
    /// shipping line, which may be free.
    pub fn quote(&self, lines: &[CartLine]) -> PaymentResult<Order> {
        if lines.is_empty() {
            return Err(PaymentError::EmptyCart);
        }

        let mut order = Order::new(self.catalog.currency);

        for line in lines {
            let product = self.catalog.get(&line.product_id).ok_or_else(|| {
                PaymentError::ProductNotFound {
                    product_id: line.product_id.clone(),
                }
            })?;

            let size = line.size();
            let volume_ml = size.map(parse_size_to_milliliters).unwrap_or(0);

            order.totals.add_line(product.price, line.quantity, volume_ml)?;
            order.add_item(LineItem::from_product(product, line.quantity, size));
        }

        let fee = self
            .shipping
            .fee(order.totals.subtotal, order.totals.volume_ml);
        order.totals.shipping = fee;
        order.add_item(LineItem::shipping(self.shipping.label_for(fee), fee));

        Ok(order)
    }
}
