//! # Order Types
//!
//! Cart input, priced order and checkout session types for volcart.

use crate::error::{PaymentError, PaymentResult};
use crate::product::{Currency, Price, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity of a cart line, always within `[MIN, MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Quantity(u32);

impl From<i64> for Quantity {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Quantity {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 99;

    /// Clamp any integer into the allowed range
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u32)
    }

    /// Decode a quantity from loosely typed JSON.
    ///
    /// Numbers are truncated toward zero, strings contribute their leading
    /// integer (`"3 bottles"` is 3). Anything else counts as 1.
    pub fn from_json(raw: Option<&serde_json::Value>) -> Self {
        let parsed = match raw {
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(serde_json::Value::String(s)) => leading_integer(s),
            _ => None,
        };
        Self::clamped(parsed.unwrap_or(1))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Leading optionally-signed integer of a string, saturating on overflow
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let value = match digits.parse::<i64>() {
        Ok(v) => v,
        Err(_) => i64::MAX,
    };
    Some(if negative { -value } else { value })
}

/// One line of the submitted cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product id
    pub product_id: String,
    /// Clamped quantity
    pub quantity: Quantity,
    /// Free-text size descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            size: None,
        }
    }

    /// Builder: set size descriptor
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Size descriptor, if one was given and is not blank
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// What a line item charges for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Product,
    Shipping,
}

/// A priced line item in an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Product ID (absent for shipping)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Display name sent to the payment page
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity
    pub quantity: u32,

    pub kind: LineKind,
}

impl LineItem {
    /// Create a line item from a product, naming it after the size if any
    pub fn from_product(product: &Product, quantity: Quantity, size: Option<&str>) -> Self {
        let name = match size {
            Some(size) => format!("{} - {}", product.name, size),
            None => product.name.clone(),
        };

        Self {
            product_id: Some(product.id.clone()),
            name,
            unit_price: product.price,
            quantity: quantity.get(),
            kind: LineKind::Product,
        }
    }

    /// Synthetic shipping line
    pub fn shipping(label: impl Into<String>, fee: Price) -> Self {
        Self {
            product_id: None,
            name: label.into(),
            unit_price: fee,
            quantity: 1,
            kind: LineKind::Shipping,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Running totals of an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of product lines
    pub subtotal: Price,
    /// Sum of parsed volume times quantity, in milliliters
    pub volume_ml: u64,
    /// Shipping fee
    pub shipping: Price,
}

impl OrderTotals {
    pub fn new(currency: Currency) -> Self {
        Self {
            subtotal: Price::zero(currency),
            volume_ml: 0,
            shipping: Price::zero(currency),
        }
    }

    /// Account for one product line. Neither total can decrease.
    ///
    /// A subtotal that no longer fits in cents is an `InvalidRequest`.
    /// Volume saturates.
    pub fn add_line(
        &mut self,
        unit_price: Price,
        quantity: Quantity,
        volume_ml: u64,
    ) -> PaymentResult<()> {
        let amount = unit_price
            .checked_times(quantity.get())
            .and_then(|line| self.subtotal.amount.checked_add(line.amount))
            .ok_or_else(|| PaymentError::InvalidRequest("order total is too large".to_string()))?;

        self.subtotal.amount = amount;
        self.volume_ml = self
            .volume_ml
            .saturating_add(volume_ml.saturating_mul(u64::from(quantity.get())));
        Ok(())
    }

    /// Total volume in liters
    pub fn volume_liters(&self) -> f64 {
        self.volume_ml as f64 / 1000.0
    }

    /// Subtotal plus shipping
    pub fn total(&self) -> Price {
        Price::from_cents(
            self.subtotal.amount.saturating_add(self.shipping.amount),
            self.subtotal.currency,
        )
    }
}

/// A priced order ready for checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    /// Line items, shipping last
    pub line_items: Vec<LineItem>,

    /// Currency (same for all items)
    pub currency: Currency,

    pub totals: OrderTotals,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with generated ID
    pub fn new(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            currency,
            totals: OrderTotals::new(currency),
            created_at: Utc::now(),
        }
    }

    /// Add a line item
    pub fn add_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Calculate order total from the line items
    pub fn total(&self) -> Price {
        let total_amount = self
            .line_items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.total().amount));
        Price::from_cents(total_amount, self.currency)
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get product item count
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .filter(|i| i.kind == LineKind::Product)
            .map(|i| i.quantity)
            .sum()
    }

    /// The shipping line, if one was appended
    pub fn shipping_line(&self) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|i| i.kind == LineKind::Shipping)
    }
}

/// A checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our internal order ID
    pub order_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect customer to for payment
    pub checkout_url: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Create a new checkout session
    pub fn new(
        session_id: impl Into<String>,
        order_id: impl Into<String>,
        provider: impl Into<String>,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            order_id: order_id.into(),
            provider: provider.into(),
            checkout_url: checkout_url.into(),
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}
