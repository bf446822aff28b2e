//! # Shipping Policy
//!
//! Tiered shipping fees keyed on order volume, with free shipping above a
//! subtotal threshold.
//!
//! ```text
//!   subtotal <= 0            -> 0
//!   subtotal >= free_from    -> 0
//!   volume <= 2 L            -> 6.90
//!   volume <= 5 L            -> 9.90
//!   volume  > 5 L            -> 14.90
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::product::{Currency, Price};
use serde::{Deserialize, Serialize};

/// A volume bracket: orders up to `max_liters` (inclusive) pay `fee`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShippingBracket {
    pub max_liters: f64,
    pub fee: f64,
}

impl ShippingBracket {
    /// Upper bound in whole milliliters
    pub fn max_milliliters(&self) -> u64 {
        (self.max_liters * 1000.0).round() as u64
    }
}

/// Shipping table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingPolicy {
    /// Subtotal from which shipping is free
    pub free_from: f64,
    /// Ascending volume brackets
    pub brackets: Vec<ShippingBracket>,
    /// Fee for volumes above the last bracket
    pub overflow_fee: f64,
    /// Line item label when shipping is free
    pub free_label: String,
    /// Line item label when shipping is charged
    pub paid_label: String,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_from: 220.0,
            brackets: vec![
                ShippingBracket {
                    max_liters: 2.0,
                    fee: 6.90,
                },
                ShippingBracket {
                    max_liters: 5.0,
                    fee: 9.90,
                },
            ],
            overflow_fee: 14.90,
            free_label: "Free shipping".to_string(),
            paid_label: "Shipping (Colissimo)".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ShippingFile {
    shipping: Option<ShippingPolicy>,
}

impl ShippingPolicy {
    /// Check that the table is usable: non-negative amounts and strictly
    /// ascending bracket bounds.
    pub fn validate(self) -> PaymentResult<Self> {
        let amounts = std::iter::once(self.free_from)
            .chain(std::iter::once(self.overflow_fee))
            .chain(self.brackets.iter().map(|b| b.fee));
        for amount in amounts {
            if !amount.is_finite() || amount < 0.0 {
                return Err(PaymentError::Configuration(format!(
                    "invalid shipping amount {}",
                    amount
                )));
            }
        }

        for pair in self.brackets.windows(2) {
            if pair[1].max_liters <= pair[0].max_liters {
                return Err(PaymentError::Configuration(format!(
                    "shipping brackets must be ascending: {} L follows {} L",
                    pair[1].max_liters, pair[0].max_liters
                )));
            }
        }

        Ok(self)
    }

    /// Read the `[shipping]` table of a TOML document.
    ///
    /// A document without the table yields the default policy.
    pub fn from_toml(toml_str: &str) -> PaymentResult<Self> {
        let file: ShippingFile = toml::from_str(toml_str)
            .map_err(|e| PaymentError::Configuration(format!("invalid shipping table: {}", e)))?;
        file.shipping.unwrap_or_default().validate()
    }

    /// Shipping fee for an order with the given subtotal and volume
    pub fn fee(&self, subtotal: Price, volume_ml: u64) -> Price {
        let currency = subtotal.currency;
        if subtotal.amount <= 0 {
            return Price::zero(currency);
        }
        if subtotal.amount >= currency.to_smallest_unit(self.free_from) {
            return Price::zero(currency);
        }

        let fee = self
            .brackets
            .iter()
            .find(|bracket| volume_ml <= bracket.max_milliliters())
            .map(|bracket| bracket.fee)
            .unwrap_or(self.overflow_fee);

        Price::new(fee, currency)
    }

    /// Label for the shipping line item
    pub fn label_for(&self, fee: Price) -> &str {
        if fee.is_zero() {
            &self.free_label
        } else {
            &self.paid_label
        }
    }

    /// Free-shipping threshold in the given currency
    pub fn free_from_price(&self, currency: Currency) -> Price {
        Price::new(self.free_from, currency)
    }
}
