//! # Product Types
//!
//! Product catalog types for volcart.
//! The catalog is loaded once from `config/catalog.toml` and never mutated.

use crate::error::{PaymentError, PaymentResult};
use crate::order::Quantity;
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    CHF,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::CHF => "chf",
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        amount as f64 / 100.0
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF ",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self::from_cents(0, currency)
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Price multiplied by a quantity, saturating at the `i64` bounds
    pub fn times(&self, quantity: u32) -> Self {
        Self::from_cents(self.amount.saturating_mul(i64::from(quantity)), self.currency)
    }

    /// Price multiplied by a quantity, `None` on overflow
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(i64::from(quantity))
            .map(|amount| Self::from_cents(amount, self.currency))
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Format for display (e.g., "€14.90")
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.as_decimal())
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "gs-1l")
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Price,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Catalog as written in the TOML file, prices as decimals
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: Currency,
    #[serde(default)]
    products: Vec<CatalogFileEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFileEntry {
    id: String,
    name: String,
    price: f64,
}

/// Static product catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductCatalog {
    pub currency: Currency,
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            products: Vec::new(),
        }
    }

    /// Builder: add a product priced in the catalog currency.
    ///
    /// Rejects duplicate ids, negative or non-finite prices, and prices whose
    /// line total at the maximum quantity does not fit in cents.
    pub fn with_product(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> PaymentResult<Self> {
        let id = id.into();
        if !price.is_finite() || price < 0.0 {
            return Err(PaymentError::Configuration(format!(
                "product {} has invalid price {}",
                id, price
            )));
        }
        if self.get(&id).is_some() {
            return Err(PaymentError::Configuration(format!(
                "duplicate product id {}",
                id
            )));
        }
        let price = Price::new(price, self.currency);
        if price.checked_times(Quantity::MAX).is_none() {
            return Err(PaymentError::Configuration(format!(
                "product {} price {} is too large",
                id, price.as_decimal()
            )));
        }
        self.products.push(Product::new(id, name, price));
        Ok(self)
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string.
    ///
    /// Tables other than `currency` and `products` are ignored, so the same
    /// file can carry the shipping table.
    pub fn from_toml(toml_str: &str) -> PaymentResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| PaymentError::Configuration(format!("invalid catalog: {}", e)))?;

        file.products
            .into_iter()
            .try_fold(Self::new(file.currency), |catalog, entry| {
                catalog.with_product(entry.id, entry.name, entry.price)
            })
    }
}
