//! Cart

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    categories::CategorySet,
    pricing::{TotalPriceError, line_subtotal, total_price},
};

/// Errors related to cart construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line was submitted with a quantity of zero.
    #[error("Line {0} has a quantity of zero")]
    ZeroQuantity(String),

    /// A line was submitted with a negative unit price.
    #[error("Line {0} has a negative unit price")]
    NegativePrice(String),

    /// Two lines share the same group key.
    #[error("Group key {0} appears more than once")]
    DuplicateGroupKey(String),

    /// Line or cart totals could not be calculated.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),
}

/// One distinct item + options combination in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    group_key: String,
    item_id: String,
    categories: CategorySet,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    subtotal: Money<'a, Currency>,
}

impl<'a> CartLine<'a> {
    /// Create a new cart line, computing its subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity is zero, the unit price is negative,
    /// or the subtotal overflows.
    pub fn new(
        group_key: impl Into<String>,
        item_id: impl Into<String>,
        categories: CategorySet,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, CartError> {
        let group_key = group_key.into();

        if quantity == 0 {
            return Err(CartError::ZeroQuantity(group_key));
        }

        if unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(group_key));
        }

        let subtotal = line_subtotal(&unit_price, quantity)?;

        Ok(Self {
            group_key,
            item_id: item_id.into(),
            categories,
            unit_price,
            quantity,
            subtotal,
        })
    }

    /// Key unique to this item + options combination.
    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    /// Catalog item id.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Categories the item belongs to.
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Price of a single unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Number of units on the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }
}

/// Wire form of a cart line, with prices in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Key unique per distinct item + options combination
    pub group_key: String,

    /// Catalog item id
    pub item_id: String,

    /// Categories the item belongs to
    #[serde(default)]
    pub category_ids: Vec<String>,

    /// Unit price in minor units
    pub unit_price: i64,

    /// Number of units
    pub quantity: u32,
}

impl CartLineRecord {
    /// Convert the record into a validated [`CartLine`] priced in `currency`.
    ///
    /// # Errors
    ///
    /// See [`CartLine::new`].
    pub fn into_line(self, currency: &Currency) -> Result<CartLine<'_>, CartError> {
        CartLine::new(
            self.group_key,
            self.item_id,
            self.category_ids.into_iter().collect(),
            Money::from_minor(self.unit_price, currency),
            self.quantity,
        )
    }
}

/// An immutable view of the cart at the moment discounts are calculated.
#[derive(Debug, Clone)]
pub struct CartSnapshot<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'a Currency,
    subtotal: Money<'a, Currency>,
}

impl<'a> CartSnapshot<'a> {
    /// Create a cart from lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line is in another currency, a group key repeats,
    /// or the subtotal cannot be calculated.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut seen = FxHashSet::default();

        for (idx, line) in lines.iter().enumerate() {
            let line_currency = line.unit_price().currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    idx,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if !seen.insert(line.group_key()) {
                return Err(CartError::DuplicateGroupKey(line.group_key().to_string()));
            }
        }

        let subtotal = total_price(lines.iter().map(CartLine::subtotal), currency)?;

        Ok(Self {
            lines,
            currency,
            subtotal,
        })
    }

    /// Create a cart from wire records priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line is invalid.
    pub fn from_records(
        records: impl IntoIterator<Item = CartLineRecord>,
        currency: &'a Currency,
    ) -> Result<Self, CartError> {
        let lines = records
            .into_iter()
            .map(|record| record.into_line(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_lines(lines, currency)
    }

    /// Iterate the cart lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// The cart lines in order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Get a line by its index.
    pub fn line(&self, idx: usize) -> Option<&CartLine<'a>> {
        self.lines.get(idx)
    }

    /// Pre-discount subtotal of every line.
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn line<'a>(key: &str, price: i64, quantity: u32, currency: &'a Currency) -> CartLine<'a> {
        match CartLine::new(
            key,
            key,
            CategorySet::from_strs(&["mains"]),
            Money::from_minor(price, currency),
            quantity,
        ) {
            Ok(line) => line,
            Err(error) => panic!("invalid test line: {error}"),
        }
    }

    #[test]
    fn empty_cart_keeps_its_currency() -> TestResult {
        let cart = CartSnapshot::with_lines(Vec::<CartLine<'_>>::new(), iso::IDR)?;

        assert_eq!(cart.currency(), iso::IDR);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), &Money::from_minor(0, iso::IDR));

        Ok(())
    }

    #[test]
    fn line_subtotal_is_unit_price_times_quantity() {
        let line = line("nasi-goreng", 1_000, 3, iso::USD);

        assert_eq!(line.subtotal(), &Money::from_minor(3_000, iso::USD));
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let result = CartLine::new(
            "tea",
            "tea",
            CategorySet::default(),
            Money::from_minor(500, iso::USD),
            0,
        );

        assert_eq!(result, Err(CartError::ZeroQuantity("tea".to_string())));
    }

    #[test]
    fn negative_price_line_is_rejected() {
        let result = CartLine::new(
            "tea",
            "tea",
            CategorySet::default(),
            Money::from_minor(-500, iso::USD),
            1,
        );

        assert_eq!(result, Err(CartError::NegativePrice("tea".to_string())));
    }

    #[test]
    fn with_lines_currency_mismatch_errors() {
        let lines = vec![line("a", 100, 1, iso::USD), line("b", 100, 1, iso::GBP)];

        let result = CartSnapshot::with_lines(lines, iso::USD);

        match result {
            Err(CartError::CurrencyMismatch(idx, line_currency, cart_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(line_currency, iso::GBP.iso_alpha_code);
                assert_eq!(cart_currency, iso::USD.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn with_lines_rejects_duplicate_group_keys() {
        let lines = vec![line("a", 100, 1, iso::USD), line("a", 200, 1, iso::USD)];

        let result = CartSnapshot::with_lines(lines, iso::USD);

        assert!(matches!(result, Err(CartError::DuplicateGroupKey(key)) if key == "a"));
    }

    #[test]
    fn subtotal_sums_line_subtotals() -> TestResult {
        let lines = vec![line("a", 1_000, 3, iso::USD), line("b", 250, 2, iso::USD)];

        let cart = CartSnapshot::with_lines(lines, iso::USD)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), &Money::from_minor(3_500, iso::USD));

        Ok(())
    }

    #[test]
    fn from_records_builds_lines_in_order() -> TestResult {
        let records = vec![
            CartLineRecord {
                group_key: "latte-oat".to_string(),
                item_id: "latte".to_string(),
                category_ids: vec!["coffee".to_string()],
                unit_price: 4_500,
                quantity: 2,
            },
            CartLineRecord {
                group_key: "croissant".to_string(),
                item_id: "croissant".to_string(),
                category_ids: vec![],
                unit_price: 3_000,
                quantity: 1,
            },
        ];

        let cart = CartSnapshot::from_records(records, iso::USD)?;

        let keys: Vec<&str> = cart.iter().map(CartLine::group_key).collect();

        assert_eq!(keys, vec!["latte-oat", "croissant"]);
        assert!(cart.line(0).is_some_and(|line| line.categories().contains("coffee")));
        assert_eq!(cart.subtotal(), &Money::from_minor(12_000, iso::USD));

        Ok(())
    }
}
