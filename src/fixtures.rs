//! Fixtures
//!
//! YAML rule sets and carts for the CLI, integration tests and anyone poking at the
//! engine by hand. A set named `lunch` lives in `fixtures/rules/lunch.yml` and
//! `fixtures/carts/lunch.yml`.

use std::{fs, path::PathBuf};

use jiff::tz::TimeZone;
use rusty_money::{Findable, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::{CartError, CartLineRecord, CartSnapshot},
    engine::DiscountEngine,
    rules::record::DiscountRecord,
};

/// Directory `from_set` reads fixture sets from.
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown time zone name
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// No rules loaded yet
    #[error("No rules loaded yet; currency unknown")]
    NoCurrency,

    /// No cart lines loaded
    #[error("No cart lines loaded")]
    NoLines,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// `fixtures/rules/<set>.yml`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesFixture {
    /// ISO 4217 currency code
    pub currency: String,

    /// IANA time zone of the restaurant
    #[serde(default)]
    pub time_zone: Option<String>,

    /// Discount records, in creation order
    #[serde(default)]
    pub discounts: Vec<DiscountRecord>,
}

/// `fixtures/carts/<set>.yml`
#[derive(Debug, Clone, Deserialize)]
pub struct CartFixture {
    /// Cart lines, in cart order
    pub lines: Vec<CartLineRecord>,
}

/// A loaded fixture set.
#[derive(Debug)]
pub struct Fixture {
    base_path: PathBuf,
    currency: Option<&'static Currency>,
    time_zone: Option<String>,
    discounts: Vec<DiscountRecord>,
    lines: Vec<CartLineRecord>,
}

impl Fixture {
    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            currency: None,
            time_zone: None,
            discounts: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Load a rule set from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an unknown currency.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RulesFixture = serde_norway::from_str(&contents)?;

        let currency = Currency::find(fixture.currency.trim())
            .ok_or_else(|| FixtureError::UnknownCurrency(fixture.currency.clone()))?;

        self.currency = Some(currency);
        self.time_zone = fixture.time_zone;
        self.discounts = fixture.discounts;

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        self.lines = fixture.lines;

        Ok(self)
    }

    /// Load a complete fixture set (rules and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(DEFAULT_BASE_PATH);

        fixture.load_rules(name)?.load_cart(name)?;

        Ok(fixture)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no rules have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// The restaurant time zone, UTC if the rule set does not name one.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone name is unknown.
    pub fn time_zone(&self) -> Result<TimeZone, FixtureError> {
        match self.time_zone.as_deref() {
            None => Ok(TimeZone::UTC),
            Some(name) => TimeZone::get(name)
                .map_err(|_unknown| FixtureError::UnknownTimeZone(name.to_string())),
        }
    }

    /// Get all discount records
    pub fn discounts(&self) -> &[DiscountRecord] {
        &self.discounts
    }

    /// Get all cart line records
    pub fn lines(&self) -> &[CartLineRecord] {
        &self.lines
    }

    /// Build an engine from the loaded rule set
    ///
    /// # Errors
    ///
    /// Returns an error if no rules have been loaded.
    pub fn engine(&self) -> Result<DiscountEngine<'static>, FixtureError> {
        Ok(DiscountEngine::from_records(&self.discounts, self.currency()?))
    }

    /// Create a cart from the loaded lines
    ///
    /// # Errors
    ///
    /// Returns an error if no lines are loaded or if cart creation fails.
    pub fn cart(&self) -> Result<CartSnapshot<'static>, FixtureError> {
        let currency = self.currency()?;

        if self.lines.is_empty() {
            return Err(FixtureError::NoLines);
        }

        Ok(CartSnapshot::from_records(self.lines.iter().cloned(), currency)?)
    }
}
