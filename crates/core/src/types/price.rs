//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are sums of many item prices; doing that in binary floating
//! point drifts (`10 + 5.5 + 2.49` is not `17.99` in `f64`). Amounts here are
//! [`Decimal`] throughout and only rounded when formatted.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Number of decimal places shown when a price is displayed.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Sum a sequence of amounts into a single price.
    ///
    /// An empty sequence yields a zero price. Returns `None` if the sum does
    /// not fit in a [`Decimal`].
    #[must_use]
    pub fn total<I>(amounts: I, currency_code: CurrencyCode) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let amount = amounts
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)?;
        Some(Self::new(amount, currency_code))
    }

    /// Format for display (e.g., "$19.99").
    ///
    /// Always shows exactly two decimal places, rounding midpoints away from zero.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rounded = self
            .amount
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::DISPLAY_SCALE);
        format!("{}{rounded}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}
