use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places shown when an amount is presented
pub const DISPLAY_SCALE: u32 = 2;

/// Three-character currency code (ISO-4217 shaped, not checked against a registry)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Number of characters every code has
    pub const LENGTH: usize = 3;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rounds an amount for presentation
    ///
    /// Only the presentation layer calls this; accumulated totals are kept exact.
    pub fn round_for_display(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Formats an amount for display with the currency code, e.g. `35.96 USD`
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!(
            "{:.width$} {}",
            Self::round_for_display(amount),
            self,
            width = DISPLAY_SCALE as usize
        )
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() == Self::LENGTH {
            Ok(CurrencyCode(s.to_string()))
        } else {
            Err(format!(
                "Currency must be exactly {} characters, got: {:?}",
                Self::LENGTH,
                s
            ))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}
