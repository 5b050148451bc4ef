//! Product identifiers.
//!
//! Catalog products are keyed by either a number or a string. The two forms
//! never compare equal, even when their text matches: `ProductId::Number(1)`
//! and `ProductId::Text("1")` are different keys.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty.
    #[error("product id cannot be empty")]
    Empty,
    /// The stored kind tag is not one we know.
    #[error("unknown product id kind: {0}")]
    UnknownKind(String),
    /// A numeric id did not hold a valid integer.
    #[error("invalid numeric product id: {0}")]
    InvalidNumber(String),
}

/// The two shapes a [`ProductId`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductIdKind {
    Number,
    Text,
}

impl ProductIdKind {
    /// Tag used when persisting the id.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
        }
    }

    /// Parse a persisted tag.
    ///
    /// # Errors
    ///
    /// Returns `ProductIdError::UnknownKind` for anything other than
    /// `"number"` or `"text"`.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        match s {
            "number" => Ok(Self::Number),
            "text" => Ok(Self::Text),
            other => Err(ProductIdError::UnknownKind(other.to_owned())),
        }
    }
}

/// Identifier of a catalog product, and therefore of a cart item.
///
/// ## Examples
///
/// ```
/// use corner_shop_core::ProductId;
///
/// let numeric: ProductId = "42".parse().unwrap();
/// let text: ProductId = "p1".parse().unwrap();
///
/// assert_eq!(numeric, ProductId::Number(42));
/// assert_eq!(text, ProductId::from("p1"));
/// assert_ne!(ProductId::Number(1), ProductId::from("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    /// Which form this id takes.
    #[must_use]
    pub const fn kind(&self) -> ProductIdKind {
        match self {
            Self::Number(_) => ProductIdKind::Number,
            Self::Text(_) => ProductIdKind::Text,
        }
    }

    /// The id's value as stored alongside its kind tag.
    #[must_use]
    pub fn storage_value(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Rebuild an id from its persisted kind tag and value.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind tag is unknown, a numeric value does not
    /// parse, or a text value is empty.
    pub fn from_storage(kind: &str, value: &str) -> Result<Self, ProductIdError> {
        match ProductIdKind::parse(kind)? {
            ProductIdKind::Number => value
                .parse::<i64>()
                .map(Self::Number)
                .map_err(|_| ProductIdError::InvalidNumber(value.to_owned())),
            ProductIdKind::Text if value.is_empty() => Err(ProductIdError::Empty),
            ProductIdKind::Text => Ok(Self::Text(value.to_owned())),
        }
    }

    /// Returns `true` for an empty text id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parses all-digit input as [`ProductId::Number`], anything else as
/// [`ProductId::Text`].
impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_text_are_distinct() {
        assert_ne!(ProductId::Number(7), ProductId::from("7"));
        assert_eq!(ProductId::Number(7).storage_value(), "7");
        assert_eq!(ProductId::from("7").storage_value(), "7");
        assert_ne!(ProductId::Number(7).kind(), ProductId::from("7").kind());
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!("12".parse::<ProductId>().unwrap(), ProductId::Number(12));
        assert_eq!("-3".parse::<ProductId>().unwrap(), ProductId::Number(-3));
        assert_eq!(
            "hc-01".parse::<ProductId>().unwrap(),
            ProductId::Text("hc-01".to_owned())
        );
        assert!(matches!("".parse::<ProductId>(), Err(ProductIdError::Empty)));
    }

    #[test]
    fn test_from_storage() {
        assert_eq!(
            ProductId::from_storage("number", "99").unwrap(),
            ProductId::Number(99)
        );
        assert_eq!(
            ProductId::from_storage("text", "99").unwrap(),
            ProductId::from("99")
        );
        assert!(matches!(
            ProductId::from_storage("number", "abc"),
            Err(ProductIdError::InvalidNumber(_))
        ));
        assert!(matches!(
            ProductId::from_storage("uuid", "abc"),
            Err(ProductIdError::UnknownKind(_))
        ));
        assert!(matches!(
            ProductId::from_storage("text", ""),
            Err(ProductIdError::Empty)
        ));
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&ProductId::Number(5)).unwrap();
        assert_eq!(json, "5");
        let json = serde_json::to_string(&ProductId::from("p1")).unwrap();
        assert_eq!(json, "\"p1\"");

        let parsed: ProductId = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(parsed, ProductId::from("5"));
        let parsed: ProductId = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, ProductId::Number(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::Number(3).to_string(), "3");
        assert_eq!(ProductId::from("p1").to_string(), "p1");
    }
}
