use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const DEFAULT_CATEGORY: &str = "Other";

/// Core product entity, stored and served in this exact field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Kept as a JSON number so `0` stays `0` and `9.5` stays `9.5`.
    #[serde(default = "default_price")]
    pub price: Number,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_price() -> Number {
    Number::from(0)
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// The whole persisted document: `{ "products": [...] }` in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    /// `max(id) + 1`, or 1 for an empty catalog. Gaps are never refilled.
    /// `None` once the largest id is `i64::MAX`.
    pub fn next_id(&self) -> Option<i64> {
        self.products.iter().map(|p| p.id).max().unwrap_or(0).checked_add(1)
    }

    pub fn position(&self, id: &RequestedId) -> Option<usize> {
        self.products.iter().position(|p| id.matches(p.id))
    }

    pub fn find(&self, id: &RequestedId) -> Option<&Product> {
        self.position(id).map(|index| &self.products[index])
    }
}

// ── Path identifiers ─────────────────────────────────────────────────────────

/// Identifier taken from a `/products/:id` path segment.
///
/// Parsing keeps the leading integer of the segment (`"12abc"` is 12,
/// `"1.5"` is 1). A segment without leading digits becomes [`RequestedId::NaN`],
/// which never matches a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedId {
    Number(i64),
    /// Digits too large for an id; kept verbatim for messages.
    OutOfRange(String),
    NaN,
}

impl RequestedId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Self::NaN;
        }

        let literal = if negative {
            format!("-{}", &rest[..digits])
        } else {
            rest[..digits].to_string()
        };

        match literal.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::OutOfRange(literal),
        }
    }

    pub fn matches(&self, id: i64) -> bool {
        matches!(self, Self::Number(n) if *n == id)
    }
}

impl fmt::Display for RequestedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::OutOfRange(literal) => f.write_str(literal),
            Self::NaN => f.write_str("NaN"),
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Number>,
    pub category: Option<String>,
}

impl CreateProduct {
    /// Builds the stored record, filling defaults. `None` when the payload has
    /// no usable name.
    pub fn into_product(self, id: i64) -> Option<Product> {
        let name = self.name.filter(|name| !name.is_empty())?;

        Some(Product {
            id,
            name,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_else(default_price),
            category: self
                .category
                .filter(|category| !category.is_empty())
                .unwrap_or_else(default_category),
        })
    }
}

/// Partial update. A field set to `Some` overwrites the stored value even when
/// it is `""` or `0`; `None` (absent or `null`) leaves it untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Number>,
    pub category: Option<String>,
}

impl UpdateProduct {
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: "Juicy".to_string(),
            price: Number::from_f64(9.5).unwrap(),
            category: "Mains".to_string(),
        }
    }

    // ── RequestedId ────────────────────────────────────────────────────────────

    #[test]
    fn parse_plain_integer() {
        assert_eq!(RequestedId::parse("42"), RequestedId::Number(42));
    }

    #[test]
    fn parse_keeps_leading_integer() {
        assert_eq!(RequestedId::parse("12abc"), RequestedId::Number(12));
        assert_eq!(RequestedId::parse("1.5"), RequestedId::Number(1));
        assert_eq!(RequestedId::parse("  7"), RequestedId::Number(7));
        assert_eq!(RequestedId::parse("-3"), RequestedId::Number(-3));
    }

    #[test]
    fn parse_non_numeric_is_nan() {
        assert_eq!(RequestedId::parse("abc"), RequestedId::NaN);
        assert_eq!(RequestedId::parse(""), RequestedId::NaN);
        assert_eq!(RequestedId::parse("-"), RequestedId::NaN);
    }

    #[test]
    fn parse_oversized_digits_keeps_literal() {
        let id = RequestedId::parse("100000000000000000000xyz");
        assert_eq!(id, RequestedId::OutOfRange("100000000000000000000".to_string()));
        assert_eq!(id.to_string(), "100000000000000000000");
        assert!(!id.matches(0));

        assert_eq!(
            RequestedId::parse("-99999999999999999999").to_string(),
            "-99999999999999999999"
        );
        assert_eq!(
            RequestedId::parse("-9223372036854775808"),
            RequestedId::Number(i64::MIN)
        );
    }

    #[test]
    fn nan_matches_nothing_and_displays_as_nan() {
        assert!(!RequestedId::NaN.matches(0));
        assert_eq!(RequestedId::NaN.to_string(), "NaN");
        assert_eq!(RequestedId::Number(99).to_string(), "99");
    }

    // ── Catalog ────────────────────────────────────────────────────────────────

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(Catalog::default().next_id(), Some(1));
    }

    #[test]
    fn next_id_follows_max_not_len() {
        let catalog = Catalog {
            products: vec![make(5, "B"), make(2, "A")],
        };
        assert_eq!(catalog.next_id(), Some(6));
    }

    #[test]
    fn next_id_is_none_at_i64_max() {
        let catalog = Catalog {
            products: vec![make(i64::MAX, "Max")],
        };
        assert_eq!(catalog.next_id(), None);
    }

    #[test]
    fn find_returns_first_match() {
        let catalog = Catalog {
            products: vec![make(1, "A"), make(2, "B")],
        };
        assert_eq!(catalog.find(&RequestedId::Number(2)).map(|p| p.name.as_str()), Some("B"));
        assert!(catalog.find(&RequestedId::Number(3)).is_none());
    }

    #[test]
    fn stored_record_missing_optional_fields_gets_defaults() {
        let product: Product = serde_json::from_value(json!({ "id": 3, "name": "Soup" })).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.price, Number::from(0));
        assert_eq!(product.category, "Other");
    }

    #[test]
    fn empty_document_is_an_empty_catalog() {
        let catalog: Catalog = serde_json::from_str("{}").unwrap();
        assert!(catalog.products.is_empty());
    }

    // ── Payloads ───────────────────────────────────────────────────────────────

    #[test]
    fn create_fills_defaults() {
        let payload: CreateProduct = serde_json::from_value(json!({ "name": "Burger" })).unwrap();
        let product = payload.into_product(1).unwrap();
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({ "id": 1, "name": "Burger", "description": "", "price": 0, "category": "Other" })
        );
    }

    #[test]
    fn create_empty_category_falls_back_to_other() {
        let payload: CreateProduct =
            serde_json::from_value(json!({ "name": "Tea", "category": "" })).unwrap();
        assert_eq!(payload.into_product(1).unwrap().category, "Other");
    }

    #[test]
    fn create_without_usable_name_is_rejected() {
        assert!(CreateProduct::default().into_product(1).is_none());
        let empty: CreateProduct = serde_json::from_value(json!({ "name": "" })).unwrap();
        assert!(empty.into_product(1).is_none());
        let null: CreateProduct = serde_json::from_value(json!({ "name": null })).unwrap();
        assert!(null.into_product(1).is_none());
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let mut product = make(1, "Burger");
        let patch: UpdateProduct = serde_json::from_value(json!({ "price": 12 })).unwrap();
        patch.apply_to(&mut product);
        assert_eq!(product.price, Number::from(12));
        assert_eq!(product.name, "Burger");
        assert_eq!(product.description, "Juicy");
        assert_eq!(product.category, "Mains");
    }

    #[test]
    fn update_applies_falsy_values() {
        let mut product = make(1, "Burger");
        let patch: UpdateProduct =
            serde_json::from_value(json!({ "description": "", "price": 0, "id": 50 })).unwrap();
        patch.apply_to(&mut product);
        assert_eq!(product.description, "");
        assert_eq!(product.price, Number::from(0));
        assert_eq!(product.id, 1);
    }
}
