use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::error::{CatalogError, Result};

pub const DEFAULT_CATEGORY: &str = "General";

/// Inventory record as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub stock: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a product about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub stock: i64,
    pub is_active: bool,
}

impl Product {
    pub fn new(fields: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            price: fields.price,
            description: fields.description,
            image_url: fields.image_url,
            category: fields.category,
            stock: fields.stock,
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product fields as submitted by a client. Every field is kept as raw JSON
/// and cast when the draft becomes a [`NewProduct`], so `"5"` is a valid
/// stock and `7` a valid name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<JsonValue>,
    /// Single creates coerce it, bulk items cast it.
    pub price: Option<JsonValue>,
    pub description: Option<JsonValue>,
    pub image_url: Option<JsonValue>,
    pub category: Option<JsonValue>,
    pub stock: Option<JsonValue>,
    pub is_active: Option<JsonValue>,
}

impl ProductDraft {
    /// Cast the optional fields. `invalid` builds the error for a field
    /// whose value cannot be cast.
    fn into_new_product<F>(
        self,
        name: String,
        price: f64,
        is_active: bool,
        invalid: F,
    ) -> Result<NewProduct>
    where
        F: Fn(&'static str) -> CatalogError,
    {
        let text = |raw: Option<&JsonValue>, field: &'static str| {
            cast_text(raw).map_err(|_| invalid(field))
        };

        Ok(NewProduct {
            name,
            price,
            description: text(self.description.as_ref(), "description")?.unwrap_or_default(),
            image_url: text(self.image_url.as_ref(), "imageUrl")?.unwrap_or_default(),
            category: text(self.category.as_ref(), "category")?
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            stock: cast_stock(self.stock.as_ref())
                .map_err(|_| invalid("stock"))?
                .unwrap_or(0),
            is_active,
        })
    }

    /// Validate a single-product submission.
    ///
    /// The price is coerced first ("Invalid price"), then the name is
    /// required. Single creates are always active.
    pub fn validate_for_create(self) -> Result<NewProduct> {
        let price = coerce_price(self.price.as_ref())
            .ok_or_else(|| CatalogError::Invalid("Invalid price".to_string()))?;

        let name = match cast_text(self.name.as_ref()) {
            Ok(Some(name)) if !name.is_empty() => name,
            _ => return Err(CatalogError::Invalid("Name and price required".to_string())),
        };

        self.into_new_product(name, price, true, |field| {
            CatalogError::Invalid(format!("Invalid {}", field))
        })
    }

    /// Validate one element of a bulk submission with storage casting rules:
    /// `name` must cast to a non-empty string and `price` to a positive
    /// number. No coercion beyond that.
    pub fn validate_for_bulk(self, index: usize) -> Result<NewProduct> {
        let required =
            || CatalogError::Invalid(format!("Product at index {}: name and price required", index));

        let name = match cast_text(self.name.as_ref()) {
            Ok(Some(name)) if !name.is_empty() => name,
            _ => return Err(required()),
        };
        let price = cast_price(self.price.as_ref()).ok_or_else(required)?;

        let invalid = |field: &'static str| {
            CatalogError::Invalid(format!("Product at index {}: invalid {}", index, field))
        };
        let is_active = cast_flag(self.is_active.as_ref())
            .map_err(|_| invalid("isActive"))?
            .unwrap_or(true);

        self.into_new_product(name, price, is_active, invalid)
    }
}

/// A submitted value that the storage layer could not store in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value cannot be cast")]
pub struct CastError;

/// Best-effort price parsing for hand-typed input such as `"$12.50 each"`.
///
/// The raw value is rendered as text, every character other than ASCII
/// digits and '.' is dropped, and the rest parsed. An absent value, an
/// unparsable remainder, or zero yields `None`.
pub fn coerce_price(raw: Option<&JsonValue>) -> Option<f64> {
    let text = match raw {
        None | Some(JsonValue::Null) | Some(JsonValue::Object(_)) => return None,
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }

    match digits.parse::<f64>() {
        Ok(price) if price.is_finite() && price != 0.0 => Some(price),
        _ => None,
    }
}

/// Strict numeric cast used for bulk items.
pub fn cast_price(raw: Option<&JsonValue>) -> Option<f64> {
    let price = match raw? {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (price.is_finite() && price > 0.0).then_some(price)
}

/// Cast to a text column. Numbers and booleans are rendered as text;
/// absent or null is `None`.
pub fn cast_text(raw: Option<&JsonValue>) -> std::result::Result<Option<String>, CastError> {
    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(CastError),
    }
}

/// Cast to the integer stock column. Numeric strings are parsed; an empty
/// string counts as absent. Fractional values cannot be stored.
pub fn cast_stock(raw: Option<&JsonValue>) -> std::result::Result<Option<i64>, CastError> {
    let number = match raw {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(stock) => return Ok(Some(stock)),
            None => n.as_f64().ok_or(CastError)?,
        },
        Some(JsonValue::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| CastError)?,
        Some(JsonValue::Bool(b)) => return Ok(Some(i64::from(*b))),
        Some(_) => return Err(CastError),
    };

    if number.is_finite() && number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Ok(Some(number as i64))
    } else {
        Err(CastError)
    }
}

/// Cast to the boolean `isActive` column: `true`/`false`, `1`/`0`,
/// `"true"`/`"false"`, `"1"`/`"0"` and `"yes"`/`"no"`.
pub fn cast_flag(raw: Option<&JsonValue>) -> std::result::Result<Option<bool>, CastError> {
    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::Number(n)) => match n.as_f64() {
            Some(v) if v == 1.0 => Ok(Some(true)),
            Some(v) if v == 0.0 => Ok(Some(false)),
            _ => Err(CastError),
        },
        Some(JsonValue::String(s)) => match s.as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(CastError),
        },
        Some(_) => Err(CastError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: JsonValue) -> ProductDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_coerce_price_strips_decoration() {
        assert_eq!(coerce_price(Some(&json!("$12.50 each"))), Some(12.5));
        assert_eq!(coerce_price(Some(&json!("1,299"))), Some(1299.0));
        assert_eq!(coerce_price(Some(&json!(19.99))), Some(19.99));
        assert_eq!(coerce_price(Some(&json!("-5"))), Some(5.0));
        assert_eq!(coerce_price(Some(&json!(".5"))), Some(0.5));
        assert_eq!(coerce_price(Some(&json!([7]))), Some(7.0));
    }

    #[test]
    fn test_coerce_price_rejects_garbage() {
        assert_eq!(coerce_price(Some(&json!("abc"))), None);
        assert_eq!(coerce_price(Some(&json!(""))), None);
        assert_eq!(coerce_price(Some(&json!("0"))), None);
        assert_eq!(coerce_price(Some(&json!("0.00"))), None);
        assert_eq!(coerce_price(Some(&json!("1.2.3"))), None);
        assert_eq!(coerce_price(Some(&json!("."))), None);
        assert_eq!(coerce_price(Some(&json!(true))), None);
        assert_eq!(coerce_price(Some(&json!(null))), None);
        assert_eq!(coerce_price(Some(&json!({"amount": 5}))), None);
        assert_eq!(coerce_price(None), None);
    }

    #[test]
    fn test_cast_price_is_strict() {
        assert_eq!(cast_price(Some(&json!(3))), Some(3.0));
        assert_eq!(cast_price(Some(&json!(" 4.25 "))), Some(4.25));
        assert_eq!(cast_price(Some(&json!("$4"))), None);
        assert_eq!(cast_price(Some(&json!(0))), None);
        assert_eq!(cast_price(Some(&json!(-1))), None);
        assert_eq!(cast_price(Some(&json!("NaN"))), None);
        assert_eq!(cast_price(None), None);
    }

    #[test]
    fn test_create_applies_defaults() {
        let product = draft(json!({"name": "Widget", "price": "$12.50 each"}))
            .validate_for_create()
            .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.description, "");
        assert_eq!(product.image_url, "");
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.stock, 0);
        assert!(product.is_active);
    }

    #[test]
    fn test_create_checks_price_before_name() {
        let err = draft(json!({"price": "abc"})).validate_for_create().unwrap_err();
        assert_eq!(err.to_string(), "Invalid price");

        let err = draft(json!({"price": 10})).validate_for_create().unwrap_err();
        assert_eq!(err.to_string(), "Name and price required");

        let err = draft(json!({"name": "", "price": 10})).validate_for_create().unwrap_err();
        assert_eq!(err.to_string(), "Name and price required");
    }

    #[test]
    fn test_create_ignores_inactive_flag() {
        let product = draft(json!({"name": "W", "price": 1, "isActive": false}))
            .validate_for_create()
            .unwrap();
        assert!(product.is_active);
    }

    #[test]
    fn test_bulk_item_keeps_fields() {
        let product = draft(json!({
            "name": "Crate",
            "price": "8",
            "category": "Storage",
            "stock": 4,
            "imageUrl": "https://img/crate.png",
            "isActive": false
        }))
        .validate_for_bulk(0)
        .unwrap();

        assert_eq!(product.price, 8.0);
        assert_eq!(product.category, "Storage");
        assert_eq!(product.stock, 4);
        assert_eq!(product.image_url, "https://img/crate.png");
        assert!(!product.is_active);
    }

    #[test]
    fn test_numeric_fields_are_cast_like_storage() {
        let product = draft(json!({"name": 7, "price": 5, "stock": "5", "category": 42}))
            .validate_for_create()
            .unwrap();
        assert_eq!(product.name, "7");
        assert_eq!(product.stock, 5);
        assert_eq!(product.category, "42");

        let product = draft(json!({"name": "W", "price": 5, "stock": " 12 ", "isActive": "false"}))
            .validate_for_bulk(0)
            .unwrap();
        assert_eq!(product.stock, 12);
        assert!(!product.is_active);

        let product = draft(json!({"name": "W", "price": 5, "stock": "", "description": null}))
            .validate_for_bulk(0)
            .unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_uncastable_fields_are_named() {
        let err = draft(json!({"name": "W", "price": 5, "stock": "lots"}))
            .validate_for_create()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid stock");

        let err = draft(json!({"name": "W", "price": 5, "stock": 1.5}))
            .validate_for_bulk(2)
            .unwrap_err();
        assert_eq!(err.to_string(), "Product at index 2: invalid stock");

        let err = draft(json!({"name": "W", "price": 5, "isActive": "maybe"}))
            .validate_for_bulk(0)
            .unwrap_err();
        assert_eq!(err.to_string(), "Product at index 0: invalid isActive");

        let err = draft(json!({"name": {"en": "W"}, "price": 5}))
            .validate_for_bulk(1)
            .unwrap_err();
        assert_eq!(err.to_string(), "Product at index 1: name and price required");
    }

    #[test]
    fn test_cast_helpers() {
        assert_eq!(cast_text(Some(&json!(2.5))), Ok(Some("2.5".to_string())));
        assert_eq!(cast_text(Some(&json!(true))), Ok(Some("true".to_string())));
        assert_eq!(cast_text(Some(&json!(["a"]))), Err(CastError));
        assert_eq!(cast_stock(Some(&json!(3.0))), Ok(Some(3)));
        assert_eq!(cast_stock(Some(&json!("-4"))), Ok(Some(-4)));
        assert_eq!(cast_stock(Some(&json!(true))), Ok(Some(1)));
        assert_eq!(cast_stock(Some(&json!("NaN"))), Err(CastError));
        assert_eq!(cast_flag(Some(&json!(0))), Ok(Some(false)));
        assert_eq!(cast_flag(Some(&json!("yes"))), Ok(Some(true)));
        assert_eq!(cast_flag(None), Ok(None));
    }

    #[test]
    fn test_bulk_item_names_its_index() {
        let err = draft(json!({"name": "Crate"})).validate_for_bulk(3).unwrap_err();
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::new(
            draft(json!({"name": "W", "price": 2})).validate_for_create().unwrap(),
        );
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["imageUrl"], "");
        assert_eq!(json["isActive"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("image_url").is_none());
    }
}
