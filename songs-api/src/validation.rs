//! Rating payload validation
//!
//! Decodes the body of `POST /songs/rating` into a typed [`SongRating`].
//! Every violation is collected before returning, keyed by field name.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use serde_json::{Map, Number, Value};
use songs_common::SongId;

use crate::error::{ApiError, ErrorMessage};

pub const ID_FIELD: &str = "_id";
/// Accepted in place of `_id`
pub const ID_ALIAS: &str = "id";
pub const RATING_FIELD: &str = "rating";
/// Key for errors about the payload as a whole
pub const SCHEMA_FIELD: &str = "_schema";

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

pub const MSG_MISSING: &str = "Missing data for required field.";
pub const MSG_UNKNOWN: &str = "Unknown field.";
pub const MSG_NULL: &str = "Field may not be null.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_INTEGER: &str = "Not a valid integer.";
pub const MSG_INVALID_INPUT: &str = "Invalid input type.";
pub const MSG_RATING_RANGE: &str = "Rating must be in between 1 and 5";

/// A validated rating submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRating {
    id: SongId,
    rating: i64,
}

impl SongRating {
    pub fn id(&self) -> &SongId {
        &self.id
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }
}

/// Validation failures, field name to messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::InvalidRequest(ErrorMessage::Fields(errors.0))
    }
}

/// Validate a rating payload
pub fn validate_rating_payload(payload: &Value) -> Result<SongRating, FieldErrors> {
    let mut errors = FieldErrors::default();

    let Some(fields) = payload.as_object() else {
        errors.add(SCHEMA_FIELD, MSG_INVALID_INPUT);
        return Err(errors);
    };

    for key in fields.keys() {
        let known = match key.as_str() {
            ID_FIELD | RATING_FIELD => true,
            // The alias only counts when the canonical key is absent
            ID_ALIAS => !fields.contains_key(ID_FIELD),
            _ => false,
        };
        if !known {
            errors.add(key, MSG_UNKNOWN);
        }
    }

    let id = validate_id(fields, &mut errors);
    let rating = validate_rating(fields, &mut errors);

    match (id, rating) {
        (Some(id), Some(rating)) if errors.is_empty() => Ok(SongRating { id, rating }),
        _ => Err(errors),
    }
}

fn validate_id(fields: &Map<String, Value>, errors: &mut FieldErrors) -> Option<SongId> {
    let (key, value) = match fields.get(ID_FIELD) {
        Some(value) => (ID_FIELD, value),
        None => match fields.get(ID_ALIAS) {
            Some(value) => (ID_ALIAS, value),
            None => {
                errors.add(ID_FIELD, MSG_MISSING);
                return None;
            }
        },
    };

    match value {
        Value::String(raw) => match SongId::parse(raw) {
            Ok(id) => Some(id),
            Err(err) => {
                errors.add(key, err.to_string());
                None
            }
        },
        Value::Null => {
            errors.add(key, MSG_NULL);
            None
        }
        _ => {
            errors.add(key, MSG_NOT_STRING);
            None
        }
    }
}

fn validate_rating(fields: &Map<String, Value>, errors: &mut FieldErrors) -> Option<i64> {
    let rating = match fields.get(RATING_FIELD) {
        None => {
            errors.add(RATING_FIELD, MSG_MISSING);
            return None;
        }
        Some(Value::Null) => {
            errors.add(RATING_FIELD, MSG_NULL);
            return None;
        }
        Some(value) => match coerce_integer(value) {
            Some(rating) => rating,
            None => {
                errors.add(RATING_FIELD, MSG_NOT_INTEGER);
                return None;
            }
        },
    };

    match i64::try_from(rating) {
        Ok(rating) if (RATING_MIN..=RATING_MAX).contains(&rating) => Some(rating),
        _ => {
            errors.add(RATING_FIELD, MSG_RATING_RANGE);
            None
        }
    }
}

/// Integer value of a rating, if it has one
///
/// Accepts JSON integers of any size, floats with no fractional part (`4.0`)
/// and strings holding an integer (`"4"`). Magnitudes beyond `i128` saturate,
/// which still fails the range check.
fn coerce_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number_as_integer(number),
        Value::String(raw) => string_as_integer(raw),
        _ => None,
    }
}

fn number_as_integer(number: &Number) -> Option<i128> {
    if let Some(value) = number.as_i64() {
        return Some(value.into());
    }
    if let Some(value) = number.as_u64() {
        return Some(value.into());
    }
    number
        .as_f64()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i128)
}

fn string_as_integer(raw: &str) -> Option<i128> {
    match raw.trim().parse::<i128>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i128::MAX),
            IntErrorKind::NegOverflow => Some(i128::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "5f1e9c3a2b4d6e8f0a1b2c3d";

    #[test]
    fn test_valid_payload() {
        let rating = validate_rating_payload(&json!({"_id": ID, "rating": 4})).unwrap();
        assert_eq!(rating.id().as_str(), ID);
        assert_eq!(rating.rating(), 4);
    }

    #[test]
    fn test_id_alias_accepted() {
        let rating = validate_rating_payload(&json!({"id": ID, "rating": 1})).unwrap();
        assert_eq!(rating.id().as_str(), ID);
    }

    #[test]
    fn test_boundaries_inclusive() {
        assert!(validate_rating_payload(&json!({"_id": ID, "rating": 1})).is_ok());
        assert!(validate_rating_payload(&json!({"_id": ID, "rating": 5})).is_ok());
        assert!(validate_rating_payload(&json!({"_id": ID, "rating": 0})).is_err());
        assert!(validate_rating_payload(&json!({"_id": ID, "rating": 6})).is_err());
    }

    #[test]
    fn test_missing_rating_and_unknown_field_collected() {
        let errors = validate_rating_payload(&json!({"_id": ID, "haha": 5})).unwrap_err();

        assert_eq!(errors.get("rating"), Some(&[MSG_MISSING.to_string()][..]));
        assert_eq!(errors.get("haha"), Some(&[MSG_UNKNOWN.to_string()][..]));
        assert!(errors.get("_id").is_none());
    }

    #[test]
    fn test_rating_out_of_range() {
        let errors = validate_rating_payload(&json!({"_id": ID, "rating": 7})).unwrap_err();
        assert_eq!(errors.get("rating"), Some(&[MSG_RATING_RANGE.to_string()][..]));
    }

    #[test]
    fn test_malformed_id() {
        let errors = validate_rating_payload(&json!({"_id": "123456", "rating": 3})).unwrap_err();
        assert_eq!(
            errors.get("_id"),
            Some(&["123456 is not valid identifier".to_string()][..])
        );
    }

    #[test]
    fn test_numeric_string_rating_accepted() {
        let rating = validate_rating_payload(&json!({"_id": ID, "rating": "4"})).unwrap();
        assert_eq!(rating.rating(), 4);

        let rating = validate_rating_payload(&json!({"_id": ID, "rating": " 2 "})).unwrap();
        assert_eq!(rating.rating(), 2);
    }

    #[test]
    fn test_numeric_string_rating_range_checked() {
        let errors = validate_rating_payload(&json!({"_id": ID, "rating": "7"})).unwrap_err();
        assert_eq!(errors.get("rating"), Some(&[MSG_RATING_RANGE.to_string()][..]));
    }

    #[test]
    fn test_huge_ratings_are_out_of_range() {
        for rating in [
            json!(18446744073709551615u64),
            json!(1e19),
            json!(-1e300),
            json!("99999999999999999999999999999999999999999"),
        ] {
            let errors =
                validate_rating_payload(&json!({"_id": ID, "rating": rating})).unwrap_err();
            assert_eq!(
                errors.get("rating"),
                Some(&[MSG_RATING_RANGE.to_string()][..]),
                "rating {}",
                rating
            );
        }
    }

    #[test]
    fn test_wrong_types() {
        let errors = validate_rating_payload(&json!({"_id": 42, "rating": "five"})).unwrap_err();
        assert_eq!(errors.get("_id"), Some(&[MSG_NOT_STRING.to_string()][..]));
        assert_eq!(errors.get("rating"), Some(&[MSG_NOT_INTEGER.to_string()][..]));

        let errors = validate_rating_payload(&json!({"_id": ID, "rating": 2.5})).unwrap_err();
        assert_eq!(errors.get("rating"), Some(&[MSG_NOT_INTEGER.to_string()][..]));
    }

    #[test]
    fn test_integral_float_rating_accepted() {
        let rating = validate_rating_payload(&json!({"_id": ID, "rating": 3.0})).unwrap();
        assert_eq!(rating.rating(), 3);
    }

    #[test]
    fn test_null_fields() {
        let errors = validate_rating_payload(&json!({"_id": null, "rating": null})).unwrap_err();
        assert_eq!(errors.get("_id"), Some(&[MSG_NULL.to_string()][..]));
        assert_eq!(errors.get("rating"), Some(&[MSG_NULL.to_string()][..]));
    }

    #[test]
    fn test_empty_object_reports_both_required() {
        let errors = validate_rating_payload(&json!({})).unwrap_err();
        assert_eq!(errors.get("_id"), Some(&[MSG_MISSING.to_string()][..]));
        assert_eq!(errors.get("rating"), Some(&[MSG_MISSING.to_string()][..]));
    }

    #[test]
    fn test_both_id_keys_flags_alias() {
        let errors =
            validate_rating_payload(&json!({"_id": ID, "id": ID, "rating": 3})).unwrap_err();
        assert_eq!(errors.get("id"), Some(&[MSG_UNKNOWN.to_string()][..]));
    }

    #[test]
    fn test_non_object_payload() {
        let errors = validate_rating_payload(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.get(SCHEMA_FIELD), Some(&[MSG_INVALID_INPUT.to_string()][..]));
    }
}
