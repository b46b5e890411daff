//! JSON request decoding with field validation.
//!
//! Both components receive a raw body. An empty body is treated as `{}` so
//! that missing-field validation, not JSON parsing, reports the problem.

use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::{CourierError, Result};

/// Decode and validate a JSON body.
///
/// `fields` lists the validated fields in the order they should be reported.
/// On validation failure the error carries the invalid field names joined by `", "`.
pub fn decode<T>(body: &[u8], fields: &[&str]) -> Result<T>
where
    T: DeserializeOwned + Default + Validate,
{
    let value: T = if body.iter().all(u8::is_ascii_whitespace) {
        T::default()
    } else {
        serde_json::from_slice(body)?
    };

    value
        .validate()
        .map_err(|errors| CourierError::Validation(invalid_fields(&errors, fields).join(", ")))?;

    Ok(value)
}

/// Names of the fields that failed validation, in `order`.
///
/// Fields not listed in `order` are appended in sorted order.
pub fn invalid_fields(errors: &ValidationErrors, order: &[&str]) -> Vec<String> {
    let failed: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();

    let mut result: Vec<String> = order
        .iter()
        .filter(|field| failed.iter().any(|f| f.as_str() == **field))
        .map(|field| field.to_string())
        .collect();

    let mut rest: Vec<String> = failed
        .into_iter()
        .filter(|f| !order.contains(&f.as_str()))
        .collect();
    rest.sort();
    result.extend(rest);
    result
}
