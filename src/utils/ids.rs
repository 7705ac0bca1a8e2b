// src/utils/ids.rs

use crate::error::AppError;
use serde::Serializer;

/// Parse a decimal-string identifier from the wire.
///
/// Entity ids cross the transport boundary as decimal strings; internally the
/// store works with integers. Non-numeric input fails with `BadRequest`.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("malformed identifier: {}", raw)))
}

/// Serde helper: render an integer id as its decimal-string wire form.
pub fn id_to_string<S>(id: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_string())
}
