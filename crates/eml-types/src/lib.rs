//! Small validated primitives shared by the EML crates.
//!
//! - [`DataPackageId`]: a strictly positive data package identifier.
//! - [`NonEmptyText`]: trimmed text guaranteed to contain at least one non-whitespace character.
//! - [`calendar_date`]: truncation of an ISO-8601 timestamp to its calendar-date part.

/// Errors that can occur when creating validated types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The identifier was zero or negative
    #[error("Identifier must be a positive integer, got {0}")]
    NonPositiveId(i64),
}

/// Identifier of a data package, the top-level entity an EML record describes.
///
/// Relational identifiers are serial keys, so zero and negative values never name a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPackageId(i64);

impl DataPackageId {
    /// Creates a new `DataPackageId`, rejecting zero and negative values.
    pub fn new(value: i64) -> Result<Self, TypesError> {
        if value <= 0 {
            return Err(TypesError::NonPositiveId(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, returning `TypesError::Empty` for blank input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but maps blank or missing input to `None`.
    pub fn from_optional(input: Option<&str>) -> Option<Self> {
        input.and_then(|value| Self::new(value).ok())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns the calendar-date part of an ISO-8601 timestamp.
///
/// The result is the substring up to, not including, the first `T`. Inputs without a `T`
/// (already date-only values such as `2021-01-01`) are returned unchanged.
pub fn calendar_date(timestamp: &str) -> &str {
    match timestamp.split_once('T') {
        Some((date, _)) => date,
        None => timestamp,
    }
}
