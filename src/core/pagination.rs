//! Paging primitives shared by every search operation.
//!
//! A [`Pageable`] is built from the optional `page`/`size` query parameters and
//! the configured limits; searches answer with a [`Page`].

use crate::{
    config::PaginationConfig,
    errors::{Error, Result},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

/// SQL offsets are signed 64-bit.
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Zero-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    /// Zero-based page number.
    pub page: u64,
    /// Rows per page.
    pub size: u64,
}

impl Pageable {
    /// A page without limit checks.
    #[must_use]
    pub const fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Applies defaults and limits to the requested page.
    ///
    /// # Errors
    /// Returns a validation error if `size` is 0 or larger than `limits.max_size`,
    /// or if the page starts beyond the largest row offset the database accepts.
    pub fn from_params(params: &PageParams, limits: PaginationConfig) -> Result<Self> {
        let size = params.size.unwrap_or(limits.default_size);
        if size == 0 || size > limits.max_size {
            return Err(Error::validation(format!(
                "page size must be between 1 and {}, got {size}",
                limits.max_size
            )));
        }
        let page = params.page.unwrap_or(0);
        match page.checked_mul(size) {
            Some(offset) if offset <= MAX_OFFSET => Ok(Self::new(page, size)),
            _ => Err(Error::validation(format!(
                "page {page} is out of range for page size {size}"
            ))),
        }
    }
}

/// The `page` and `size` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// Zero-based page number; defaults to 0.
    #[serde(default, deserialize_with = "optional_param")]
    pub page: Option<u64>,
    /// Rows per page; defaults to the configured size.
    #[serde(default, deserialize_with = "optional_param")]
    pub size: Option<u64>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub content: Vec<T>,
    /// Zero-based page number.
    pub page: u64,
    /// Requested page size.
    pub size: u64,
    /// Rows matching the search across all pages.
    pub total_elements: u64,
    /// Number of pages at this size.
    pub total_pages: u64,
}

/// Deserializes a query parameter, treating a missing or blank value as `None`.
///
/// Non-blank values are trimmed and parsed with [`FromStr`]; parse failures are
/// reported as deserialization errors.
pub fn optional_param<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
