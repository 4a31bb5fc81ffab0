//! Page arithmetic for the post feed.
//!
//! The feed is page-based with a fixed page size chosen by the caller:
//!
//! - `page`: page number (1-indexed, default: 1, clamped to a minimum of 1)
//! - `offset = (page - 1) * page_size`
//! - `number_of_pages = ceil(total / page_size)`

use serde::Deserialize;
use utoipa::IntoParams;

use crate::serde::deserialize_optional_i64;

/// Query parameters for page-based listing.
///
/// Empty strings (`?page=`) are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PageParams {
    /// Returns the effective page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the number of items to skip for the given page size.
    #[must_use]
    pub fn offset(&self, page_size: i64) -> i64 {
        (self.page() - 1).saturating_mul(page_size.max(1))
    }
}

/// Number of pages needed to hold `total` items, `ceil(total / page_size)`.
#[must_use]
pub fn number_of_pages(total: i64, page_size: i64) -> i64 {
    let page_size = page_size.max(1);
    let total = total.max(0);
    (total + page_size - 1) / page_size
}
