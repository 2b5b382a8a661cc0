//! Pagination parameters for service-layer search and listing.
//!
//! Bad inputs are rejected explicitly rather than clamped, so callers get a
//! 400 instead of a silently adjusted page.

use crate::errors::ServiceError;

/// Upper bound on page size accepted from callers.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        match input.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(ServiceError::Validation(format!("unknown sort direction: {other}"))),
        }
    }
}

/// A validated page request.
///
/// `page` is 0-based. The sort field is a caller-supplied name resolved to a
/// real column by each entity service; unknown names are validation errors
/// there.
#[derive(Clone, Debug)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: String,
    pub order: SortOrder,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: impl Into<String>, order: SortOrder) -> Result<Self, ServiceError> {
        if size == 0 {
            return Err(ServiceError::Validation("page size must be at least 1".into()));
        }
        if size > MAX_PAGE_SIZE {
            return Err(ServiceError::Validation(format!("page size must be at most {MAX_PAGE_SIZE}")));
        }
        Ok(Self { page, size, sort: sort.into(), order })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}
