// Common DTOs and helpers for the public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use devlog_core::{LedgerError, Page};

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Pagination query parameters for list endpoints without extra filters
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct Pagination {
    /// Number of records to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(crate) fn default_limit() -> i64 {
    100
}

impl From<Pagination> for Page {
    fn from(p: Pagination) -> Self {
        Page {
            skip: p.skip,
            limit: p.limit,
        }
    }
}

/// Map ledger errors onto HTTP status codes
pub fn status_for(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlog_core::RecordKind;

    #[test]
    fn test_pagination_defaults() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&LedgerError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&LedgerError::not_found(RecordKind::Run, 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&LedgerError::conflict("dup")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&LedgerError::store(anyhow::anyhow!("down"))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
