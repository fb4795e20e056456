//! Common API utilities and shared types
//!
//! This module contains shared utilities used across multiple API endpoints.

use serde::Deserialize;

/// Limit/offset pagination query parameters
///
/// Absent values fall back to the configured pagination defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Build next/previous page markers for a paginated response.
///
/// Markers are relative URLs over the same path; either end of the result
/// set yields `None`.
pub fn page_links(
    path: &str,
    limit: i64,
    offset: i64,
    count: i64,
) -> (Option<String>, Option<String>) {
    let next = if offset + limit < count {
        Some(format!(
            "{}?limit={}&offset={}",
            path,
            limit,
            offset + limit
        ))
    } else {
        None
    };

    let previous = if offset > 0 {
        Some(format!(
            "{}?limit={}&offset={}",
            path,
            limit,
            (offset - limit).max(0)
        ))
    } else {
        None
    };

    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_previous() {
        let (next, previous) = page_links("/api/v1/users", 10, 0, 25);
        assert_eq!(next.as_deref(), Some("/api/v1/users?limit=10&offset=10"));
        assert!(previous.is_none());
    }

    #[test]
    fn test_middle_page_has_both_links() {
        let (next, previous) = page_links("/api/v1/users", 10, 10, 25);
        assert_eq!(next.as_deref(), Some("/api/v1/users?limit=10&offset=20"));
        assert_eq!(previous.as_deref(), Some("/api/v1/users?limit=10&offset=0"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let (next, previous) = page_links("/api/v1/users", 10, 20, 25);
        assert!(next.is_none());
        assert_eq!(previous.as_deref(), Some("/api/v1/users?limit=10&offset=10"));
    }

    #[test]
    fn test_short_offset_clamps_previous_to_zero() {
        let (_, previous) = page_links("/search", 10, 4, 100);
        assert_eq!(previous.as_deref(), Some("/search?limit=10&offset=0"));
    }

    #[test]
    fn test_empty_result_set_has_no_links() {
        let (next, previous) = page_links("/search", 10, 0, 0);
        assert!(next.is_none());
        assert!(previous.is_none());
    }
}
