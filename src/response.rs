//! Standard response envelope helpers and pagination metadata.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

/// Envelope for filtered-search responses.
#[derive(Serialize)]
pub struct SuccessPage<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Pagination metadata computed from the pre-pagination total and the
/// effective page window.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub next_page: Option<i64>,
}

impl Pagination {
    /// `per_page` must be positive; callers clamp before reaching here.
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = (total + per_page - 1) / per_page;
        let next_page = if page < total_pages {
            Some(page + 1)
        } else {
            None
        };
        Pagination {
            total,
            page,
            per_page,
            total_pages,
            next_page,
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::CREATED, Json(SuccessOne { data }))
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaCount { count },
        }),
    )
}

pub fn success_page<T: Serialize>(
    data: Vec<T>,
    pagination: Pagination,
) -> (StatusCode, Json<SuccessPage<T>>) {
    (StatusCode::OK, Json(SuccessPage { data, pagination }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_mid_range_has_next_page() {
        let p = Pagination::new(23, 1, 10);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.next_page, Some(2));
    }

    #[test]
    fn pagination_last_page_has_no_next() {
        let p = Pagination::new(23, 3, 10);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.next_page, None);
    }

    #[test]
    fn pagination_past_the_end_keeps_totals() {
        let p = Pagination::new(23, 4, 10);
        assert_eq!(p.total, 23);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.next_page, None);
    }

    #[test]
    fn pagination_zero_matches_is_not_an_error() {
        let p = Pagination::new(0, 1, 10);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.next_page, None);
    }

    #[test]
    fn pagination_exact_multiple() {
        let p = Pagination::new(20, 2, 10);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.next_page, None);
    }
}
