// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page slicing over lists already fetched from the gateway.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters for paginated listings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Slice `items` to the requested page.
///
/// `per_page` is clamped to `1..=MAX_PER_PAGE`. A page past the end is empty,
/// page 0 is rejected.
pub fn paginate<T>(items: Vec<T>, query: PageQuery) -> Result<Page<T>> {
    if query.page < 1 {
        return Err(AppError::BadRequest(
            "Page must be greater than 0".to_string(),
        ));
    }

    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let total_pages = total.div_ceil(per_page as usize);

    let start = (query.page as usize - 1)
        .checked_mul(per_page as usize)
        .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;

    let items: Vec<T> = if start < total {
        items.into_iter().skip(start).take(per_page as usize).collect()
    } else {
        vec![]
    };

    Ok(Page {
        items,
        page: query.page,
        per_page,
        total: u32::try_from(total).unwrap_or(u32::MAX),
        total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
    })
}
