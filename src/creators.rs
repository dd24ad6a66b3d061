// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Creator metadata source and list pagination.
//!
//! Handlers read creators through [`CreatorSource`]. The shipped
//! implementation is an in-memory catalogue; a platform-backed source plugs
//! in behind the same trait.

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::models::{Creator, CreatorPage, PageMeta};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum CreatorSourceError {
    #[error("not authenticated with the platform")]
    NotAuthenticated,
    #[error("creator source unavailable: {0}")]
    Unavailable(String),
}

/// Provides cached creator metadata.
pub trait CreatorSource: Send + Sync {
    fn creators(&self) -> Result<Vec<Creator>, CreatorSourceError>;
}

/// Fixed in-memory catalogue.
#[derive(Debug, Clone)]
pub struct MockCreatorSource {
    creators: Vec<Creator>,
}

impl MockCreatorSource {
    /// Catalogue with the two example creators.
    pub fn new() -> Self {
        let now = Utc::now();
        Self::with_creators(vec![
            Creator {
                id: "1".to_string(),
                name: "Example Creator 1".to_string(),
                username: "creator1".to_string(),
                avatar_url: None,
                is_verified: true,
                is_following: true,
                last_updated: now - Duration::hours(2),
            },
            Creator {
                id: "2".to_string(),
                name: "Example Creator 2".to_string(),
                username: "creator2".to_string(),
                avatar_url: None,
                is_verified: false,
                is_following: true,
                last_updated: now - Duration::hours(1),
            },
        ])
    }

    pub fn with_creators(creators: Vec<Creator>) -> Self {
        Self { creators }
    }
}

impl Default for MockCreatorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CreatorSource for MockCreatorSource {
    fn creators(&self) -> Result<Vec<Creator>, CreatorSourceError> {
        Ok(self.creators.clone())
    }
}

/// Sort field for creator listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    LastUpdated,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" | "name" => Some(SortField::Name),
            "last_updated" => Some(SortField::LastUpdated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" | "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Validated listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub limit: usize,
    pub offset: usize,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListParams {
    /// Lenient numeric parsing: a missing, unparseable or non-positive
    /// limit falls back to the default and is capped at [`MAX_LIMIT`]; a
    /// bad offset becomes `0`.
    pub fn with_raw_paging(mut self, limit: Option<&str>, offset: Option<&str>) -> Self {
        self.limit = limit
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| (v as u64).min(MAX_LIMIT as u64) as usize)
            .unwrap_or(DEFAULT_LIMIT);
        self.offset = offset
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .map(|v| v as usize)
            .unwrap_or(0);
        self
    }
}

/// Sort then slice `creators` into one page.
pub fn paginate(mut creators: Vec<Creator>, params: &ListParams) -> CreatorPage {
    match params.sort {
        SortField::Name => creators.sort_by(|a, b| a.name.cmp(&b.name)),
        SortField::LastUpdated => creators.sort_by(|a, b| a.last_updated.cmp(&b.last_updated)),
    }
    if params.order == SortOrder::Desc {
        creators.reverse();
    }

    let total = creators.len();
    let limit = params.limit.max(1);
    let data: Vec<Creator> = creators
        .into_iter()
        .skip(params.offset)
        .take(limit)
        .collect();

    CreatorPage {
        meta: PageMeta {
            total,
            count: data.len(),
            per_page: limit,
            current_page: params.offset / limit + 1,
            total_pages: total.div_ceil(limit),
        },
        data,
    }
}
