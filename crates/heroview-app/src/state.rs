// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::fmt;
use std::num::NonZeroUsize;

use crate::model::{Column, SortDirection};

pub const DEFAULT_PAGE_SIZE: PageSize = PageSize::Rows(NonZeroUsize::new(20).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Rows(NonZeroUsize),
    All,
}

impl PageSize {
    pub fn rows(count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(Self::Rows)
    }

    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(Self::rows)
            .ok_or_else(|| anyhow!("invalid page size {value:?}; use a positive number or \"all\""))
    }

    pub fn page_count(self, matched: usize) -> usize {
        match self {
            Self::Rows(rows) => matched.div_ceil(rows.get()).max(1),
            Self::All => 1,
        }
    }

    /// Half-open row range shown on 1-based `page`, clipped to `matched`.
    pub fn bounds(self, page: usize, matched: usize) -> (usize, usize) {
        match self {
            Self::Rows(rows) => {
                let start = page.saturating_sub(1).saturating_mul(rows.get()).min(matched);
                let end = start.saturating_add(rows.get()).min(matched);
                (start, end)
            }
            Self::All => (0, matched),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(rows) => write!(f, "{rows}"),
            Self::All => f.write_str("all"),
        }
    }
}

pub fn default_page_size_options() -> Vec<PageSize> {
    [10, 20, 50, 100]
        .into_iter()
        .filter_map(PageSize::rows)
        .chain([PageSize::All])
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page_size: PageSize,
    pub current_page: usize,
    pub filter_column: Option<Column>,
    pub filter_query: String,
    pub sort_column: Option<Column>,
    pub sort_direction: SortDirection,
}

impl ViewState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
            filter_column: None,
            filter_query: String::new(),
            sort_column: None,
            sort_direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetPageSize(PageSize),
    NextPage,
    PreviousPage,
    SetFilter {
        column: Option<Column>,
        query: String,
    },
    ToggleSort(Column),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    PageSizeChanged(PageSize),
    PageChanged {
        page: usize,
        page_count: usize,
    },
    FilterApplied {
        column: Option<Column>,
        query: String,
        matched: usize,
    },
    SortChanged {
        column: Column,
        direction: SortDirection,
    },
    Rendered {
        rows: usize,
        matched: usize,
    },
}

impl ViewEvent {
    pub fn message(&self) -> Option<String> {
        match self {
            Self::PageSizeChanged(size) => Some(format!("page size {size}")),
            Self::PageChanged { page, page_count } => Some(format!("page {page}/{page_count}")),
            Self::FilterApplied {
                column: Some(column),
                query,
                matched,
            } if !query.trim().is_empty() => Some(format!(
                "filter {} = {query:?}: {matched} rows",
                column.label()
            )),
            Self::FilterApplied { matched, .. } => Some(format!("filter cleared: {matched} rows")),
            Self::SortChanged { column, direction } => {
                Some(format!("sort {} {}", column.label(), direction.as_str()))
            }
            Self::Rendered { .. } => None,
        }
    }
}
