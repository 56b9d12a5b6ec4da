//! Storage-agnostic paginated search contract.
//!
//! Out-of-range paging values are clamped rather than rejected: `page`
//! never drops below 1 and `per_page` stays within `1..=MAX_PER_PAGE`.

use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: i64 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    #[default]
    #[serde(alias = "ASC", alias = "Asc")]
    Asc,
    #[serde(alias = "DESC", alias = "Desc")]
    Desc,
}

/// Fields a search can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Id,
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    pub page: i64,
    pub per_page: i64,
    pub search: String,
    pub order_by: String,
    pub order: SearchOrder,
}

impl SearchInput {
    pub fn new(
        page: i64,
        per_page: i64,
        search: impl Into<String>,
        order_by: impl Into<String>,
        order: SearchOrder,
    ) -> Self {
        Self {
            page,
            per_page,
            search: search.into(),
            order_by: order_by.into(),
            order,
        }
    }

    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Substring to match against, or `None` when the search is blank.
    pub fn filter(&self) -> Option<&str> {
        if self.search.trim().is_empty() {
            None
        } else {
            Some(&self.search)
        }
    }

    /// Resolved ordering. Unknown fields sort by name ascending whatever
    /// direction was asked for.
    pub fn sort(&self) -> (SortField, SearchOrder) {
        match self.order_by.trim().to_ascii_lowercase().as_str() {
            "name" => (SortField::Name, self.order),
            "id" => (SortField::Id, self.order),
            "createdat" | "created_at" => (SortField::CreatedAt, self.order),
            _ => (SortField::Name, SearchOrder::Asc),
        }
    }
}

/// One page of search results. `total` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutput<T> {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub items: Vec<T>,
}

impl<T> SearchOutput<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchOutput<U> {
        SearchOutput {
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
