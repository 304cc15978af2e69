use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pagination;

/// Query state of one list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub filters: BTreeMap<String, String>,
}

impl ResourceQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.set_filter(key, value);
        self
    }

    /// Set a filter value; an empty value removes the filter
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Request parameters: `page`, `limit`, `q` when searching, then filters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("q".to_string(), search.to_string()));
        }
        for (key, value) in &self.filters {
            params.push((key.clone(), value.clone()));
        }
        params
    }
}

/// Result of one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePage<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> ResourcePage<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.total_count, self.page_size)
    }

    /// 1-based serial number of the row at `index` across all pages
    pub fn row_number(&self, index: usize) -> u64 {
        (self.page.max(1) as u64 - 1) * self.page_size as u64 + index as u64 + 1
    }
}

/// Loading state of one list screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Edit,
    Delete,
    Approve,
    Reject,
    MarkPaid,
    ViewDetail,
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::MarkPaid => "mark paid",
            ActionKind::ViewDetail => "view detail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "edit" => Some(ActionKind::Edit),
            "delete" | "del" | "rm" => Some(ActionKind::Delete),
            "approve" | "accept" => Some(ActionKind::Approve),
            "reject" => Some(ActionKind::Reject),
            "mark-paid" | "mark_paid" | "paid" => Some(ActionKind::MarkPaid),
            "view" | "detail" | "view-detail" => Some(ActionKind::ViewDetail),
            _ => None,
        }
    }
}

/// A user-triggered operation on one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub id: String,
    pub kind: ActionKind,
}

impl RowAction {
    pub fn new(id: &str, kind: ActionKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
        }
    }
}
