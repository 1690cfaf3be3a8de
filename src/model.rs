use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{CmsError, Result};

/// Tags shown next to a question are cut to this many.
pub const DISPLAY_TAG_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqQuestion {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub order: u32,
}

impl FaqQuestion {
    pub fn display_tags(&self) -> &[String] {
        let end = self.tags.len().min(DISPLAY_TAG_LIMIT);
        &self.tags[..end]
    }

    pub fn matches(&self, search: &str, category: &CategoryFilter) -> bool {
        if !category.accepts(&self.category) {
            return false;
        }
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.question.to_lowercase().contains(&needle) || self.answer.to_lowercase().contains(&needle)
    }
}

/// Body of an admin create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn accepts(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name.eq_ignore_ascii_case(category),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Named(name) => name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Named(trimmed.to_lowercase()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub category: CategoryFilter,
}

impl ListQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            search: String::new(),
            category: CategoryFilter::All,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(CmsError::InvalidArg("page must be >= 1".to_string()));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(CmsError::InvalidArg(format!(
                "limit must be within 1..={MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub has_more: bool,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    pub questions: Vec<FaqQuestion>,
    pub pagination: Pagination,
    pub categories: Vec<String>,
}

/// What `initialize` did to the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InitializeOutcome {
    Unchanged,
    #[serde(rename_all = "camelCase")]
    Seeded { inserted: usize },
    #[serde(rename_all = "camelCase")]
    Cleaned { removed_count: usize },
}

impl InitializeOutcome {
    pub fn requires_refetch(&self) -> bool {
        matches!(self, InitializeOutcome::Cleaned { .. })
    }

    pub fn message(&self) -> String {
        match self {
            InitializeOutcome::Unchanged => "Question bank already initialized".to_string(),
            InitializeOutcome::Seeded { inserted } => {
                format!("Seeded question bank with {inserted} questions")
            }
            InitializeOutcome::Cleaned { removed_count } => {
                format!("Removed {removed_count} duplicate questions")
            }
        }
    }
}
