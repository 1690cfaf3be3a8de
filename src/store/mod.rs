use serde_json::Value;

use crate::error::{CmsError, Result};
use crate::model::FaqQuestion;

pub mod file;
pub mod memory;

pub use file::FileContentStore;
pub use memory::MemoryContentStore;

/// Per-page JSON documents plus the question bank collection.
pub trait ContentStore: Send + Sync {
    fn load_document(&self, page: &str) -> Result<Option<Value>>;
    /// Replaces the stored document wholesale.
    fn save_document(&self, page: &str, document: &Value) -> Result<()>;
    fn list_documents(&self) -> Result<Vec<String>>;

    fn load_questions(&self) -> Result<Vec<FaqQuestion>>;
    fn save_questions(&self, questions: &[FaqQuestion]) -> Result<()>;
}

/// Page ids double as file names.
pub fn validate_page_id(page: &str) -> Result<()> {
    let valid = !page.is_empty()
        && page.len() <= 64
        && page
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CmsError::InvalidArg(format!("invalid page id: {page:?}")))
    }
}
