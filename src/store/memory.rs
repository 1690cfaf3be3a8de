use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::Result;
use crate::model::FaqQuestion;
use crate::store::{ContentStore, validate_page_id};

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    documents: Mutex<BTreeMap<String, Value>>,
    questions: Mutex<Vec<FaqQuestion>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<FaqQuestion>) -> Self {
        Self {
            documents: Mutex::default(),
            questions: Mutex::new(questions),
        }
    }
}

impl ContentStore for MemoryContentStore {
    fn load_document(&self, page: &str) -> Result<Option<Value>> {
        validate_page_id(page)?;
        let documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.get(page).cloned())
    }

    fn save_document(&self, page: &str, document: &Value) -> Result<()> {
        validate_page_id(page)?;
        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        documents.insert(page.to_string(), document.clone());
        Ok(())
    }

    fn list_documents(&self) -> Result<Vec<String>> {
        let documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(documents.keys().cloned().collect())
    }

    fn load_questions(&self) -> Result<Vec<FaqQuestion>> {
        let questions = self.questions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(questions.clone())
    }

    fn save_questions(&self, questions: &[FaqQuestion]) -> Result<()> {
        let mut stored = self.questions.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = questions.to_vec();
        Ok(())
    }
}
