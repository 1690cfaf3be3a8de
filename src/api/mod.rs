use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{CmsError, Result};
use crate::model::{InitializeOutcome, ListQuery, QuestionPage};
use crate::question_bank::QuestionBank;
use crate::store::ContentStore;

pub mod http;

pub use http::HttpClient;

/// What the FAQ page needs from the question bank.
#[async_trait]
pub trait QuestionBankApi: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<QuestionPage>;
    async fn initialize(&self) -> Result<InitializeOutcome>;
}

/// Read access to static page documents.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_document(&self, page: &str) -> Result<Value>;
}

#[async_trait]
impl<T: QuestionBankApi + ?Sized> QuestionBankApi for Arc<T> {
    async fn list(&self, query: &ListQuery) -> Result<QuestionPage> {
        (**self).list(query).await
    }

    async fn initialize(&self) -> Result<InitializeOutcome> {
        (**self).initialize().await
    }
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    async fn fetch_document(&self, page: &str) -> Result<Value> {
        (**self).fetch_document(page).await
    }
}

/// `{ success, data }` wrapper used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_data(self) -> Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(CmsError::Api("response carried no data".to_string())),
            (false, _) => Err(CmsError::Api(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    pub message: String,
    pub outcome: InitializeOutcome,
}

impl From<InitializeOutcome> for InitializeResponse {
    fn from(outcome: InitializeOutcome) -> Self {
        Self {
            message: outcome.message(),
            outcome,
        }
    }
}

pub type SharedQuestionBank = Arc<RwLock<QuestionBank>>;

/// In-process client over a shared bank and its store.
#[derive(Clone)]
pub struct LocalQuestionBank {
    bank: SharedQuestionBank,
    store: Arc<dyn ContentStore>,
}

impl LocalQuestionBank {
    pub fn open(store: Arc<dyn ContentStore>) -> Result<Self> {
        let bank = QuestionBank::open(store.clone())?;
        Ok(Self {
            bank: Arc::new(RwLock::new(bank)),
            store,
        })
    }

    pub fn bank(&self) -> &SharedQuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }
}

#[async_trait]
impl QuestionBankApi for LocalQuestionBank {
    async fn list(&self, query: &ListQuery) -> Result<QuestionPage> {
        self.bank.read().await.list(query)
    }

    async fn initialize(&self) -> Result<InitializeOutcome> {
        self.bank.write().await.initialize()
    }
}

#[async_trait]
impl ContentSource for LocalQuestionBank {
    async fn fetch_document(&self, page: &str) -> Result<Value> {
        self.store
            .load_document(page)?
            .ok_or_else(|| CmsError::NotFound(format!("content page {page}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContentStore;

    #[test]
    fn failure_envelope_maps_to_api_error() {
        let envelope: Envelope<Value> = Envelope::failure("boom");
        match envelope.into_data() {
            Err(CmsError::Api(msg)) => assert_eq!(msg, "boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> Envelope<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn envelope_parses_for_any_payload() {
        let failed: Envelope<QuestionPage> = parse(r#"{ "success": false, "error": "offline" }"#);
        assert!(failed.data.is_none());
        assert_eq!(failed.error.as_deref(), Some("offline"));

        let ok: Envelope<InitializeResponse> = parse(
            r#"{ "success": true, "data": { "message": "m", "outcome": { "kind": "unchanged" } } }"#,
        );
        assert_eq!(ok.into_data().unwrap().outcome, InitializeOutcome::Unchanged);
    }

    #[tokio::test]
    async fn local_bank_initializes_and_lists() {
        let local = LocalQuestionBank::open(Arc::new(MemoryContentStore::new())).unwrap();
        let outcome = local.initialize().await.unwrap();
        assert!(matches!(outcome, InitializeOutcome::Seeded { .. }));

        let page = local.list(&ListQuery::default()).await.unwrap();
        assert_eq!(page.questions.len(), 12);
        assert!(page.pagination.has_more);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let local = LocalQuestionBank::open(Arc::new(MemoryContentStore::new())).unwrap();
        assert!(matches!(
            local.fetch_document("faq").await,
            Err(CmsError::NotFound(_))
        ));
    }
}
