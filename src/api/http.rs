use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{ContentSource, Envelope, InitializeResponse, QuestionBankApi};
use crate::error::Result;
use crate::model::{InitializeOutcome, ListQuery, QuestionPage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a remote `tidyhaus serve` instance.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let envelope: Envelope<T> = response.json().await?;
    debug!(%status, success = envelope.success, "api response");
    envelope.into_data()
}

#[async_trait]
impl QuestionBankApi for HttpClient {
    async fn list(&self, query: &ListQuery) -> Result<QuestionPage> {
        let response = self
            .client
            .get(self.url("/api/faq/questions"))
            .query(&[
                ("page", query.page.to_string()),
                ("limit", query.limit.to_string()),
                ("search", query.search.clone()),
                ("category", query.category.to_string()),
            ])
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn initialize(&self) -> Result<InitializeOutcome> {
        let response = self
            .client
            .post(self.url("/api/faq/questions"))
            .json(&json!({ "initialize": true }))
            .send()
            .await?;
        let body: InitializeResponse = read_envelope(response).await?;
        Ok(body.outcome)
    }
}

#[async_trait]
impl ContentSource for HttpClient {
    async fn fetch_document(&self, page: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.url(&format!("/api/content/{page}")))
            .send()
            .await?;
        read_envelope(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::HttpClient;

    #[test]
    fn trims_trailing_slash() {
        let client = HttpClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.url("/healthz"), "http://localhost:3000/healthz");
    }
}
