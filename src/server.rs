use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::api::{Envelope, InitializeResponse, LocalQuestionBank, SharedQuestionBank};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{CmsError, Result};
use crate::model::{CategoryFilter, FaqQuestion, ListQuery, NewQuestion, QuestionPage};
use crate::store::ContentStore;

#[derive(Clone)]
struct AppState {
    bank: SharedQuestionBank,
    store: Arc<dyn ContentStore>,
}

struct ApiError(CmsError);

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        Self(err)
    }
}

/// Malformed or non-JSON bodies answer 400 with the usual envelope.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CmsError::InvalidArg(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CmsError::InvalidArg(_) | CmsError::Serde(_) => StatusCode::BAD_REQUEST,
            CmsError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(Envelope::<()>::failure(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

pub fn router(local: LocalQuestionBank) -> Router {
    let state = AppState {
        bank: local.bank().clone(),
        store: local.store().clone(),
    };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/faq/questions", get(list_questions).post(post_questions))
        .route("/api/faq/questions/{id}", delete(delete_question))
        .route("/api/content/{page}", get(get_content).post(put_content))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, local: LocalQuestionBank, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Starting CMS HTTP server on {addr}");
    axum::serve(listener, router(local))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind and serve in the background. Dropping or firing the sender stops the server.
pub async fn spawn(bind: SocketAddr, local: LocalQuestionBank) -> Result<(SocketAddr, oneshot::Sender<()>)> {
    let listener = TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(err) = serve(listener, local, shutdown).await {
            warn!(error = %err, "CMS HTTP server error");
        }
    });

    Ok((addr, shutdown_tx))
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    category: Option<String>,
}

fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| CmsError::InvalidArg(format!("{name} must be a positive integer, got {raw:?}"))),
    }
}

impl ListParams {
    fn into_query(self) -> Result<ListQuery> {
        let query = ListQuery {
            page: parse_positive("page", self.page.as_deref(), 1)?,
            limit: parse_positive("limit", self.limit.as_deref(), DEFAULT_PAGE_SIZE)?,
            search: self.search.unwrap_or_default(),
            category: self
                .category
                .as_deref()
                .unwrap_or("all")
                .parse::<CategoryFilter>()?,
        };
        query.validate()?;
        Ok(query)
    }
}

async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<QuestionPage>>> {
    let query = params.into_query()?;
    let page = state.bank.read().await.list(&query)?;
    debug!(
        page = query.page,
        category = %query.category,
        returned = page.questions.len(),
        total = page.pagination.total_questions,
        "listed questions"
    );
    Ok(Json(Envelope::ok(page)))
}

async fn post_questions(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    if body.get("initialize").and_then(Value::as_bool) == Some(true) {
        let outcome = state.bank.write().await.initialize()?;
        info!(?outcome, "question bank initialize");
        let body = Envelope::ok(InitializeResponse::from(outcome));
        return Ok(Json(body).into_response());
    }

    let new: NewQuestion = serde_json::from_value(body).map_err(CmsError::from)?;
    let created = state.bank.write().await.create(new)?;
    info!(id = %created.id, "created question");
    Ok((StatusCode::CREATED, Json(Envelope::ok(created))).into_response())
}

async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<FaqQuestion>>> {
    let removed = state.bank.write().await.delete(&id)?;
    info!(id = %removed.id, "deleted question");
    Ok(Json(Envelope::ok(removed)))
}

async fn get_content(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let document = state
        .store
        .load_document(&page)?
        .ok_or_else(|| CmsError::NotFound(format!("content page {page}")))?;
    Ok(Json(Envelope::ok(document)))
}

async fn put_content(
    State(state): State<AppState>,
    Path(page): Path<String>,
    document: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Envelope<Value>>> {
    let Json(document) = document?;
    if !document.is_object() {
        return Err(CmsError::InvalidArg("content document must be a JSON object".to_string()).into());
    }
    state.store.save_document(&page, &document)?;
    info!(page = %page, "replaced content document");
    Ok(Json(Envelope::ok(document)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_default_to_first_page() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query, ListQuery::default());
    }

    #[test]
    fn list_params_reject_bad_numbers() {
        let params = ListParams {
            page: Some("0".to_string()),
            ..ListParams::default()
        };
        assert!(params.into_query().is_err());

        let params = ListParams {
            limit: Some("lots".to_string()),
            ..ListParams::default()
        };
        assert!(params.into_query().is_err());

        let params = ListParams {
            limit: Some("500".to_string()),
            ..ListParams::default()
        };
        assert!(params.into_query().is_err());
    }
}
