//! FAQ list controller: debounced filtering, Load More / Hide paging and
//! per-question expansion.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::QuestionBankApi;
use crate::config::{DisclosureConfig, UiTimings};
use crate::model::CategoryFilter;
use crate::scroll_lock::{ScrollBehavior, ScrollSurface};

pub mod state;

pub use state::{DisclosureState, FetchKind, FetchTicket, HIDE_AFTER_CLICKS, HidePlan};

struct Inner<A> {
    api: A,
    config: DisclosureConfig,
    timings: UiTimings,
    state: Mutex<DisclosureState>,
    debounce: Mutex<Option<JoinHandle<()>>>,
}

/// Drives a [`DisclosureState`] against a question bank. Cheap to clone;
/// clones share the same state.
pub struct FaqDisclosure<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for FaqDisclosure<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> FaqDisclosure<A>
where
    A: QuestionBankApi + 'static,
{
    pub fn new(api: A, config: DisclosureConfig, timings: UiTimings) -> Self {
        let state = DisclosureState::new(config.page_size);
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                timings,
                state: Mutex::new(state),
                debounce: Mutex::new(None),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Current state, cloned for rendering.
    pub fn state(&self) -> DisclosureState {
        self.with_state(|s| s.clone())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DisclosureState) -> R) -> R {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Initialize the bank and load the first page concurrently. If the
    /// bank reports removed duplicates, refetch once it has settled.
    pub async fn mount(&self) {
        let (outcome, _) = tokio::join!(self.inner.api.initialize(), self.refresh());
        match outcome {
            Ok(outcome) if outcome.requires_refetch() => {
                info!(?outcome, "question bank cleaned; refetching");
                tokio::time::sleep(self.inner.timings.cleanup_settle).await;
                self.refresh().await;
            }
            Ok(outcome) => debug!(?outcome, "question bank initialized"),
            Err(err) => warn!(error = %err, "question bank initialize failed"),
        }
    }

    /// Fetch page 1 for the current filters immediately. Returns whether
    /// the response was applied.
    pub async fn refresh(&self) -> bool {
        let ticket = self.with_state(|s| s.begin_reset());
        self.run(ticket).await
    }

    pub async fn load_more(&self) -> bool {
        let Some(ticket) = self.with_state(|s| s.begin_load_more()) else {
            return false;
        };
        self.run(ticket).await
    }

    async fn run(&self, ticket: FetchTicket) -> bool {
        match self.inner.api.list(&ticket.query).await {
            Ok(page) => {
                let applied = self.with_state(|s| s.apply(&ticket, page));
                if !applied {
                    debug!(generation = ticket.generation, "dropped stale question page");
                }
                applied
            }
            Err(err) => {
                warn!(error = %err, page = ticket.query.page, "question fetch failed");
                self.with_state(|s| s.fail(&ticket));
                false
            }
        }
    }

    pub fn set_search(&self, query: impl Into<String>) {
        let query = query.into();
        self.with_state(|s| s.set_search(query));
        self.schedule_refresh();
    }

    pub fn clear_search(&self) {
        self.set_search(String::new());
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.with_state(|s| s.set_category(category));
        self.schedule_refresh();
    }

    /// Restart the debounce timer; only the last change within the window fetches.
    fn schedule_refresh(&self) {
        let this = self.clone();
        let delay = self.inner.timings.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.refresh().await;
        });

        let mut slot = self.inner.debounce.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Skip the debounce window and fetch now.
    pub async fn flush(&self) {
        let pending = self
            .inner
            .debounce
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
        self.refresh().await;
    }

    /// Collapse back to the first Load More increment, then scroll.
    /// `section_top` is the page offset of the FAQ section.
    pub async fn hide(&self, surface: &dyn ScrollSurface, section_top: f64) -> bool {
        let offset = surface.scroll_offset();
        let config = &self.inner.config;
        let Some(plan) = self.with_state(|s| {
            s.begin_hide(
                offset,
                section_top,
                config.hide_scroll_threshold,
                config.section_inset,
            )
        }) else {
            return false;
        };

        tokio::time::sleep(self.inner.timings.hide_transition).await;

        if !self.with_state(|s| s.finish_hide()) {
            return false;
        }
        surface.scroll_to(plan.scroll_target, ScrollBehavior::Smooth);
        true
    }

    pub fn toggle(&self, id: &str) -> bool {
        self.with_state(|s| s.toggle(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CmsError, Result};
    use crate::model::{FaqQuestion, InitializeOutcome, ListQuery, Pagination, QuestionPage};
    use crate::scroll_lock::VirtualDocument;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct Scripted {
        total: usize,
        lists: AtomicUsize,
        fail: AtomicBool,
    }

    impl Scripted {
        fn new(total: usize) -> Arc<Self> {
            Arc::new(Self {
                total,
                lists: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl QuestionBankApi for Scripted {
        async fn list(&self, query: &ListQuery) -> Result<QuestionPage> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(CmsError::Api("offline".to_string()));
            }
            let start = (query.page as usize - 1) * query.limit as usize;
            let end = (start + query.limit as usize).min(self.total);
            let questions = (start.min(end)..end)
                .map(|i| FaqQuestion {
                    id: format!("{}-{i}", query.search),
                    question: format!("Q{i}"),
                    answer: format!("A{i}"),
                    category: "general".to_string(),
                    tags: Vec::new(),
                    order: i as u32,
                })
                .collect();
            Ok(QuestionPage {
                questions,
                pagination: Pagination {
                    current_page: query.page,
                    has_more: end < self.total,
                    total_questions: self.total,
                },
                categories: vec!["general".to_string()],
            })
        }

        async fn initialize(&self) -> Result<InitializeOutcome> {
            Ok(InitializeOutcome::Unchanged)
        }
    }

    fn controller(api: Arc<Scripted>) -> FaqDisclosure<Arc<Scripted>> {
        FaqDisclosure::new(api, DisclosureConfig::default(), UiTimings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_within_debounce_fetch_once() {
        let api = Scripted::new(30);
        let faq = controller(api.clone());

        for prefix in ["c", "ca", "car", "carp", "carpet"] {
            faq.set_search(prefix);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(api.lists.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(api.lists.load(Ordering::SeqCst), 1);

        let state = faq.state();
        assert_eq!(state.search_query(), "carpet");
        assert_eq!(state.questions()[0].id, "carpet-0");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_more_keeps_list() {
        let api = Scripted::new(30);
        let faq = controller(api.clone());
        assert!(faq.refresh().await);

        api.fail.store(true, Ordering::SeqCst);
        assert!(!faq.load_more().await);

        let state = faq.state();
        assert_eq!(state.questions().len(), 12);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.load_more_clicks(), 0);
        assert!(!state.is_loading());
        assert!(state.show_load_more());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_cancels_pending_debounce() {
        let api = Scripted::new(5);
        let faq = controller(api.clone());
        faq.set_category(CategoryFilter::Named("general".into()));
        faq.flush().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.lists.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_search_refetches_unfiltered() {
        let api = Scripted::new(30);
        let faq = controller(api.clone());

        faq.set_search("carpet");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(faq.state().questions()[0].id, "carpet-0");

        faq.clear_search();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(api.lists.load(Ordering::SeqCst), 2);

        let state = faq.state();
        assert_eq!(state.search_query(), "");
        assert_eq!(state.questions()[0].id, "-0");
        assert_eq!(state.current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_during_hide_cancels_it() {
        let api = Scripted::new(50);
        let faq = controller(api.clone());
        assert!(faq.refresh().await);
        assert!(faq.load_more().await);
        assert!(faq.load_more().await);
        assert!(faq.state().show_hide());

        let surface = VirtualDocument::new(5000.0);
        surface.user_scroll(3000.0);
        let (hidden, _) = tokio::join!(faq.hide(&surface, 900.0), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            faq.set_category(CategoryFilter::Named("general".into()));
            faq.flush().await;
        });

        assert!(!hidden);
        assert!(surface.smooth_scrolls().is_empty());
        let state = faq.state();
        assert!(!state.is_hiding());
        assert_eq!(state.questions().len(), 12);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.load_more_clicks(), 0);
        assert_eq!(
            state.selected_category(),
            &CategoryFilter::Named("general".into())
        );
    }
}
