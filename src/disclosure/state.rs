use std::collections::HashSet;

use serde::Serialize;

use crate::model::{CategoryFilter, FaqQuestion, ListQuery, QuestionPage};

/// Load More clicks required before Hide is offered.
pub const HIDE_AFTER_CLICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Reset,
    LoadMore { first: bool },
}

/// A fetch the driver must perform. Results are only applied while the
/// ticket's generation is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub kind: FetchKind,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HidePlan {
    pub scroll_target: f64,
}

/// Pure FAQ list state: filters, accumulated questions and the
/// load-more/hide progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureState {
    search_query: String,
    #[serde(serialize_with = "serialize_category")]
    selected_category: CategoryFilter,
    current_page: u32,
    questions: Vec<FaqQuestion>,
    has_more: bool,
    total_questions: usize,
    categories: Vec<String>,
    load_more_clicks: u32,
    #[serde(skip)]
    questions_after_first_load: Option<Vec<FaqQuestion>>,
    #[serde(skip)]
    open: HashSet<String>,
    is_hiding: bool,
    loading: bool,
    loading_more: bool,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    page_size: u32,
    /// Filters the loaded pages were fetched with. Load More keeps using
    /// them until the next reset, even while an edit waits out the debounce.
    #[serde(skip)]
    applied_search: String,
    #[serde(skip)]
    applied_category: CategoryFilter,
}

fn serialize_category<S>(category: &CategoryFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(category.as_str())
}

impl DisclosureState {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_query: String::new(),
            selected_category: CategoryFilter::All,
            current_page: 1,
            questions: Vec::new(),
            has_more: false,
            total_questions: 0,
            categories: Vec::new(),
            load_more_clicks: 0,
            questions_after_first_load: None,
            open: HashSet::new(),
            is_hiding: false,
            loading: false,
            loading_more: false,
            generation: 0,
            page_size,
            applied_search: String::new(),
            applied_category: CategoryFilter::All,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected_category
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn questions(&self) -> &[FaqQuestion] {
        &self.questions
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn load_more_clicks(&self) -> u32 {
        self.load_more_clicks
    }

    pub fn snapshot(&self) -> Option<&[FaqQuestion]> {
        self.questions_after_first_load.as_deref()
    }

    pub fn is_hiding(&self) -> bool {
        self.is_hiding
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.loading_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    pub fn show_load_more(&self) -> bool {
        self.has_more
    }

    pub fn show_hide(&self) -> bool {
        self.load_more_clicks >= HIDE_AFTER_CLICKS
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.selected_category = category;
    }

    /// Start a page-1 fetch for the current filters. Discards all paging
    /// progress and invalidates every older in-flight fetch.
    pub fn begin_reset(&mut self) -> FetchTicket {
        self.generation += 1;
        self.current_page = 1;
        self.load_more_clicks = 0;
        self.questions_after_first_load = None;
        self.is_hiding = false;
        self.loading = true;
        self.loading_more = false;
        self.applied_search = self.search_query.trim().to_string();
        self.applied_category = self.selected_category.clone();
        FetchTicket {
            generation: self.generation,
            kind: FetchKind::Reset,
            query: self.query_for(1),
        }
    }

    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if !self.has_more || self.is_loading() || self.is_hiding {
            return None;
        }
        self.loading_more = true;
        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::LoadMore {
                first: self.load_more_clicks == 0,
            },
            query: self.query_for(self.current_page + 1),
        })
    }

    /// Apply a fetched page. Returns false when the ticket was stale.
    pub fn apply(&mut self, ticket: &FetchTicket, page: QuestionPage) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        let QuestionPage {
            questions,
            pagination,
            categories,
        } = page;

        match ticket.kind {
            FetchKind::Reset => {
                self.questions.clear();
                self.append_unique(questions);
                self.current_page = 1;
                self.loading = false;
            }
            FetchKind::LoadMore { first } => {
                if !self.loading_more {
                    return false;
                }
                self.append_unique(questions);
                self.current_page = ticket.query.page;
                self.load_more_clicks += 1;
                if first {
                    self.questions_after_first_load = Some(self.questions.clone());
                }
                self.loading_more = false;
            }
        }

        self.has_more = pagination.has_more;
        self.total_questions = pagination.total_questions;
        if !categories.is_empty() {
            self.categories = categories;
        }
        true
    }

    /// A failed fetch leaves the list as it was.
    pub fn fail(&mut self, ticket: &FetchTicket) {
        if ticket.generation != self.generation {
            return;
        }
        match ticket.kind {
            FetchKind::Reset => self.loading = false,
            FetchKind::LoadMore { .. } => self.loading_more = false,
        }
    }

    /// Enter the hiding phase. `scroll_offset` and `section_top` are page
    /// coordinates; the plan says where to scroll once the list collapses.
    pub fn begin_hide(
        &mut self,
        scroll_offset: f64,
        section_top: f64,
        threshold: f64,
        inset: f64,
    ) -> Option<HidePlan> {
        if !self.show_hide() || self.is_hiding || self.is_loading() {
            return None;
        }
        self.questions_after_first_load.as_ref()?;

        let scroll_target = if scroll_offset > section_top + threshold {
            (section_top + inset).max(0.0)
        } else {
            scroll_offset
        };
        self.is_hiding = true;
        Some(HidePlan { scroll_target })
    }

    /// Step back to the list as it stood after the first Load More.
    /// Returns false if a filter change cancelled the hide.
    pub fn finish_hide(&mut self) -> bool {
        if !self.is_hiding {
            return false;
        }
        if let Some(snapshot) = &self.questions_after_first_load {
            self.questions = snapshot.clone();
        }
        self.load_more_clicks = 1;
        self.current_page = 2;
        self.has_more = true;
        self.is_hiding = false;
        true
    }

    /// Returns whether the question is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.open.remove(id) {
            false
        } else {
            self.open.insert(id.to_string());
            true
        }
    }

    fn query_for(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            limit: self.page_size,
            search: self.applied_search.clone(),
            category: self.applied_category.clone(),
        }
    }

    fn append_unique(&mut self, incoming: Vec<FaqQuestion>) {
        let mut seen: HashSet<String> = self.questions.iter().map(|q| q.id.clone()).collect();
        for question in incoming {
            if seen.insert(question.id.clone()) {
                self.questions.push(question);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pagination;

    fn q(id: &str) -> FaqQuestion {
        FaqQuestion {
            id: id.to_string(),
            question: format!("{id}?"),
            answer: format!("{id}."),
            category: "general".to_string(),
            tags: Vec::new(),
            order: 0,
        }
    }

    fn page(ids: &[&str], current: u32, has_more: bool, total: usize) -> QuestionPage {
        QuestionPage {
            questions: ids.iter().map(|id| q(id)).collect(),
            pagination: Pagination {
                current_page: current,
                has_more,
                total_questions: total,
            },
            categories: vec!["general".to_string()],
        }
    }

    fn ids(state: &DisclosureState) -> Vec<&str> {
        state.questions().iter().map(|q| q.id.as_str()).collect()
    }

    fn loaded(state: &mut DisclosureState, pages: &[&[&str]]) {
        let ticket = state.begin_reset();
        assert!(state.apply(&ticket, page(pages[0], 1, true, 100)));
        for (i, ids) in pages.iter().enumerate().skip(1) {
            let ticket = state.begin_load_more().expect("load more allowed");
            assert!(state.apply(&ticket, page(ids, i as u32 + 1, true, 100)));
        }
    }

    #[test]
    fn overlapping_pages_are_deduplicated() {
        let mut state = DisclosureState::new(3);
        loaded(&mut state, &[&["a", "b", "c"], &["c", "d", "e"], &["e", "e", "f"]]);
        assert_eq!(ids(&state), ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.load_more_clicks(), 2);
    }

    #[test]
    fn duplicate_ids_within_first_page_are_dropped() {
        let mut state = DisclosureState::new(3);
        loaded(&mut state, &[&["a", "a", "b"]]);
        assert_eq!(ids(&state), ["a", "b"]);
    }

    #[test]
    fn filter_change_discards_progress() {
        let mut state = DisclosureState::new(2);
        loaded(&mut state, &[&["a", "b"], &["c", "d"], &["e", "f"]]);
        assert!(state.show_hide());

        state.set_category(CategoryFilter::Named("pricing".into()));
        let ticket = state.begin_reset();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.load_more_clicks(), 0);
        assert!(state.snapshot().is_none());
        assert_eq!(ticket.query.category, CategoryFilter::Named("pricing".into()));

        assert!(state.apply(&ticket, page(&["p1", "p2"], 1, false, 2)));
        assert_eq!(ids(&state), ["p1", "p2"]);
        assert!(!state.show_load_more());
        assert!(!state.show_hide());
    }

    #[test]
    fn stale_reset_response_is_ignored() {
        let mut state = DisclosureState::new(2);
        let old = state.begin_reset();
        let new = state.begin_reset();
        assert!(!state.apply(&old, page(&["old"], 1, false, 1)));
        assert!(state.apply(&new, page(&["new"], 1, false, 1)));
        assert_eq!(ids(&state), ["new"]);
    }

    #[test]
    fn load_more_in_flight_is_dropped_by_reset() {
        let mut state = DisclosureState::new(2);
        loaded(&mut state, &[&["a", "b"]]);
        let more = state.begin_load_more().unwrap();
        let reset = state.begin_reset();
        assert!(!state.apply(&more, page(&["c"], 2, false, 3)));
        assert!(state.apply(&reset, page(&["x"], 1, false, 1)));
        assert_eq!(ids(&state), ["x"]);
    }

    #[test]
    fn load_more_before_reset_keeps_loaded_filters() {
        let mut state = DisclosureState::new(2);
        state.set_search("carpet");
        loaded(&mut state, &[&["a", "b"]]);

        state.set_search("windows");
        state.set_category(CategoryFilter::Named("pricing".into()));
        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.query.page, 2);
        assert_eq!(ticket.query.search, "carpet");
        assert_eq!(ticket.query.category, CategoryFilter::All);
        assert_eq!(state.search_query(), "windows");
    }

    #[test]
    fn load_more_requires_more_and_idle() {
        let mut state = DisclosureState::new(2);
        assert!(state.begin_load_more().is_none());

        loaded(&mut state, &[&["a", "b"]]);
        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.query.page, 2);
        assert!(state.begin_load_more().is_none());

        state.fail(&ticket);
        assert_eq!(ids(&state), ["a", "b"]);
        assert_eq!(state.load_more_clicks(), 0);
        assert!(state.begin_load_more().is_some());
    }

    #[test]
    fn hide_steps_back_to_first_load_more_snapshot() {
        let mut state = DisclosureState::new(2);
        loaded(&mut state, &[&["a", "b"], &["c", "d"]]);
        assert!(!state.show_hide());
        assert!(state.begin_hide(0.0, 0.0, 200.0, 16.0).is_none());

        let ticket = state.begin_load_more().unwrap();
        assert!(state.apply(&ticket, page(&["e", "f"], 3, false, 6)));
        assert!(state.show_hide());
        assert!(!state.show_load_more());

        let plan = state.begin_hide(2000.0, 900.0, 200.0, 16.0).unwrap();
        assert_eq!(plan.scroll_target, 916.0);
        assert!(state.is_hiding());
        assert!(state.begin_load_more().is_none());

        assert!(state.finish_hide());
        assert_eq!(ids(&state), ["a", "b", "c", "d"]);
        assert_eq!(state.load_more_clicks(), 1);
        assert_eq!(state.current_page(), 2);
        assert!(state.has_more());
        assert!(!state.is_hiding());

        let next = state.begin_load_more().unwrap();
        assert_eq!(next.query.page, 3);
    }

    #[test]
    fn hide_keeps_position_near_the_section() {
        let mut state = DisclosureState::new(1);
        loaded(&mut state, &[&["a"], &["b"], &["c"]]);
        let plan = state.begin_hide(1050.0, 900.0, 200.0, 16.0).unwrap();
        assert_eq!(plan.scroll_target, 1050.0);
    }

    #[test]
    fn toggles_are_independent() {
        let mut state = DisclosureState::new(2);
        assert!(state.toggle("a"));
        assert!(state.toggle("b"));
        assert!(state.is_open("a") && state.is_open("b"));
        assert!(!state.toggle("a"));
        assert!(!state.is_open("a"));
        assert!(state.is_open("b"));
    }
}
