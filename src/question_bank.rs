use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::info;

use crate::error::{CmsError, Result};
use crate::model::{FaqQuestion, InitializeOutcome, ListQuery, NewQuestion, Pagination, QuestionPage};
use crate::seed::seed_questions;
use crate::store::ContentStore;

/// Searchable, paginated FAQ collection backed by a content store.
///
/// Records are kept sorted by `(order, id)` so every filter pages through
/// the same relative order.
pub struct QuestionBank {
    store: Arc<dyn ContentStore>,
    questions: Vec<FaqQuestion>,
}

impl QuestionBank {
    pub fn open(store: Arc<dyn ContentStore>) -> Result<Self> {
        let mut questions = store.load_questions()?;
        sort_stable(&mut questions);
        Ok(Self { store, questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FaqQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Distinct categories over the whole bank, independent of any filter.
    pub fn categories(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.category.to_lowercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn list(&self, query: &ListQuery) -> Result<QuestionPage> {
        query.validate()?;

        let matching: Vec<&FaqQuestion> = self
            .questions
            .iter()
            .filter(|q| q.matches(&query.search, &query.category))
            .collect();
        let total = matching.len();
        let limit = query.limit as usize;
        let start = (query.page as usize - 1).saturating_mul(limit);

        let questions: Vec<FaqQuestion> = matching
            .into_iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect();
        let has_more = start.saturating_add(questions.len()) < total;

        Ok(QuestionPage {
            questions,
            pagination: Pagination {
                current_page: query.page,
                has_more,
                total_questions: total,
            },
            categories: self.categories(),
        })
    }

    /// Seed an empty bank, or drop duplicate records from a populated one.
    /// Running it again on a clean bank changes nothing.
    pub fn initialize(&mut self) -> Result<InitializeOutcome> {
        if self.questions.is_empty() {
            let mut seed = seed_questions();
            sort_stable(&mut seed);
            self.store.save_questions(&seed)?;
            let inserted = seed.len();
            self.questions = seed;
            info!(inserted, "seeded question bank");
            return Ok(InitializeOutcome::Seeded { inserted });
        }

        let before = self.questions.len();
        let mut seen_ids = HashSet::new();
        let mut seen_text = HashSet::new();
        let deduped: Vec<FaqQuestion> = self
            .questions
            .iter()
            .filter(|q| {
                // Only kept records claim their id and text.
                let text = normalize(&q.question);
                if seen_ids.contains(&q.id) || seen_text.contains(&text) {
                    return false;
                }
                seen_ids.insert(q.id.clone());
                seen_text.insert(text);
                true
            })
            .cloned()
            .collect();
        let removed_count = before - deduped.len();

        if removed_count == 0 {
            return Ok(InitializeOutcome::Unchanged);
        }

        self.store.save_questions(&deduped)?;
        self.questions = deduped;
        info!(removed_count, "removed duplicate questions");
        Ok(InitializeOutcome::Cleaned { removed_count })
    }

    pub fn create(&mut self, new: NewQuestion) -> Result<FaqQuestion> {
        let question = new.question.trim();
        let answer = new.answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(CmsError::InvalidArg(
                "question and answer must not be empty".to_string(),
            ));
        }
        let category = new.category.trim().to_lowercase();
        if category.is_empty() || category == "all" {
            return Err(CmsError::InvalidArg(format!(
                "invalid category: {:?}",
                new.category
            )));
        }

        let order = self
            .questions
            .iter()
            .map(|q| q.order)
            .max()
            .map_or(0, |max| max + 1);
        let mut n = self.questions.len() + 1;
        let mut id = format!("faq-{n:04}");
        while self.get(&id).is_some() {
            n += 1;
            id = format!("faq-{n:04}");
        }

        let record = FaqQuestion {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            category,
            tags: new.tags,
            order,
        };
        let mut next = self.questions.clone();
        next.push(record.clone());
        sort_stable(&mut next);
        self.store.save_questions(&next)?;
        self.questions = next;
        Ok(record)
    }

    pub fn delete(&mut self, id: &str) -> Result<FaqQuestion> {
        let pos = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| CmsError::NotFound(format!("question {id}")))?;
        let mut next = self.questions.clone();
        let removed = next.remove(pos);
        self.store.save_questions(&next)?;
        self.questions = next;
        Ok(removed)
    }
}

fn sort_stable(questions: &mut [FaqQuestion]) {
    questions.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
