use std::collections::HashSet;
use std::sync::Arc;

use tidyhaus_cms::api::LocalQuestionBank;
use tidyhaus_cms::config::{DisclosureConfig, UiTimings};
use tidyhaus_cms::disclosure::FaqDisclosure;
use tidyhaus_cms::model::{CategoryFilter, FaqQuestion};
use tidyhaus_cms::scroll_lock::{ScrollSurface, VirtualDocument};
use tidyhaus_cms::store::MemoryContentStore;

fn questions(n: usize, category: &str) -> Vec<FaqQuestion> {
    (0..n)
        .map(|i| FaqQuestion {
            id: format!("{category}-{i:02}"),
            question: format!("{category} question {i}?"),
            answer: format!("{category} answer {i}."),
            category: category.to_string(),
            tags: Vec::new(),
            order: i as u32,
        })
        .collect()
}

fn controller(seed: Vec<FaqQuestion>) -> FaqDisclosure<LocalQuestionBank> {
    let local = LocalQuestionBank::open(Arc::new(MemoryContentStore::with_questions(seed))).unwrap();
    FaqDisclosure::new(local, DisclosureConfig::default(), UiTimings::default())
}

fn ids(faq: &FaqDisclosure<LocalQuestionBank>) -> Vec<String> {
    faq.state().questions().iter().map(|q| q.id.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn load_more_accumulates_twenty_unique_questions() {
    let faq = controller(questions(20, "general"));
    faq.mount().await;

    let state = faq.state();
    assert_eq!(state.questions().len(), 12);
    assert!(state.has_more());
    assert_eq!(state.total_questions(), 20);

    assert!(faq.load_more().await);
    let state = faq.state();
    let unique: HashSet<_> = state.questions().iter().map(|q| &q.id).collect();
    assert_eq!(state.questions().len(), 20);
    assert_eq!(unique.len(), 20);
    assert!(!state.has_more());
    assert!(!state.show_load_more());
    assert!(!state.show_hide());

    assert!(!faq.load_more().await);
}

#[tokio::test(start_paused = true)]
async fn hide_steps_back_to_the_first_increment() {
    let faq = controller(questions(50, "general"));
    faq.mount().await;
    assert!(faq.load_more().await);
    let after_first = ids(&faq);
    assert_eq!(after_first.len(), 24);

    assert!(faq.load_more().await);
    assert!(faq.load_more().await);
    assert_eq!(faq.state().questions().len(), 48);
    assert!(faq.state().show_hide());

    let surface = VirtualDocument::new(10_000.0);
    surface.user_scroll(3_000.0);
    assert!(faq.hide(&surface, 1_000.0).await);

    let state = faq.state();
    assert_eq!(ids(&faq), after_first);
    assert_eq!(state.load_more_clicks(), 1);
    assert_eq!(state.current_page(), 2);
    assert!(state.has_more());
    assert!(!state.show_hide());
    assert_eq!(surface.scroll_offset(), 1_016.0);
    assert_eq!(surface.smooth_scrolls(), vec![1_016.0]);

    assert!(faq.load_more().await);
    let state = faq.state();
    assert_eq!(state.current_page(), 3);
    assert_eq!(state.questions().len(), 36);
    assert_eq!(state.questions()[24].id, "general-24");
}

#[tokio::test(start_paused = true)]
async fn hide_near_the_section_keeps_position() {
    let faq = controller(questions(40, "general"));
    faq.mount().await;
    assert!(faq.load_more().await);
    assert!(faq.load_more().await);

    let surface = VirtualDocument::new(10_000.0);
    surface.user_scroll(1_150.0);
    assert!(faq.hide(&surface, 1_000.0).await);
    assert_eq!(surface.scroll_offset(), 1_150.0);
}

#[tokio::test(start_paused = true)]
async fn changing_category_discards_progress() {
    let mut seed = questions(30, "general");
    seed.extend(questions(5, "pricing"));
    let faq = controller(seed);
    faq.mount().await;
    assert!(faq.load_more().await);
    assert_eq!(faq.state().load_more_clicks(), 1);

    faq.set_category(CategoryFilter::Named("pricing".to_string()));
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let state = faq.state();
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.load_more_clicks(), 0);
    assert!(state.snapshot().is_none());
    assert_eq!(state.questions().len(), 5);
    assert!(state.questions().iter().all(|q| q.category == "pricing"));
    assert_eq!(state.categories(), ["general".to_string(), "pricing".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn mount_refetches_after_cleanup() {
    let mut seed = questions(3, "general");
    let duplicate = FaqQuestion {
        id: "general-99".to_string(),
        order: 99,
        ..seed[0].clone()
    };
    seed.push(duplicate);
    let faq = controller(seed);
    faq.mount().await;

    let state = faq.state();
    assert_eq!(state.total_questions(), 3);
    assert_eq!(state.questions().len(), 3);
}
