use serde::de::DeserializeOwned;
use tracing::warn;

use crate::api::ContentSource;

pub mod checklist;
pub mod faq_page;
mod lenient;

pub use checklist::{
    CHECKLIST_PAGE, ChecklistDocument, ChecklistItems, CleaningType, Room, RoomImages, RoomTasks,
};
pub use faq_page::{FAQ_PAGE, FaqPageDocument, HelpCard, IconTag, TrustIndicator};

/// A static page document with a built-in fallback.
pub trait PageDocument: DeserializeOwned + Default {
    const PAGE: &'static str;

    fn normalized(self) -> Self;
}

impl PageDocument for ChecklistDocument {
    const PAGE: &'static str = CHECKLIST_PAGE;

    fn normalized(self) -> Self {
        ChecklistDocument::normalized(self)
    }
}

impl PageDocument for FaqPageDocument {
    const PAGE: &'static str = FAQ_PAGE;

    fn normalized(self) -> Self {
        FaqPageDocument::normalized(self)
    }
}

/// Fetch a page document, falling back to the built-in one on any failure.
pub async fn load_or_default<D, S>(source: &S) -> D
where
    D: PageDocument,
    S: ContentSource + ?Sized,
{
    let value = match source.fetch_document(D::PAGE).await {
        Ok(value) => value,
        Err(err) => {
            warn!(page = D::PAGE, error = %err, "content fetch failed; using default document");
            return D::default();
        }
    };

    match serde_json::from_value::<D>(value) {
        Ok(doc) => doc.normalized(),
        Err(err) => {
            warn!(page = D::PAGE, error = %err, "malformed content document; using default");
            D::default()
        }
    }
}
