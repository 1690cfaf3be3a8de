//! Checklist explorer: an inline room x cleaning-type panel and a room
//! detail modal with its own cleaning-type selector.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::ContentSource;
use crate::config::UiTimings;
use crate::documents::{ChecklistDocument, CleaningType, Room, load_or_default};
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};

/// Everything the modal shows for one room, copied out of the document
/// when the modal opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalData {
    pub room: Room,
    pub title: String,
    pub routine: Vec<String>,
    pub deep: Vec<String>,
    pub moving: Vec<String>,
    pub image: String,
}

impl ModalData {
    fn for_room(document: &ChecklistDocument, room: Room) -> Self {
        let items = &document.checklist_items;
        Self {
            room,
            title: room.title().to_string(),
            routine: items.tasks(CleaningType::Routine, room).to_vec(),
            deep: items.tasks(CleaningType::Deep, room).to_vec(),
            moving: items.tasks(CleaningType::Moving, room).to_vec(),
            image: document.room_images.get(room).to_string(),
        }
    }

    pub fn tasks(&self, cleaning_type: CleaningType) -> &[String] {
        match cleaning_type {
            CleaningType::Routine => &self.routine,
            CleaningType::Deep => &self.deep,
            CleaningType::Moving => &self.moving,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    pub open: bool,
    pub data: Option<ModalData>,
    pub cleaning_type: CleaningType,
}

/// Selection state for the explorer. The inline selection and the modal
/// selection never affect each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistExplorer {
    #[serde(skip)]
    document: ChecklistDocument,
    active_room: Room,
    cleaning_type: CleaningType,
    modal: ModalState,
}

impl ChecklistExplorer {
    pub fn new(document: ChecklistDocument) -> Self {
        Self {
            document,
            active_room: Room::default(),
            cleaning_type: CleaningType::default(),
            modal: ModalState::default(),
        }
    }

    pub fn document(&self) -> &ChecklistDocument {
        &self.document
    }

    pub fn active_room(&self) -> Room {
        self.active_room
    }

    pub fn cleaning_type(&self) -> CleaningType {
        self.cleaning_type
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn select_room(&mut self, room: Room) {
        self.active_room = room;
    }

    pub fn select_cleaning_type(&mut self, cleaning_type: CleaningType) {
        self.cleaning_type = cleaning_type;
    }

    /// Tasks shown by the inline panel.
    pub fn inline_tasks(&self) -> &[String] {
        self.document
            .checklist_items
            .tasks(self.cleaning_type, self.active_room)
    }

    /// Open the detail modal for `room`. The modal always starts on the
    /// routine list.
    pub fn open_room(&mut self, room: Room) {
        self.modal = ModalState {
            open: true,
            data: Some(ModalData::for_room(&self.document, room)),
            cleaning_type: CleaningType::Routine,
        };
    }

    pub fn select_modal_cleaning_type(&mut self, cleaning_type: CleaningType) {
        self.modal.cleaning_type = cleaning_type;
    }

    /// Tasks shown by the modal, if it has content.
    pub fn modal_tasks(&self) -> Option<&[String]> {
        self.modal
            .data
            .as_ref()
            .map(|data| data.tasks(self.modal.cleaning_type))
    }

    /// Hide the modal. Its content stays until [`Self::clear_modal_data`]
    /// so the closing transition still has something to show.
    pub fn close_modal(&mut self) {
        self.modal.open = false;
    }

    /// Drop stale modal content. A no-op if the modal was reopened.
    pub fn clear_modal_data(&mut self) -> bool {
        if self.modal.open || self.modal.data.is_none() {
            return false;
        }
        self.modal.data = None;
        true
    }
}

/// Explorer wired to a scroll lock and the modal-close timer.
pub struct ChecklistSession {
    explorer: Arc<Mutex<ChecklistExplorer>>,
    lock: ScrollLock,
    guard: Mutex<Option<ScrollLockGuard>>,
    pending_clear: Mutex<Option<JoinHandle<()>>>,
    modal_clear: Duration,
}

impl ChecklistSession {
    pub fn new(document: ChecklistDocument, lock: ScrollLock, timings: &UiTimings) -> Self {
        Self {
            explorer: Arc::new(Mutex::new(ChecklistExplorer::new(document))),
            lock,
            guard: Mutex::new(None),
            pending_clear: Mutex::new(None),
            modal_clear: timings.modal_clear,
        }
    }

    /// Load the checklist document, falling back to the built-in one.
    pub async fn load<S>(source: &S, lock: ScrollLock, timings: &UiTimings) -> Self
    where
        S: ContentSource + ?Sized,
    {
        let document: ChecklistDocument = load_or_default(source).await;
        Self::new(document, lock, timings)
    }

    fn with_explorer<R>(&self, f: impl FnOnce(&mut ChecklistExplorer) -> R) -> R {
        let mut explorer = self.explorer.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut explorer)
    }

    /// Current state, cloned for rendering.
    pub fn explorer(&self) -> ChecklistExplorer {
        self.with_explorer(|e| e.clone())
    }

    pub fn select_room(&self, room: Room) {
        self.with_explorer(|e| e.select_room(room));
    }

    pub fn select_cleaning_type(&self, cleaning_type: CleaningType) {
        self.with_explorer(|e| e.select_cleaning_type(cleaning_type));
    }

    pub fn select_modal_cleaning_type(&self, cleaning_type: CleaningType) {
        self.with_explorer(|e| e.select_modal_cleaning_type(cleaning_type));
    }

    /// Open the room modal and lock page scroll.
    pub fn open_room(&self, room: Room) {
        if let Some(pending) = self
            .pending_clear
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pending.abort();
        }
        self.with_explorer(|e| e.open_room(room));

        let mut guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(self.lock.acquire());
        }
        debug!(%room, "checklist modal opened");
    }

    /// Close the modal, restore page scroll and schedule the content clear.
    pub async fn close_modal(&self) {
        let was_open = self.with_explorer(|e| {
            let open = e.modal().open;
            e.close_modal();
            open
        });
        if !was_open {
            return;
        }

        let explorer = Arc::clone(&self.explorer);
        let delay = self.modal_clear;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let cleared = explorer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear_modal_data();
            if cleared {
                debug!("checklist modal content cleared");
            }
        });
        if let Some(previous) = self
            .pending_clear
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle)
        {
            previous.abort();
        }

        let guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(guard) = guard {
            guard.release().await;
        }
    }
}

impl Drop for ChecklistSession {
    fn drop(&mut self) {
        let pending = self
            .pending_clear
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LocalQuestionBank;
    use crate::scroll_lock::{ScrollSurface, VirtualDocument};
    use crate::store::MemoryContentStore;

    fn session(doc: &Arc<VirtualDocument>) -> ChecklistSession {
        let timings = UiTimings::default();
        let lock = ScrollLock::new(doc.clone(), timings.scroll_restore_fallback);
        ChecklistSession::new(ChecklistDocument::default(), lock, &timings)
    }

    #[test]
    fn modal_selection_is_independent_of_inline() {
        let mut explorer = ChecklistExplorer::new(ChecklistDocument::default());
        explorer.select_room(Room::Kitchen);
        explorer.select_cleaning_type(CleaningType::Deep);

        explorer.open_room(Room::Kitchen);
        assert_eq!(explorer.modal().cleaning_type, CleaningType::Routine);
        assert_eq!(explorer.modal().data.as_ref().unwrap().title, "Kitchen");

        explorer.select_modal_cleaning_type(CleaningType::Moving);
        assert_eq!(explorer.cleaning_type(), CleaningType::Deep);
        assert_eq!(
            explorer.inline_tasks(),
            explorer
                .document()
                .checklist_items
                .tasks(CleaningType::Deep, Room::Kitchen)
        );
        assert_eq!(
            explorer.modal_tasks().unwrap(),
            explorer
                .document()
                .checklist_items
                .tasks(CleaningType::Moving, Room::Kitchen)
        );
    }

    #[test]
    fn reopen_resets_modal_type() {
        let mut explorer = ChecklistExplorer::new(ChecklistDocument::default());
        explorer.open_room(Room::Bathroom);
        explorer.select_modal_cleaning_type(CleaningType::Deep);
        explorer.close_modal();
        explorer.open_room(Room::Bedroom);
        assert_eq!(explorer.modal().cleaning_type, CleaningType::Routine);
        assert_eq!(
            explorer.modal().data.as_ref().unwrap().image,
            "/images/checklist/bedroom.jpg"
        );
        assert!(!explorer.clear_modal_data());
    }

    #[tokio::test(start_paused = true)]
    async fn modal_round_trip_restores_scroll() {
        let doc = Arc::new(VirtualDocument::new(8000.0));
        doc.user_scroll(640.0);
        let session = session(&doc);

        session.open_room(Room::Living);
        assert!(doc.body_style().fixed);
        assert_eq!(doc.visible_top(), 640.0);

        session.close_modal().await;
        assert_eq!(doc.scroll_offset(), 640.0);
        assert!(!doc.root_overflow_hidden());
        assert!(session.explorer().modal().data.is_some());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(session.explorer().modal().data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_cancels_pending_clear() {
        let doc = Arc::new(VirtualDocument::new(8000.0));
        let session = session(&doc);

        session.open_room(Room::Kitchen);
        session.close_modal().await;
        session.open_room(Room::Bathroom);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let explorer = session.explorer();
        assert!(explorer.modal().open);
        assert_eq!(explorer.modal().data.as_ref().unwrap().room, Room::Bathroom);
        assert!(doc.body_style().fixed);
    }

    #[tokio::test]
    async fn missing_document_falls_back_to_defaults() {
        let local = LocalQuestionBank::open(Arc::new(MemoryContentStore::new())).unwrap();
        let doc = Arc::new(VirtualDocument::new(100.0));
        let lock = ScrollLock::new(doc, Duration::from_millis(50));
        let session = ChecklistSession::load(&local, lock, &UiTimings::default()).await;
        let explorer = session.explorer();
        assert_eq!(explorer.active_room(), Room::Living);
        assert!(!explorer.inline_tasks().is_empty());
    }
}
