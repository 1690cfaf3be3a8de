//! Page scroll pinning for modal overlays.
//!
//! A [`ScrollLock`] is shared by everything that may open an overlay. The
//! first holder captures the scroll offset and pins the body; the last one
//! to release restores it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// The scrollable page as seen by overlays and the FAQ list.
pub trait ScrollSurface: Send + Sync {
    fn scroll_offset(&self) -> f64;
    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior);
    /// Fix the body in place so the content at `offset` stays where it is
    /// on screen, and constrain it to full width.
    fn pin_body(&self, offset: f64);
    fn unpin_body(&self);
    fn set_root_overflow_hidden(&self, hidden: bool);
}

#[derive(Debug, Default)]
struct LockState {
    holders: usize,
    captured: Option<f64>,
    epoch: u64,
}

#[derive(Clone)]
pub struct ScrollLock {
    surface: Arc<dyn ScrollSurface>,
    state: Arc<Mutex<LockState>>,
    restore_fallback: Duration,
}

impl ScrollLock {
    pub fn new(surface: Arc<dyn ScrollSurface>, restore_fallback: Duration) -> Self {
        Self {
            surface,
            state: Arc::new(Mutex::new(LockState::default())),
            restore_fallback,
        }
    }

    pub fn surface(&self) -> &Arc<dyn ScrollSurface> {
        &self.surface
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.holders += 1;
        if state.holders == 1 {
            let offset = self.surface.scroll_offset();
            state.captured = Some(offset);
            state.epoch += 1;
            self.surface.pin_body(offset);
            self.surface.set_root_overflow_hidden(true);
            debug!(offset, "scroll locked");
        }
        ScrollLockGuard {
            lock: self.clone(),
            active: true,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .holders
            > 0
    }

    /// Offset captured by the current lock and not yet restored.
    pub fn captured_offset(&self) -> Option<f64> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .captured
    }

    /// Returns the offset to restore and the lock epoch when this was the
    /// last holder.
    fn release_one(&self) -> Option<(f64, u64)> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.holders = state.holders.saturating_sub(1);
        if state.holders > 0 {
            return None;
        }
        self.surface.unpin_body();
        self.surface.set_root_overflow_hidden(false);
        let offset = state.captured?;
        self.surface.scroll_to(offset, ScrollBehavior::Instant);
        Some((offset, state.epoch))
    }

    async fn reassert(&self, offset: f64, epoch: u64) {
        tokio::time::sleep(self.restore_fallback).await;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer lock owns the capture now.
        if state.holders > 0 || state.epoch != epoch {
            return;
        }
        if self.surface.scroll_offset() != offset {
            debug!(offset, "re-asserting restored scroll offset");
            self.surface.scroll_to(offset, ScrollBehavior::Instant);
        }
        state.captured = None;
    }

    fn clear_capture(&self, epoch: u64) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.holders == 0 && state.epoch == epoch {
            state.captured = None;
        }
    }
}

/// One holder of a [`ScrollLock`]. Prefer [`ScrollLockGuard::release`];
/// dropping the guard restores synchronously without the fallback pass.
pub struct ScrollLockGuard {
    lock: ScrollLock,
    active: bool,
}

impl ScrollLockGuard {
    pub async fn release(mut self) {
        self.active = false;
        if let Some((offset, epoch)) = self.lock.release_one() {
            self.lock.reassert(offset, epoch).await;
        }
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some((_, epoch)) = self.lock.release_one() {
            self.lock.clear_capture(epoch);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyStyle {
    pub fixed: bool,
    pub top: f64,
    pub full_width: bool,
}

#[derive(Debug)]
struct DocumentState {
    scroll: f64,
    max_scroll: f64,
    body: BodyStyle,
    root_overflow_hidden: bool,
    lose_first_restore: bool,
    drop_next_scroll: bool,
    smooth_scrolls: Vec<f64>,
}

/// In-memory page used where there is no browser. A pinned body reports a
/// window offset of zero, as browsers do.
#[derive(Debug)]
pub struct VirtualDocument {
    state: Mutex<DocumentState>,
}

impl VirtualDocument {
    pub fn new(max_scroll: f64) -> Self {
        Self {
            state: Mutex::new(DocumentState {
                scroll: 0.0,
                max_scroll: max_scroll.max(0.0),
                body: BodyStyle::default(),
                root_overflow_hidden: false,
                lose_first_restore: false,
                drop_next_scroll: false,
                smooth_scrolls: Vec::new(),
            }),
        }
    }

    /// Drop the first scroll request after the body is unpinned.
    pub fn losing_first_restore(self) -> Self {
        self.with_state(|s| s.lose_first_restore = true);
        self
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DocumentState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// A user gesture. Ignored while scrolling is disabled.
    pub fn user_scroll(&self, offset: f64) {
        self.with_state(|s| {
            if !s.root_overflow_hidden && !s.body.fixed {
                s.scroll = offset.clamp(0.0, s.max_scroll);
            }
        });
    }

    /// Offset of the content at the top of the screen.
    pub fn visible_top(&self) -> f64 {
        self.with_state(|s| if s.body.fixed { -s.body.top } else { s.scroll })
    }

    pub fn body_style(&self) -> BodyStyle {
        self.with_state(|s| s.body.clone())
    }

    pub fn root_overflow_hidden(&self) -> bool {
        self.with_state(|s| s.root_overflow_hidden)
    }

    pub fn smooth_scrolls(&self) -> Vec<f64> {
        self.with_state(|s| s.smooth_scrolls.clone())
    }
}

impl ScrollSurface for VirtualDocument {
    fn scroll_offset(&self) -> f64 {
        self.with_state(|s| if s.body.fixed { 0.0 } else { s.scroll })
    }

    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior) {
        self.with_state(|s| {
            if s.drop_next_scroll {
                s.drop_next_scroll = false;
                return;
            }
            if s.body.fixed || s.root_overflow_hidden {
                return;
            }
            s.scroll = offset.clamp(0.0, s.max_scroll);
            if behavior == ScrollBehavior::Smooth {
                s.smooth_scrolls.push(s.scroll);
            }
        });
    }

    fn pin_body(&self, offset: f64) {
        self.with_state(|s| {
            s.body = BodyStyle {
                fixed: true,
                top: -offset,
                full_width: true,
            };
            s.scroll = 0.0;
        });
    }

    fn unpin_body(&self) {
        self.with_state(|s| {
            s.body = BodyStyle::default();
            if s.lose_first_restore {
                s.drop_next_scroll = true;
            }
        });
    }

    fn set_root_overflow_hidden(&self, hidden: bool) {
        self.with_state(|s| s.root_overflow_hidden = hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: Duration = Duration::from_millis(50);

    fn setup(doc: VirtualDocument) -> (Arc<VirtualDocument>, ScrollLock) {
        let doc = Arc::new(doc);
        let lock = ScrollLock::new(doc.clone(), FALLBACK);
        (doc, lock)
    }

    #[tokio::test(start_paused = true)]
    async fn pins_without_moving_the_view() {
        let (doc, lock) = setup(VirtualDocument::new(5000.0));
        doc.user_scroll(420.0);

        let guard = lock.acquire();
        assert_eq!(doc.visible_top(), 420.0);
        assert_eq!(
            doc.body_style(),
            BodyStyle {
                fixed: true,
                top: -420.0,
                full_width: true
            }
        );
        assert!(doc.root_overflow_hidden());
        assert_eq!(lock.captured_offset(), Some(420.0));

        doc.user_scroll(900.0);
        assert_eq!(doc.visible_top(), 420.0);

        guard.release().await;
        assert_eq!(doc.scroll_offset(), 420.0);
        assert!(!doc.root_overflow_hidden());
        assert_eq!(doc.body_style(), BodyStyle::default());
        assert_eq!(lock.captured_offset(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_recovers_a_dropped_restore() {
        let (doc, lock) = setup(VirtualDocument::new(5000.0).losing_first_restore());
        doc.user_scroll(1234.0);

        let guard = lock.acquire();
        guard.release().await;

        assert_eq!(doc.scroll_offset(), 1234.0);
        assert_eq!(lock.captured_offset(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn nested_holders_release_in_any_order() {
        let (doc, lock) = setup(VirtualDocument::new(5000.0));
        doc.user_scroll(300.0);

        let outer = lock.acquire();
        let inner = lock.acquire();
        outer.release().await;
        assert!(lock.is_locked());
        assert!(doc.body_style().fixed);

        inner.release().await;
        assert!(!lock.is_locked());
        assert_eq!(doc.scroll_offset(), 300.0);
    }

    #[test]
    fn dropping_a_guard_restores_and_clears() {
        let (doc, lock) = setup(VirtualDocument::new(5000.0));
        doc.user_scroll(75.0);
        {
            let _guard = lock.acquire();
            assert_eq!(doc.scroll_offset(), 0.0);
        }
        assert_eq!(doc.scroll_offset(), 75.0);
        assert_eq!(lock.captured_offset(), None);
    }
}
