//! In-memory page surface.
//!
//! Holds the current content of every element and broadcasts each change,
//! so the page server can push fragments to a browser and tests can inspect
//! exactly what was rendered.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

use crate::traits::PageSurface;

/// Current state of one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementState {
    pub html: String,
    pub scroll: usize,
}

/// A change pushed to page subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageUpdate {
    pub element: String,
    pub html: String,
    pub scroll: usize,
}

/// Page surface backed by a map of element id to content.
pub struct MemoryPage {
    elements: RwLock<HashMap<String, ElementState>>,
    updates: broadcast::Sender<PageUpdate>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a page whose update channel buffers `capacity` changes.
    pub fn with_capacity(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            elements: RwLock::new(HashMap::new()),
            updates,
        }
    }

    /// Current HTML of an element, if it was ever rendered.
    pub fn content(&self, element_id: &str) -> Option<String> {
        self.read().get(element_id).map(|e| e.html.clone())
    }

    /// Current scroll offset of an element.
    pub fn scroll_offset(&self, element_id: &str) -> Option<usize> {
        self.read().get(element_id).map(|e| e.scroll)
    }

    /// All elements, ordered by id.
    pub fn snapshot(&self) -> BTreeMap<String, ElementState> {
        self.read()
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    /// Receive every subsequent change.
    pub fn subscribe(&self) -> broadcast::Receiver<PageUpdate> {
        self.updates.subscribe()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, ElementState>> {
        self.elements.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<F>(&self, element_id: &str, f: F)
    where
        F: FnOnce(&mut ElementState),
    {
        let update = {
            let mut elements = self.elements.write().unwrap_or_else(PoisonError::into_inner);
            let state = elements.entry(element_id.to_string()).or_default();
            f(state);
            PageUpdate {
                element: element_id.to_string(),
                html: state.html.clone(),
                scroll: state.scroll,
            }
        };
        // No subscribers is fine
        let _ = self.updates.send(update);
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSurface for MemoryPage {
    fn replace_content(&self, element_id: &str, html: String) {
        self.update(element_id, |state| state.html = html);
    }

    fn scroll_to(&self, element_id: &str, offset: usize) {
        self.update(element_id, |state| state.scroll = offset);
    }
}
