//! Timestamped status line display.

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, PoisonError};

use crate::results::html::escape_text;
use crate::traits::PageSurface;

/// A status line with the local time it was shown.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub timestamp: DateTime<Local>,
    pub text: String,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self::at(Local::now(), text)
    }

    pub fn at(timestamp: DateTime<Local>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// `[HH:MM:SS] text`, 24-hour clock.
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }

    /// The label fragment placed in the status element.
    ///
    /// Inbound text is escaped; a server message can never inject markup.
    pub fn to_html(&self) -> String {
        format!("<label>{}\n</label>", escape_text(&self.formatted()))
    }

    /// Rendered height in lines, used as the scroll target.
    pub fn line_count(&self) -> usize {
        self.formatted().lines().count().max(1)
    }
}

/// Shows one status line at a time in a page element.
pub struct StatusDisplay {
    page: Arc<dyn PageSurface>,
    element_id: String,
    last: Mutex<Option<StatusMessage>>,
}

impl StatusDisplay {
    pub fn new(page: Arc<dyn PageSurface>, element_id: impl Into<String>) -> Self {
        Self {
            page,
            element_id: element_id.into(),
            last: Mutex::new(None),
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Replace the visible status line with `text`, stamped now.
    pub fn show(&self, text: impl Into<String>) -> StatusMessage {
        let message = StatusMessage::new(text);
        self.show_message(message.clone());
        message
    }

    pub fn show_message(&self, message: StatusMessage) {
        self.page
            .replace_content(&self.element_id, message.to_html());
        self.page
            .scroll_to(&self.element_id, message.line_count());
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
    }

    /// The most recent status line, if any has been shown.
    pub fn last_message(&self) -> Option<StatusMessage> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
