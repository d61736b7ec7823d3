//! Event handling for the category TUI

use tokio::sync::mpsc;
use tracing::debug;

use super::operations::Ticket;
use crate::api::ApiError;
use crate::models::Category;

/// Completion events delivered from request tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Form(FormEvent),
    Table(TableEvent),
}

/// Entry form request results
#[derive(Debug)]
pub enum FormEvent {
    /// Category creation finished
    Submitted {
        ticket: Ticket,
        result: Result<(), ApiError>,
    },
    /// Spreadsheet upload finished
    Uploaded {
        ticket: Ticket,
        result: Result<(), ApiError>,
    },
}

/// Category table request results
#[derive(Debug)]
pub enum TableEvent {
    /// Category list fetched
    Loaded {
        ticket: Ticket,
        result: Result<Vec<Category>, ApiError>,
    },
    /// Row update finished
    Saved {
        ticket: Ticket,
        uid: String,
        result: Result<(), ApiError>,
    },
}

/// Channel used by request tasks to report back
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Deliver an event; the UI may already be gone, which is not an error
    pub fn send(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!("UI loop no longer listening, dropping {:?}", e.0);
        }
    }
}

/// Create the event channel shared by all screens
pub fn channel() -> (EventSender, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender::new(tx), rx)
}
