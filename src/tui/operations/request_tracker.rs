//! Ticketed tracking of in-flight requests

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::debug;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one spawned request; never reused within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    fn next() -> Self {
        Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Kinds of request a screen can have in flight; at most one per kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Submit,
    Upload,
    Fetch,
    Save(String),
}

struct InFlight {
    ticket: Ticket,
    handle: JoinHandle<()>,
}

/// Owns the request tasks of one screen
#[derive(Default)]
pub struct RequestTracker {
    in_flight: HashMap<RequestKind, InFlight>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a request; an older request of the same kind is aborted and its
    /// result will be ignored
    pub fn start<F, Fut>(&mut self, kind: RequestKind, task: F) -> Ticket
    where
        F: FnOnce(Ticket) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = Ticket::next();

        if let Some(previous) = self.in_flight.remove(&kind) {
            debug!("Superseding {:?} request {:?}", kind, previous.ticket);
            previous.handle.abort();
        }

        let handle = tokio::spawn(task(ticket));
        self.in_flight.insert(kind, InFlight { ticket, handle });
        ticket
    }

    /// Mark a request finished. Returns false when the ticket is stale, in
    /// which case the result must not be applied.
    pub fn finish(&mut self, kind: &RequestKind, ticket: Ticket) -> bool {
        match self.in_flight.get(kind) {
            Some(current) if current.ticket == ticket => {
                self.in_flight.remove(kind);
                true
            }
            _ => {
                debug!("Dropping stale {:?} result {:?}", kind, ticket);
                false
            }
        }
    }

    pub fn is_in_flight(&self, kind: &RequestKind) -> bool {
        self.in_flight.contains_key(kind)
    }

    /// Abort every request; late results are then recognised as stale
    pub fn cancel_all(&mut self) {
        for (kind, request) in self.in_flight.drain() {
            debug!("Cancelling {:?} request {:?}", kind, request.ticket);
            request.handle.abort();
        }
    }
}

impl Drop for RequestTracker {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::{mpsc, oneshot};

    #[tokio::test]
    async fn test_finish_accepts_current_ticket_once() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.start(RequestKind::Submit, |_| async {});

        assert!(tracker.is_in_flight(&RequestKind::Submit));
        assert!(tracker.finish(&RequestKind::Submit, ticket));
        assert!(!tracker.is_in_flight(&RequestKind::Submit));
        assert!(!tracker.finish(&RequestKind::Submit, ticket));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let (release_tx, release_rx) = oneshot::channel::<()>();
        let first_tx = tx.clone();
        let first = tracker.start(RequestKind::Fetch, move |ticket| async move {
            let _ = release_rx.await;
            let _ = first_tx.send(ticket);
        });
        let second = tracker.start(RequestKind::Fetch, move |ticket| async move {
            let _ = tx.send(ticket);
        });

        // the first task was aborted before it could report
        let _ = release_tx.send(());
        assert_eq!(rx.recv().await, Some(second));
        assert_eq!(rx.recv().await, None);

        assert!(!tracker.finish(&RequestKind::Fetch, first));
        assert!(tracker.finish(&RequestKind::Fetch, second));
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let mut tracker = RequestTracker::new();
        let save_a = tracker.start(RequestKind::Save("A".to_string()), |_| async {});
        let save_b = tracker.start(RequestKind::Save("B".to_string()), |_| async {});
        let upload = tracker.start(RequestKind::Upload, |_| async {});

        assert!(tracker.finish(&RequestKind::Save("B".to_string()), save_b));
        assert!(tracker.is_in_flight(&RequestKind::Save("A".to_string())));
        assert!(tracker.is_in_flight(&RequestKind::Upload));
        assert!(tracker.finish(&RequestKind::Save("A".to_string()), save_a));
        assert!(tracker.finish(&RequestKind::Upload, upload));
    }

    #[tokio::test]
    async fn test_cancel_all_makes_tickets_stale() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.start(RequestKind::Fetch, |_| std::future::pending());

        tracker.cancel_all();

        assert!(!tracker.is_in_flight(&RequestKind::Fetch));
        assert!(!tracker.finish(&RequestKind::Fetch, ticket));
    }
}
