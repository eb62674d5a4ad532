//! Latest-score inbox.
//!
//! The driver writes when a score arrives, the simulation reads at the top
//! of the next tick. Only the newest report matters, so the inbox is a
//! single slot rather than a queue.

use std::sync::Arc;

use fireworks_core::ScoreSource;
use fireworks_shared::ScoreReport;
use parking_lot::Mutex;

/// Single-slot mailbox for score reports. Cloning shares the slot.
#[derive(Clone, Debug, Default)]
pub struct ScoreInbox {
    latest: Arc<Mutex<Option<ScoreReport>>>,
}

impl ScoreInbox {
    /// Creates an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a report, replacing any unread one.
    pub fn post(&self, report: ScoreReport) {
        *self.latest.lock() = Some(report);
    }
}

impl ScoreSource for ScoreInbox {
    fn poll(&self) -> Option<ScoreReport> {
        self.latest.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_report_wins() {
        let inbox = ScoreInbox::new();
        inbox.post(ScoreReport::new(1.0, 10.0));
        inbox.post(ScoreReport::new(10.0, 10.0));

        assert_eq!(inbox.poll(), Some(ScoreReport::new(10.0, 10.0)));
        assert_eq!(inbox.poll(), None);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let writer = ScoreInbox::new();
        let reader = writer.clone();

        writer.post(ScoreReport::new(3.0, 4.0));
        assert_eq!(reader.poll(), Some(ScoreReport::new(3.0, 4.0)));
        assert_eq!(writer.poll(), None);
    }

    #[test]
    fn test_cross_thread_post() {
        let inbox = ScoreInbox::new();
        let writer = inbox.clone();
        std::thread::spawn(move || writer.post(ScoreReport::new(5.0, 5.0)))
            .join()
            .unwrap();

        assert_eq!(inbox.poll(), Some(ScoreReport::new(5.0, 5.0)));
    }
}
