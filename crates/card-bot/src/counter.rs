//! Per-thread reply counter shared by the comment and mention watchers.
//!
//! Counts only replies posted during this process run; it resets on
//! restart and never decays. A thread at the cap stays capped for the
//! process lifetime.

use std::collections::HashMap;
use std::sync::Mutex;

use reddit_client::Fullname;

/// Hard ceiling on replies per thread for one process run.
pub const MAX_REPLIES_PER_THREAD: u32 = 10;

#[derive(Default)]
pub struct ReplyCounter {
    counts: Mutex<HashMap<Fullname, u32>>,
}

impl ReplyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the thread has used up its reply budget. Checked before the
    /// reply; the check and the increment are separate calls, so two
    /// watchers racing on the same thread may overshoot by one.
    pub fn at_cap(&self, thread: &Fullname) -> bool {
        self.count(thread) >= MAX_REPLIES_PER_THREAD
    }

    /// Record a successful reply and return the new count for the thread.
    pub fn record_reply(&self, thread: &Fullname) -> u32 {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(thread.clone()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, thread: &Fullname) -> u32 {
        self.counts.lock().unwrap().get(thread).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn thread() -> Fullname {
        Fullname::submission("thread1")
    }

    #[test]
    fn test_counts_start_at_zero() {
        let counter = ReplyCounter::new();
        assert_eq!(counter.count(&thread()), 0);
        assert!(!counter.at_cap(&thread()));
    }

    #[test]
    fn test_record_reply_increments() {
        let counter = ReplyCounter::new();
        assert_eq!(counter.record_reply(&thread()), 1);
        assert_eq!(counter.record_reply(&thread()), 2);
        assert_eq!(counter.count(&thread()), 2);
    }

    #[test]
    fn test_threads_are_independent() {
        let counter = ReplyCounter::new();
        counter.record_reply(&Fullname::submission("a"));
        assert_eq!(counter.count(&Fullname::submission("b")), 0);
    }

    #[test]
    fn test_cap_reached_after_max_replies() {
        let counter = ReplyCounter::new();
        for _ in 0..MAX_REPLIES_PER_THREAD {
            counter.record_reply(&thread());
        }
        assert!(counter.at_cap(&thread()));
        // the cap never decays
        assert!(counter.at_cap(&thread()));
    }

    #[tokio::test]
    async fn test_no_lost_updates_under_concurrency() {
        let counter = Arc::new(ReplyCounter::new());
        let mut handles = Vec::new();
        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                counter.record_reply(&Fullname::submission("racy"));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(counter.count(&Fullname::submission("racy")), 20);
    }
}
