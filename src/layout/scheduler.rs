//! Debounced reflow scheduling
//!
//! Edits arrive much faster than a reflow should run. The scheduler holds at
//! most one pending pass; a newer trigger replaces the older one and restarts
//! the quiet period. Time is passed in by the caller, so the scheduler never
//! reads a clock itself.

/// A reflow waiting for its quiet period to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReflow {
    pub page_index: usize,
    pub due_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ReflowScheduler {
    delay_ms: u64,
    pending: Option<PendingReflow>,
}

impl Default for ReflowScheduler {
    fn default() -> Self {
        Self::new(500)
    }
}

impl ReflowScheduler {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Change the quiet period; an already pending pass keeps its due time
    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    /// Request a reflow of `page_index`, replacing any pending request
    pub fn schedule(&mut self, page_index: usize, now_ms: u64) {
        if let Some(previous) = self.pending {
            if previous.page_index != page_index {
                log::debug!(
                    "reflow of page {} superseded by page {}",
                    previous.page_index + 1,
                    page_index + 1
                );
            }
        }
        self.pending = Some(PendingReflow {
            page_index,
            due_at_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Take the pending request if its quiet period has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<usize> {
        match self.pending {
            Some(pending) if now_ms >= pending.due_at_ms => {
                self.pending = None;
                Some(pending.page_index)
            }
            _ => None,
        }
    }

    /// Take the pending request regardless of time
    pub fn take(&mut self) -> Option<usize> {
        self.pending.take().map(|p| p.page_index)
    }

    pub fn pending(&self) -> Option<PendingReflow> {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let mut scheduler = ReflowScheduler::new(500);
        scheduler.schedule(2, 1_000);
        assert_eq!(scheduler.poll(1_499), None);
        assert_eq!(scheduler.poll(1_500), Some(2));
        assert_eq!(scheduler.poll(2_000), None);
    }

    #[test]
    fn test_burst_coalesces() {
        let mut scheduler = ReflowScheduler::new(500);
        scheduler.schedule(0, 0);
        scheduler.schedule(0, 100);
        scheduler.schedule(0, 200);
        assert_eq!(scheduler.poll(600), None);
        assert_eq!(scheduler.poll(700), Some(0));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_latest_trigger_wins() {
        let mut scheduler = ReflowScheduler::new(500);
        scheduler.schedule(1, 0);
        scheduler.schedule(4, 50);
        assert_eq!(
            scheduler.pending(),
            Some(PendingReflow {
                page_index: 4,
                due_at_ms: 550
            })
        );
        assert_eq!(scheduler.poll(550), Some(4));
    }

    #[test]
    fn test_cancel_and_take() {
        let mut scheduler = ReflowScheduler::default();
        scheduler.schedule(3, 0);
        scheduler.cancel();
        assert_eq!(scheduler.poll(10_000), None);

        scheduler.schedule(3, 0);
        assert_eq!(scheduler.take(), Some(3));
        assert_eq!(scheduler.take(), None);
    }
}
