/// Quiet period after the last keystroke before a search is issued
pub const SEARCH_DEBOUNCE_MS: u32 = 500;

/// Ticket-based debounce: every keystroke schedules a ticket, and only the
/// latest ticket settles into a search once its timer fires.
#[derive(Debug, Clone, Default)]
pub struct SearchDebouncer {
    ticket: u64,
    pending: Option<String>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, text: impl Into<String>) -> u64 {
        self.ticket += 1;
        self.pending = Some(text.into());
        self.ticket
    }

    /// Text to search for, or `None` when a newer keystroke superseded this ticket
    pub fn settle(&mut self, ticket: u64) -> Option<String> {
        if ticket != self.ticket {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.ticket += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_settles() {
        let mut debouncer = SearchDebouncer::new();
        let first = debouncer.schedule("ac");
        let second = debouncer.schedule("acme");
        assert_eq!(debouncer.settle(first), None);
        assert_eq!(debouncer.settle(second), Some("acme".to_string()));
        assert_eq!(debouncer.settle(second), None);
    }

    #[test]
    fn cancel_drops_pending() {
        let mut debouncer = SearchDebouncer::new();
        let ticket = debouncer.schedule("x");
        debouncer.cancel();
        assert_eq!(debouncer.settle(ticket), None);
    }
}
