/// Generation counter for list requests. Starting a request supersedes the
/// previous one; the caller aborts whatever handle it kept for the old
/// generation and drops its response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn current(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_request_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let first = tracker.start();
        let second = tracker.start();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }
}
