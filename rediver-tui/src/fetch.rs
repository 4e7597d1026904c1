//! Generation tickets for in-flight fetches.
//!
//! Every fetch takes a ticket; only a result carrying the latest ticket may
//! touch the view. Anything older is stale and dropped.

use rediver_client::ApiClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    mode: FetchMode,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    /// Whether a failure of this fetch should reach the user.
    pub fn announces_failure(&self) -> bool {
        self.mode != FetchMode::Background
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn issue(&mut self, mode: FetchMode) -> FetchTicket {
        self.current += 1;
        FetchTicket {
            generation: self.current,
            mode,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.current
    }

    /// Invalidate whatever is in flight without starting a new fetch.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Load,
    Refresh,
    /// Poll-driven; failures are logged but not announced.
    Background,
}

/// What happened to a completed fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Applied,
    Failed(ApiClientError),
    Stale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut generation = Generation::default();
        let first = generation.issue(FetchMode::Load);
        let second = generation.issue(FetchMode::Refresh);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));

        generation.invalidate();
        assert!(!generation.is_current(second));
    }

    #[test]
    fn test_background_failures_stay_quiet() {
        let mut generation = Generation::default();
        assert!(generation.issue(FetchMode::Load).announces_failure());
        assert!(generation.issue(FetchMode::Refresh).announces_failure());
        let poll = generation.issue(FetchMode::Background);
        assert!(!poll.announces_failure());
        assert_eq!(poll.mode(), FetchMode::Background);
    }
}
