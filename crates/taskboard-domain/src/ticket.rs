//! Response ordering for refreshes that may overlap.
//!
//! Every fetch takes a ticket when it is issued. A response is applied only
//! if its ticket is newer than the last one applied, so a slow response can
//! never overwrite the result of a request issued after it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    issued: u64,
    applied: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Mark `ticket` applied if it is newer than anything applied so far.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "Discarding stale response");
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// True if `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// True while the most recently issued ticket has not been applied.
    pub fn outstanding(&self) -> bool {
        self.issued > self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_response_is_discarded() {
        let mut counter = TicketCounter::default();
        let first = counter.issue();
        let second = counter.issue();
        assert!(counter.accept(second));
        assert!(!counter.accept(first));
        assert!(!counter.outstanding());
    }

    #[test]
    fn test_in_order_responses_both_apply() {
        let mut counter = TicketCounter::default();
        let first = counter.issue();
        let second = counter.issue();
        assert!(counter.accept(first));
        assert!(counter.outstanding());
        assert!(counter.accept(second));
        assert!(counter.is_latest(second));
    }
}
