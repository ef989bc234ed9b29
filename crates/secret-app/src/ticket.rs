//! Request tickets.

use std::fmt;

/// Token attached to an asynchronous request.
///
/// Tickets increase monotonically per state machine. A completion is applied
/// only if its ticket is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and remembers which one is outstanding.
#[derive(Debug, Clone, Default)]
pub(crate) struct TicketCounter {
    next: u64,
    current: Option<Ticket>,
}

impl TicketCounter {
    /// Issue a new ticket, superseding the outstanding one.
    pub(crate) fn issue(&mut self) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        self.current = Some(ticket);
        ticket
    }

    /// Drop the outstanding ticket.
    pub(crate) fn invalidate(&mut self) {
        self.current = None;
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.current == Some(ticket)
    }
}
