//! Last-write-wins gate for route queries.
//!
//! Every query takes a ticket before it calls the routing provider. Only
//! the most recently issued ticket may publish, so a slow response to an
//! older query can never overwrite the result of a newer one.
//!
//! Ticket numbers come from one process-wide sequence, so a gate that is
//! dropped and recreated never hands out a number an in-flight query
//! already holds.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("query {ticket} was superseded by query {latest}")]
pub struct Superseded {
    pub ticket: u64,
    pub latest: u64,
}

#[derive(Debug, Clone)]
pub struct RouteQueryGate<T> {
    issued: u64,
    published: Option<(QueryTicket, T)>,
}

impl<T> Default for RouteQueryGate<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            published: None,
        }
    }
}

impl<T> RouteQueryGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query, superseding every earlier ticket.
    pub fn begin(&mut self) -> QueryTicket {
        self.issued = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        QueryTicket(self.issued)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Store `result` if `ticket` is still the newest query.
    pub fn publish(&mut self, ticket: QueryTicket, result: T) -> Result<(), Superseded> {
        if !self.is_current(ticket) {
            return Err(Superseded {
                ticket: ticket.0,
                latest: self.issued,
            });
        }
        self.published = Some((ticket, result));
        Ok(())
    }

    /// Most recently published result.
    pub fn latest(&self) -> Option<&T> {
        self.published.as_ref().map(|(_, result)| result)
    }
}
