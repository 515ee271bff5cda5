use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter for overlapping fetch cycles.
///
/// Each cycle takes a ticket before issuing requests; when its responses
/// arrive, the result may only be installed if no newer ticket has been
/// issued since. A slow early response can then never overwrite the result
/// of a faster later one.
#[derive(Debug, Default)]
pub struct FetchGeneration {
    latest: AtomicU64,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Invalidate every ticket issued so far (e.g. when the view goes away).
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}
