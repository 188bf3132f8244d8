//! Request sequencing for stale-result suppression.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kinds of provider round trip a view issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Load,
    Range,
    Sample,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Load => "load",
            RequestKind::Range => "range",
            RequestKind::Sample => "sample",
        }
    }
}

/// Proof that a request was issued, checked when its result arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub seq: u64,
}

/// Outcome of handing a provider result back to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The result was the newest of its kind and changed the view.
    Applied,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

impl Update {
    pub fn is_applied(&self) -> bool {
        matches!(self, Update::Applied)
    }
}

/// Per-kind monotonically increasing sequence numbers.
///
/// Issuing a load also advances the range and sample counters, so results
/// computed against the previous raster can never land on the new one.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    load: u64,
    range: u64,
    sample: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter_mut(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Load => &mut self.load,
            RequestKind::Range => &mut self.range,
            RequestKind::Sample => &mut self.sample,
        }
    }

    /// Latest sequence number issued for `kind`.
    pub fn latest(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Load => self.load,
            RequestKind::Range => self.range,
            RequestKind::Sample => self.sample,
        }
    }

    /// Issue a new ticket, superseding every earlier ticket of the kind.
    pub fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        counter!("viewer_requests_total", "kind" => kind.as_str()).increment(1);
        if kind == RequestKind::Load {
            self.invalidate(RequestKind::Range);
            self.invalidate(RequestKind::Sample);
        }
        let seq = self.counter_mut(kind);
        *seq += 1;
        RequestTicket { kind, seq: *seq }
    }

    /// Supersede outstanding requests of `kind` without issuing a new one.
    pub fn invalidate(&mut self, kind: RequestKind) {
        *self.counter_mut(kind) += 1;
    }

    /// Whether `ticket` is still the newest of its kind.
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.seq == self.latest(ticket.kind)
    }

    /// Check a returning result, counting and logging it when stale.
    pub fn accept(&self, ticket: RequestTicket) -> Update {
        if self.is_latest(ticket) {
            return Update::Applied;
        }
        counter!("viewer_stale_responses_total", "kind" => ticket.kind.as_str()).increment(1);
        debug!(
            kind = ticket.kind.as_str(),
            seq = ticket.seq,
            latest = self.latest(ticket.kind),
            "Discarding stale response"
        );
        Update::Stale
    }
}
