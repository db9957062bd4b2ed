//! Per-hop records and the summary of one resolution.

use crate::probe::ProbeMethod;

/// One request/response step. Kept only for logging and tracing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    /// URL requested at this hop.
    pub url: String,
    /// Verb whose answer was used (GET when HEAD was opaque).
    pub method: ProbeMethod,
    /// Observed status; `None` when both verbs came back opaque.
    pub status: Option<u32>,
    /// Literal `Location` value, if any.
    pub location: Option<String>,
}

/// Why a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Non-redirect response: the destination.
    Settled,
    /// 3xx without a `Location` header.
    MissingLocation,
    /// `Location` resolved to the URL just requested.
    SelfRedirect,
    /// Redirect details stayed hidden even with GET.
    Opaque,
    /// Hop budget spent; the last reached URL stands.
    HopLimit,
    /// `Location` did not resolve to an http(s) URL; start URL returned.
    MalformedLocation,
    /// A request failed; start URL returned.
    TransportFailure,
    /// Caller cancelled; start URL returned.
    Cancelled,
    /// Start input was not an absolute http(s) URL; returned unchanged.
    Rejected,
}

impl StopReason {
    /// True when partial progress was discarded in favour of the start URL.
    pub fn fell_back_to_start(self) -> bool {
        matches!(
            self,
            StopReason::MalformedLocation
                | StopReason::TransportFailure
                | StopReason::Cancelled
                | StopReason::Rejected
        )
    }
}

/// Outcome of following one redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub start: String,
    pub final_url: String,
    pub hops: Vec<RedirectHop>,
    pub stop: StopReason,
}

impl Resolution {
    /// True when the final URL differs from the start.
    pub fn expanded(&self) -> bool {
        self.final_url != self.start
    }
}
