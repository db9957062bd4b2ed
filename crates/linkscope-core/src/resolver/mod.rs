//! Bounded redirect-chain resolver.
//!
//! Follows `Location` headers one hop at a time through a [`RedirectProbe`]
//! that never auto-follows, so every intermediate host is observed and the
//! hop count is capped here rather than by the transport. HEAD is tried first;
//! an opaque HEAD answer is retried with GET.
//!
//! The resolver never fails: transport errors and cancellation return the
//! start URL, protocol dead ends return the best URL reached so far.

mod hop;

pub use hop::{RedirectHop, Resolution, StopReason};

use url::Url;

use crate::config::LinkscopeConfig;
use crate::control::CancelToken;
use crate::probe::{
    is_redirect_status, CurlProbe, ProbeError, ProbeMethod, ProbeOutcome, RedirectProbe,
};
use crate::url_model;

/// Default hop budget.
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Follows redirects through `P`, at most `max_hops` requests deep.
#[derive(Debug, Clone)]
pub struct RedirectResolver<P = CurlProbe> {
    probe: P,
    max_hops: usize,
}

impl RedirectResolver<CurlProbe> {
    /// libcurl-backed resolver using timeouts and hop budget from `cfg`.
    pub fn from_config(cfg: &LinkscopeConfig) -> Self {
        Self::new(CurlProbe::from_config(cfg)).with_max_hops(cfg.max_hops)
    }
}

impl<P: RedirectProbe> RedirectResolver<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Sets the hop budget (a budget of 0 is treated as 1).
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops.max(1);
        self
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Final URL after following redirects from `start`.
    pub fn resolve(&self, start: &str, cancel: &CancelToken) -> String {
        self.trace(start, cancel).final_url
    }

    /// Like [`resolve`](Self::resolve) but keeps the hops and the stop reason.
    pub fn trace(&self, start: &str, cancel: &CancelToken) -> Resolution {
        let start_url = match url_model::normalize(start, None) {
            Ok(u) if url_model::is_web(&u) => u,
            _ => {
                tracing::debug!(start, "not an absolute http(s) URL; left unresolved");
                return Resolution {
                    start: start.to_string(),
                    final_url: start.to_string(),
                    hops: Vec::new(),
                    stop: StopReason::Rejected,
                };
            }
        };

        let mut chain = Chain::new(start_url);

        for hop in 0..self.max_hops {
            if cancel.is_cancelled() {
                return chain.finish(StopReason::Cancelled);
            }

            let (method, outcome) = match self.probe_hop(&chain.current, cancel) {
                Ok(answer) => answer,
                Err(e) if e.is_aborted() => return chain.finish(StopReason::Cancelled),
                Err(e) => {
                    tracing::warn!(hop, url = %chain.current, "redirect probe failed: {}", e);
                    return chain.finish(StopReason::TransportFailure);
                }
            };

            let (status, location) = match outcome {
                ProbeOutcome::Response { status, location } => (status, location),
                ProbeOutcome::Opaque => {
                    chain.record(method, None, None);
                    return chain.finish(StopReason::Opaque);
                }
            };
            chain.record(method, Some(status), location.clone());

            if !is_redirect_status(status) {
                return chain.finish(StopReason::Settled);
            }
            let Some(location) = location else {
                return chain.finish(StopReason::MissingLocation);
            };
            let next = match url_model::normalize(&location, Some(&chain.current)) {
                Ok(next) if url_model::is_web(&next) => next,
                _ => {
                    tracing::debug!(hop, location = %location, "redirect target is not an http(s) URL");
                    return chain.finish(StopReason::MalformedLocation);
                }
            };
            if next == chain.current {
                return chain.finish(StopReason::SelfRedirect);
            }
            chain.current = next;
        }

        chain.finish(StopReason::HopLimit)
    }

    /// HEAD, then GET when HEAD hides the redirect. Returns the verb whose answer counts.
    fn probe_hop(
        &self,
        url: &Url,
        cancel: &CancelToken,
    ) -> Result<(ProbeMethod, ProbeOutcome), ProbeError> {
        let head = self.probe.probe(url, ProbeMethod::Head, cancel)?;
        if head != ProbeOutcome::Opaque {
            return Ok((ProbeMethod::Head, head));
        }
        tracing::debug!(url = %url, "opaque HEAD answer; retrying with GET");
        let get = self.probe.probe(url, ProbeMethod::Get, cancel)?;
        Ok((ProbeMethod::Get, get))
    }
}

/// Progress of one resolution.
struct Chain {
    start: Url,
    current: Url,
    hops: Vec<RedirectHop>,
}

impl Chain {
    fn new(start: Url) -> Self {
        Self {
            current: start.clone(),
            start,
            hops: Vec::new(),
        }
    }

    fn record(&mut self, method: ProbeMethod, status: Option<u32>, location: Option<String>) {
        tracing::debug!(
            hop = self.hops.len(),
            url = %self.current,
            method = method.as_str(),
            status = ?status,
            location = location.as_deref().unwrap_or("-"),
            "redirect hop"
        );
        self.hops.push(RedirectHop {
            url: self.current.to_string(),
            method,
            status,
            location,
        });
    }

    fn finish(self, stop: StopReason) -> Resolution {
        let final_url = if stop.fell_back_to_start() {
            self.start.to_string()
        } else {
            self.current.to_string()
        };
        tracing::debug!(
            start = %self.start,
            final_url = %final_url,
            hops = self.hops.len(),
            stop = ?stop,
            "resolution finished"
        );
        Resolution {
            start: self.start.to_string(),
            final_url,
            hops: self.hops,
            stop,
        }
    }
}
