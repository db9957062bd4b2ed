//! HTTP probing with redirect following disabled.
//!
//! The resolver talks to the network only through [`RedirectProbe`], so it can
//! be driven by libcurl in production and by a scripted probe in tests.

mod curl_probe;
mod error;
mod parse;
#[cfg(test)]
pub(crate) mod scripted;

pub use curl_probe::CurlProbe;
pub use error::ProbeError;
pub use parse::{parse_response_head, ResponseHead};

use url::Url;

use crate::control::CancelToken;

/// Request verb used for one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    /// Lightweight probe; tried first on every hop.
    Head,
    /// Fallback when the HEAD answer hides the redirect.
    Get,
}

impl ProbeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "GET",
        }
    }
}

/// What a single request revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Status and the literal `Location` header value, if any.
    Response {
        status: u32,
        location: Option<String>,
    },
    /// A redirect happened but its details are not inspectable with this verb.
    Opaque,
}

/// 3xx, the only statuses whose `Location` is followed.
pub fn is_redirect_status(status: u32) -> bool {
    (300..400).contains(&status)
}

/// Issues a single request without following redirects.
///
/// Implementations must return promptly with `ProbeError::Aborted` once
/// `cancel` is set.
pub trait RedirectProbe: Send + Sync {
    fn probe(
        &self,
        url: &Url,
        method: ProbeMethod,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, ProbeError>;
}

impl<P: RedirectProbe + ?Sized> RedirectProbe for std::sync::Arc<P> {
    fn probe(
        &self,
        url: &Url,
        method: ProbeMethod,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, ProbeError> {
        (**self).probe(url, method, cancel)
    }
}
