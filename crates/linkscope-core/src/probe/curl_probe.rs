//! libcurl-backed probe.
//!
//! One `Easy` handle per request with `follow_location(false)`, so every
//! redirect surfaces to the resolver instead of being followed by curl.

use std::time::Duration;

use curl::easy::Easy;
use url::Url;

use super::parse::parse_response_head;
use super::{is_redirect_status, ProbeError, ProbeMethod, ProbeOutcome, RedirectProbe};
use crate::config::LinkscopeConfig;
use crate::control::{CancelToken, ResolutionAborted};

/// HEAD answers that mean "ask again with GET".
const HEAD_REFUSED: [u32; 2] = [405, 501];

/// Probe that issues real HTTP requests through libcurl.
#[derive(Debug, Clone)]
pub struct CurlProbe {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl CurlProbe {
    pub fn new(connect_timeout: Duration, timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            connect_timeout,
            timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(cfg: &LinkscopeConfig) -> Self {
        Self::new(
            cfg.connect_timeout(),
            cfg.request_timeout(),
            cfg.user_agent.clone(),
        )
    }

    fn configure(&self, easy: &mut Easy, url: &Url, method: ProbeMethod) -> Result<(), curl::Error> {
        easy.url(url.as_str())?;
        easy.follow_location(false)?;
        match method {
            ProbeMethod::Head => easy.nobody(true)?,
            ProbeMethod::Get => easy.get(true)?,
        }
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;
        easy.progress(true)?;
        Ok(())
    }
}

impl Default for CurlProbe {
    fn default() -> Self {
        Self::from_config(&LinkscopeConfig::default())
    }
}

impl RedirectProbe for CurlProbe {
    fn probe(
        &self,
        url: &Url,
        method: ProbeMethod,
        cancel: &CancelToken,
    ) -> Result<ProbeOutcome, ProbeError> {
        cancel.check()?;

        let mut headers: Vec<Vec<u8>> = Vec::new();
        let mut body_started = false;

        let mut easy = Easy::new();
        self.configure(&mut easy, url, method)
            .map_err(|e| ProbeError::from_curl(url.as_str(), &e))?;

        let performed = perform(&mut easy, &mut headers, &mut body_started, cancel);

        if let Err(e) = performed {
            if cancel.is_cancelled() {
                return Err(ProbeError::Aborted(ResolutionAborted));
            }
            if !(body_started && e.is_write_error()) {
                return Err(ProbeError::from_curl(url.as_str(), &e));
            }
        }

        let head = parse_response_head(&headers);
        let status = match easy.response_code() {
            Ok(code) if code != 0 => code,
            _ => head.status.ok_or_else(|| ProbeError::Other {
                url: url.to_string(),
                message: "no response status".to_string(),
            })?,
        };

        tracing::trace!(
            url = %url,
            method = method.as_str(),
            status,
            location = head.location.as_deref().unwrap_or("-"),
            "probe response"
        );

        if method == ProbeMethod::Head {
            let hidden_redirect = is_redirect_status(status) && head.location.is_none();
            if hidden_redirect || HEAD_REFUSED.contains(&status) {
                return Ok(ProbeOutcome::Opaque);
            }
        }

        Ok(ProbeOutcome::Response {
            status,
            location: head.location,
        })
    }
}

/// Runs the transfer, collecting raw header lines. Only the head matters, so
/// the first body chunk is refused, which ends the transfer with a write error.
fn perform(
    easy: &mut Easy,
    headers: &mut Vec<Vec<u8>>,
    body_started: &mut bool,
    cancel: &CancelToken,
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.header_function(|data| {
        headers.push(data.to_vec());
        true
    })?;
    transfer.write_function(|_data| {
        *body_started = true;
        Ok(0)
    })?;
    transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
    transfer.perform()
}
