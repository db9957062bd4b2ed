//! Probe failure type, classified from libcurl errors.

use thiserror::Error;

use crate::control::ResolutionAborted;

/// Why a single probe request failed. Any of these aborts the whole resolution.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connect or total timeout elapsed.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// DNS, connect, TLS or socket-level failure.
    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// The caller cancelled the resolution.
    #[error(transparent)]
    Aborted(#[from] ResolutionAborted),

    /// libcurl refused the URL.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Other { url: String, message: String },
}

impl ProbeError {
    pub(crate) fn from_curl(url: &str, e: &curl::Error) -> Self {
        let url = url.to_string();
        if e.is_aborted_by_callback() {
            return ProbeError::Aborted(ResolutionAborted);
        }
        if e.is_operation_timedout() {
            return ProbeError::Timeout { url };
        }
        if e.is_url_malformed() || e.is_unsupported_protocol() {
            return ProbeError::InvalidUrl {
                url,
                message: e.to_string(),
            };
        }
        if e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_ssl_connect_error()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
        {
            return ProbeError::Connection {
                url,
                message: e.to_string(),
            };
        }
        ProbeError::Other {
            url,
            message: e.to_string(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ProbeError::Aborted(_))
    }
}
