//! URL normalization and the cheap domain helpers used by the heuristics.
//!
//! Every URL is normalized through [`normalize`] before it is compared or
//! returned, so two spellings of the same address compare equal.

mod domain;

pub use domain::{extract_domain_like, registered_domain};

use anyhow::{Context, Result};
use url::Url;

/// Resolves `href` against `base` (or parses it as absolute when no base is given).
pub fn normalize(href: &str, base: Option<&Url>) -> Result<Url> {
    let href = href.trim();
    match base {
        Some(base) => base
            .join(href)
            .with_context(|| format!("cannot resolve {href:?} against {base}")),
        None => Url::parse(href).with_context(|| format!("invalid URL: {href:?}")),
    }
}

/// True only for `http` and `https`.
pub fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Lowercased hostname, if the URL has one.
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_ascii_lowercase())
}
