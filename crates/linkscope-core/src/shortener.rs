//! Registry of link-shortener hosts worth expanding.
//!
//! Resolution costs network round trips, so only links whose host is in this
//! set are expanded. Matching is exact on the lowercased hostname.

use std::collections::HashSet;

use url::Url;

use crate::config::LinkscopeConfig;
use crate::url_model;

/// Built-in shortener hosts.
pub const DEFAULT_SHORTENERS: &[&str] = &[
    "bit.ly",
    "t.co",
    "tinyurl.com",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "cutt.ly",
    "rebrand.ly",
    "t.ly",
    "s.id",
    "rb.gy",
    "lnkd.in",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenerRegistry {
    hosts: HashSet<String>,
}

impl Default for ShortenerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SHORTENERS.iter().copied())
    }
}

impl ShortenerRegistry {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Configured list when present, built-in list otherwise.
    pub fn from_config(cfg: &LinkscopeConfig) -> Self {
        match &cfg.shorteners {
            Some(hosts) => Self::new(hosts),
            None => Self::default(),
        }
    }

    /// Exact match; `host` is expected lowercase already.
    pub fn is_known_shortener(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// True when `url` is http(s) and its host is a known shortener.
    pub fn should_expand(&self, url: &Url) -> bool {
        url_model::is_web(url)
            && url_model::host_of(url).is_some_and(|h| self.is_known_shortener(&h))
    }

    /// Hosts in sorted order.
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
