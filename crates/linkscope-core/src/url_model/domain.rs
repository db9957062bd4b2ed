//! Registered-domain approximation and domain-like token extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// `label(.label)+` whose last label is alphabetic and at least two characters long.
/// Case folding is ASCII-only, so U+212A KELVIN SIGN does not match `k`.
static DOMAIN_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)[a-z0-9.-]+\.[a-z]{2,}").expect("domain-like pattern compiles")
});

/// Last two non-empty dot-separated labels of `host`, lowercased.
///
/// Not a public-suffix lookup: `a.b.co.uk` yields `co.uk`. Good enough for
/// comparing what a link shows against where it goes.
pub fn registered_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".").to_lowercase()
    } else {
        host.to_lowercase()
    }
}

/// First domain-shaped token in `text`, lowercased.
pub fn extract_domain_like(text: &str) -> Option<String> {
    DOMAIN_LIKE
        .find(text.trim())
        .map(|m| m.as_str().to_lowercase())
}
