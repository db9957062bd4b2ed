//! Link inspection: score a link, expand it when it is a known shortener,
//! and score the destination.

use std::fmt::Write as _;

use serde::Serialize;
use url::Url;

use crate::expand::{ExpandHandle, ExpandRequest};
use crate::heuristics::{self, Severity, SuspicionNote};
use crate::shortener::ShortenerRegistry;
use crate::url_model;

/// Everything known about one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Normalized href (raw input when it could not be normalized).
    pub original: String,
    /// Destination, only when expansion produced a different URL.
    pub expanded: Option<String>,
    pub notes: Vec<SuspicionNote>,
}

impl LinkReport {
    pub fn max_severity(&self) -> Option<Severity> {
        self.notes.iter().map(|n| n.severity).max()
    }

    pub fn has_warnings(&self) -> bool {
        self.max_severity() == Some(Severity::Warning)
    }

    /// Plain-text rendering, one line per row.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Link:        {}", self.original);
        let _ = writeln!(
            out,
            "Resolves to: {}",
            self.expanded.as_deref().unwrap_or("—")
        );
        if self.notes.is_empty() {
            out.push_str("No obvious red flags.\n");
        } else {
            for note in &self.notes {
                let _ = writeln!(out, "⚠ {note}");
            }
        }
        out
    }
}

/// Combines the shortener registry, the expansion service and the scorer.
#[derive(Debug, Clone)]
pub struct LinkInspector {
    registry: ShortenerRegistry,
    expander: Option<ExpandHandle>,
}

impl LinkInspector {
    pub fn new(registry: ShortenerRegistry, expander: Option<ExpandHandle>) -> Self {
        Self { registry, expander }
    }

    /// Scores only; never touches the network.
    pub fn offline(registry: ShortenerRegistry) -> Self {
        Self::new(registry, None)
    }

    /// Inspects `href` as shown with `anchor_text`, resolving relative hrefs against `base`.
    pub async fn inspect(&self, href: &str, anchor_text: &str, base: Option<&Url>) -> LinkReport {
        let parsed = url_model::normalize(href, base).ok();
        let original = parsed
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| href.trim().to_string());

        let expandable = parsed.as_ref().is_some_and(|u| self.registry.should_expand(u));
        let expanded = match (&self.expander, expandable) {
            (Some(expander), true) => {
                let resp = expander
                    .expand(ExpandRequest {
                        url: original.clone(),
                    })
                    .await;
                Some(resp.final_url).filter(|u| *u != original)
            }
            _ => None,
        };

        let notes = heuristics::score(&original, expanded.as_deref(), anchor_text);
        tracing::debug!(
            url = %original,
            expanded = expanded.as_deref().unwrap_or("-"),
            notes = notes.len(),
            "inspected link"
        );

        LinkReport {
            original,
            expanded,
            notes,
        }
    }
}
