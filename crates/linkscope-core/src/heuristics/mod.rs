//! Deceptive-link heuristics.
//!
//! Compares what an anchor shows against where it actually goes and returns
//! human-readable notes. Pure and synchronous: no I/O, no shared state.

mod confusables;
mod distance;

pub use confusables::normalize_lookalikes;
pub use distance::edit_distance;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::url_model::{self, extract_domain_like, registered_domain};

/// Normalized edit distance at or below which a mismatch is called a lookalike.
const LOOKALIKE_MAX_DISTANCE: usize = 2;
const UNUSUAL_HYPHENS: usize = 2;
const UNUSUAL_DIGITS: usize = 3;

/// How loudly a note should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// Which check produced a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    NonWeb,
    Punycode,
    Lookalike,
    TextMismatch,
    UnusualPattern,
}

impl NoteKind {
    pub fn severity(self) -> Severity {
        match self {
            NoteKind::Punycode | NoteKind::Lookalike => Severity::Warning,
            NoteKind::NonWeb | NoteKind::TextMismatch | NoteKind::UnusualPattern => Severity::Info,
        }
    }
}

/// One finding about a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionNote {
    pub kind: NoteKind,
    pub severity: Severity,
    pub message: String,
}

impl SuspicionNote {
    fn new(kind: NoteKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SuspicionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Scoring boundary input: the link target and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub url: String,
    #[serde(default)]
    pub anchor_text: String,
}

/// Scores `resolved` when present, otherwise `original`, against `anchor_text`.
///
/// Notes come back in check order and are not deduplicated. A URL that fails
/// to parse yields whatever was collected so far (possibly nothing).
pub fn score(original: &str, resolved: Option<&str>, anchor_text: &str) -> Vec<SuspicionNote> {
    let target = resolved.unwrap_or(original);
    let mut notes = Vec::new();
    if collect_notes(target, anchor_text, &mut notes).is_none() {
        tracing::trace!(url = target, "scoring stopped early");
    }
    notes
}

/// [`score`] over the boundary type, flattened to message strings.
pub fn score_request(req: &ScoreRequest) -> Vec<String> {
    score(&req.url, None, &req.anchor_text)
        .into_iter()
        .map(|n| n.message)
        .collect()
}

fn collect_notes(target: &str, anchor_text: &str, notes: &mut Vec<SuspicionNote>) -> Option<()> {
    let url = Url::parse(target.trim()).ok()?;
    if !url_model::is_web(&url) {
        notes.push(SuspicionNote::new(NoteKind::NonWeb, "Non-web link"));
        return Some(());
    }

    let href_host = url_model::host_of(&url)?;
    if href_host.starts_with("xn--") {
        notes.push(SuspicionNote::new(NoteKind::Punycode, "Punycode domain"));
    }

    let href_reg = registered_domain(&href_host);

    if let Some(text_host) = extract_domain_like(anchor_text) {
        let text_reg = registered_domain(&text_host);
        if text_reg != href_reg {
            notes.push(mismatch_note(&text_reg, &href_reg));
        }
    }

    if looks_machine_generated(&href_reg) {
        notes.push(SuspicionNote::new(
            NoteKind::UnusualPattern,
            "Unusual domain pattern",
        ));
    }

    Some(())
}

fn mismatch_note(text_reg: &str, href_reg: &str) -> SuspicionNote {
    let d = edit_distance(&normalize_lookalikes(text_reg), &normalize_lookalikes(href_reg));
    if d <= LOOKALIKE_MAX_DISTANCE {
        SuspicionNote::new(
            NoteKind::Lookalike,
            format!("Lookalike domain? Text shows \"{text_reg}\", link goes to \"{href_reg}\""),
        )
    } else {
        SuspicionNote::new(
            NoteKind::TextMismatch,
            format!("Text shows \"{text_reg}\", link goes to \"{href_reg}\""),
        )
    }
}

fn looks_machine_generated(reg: &str) -> bool {
    let hyphens = reg.chars().filter(|&c| c == '-').count();
    let digits = reg.chars().filter(char::is_ascii_digit).count();
    hyphens >= UNUSUAL_HYPHENS || digits >= UNUSUAL_DIGITS
}
