//! `linkscope score <url>` – offline heuristics.

use anyhow::Result;
use linkscope_core::heuristics::{self, Severity};

pub fn run_score(url: &str, text: &str, resolved: Option<&str>, json: bool) -> Result<()> {
    let notes = heuristics::score(url, resolved, text);
    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }
    if notes.is_empty() {
        println!("No obvious red flags.");
    }
    for note in &notes {
        let tag = match note.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!("{:<8} {}", tag, note);
    }
    Ok(())
}
