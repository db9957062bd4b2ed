//! CLI command handlers, one file per command.

mod completions;
mod expand;
mod inspect;
mod score;
mod shorteners;

pub use completions::{run_completions, run_man};
pub use expand::run_expand;
pub use inspect::{run_inspect, InspectArgs};
pub use score::run_score;
pub use shorteners::run_shorteners;
