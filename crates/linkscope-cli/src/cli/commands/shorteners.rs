//! `linkscope shorteners` – list hosts that get expanded.

use linkscope_core::config::LinkscopeConfig;
use linkscope_core::shortener::ShortenerRegistry;

pub fn run_shorteners(cfg: &LinkscopeConfig) {
    let registry = ShortenerRegistry::from_config(cfg);
    if registry.is_empty() {
        println!("No shortener hosts configured.");
        return;
    }
    for host in registry.hosts() {
        println!("{host}");
    }
}
