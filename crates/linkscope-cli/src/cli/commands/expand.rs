//! `linkscope expand <url>` – follow redirects and print the destination.

use anyhow::{Context, Result};
use linkscope_core::config::LinkscopeConfig;
use linkscope_core::control::CancelToken;
use linkscope_core::resolver::{RedirectResolver, Resolution};

fn print_hops(resolution: &Resolution) {
    println!("  {:>3}  {:<4}  {:>6}  {}", "Hop", "Verb", "Status", "URL");
    for (i, hop) in resolution.hops.iter().enumerate() {
        let status = hop
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "opaque".to_string());
        println!(
            "  {:>3}  {:<4}  {:>6}  {}",
            i + 1,
            hop.method.as_str(),
            status,
            hop.url
        );
        if let Some(loc) = &hop.location {
            println!("  {:>3}  {:<4}  {:>6}  -> {}", "", "", "", loc);
        }
    }
    println!("  stopped: {:?}", resolution.stop);
}

pub async fn run_expand(
    cfg: &LinkscopeConfig,
    url: &str,
    max_hops: Option<usize>,
    trace: bool,
) -> Result<()> {
    let resolver =
        RedirectResolver::from_config(cfg).with_max_hops(max_hops.unwrap_or(cfg.max_hops));
    let cancel = CancelToken::new();

    // Ctrl-C stops the chain at the next hop or transfer callback.
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let resolution = tokio::task::spawn_blocking({
        let url = url.to_string();
        let cancel = cancel.clone();
        move || resolver.trace(&url, &cancel)
    })
    .await
    .context("expand task join")?;
    interrupt.abort();

    if trace {
        print_hops(&resolution);
    }
    println!("{}", resolution.final_url);
    if cancel.is_cancelled() {
        anyhow::bail!("interrupted; printed the starting URL");
    }
    Ok(())
}
