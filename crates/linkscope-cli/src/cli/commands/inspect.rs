//! `linkscope inspect <url>` – expand known shorteners, then score.

use anyhow::{Context, Result};
use linkscope_core::config::LinkscopeConfig;
use linkscope_core::expand::ExpandService;
use linkscope_core::inspect::LinkInspector;
use linkscope_core::resolver::RedirectResolver;
use linkscope_core::shortener::ShortenerRegistry;
use url::Url;

#[derive(Debug, Clone)]
pub struct InspectArgs {
    pub url: String,
    pub text: String,
    pub base: Option<String>,
    pub no_expand: bool,
    pub json: bool,
}

pub async fn run_inspect(cfg: &LinkscopeConfig, args: &InspectArgs) -> Result<()> {
    let base = args
        .base
        .as_deref()
        .map(Url::parse)
        .transpose()
        .context("invalid --base URL")?;

    let registry = ShortenerRegistry::from_config(cfg);
    let inspector = if args.no_expand {
        LinkInspector::offline(registry)
    } else {
        let (handle, _service) = ExpandService::spawn(RedirectResolver::from_config(cfg));
        LinkInspector::new(registry, Some(handle))
    };

    let report = inspector
        .inspect(&args.url, &args.text, base.as_ref())
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
