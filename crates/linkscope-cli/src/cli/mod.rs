//! CLI for linkscope.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use linkscope_core::config::{self, LinkscopeConfig};
use std::path::PathBuf;

use commands::{
    run_completions, run_expand, run_inspect, run_man, run_score, run_shorteners, InspectArgs,
};

/// Top-level CLI for linkscope.
#[derive(Debug, Parser)]
#[command(name = "linkscope")]
#[command(about = "Reveal where links really go and flag deceptive ones", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/linkscope/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Follow redirects from a URL and print where it ends up.
    Expand {
        /// HTTP/HTTPS URL to expand.
        url: String,
        /// Override the configured hop budget.
        #[arg(long, value_name = "N")]
        max_hops: Option<usize>,
        /// Print every hop, not just the final URL.
        #[arg(long)]
        trace: bool,
    },

    /// Run the deceptive-link heuristics without touching the network.
    Score {
        /// Link target (href).
        url: String,
        /// Visible text of the link.
        #[arg(long, default_value = "")]
        text: String,
        /// Already-known destination of the link; scored instead of the URL.
        #[arg(long, value_name = "URL")]
        resolved: Option<String>,
        /// Emit notes as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Score a link, expanding it first when it points at a known shortener.
    Inspect {
        /// Link target (href); may be relative when --base is given.
        url: String,
        /// Visible text of the link.
        #[arg(long, default_value = "")]
        text: String,
        /// Page URL that relative hrefs are resolved against.
        #[arg(long, value_name = "URL")]
        base: Option<String>,
        /// Never expand, even for known shorteners.
        #[arg(long)]
        no_expand: bool,
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the shortener hosts that get expanded.
    Shorteners,

    /// Print shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Expand {
                url,
                max_hops,
                trace,
            } => run_expand(&cfg, &url, max_hops, trace).await?,
            CliCommand::Score {
                url,
                text,
                resolved,
                json,
            } => run_score(&url, &text, resolved.as_deref(), json)?,
            CliCommand::Inspect {
                url,
                text,
                base,
                no_expand,
                json,
            } => {
                let args = InspectArgs {
                    url,
                    text,
                    base,
                    no_expand,
                    json,
                };
                run_inspect(&cfg, &args).await?;
            }
            CliCommand::Shorteners => run_shorteners(&cfg),
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<LinkscopeConfig> {
    match path {
        Some(path) => config::load_from(path),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
