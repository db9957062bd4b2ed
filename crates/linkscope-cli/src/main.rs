use linkscope_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable: {:#}", err),
            Err(fallback) => eprintln!("linkscope: logging disabled: {:#}; {:#}", err, fallback),
        }
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("linkscope error: {:#}", err);
        std::process::exit(1);
    }
}
