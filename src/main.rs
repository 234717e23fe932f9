// src/main.rs

use std::path::Path;

use edxrun::{cli, load_config, logging, run};
use tracing::debug;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("edxrun error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    let config = load_config(&args)?;
    logging::init_logging(logging::resolve_verbosity(args.verbosity, config.verbosity))?;
    // The config file may set the verbosity, so logging starts after loading.
    if !Path::new(&args.config).exists() {
        debug!(path = %args.config, "no config file; using defaults");
    }
    run(args, config).await
}
