//! calls911 - 911 call analysis entry point

use anyhow::{Context, Result};
use calls_cli::{prompt_for_input, report, Args, Pipeline};
use calls_common::init_logging;
use calls_config::ConfigLoader;
use clap::Parser;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref())?;
    args.apply(&mut config)?;

    init_logging(config.logging.to_logging_config())?;
    info!("Starting calls911");

    let input = match &args.input {
        Some(path) => path.clone(),
        None => prompt_for_input()?,
    };

    let outcome = Pipeline::new(config)
        .run(&input)
        .await
        .with_context(|| format!("Analysis of {} failed", input.display()))?;

    print!("{}", report::render(&outcome));
    Ok(())
}
