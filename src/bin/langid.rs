//! Interactive language identification.
//!
//! Downloads the fastText `lid.176` model on first run, then classifies each
//! line typed on stdin until `exit` or end of input.

use anyhow::Result;
use clap::Parser;
use stadstuin::langid::{
    ensure_model, run_repl, FastTextClassifier, DEFAULT_MODEL_PATH, DEFAULT_MODEL_URL,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "langid")]
#[command(about = "Identify the language of each line typed on stdin")]
struct CliArgs {
    /// Local path of the fastText model file.
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Where to fetch the model when it is not present locally.
    #[arg(long, default_value = DEFAULT_MODEL_URL)]
    model_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stadstuin=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    ensure_model(&args.model_path, &args.model_url, &mut io::stdout()).await?;

    let classifier = FastTextClassifier::load(&args.model_path)?;
    println!("FastText language identification model loaded.\n");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl(&classifier, stdin.lock(), stdout.lock())?;

    Ok(())
}
