//! clipwave CLI binary entry point.

use clap::Parser;
use clipwave::cli::{errors, run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipwave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let message = if let Some(audio_err) = e.downcast_ref::<clipwave::error::AudioError>() {
            errors::format_error_help(audio_err)
        } else {
            format!("{e}")
        };
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}
