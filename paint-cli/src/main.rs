//! # Onyx Paint
//!
//! Headless paint host: replay, place images, export PNG.

use clap::Parser;
use paint_cli::{CliArgs, PaintConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paint_cli=info,paint_core=info,paint_renderer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Onyx Paint v{}", paint_core::VERSION);

    let args = CliArgs::parse();
    let config = PaintConfig::from(args);

    tracing::info!("Canvas {}x{}", config.width, config.height);
    if let Some(ref script) = config.script {
        tracing::info!("Script: {}", script.display());
    }

    // Imports decode on worker threads
    let rt = tokio::runtime::Runtime::new()?;
    let state = rt.block_on(paint_cli::run(&config))?;
    tracing::debug!("Scene has {} elements", state.scene().len());

    let path = paint_cli::export(&state, &config)?;
    println!("{}", path.display());

    Ok(())
}
