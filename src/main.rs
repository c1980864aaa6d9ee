mod config;
mod crawl;
mod error;
mod models;
mod recorder;
mod scrapers;

use anyhow::Context;
use config::{RendererKind, ScoutConfig, DEFAULT_CONFIG_PATH};
use crawl::Crawler;
use recorder::Recorder;
use scrapers::{ChromeRenderer, Extractor, HttpRenderer, Navigator, Renderer, Selectors};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ScoutConfig::load(DEFAULT_CONFIG_PATH)?;

    // Initialize logging - RUST_LOG wins over the configured level
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        let level = config
            .tracing_level
            .parse::<Level>()
            .unwrap_or(Level::INFO);
        tracing_subscriber::fmt().with_max_level(level).init();
    }

    info!("🏨 Hotel Scout");
    info!("Target: {}{}", config.base_url, config.locations_path);

    let selectors = Arc::new(Selectors::compile(&config.layout)?);

    let renderer: Box<dyn Renderer> = match config.renderer {
        RendererKind::Chrome => Box::new(ChromeRenderer::launch(
            config.headless,
            config.settle_delay(),
        )?),
        RendererKind::Http => Box::new(HttpRenderer::new(
            &config.user_agent,
            config.page_timeout(),
        )?),
    };

    let navigator = Navigator::new(
        renderer,
        Arc::clone(&selectors),
        config.base_url()?,
        config.locations_path.clone(),
        config.page_timeout(),
    );
    let recorder = Recorder::new(config.output_path.clone(), config.quote_style);
    info!("Output: {}", recorder.path().display());
    let crawler = Crawler::new(
        navigator,
        Extractor::new(selectors),
        recorder,
        config.max_concurrent_extractions,
    );

    let summary = crawler.run().await.context("Crawl aborted")?;

    println!("{}", summary.report());

    if let Some(path) = &config.summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        tokio::fs::write(path, json).await?;
        info!("💾 Saved run summary to {}", path.display());
    }

    Ok(())
}
