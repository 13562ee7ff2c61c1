use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod services;
mod utils;

use config::AppConfig;
use services::{chart_service, loader, page, png_service};
use utils::errors::ChartError;

/// Load, lay out, render, write. Any failure before the write leaves no output behind.
async fn run(config: &AppConfig) -> Result<(), ChartError> {
    let rows = loader::load_rows(&config.source).await?;

    let (doc, chart) = chart_service::render_document(&rows, &config.layout)?;
    info!(
        "Chart has {} markers and {} axis ticks on {}x{} canvas",
        chart.markers.len(),
        doc.find_by_class("tick").len(),
        config.layout.width,
        config.layout.height
    );
    debug!("Document holds {} circle elements", doc.count_tag("circle"));

    let html = page::render_page(&doc);
    page::write_page(&config.output, &html).await?;

    if let Some(png_path) = &config.png_output {
        let image_data = png_service::generate_png(&rows, &config.layout)?;
        tokio::fs::write(png_path, image_data).await?;
        info!("🖼️ Wrote PNG to {}", png_path.display());
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "linegraph=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("📊 Starting linegraph...");

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config).await {
        error!("Rendering aborted: {}", e);
        std::process::exit(1);
    }

    info!("Done");
}
