use anyhow::Context;
use std::sync::Arc;
use tunaview::{codec, Aggregator, Config, TunaApiSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let wallet = std::env::args()
        .nth(1)
        .context("Usage: tunaview <wallet-address>")?;

    let source = Arc::new(TunaApiSource::new(config.api_url.clone()));
    let aggregator = Aggregator::new(source, &config);

    let positions = aggregator
        .aggregate_wallet(&wallet)
        .await
        .context("aggregation failed")?;

    tracing::info!("Aggregated {} positions for {}", positions.len(), wallet);

    let encoded: Vec<_> = positions.iter().map(codec::encode).collect();
    println!("{}", serde_json::to_string_pretty(&encoded)?);

    Ok(())
}
