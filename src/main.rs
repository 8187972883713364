use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use descgen_core::config::Config;
use descgen_core::driver::{Driver, RunOptions};
use descgen_core::vault::EnvVaultProvider;
use descgen_llm::http::build_client;
use descgen_llm::openai::OpenAiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let config_path = resolve_config_path();
    let mut config = Config::load(&config_path)?;
    config.validate()?;
    config.resolve_secrets(&EnvVaultProvider).await?;

    let provider = create_provider(&config)?;
    tracing::info!(
        model = provider.model(),
        input = %config.dataset.path,
        output = %config.output.path,
        "starting description run"
    );

    let mut driver = Driver::new(
        provider,
        RunOptions {
            concurrency: config.run.concurrency,
        },
    );
    driver
        .run(Path::new(&config.dataset.path), Path::new(&config.output.path))
        .await?;

    Ok(())
}

fn create_provider(config: &Config) -> anyhow::Result<OpenAiProvider> {
    let api_key = config
        .secrets
        .openai_api_key
        .as_ref()
        .context("OPENAI_API_KEY not found in environment")?
        .expose()
        .to_owned();
    let client = build_client(
        Duration::from_secs(config.timeouts.connect_seconds),
        Duration::from_secs(config.timeouts.request_seconds),
    )
    .context("failed to build HTTP client")?;
    let provider = OpenAiProvider::new(
        api_key,
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.max_tokens,
    )?
    .with_client(client);
    Ok(provider)
}

fn resolve_config_path() -> PathBuf {
    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = args.windows(2).find(|w| w[0] == "--config").map(|w| &w[1]) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("DESCGEN_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
