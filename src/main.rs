use dotenvy::dotenv;
use inference_relay::config::get_configuration;
use inference_relay::observability::init_tracing;
use inference_relay::startup::Application;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("info");

    let application = Application::build(configuration).await?;
    info!("Starting inference-relay on port {}", application.port());
    application.run_until_stopped().await?;

    Ok(())
}
