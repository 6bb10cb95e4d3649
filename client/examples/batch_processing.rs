use anyhow::Result;
use local_client::{config::ClientConfig, driver::batch};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    local_client::init_tracing();

    let config = ClientConfig::from_env()?;
    let client = config.client();

    batch::run_batch(
        &client,
        &config.model_id,
        config.max_tokens,
        &batch::sample_requests(),
        &mut io::stdout(),
    )
    .await?;

    Ok(())
}
