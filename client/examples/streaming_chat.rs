use anyhow::Result;
use local_client::{config::ClientConfig, driver::streaming};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    local_client::init_tracing();

    let config = ClientConfig::from_env()?;
    let client = config.client();

    streaming::run_streaming_chat(
        &client,
        &config.model_id,
        streaming::STORY_PROMPT,
        &mut io::stdout(),
    )
    .await?;

    Ok(())
}
