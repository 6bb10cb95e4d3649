use anyhow::Result;
use local_client::{config::ClientConfig, driver::single_turn};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    local_client::init_tracing();

    let config = ClientConfig::from_env()?;
    let client = config.client();

    single_turn::run_basic_chat(
        &client,
        &config.model_id,
        single_turn::BASIC_PROMPT,
        &mut io::stdout(),
    )
    .await?;

    Ok(())
}
