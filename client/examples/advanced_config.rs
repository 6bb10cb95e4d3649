use anyhow::Result;
use local_client::{config::ClientConfig, driver::single_turn};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    local_client::init_tracing();

    let config = ClientConfig::from_env()?;
    config.validate_base_url()?;
    println!("Configuration check passed (URL syntax only).");

    let client = config.client();

    single_turn::run_advanced_chat(
        &client,
        &config,
        single_turn::ADVANCED_PROMPT,
        &mut io::stdout(),
    )
    .await?;

    Ok(())
}
