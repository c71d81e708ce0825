use anyhow::Result;

use crate::{commands::intents, config::Config, outbox::Outbox, output};

pub async fn handle(config: &Config) -> Result<()> {
    let outbox = Outbox::connect(&config.outbox_path).await?;
    let report = intents::run(&outbox).await?;
    output::emit(&report, config.json_output)?;
    Ok(())
}
