//! Config command implementation.

use anyhow::Result;
use clap::Args;
use icloud::is_icloud_container;

use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

pub fn run(_args: ConfigArgs, connection: &ConnectionArgs) -> Result<()> {
    let client = connection.unsigned_client()?;

    output::field("Base URL", client.base_url().as_str());
    output::field("Environment", connection.environment.as_str());
    output::field("Key ID", client.key_id());
    output::field("User agent", client.user_agent());
    let key_state = if client.has_private_key() {
        "loaded"
    } else {
        "not set"
    };
    output::field("Private key", key_state);

    if let Some(container) = &connection.container
        && !is_icloud_container(container)
    {
        output::error(&format!("Container {container} does not start with \"iCloud.\""));
    }

    Ok(())
}
