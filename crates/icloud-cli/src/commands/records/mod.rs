//! Records subcommand implementations.

mod create;
mod delete;
mod modify;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use icloud::{Client, Database, RecordsRequest, RecordsResponse};

use crate::cli::ConnectionArgs;
use crate::output;

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// Send a raw modify request read from JSON
    Modify(modify::ModifyArgs),

    /// Create a single record
    Create(create::CreateArgs),

    /// Delete a single record
    Delete(delete::DeleteArgs),
}

pub async fn handle(cmd: RecordsCommand, connection: &ConnectionArgs) -> Result<()> {
    let client = connection.client()?;
    match cmd.command {
        RecordsSubcommand::Modify(args) => modify::run(args, &client).await,
        RecordsSubcommand::Create(args) => create::run(args, &client).await,
        RecordsSubcommand::Delete(args) => delete::run(args, &client).await,
    }
}

async fn send(
    client: &Client,
    database: Database,
    request: &RecordsRequest,
) -> Result<RecordsResponse> {
    client
        .records()
        .modify(database, request)
        .await
        .context("Failed to modify records")
}

fn print_response(response: &RecordsResponse, pretty: bool) -> Result<()> {
    if pretty {
        output::json_pretty(response)
    } else {
        output::json(response)
    }
}
