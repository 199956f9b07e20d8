//! Modify command implementation.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use icloud::{Client, Database, RecordsRequest};

use crate::output;

#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// Target database (public, private or shared)
    #[arg(long, short = 'd')]
    pub database: Database,

    /// JSON file with the request body (use - for stdin)
    #[arg(long, default_value = "-")]
    pub json: String,

    /// Apply the operations all-or-nothing
    #[arg(long)]
    pub atomic: bool,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ModifyArgs, client: &Client) -> Result<()> {
    let content = if args.json == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.json).context("Failed to read JSON file")?
    };

    let mut request: RecordsRequest =
        serde_json::from_str(&content).context("Invalid records request JSON")?;
    if args.atomic {
        request = request.atomic(true);
    }

    let response = super::send(client, args.database, &request).await?;
    super::print_response(&response, args.pretty)?;
    output::success(&format!("Modified {} record(s)", response.records.len()));

    Ok(())
}
