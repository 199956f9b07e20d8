//! Delete command implementation.

use anyhow::Result;
use clap::Args;
use icloud::{Client, Database, Record, RecordOperation, RecordsRequest};

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Target database (public, private or shared)
    #[arg(long, short = 'd')]
    pub database: Database,

    /// Record type
    #[arg(long = "type", short = 't')]
    pub record_type: String,

    /// Record name
    #[arg(long)]
    pub name: String,

    /// Delete regardless of the server-side change tag
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: DeleteArgs, client: &Client) -> Result<()> {
    let record = Record::new(args.record_type).with_name(&args.name);
    let operation = if args.force {
        RecordOperation::force_delete(record)
    } else {
        RecordOperation::delete(record)
    };

    let request = RecordsRequest::new(vec![operation]);
    super::send(client, args.database, &request).await?;
    output::success(&format!("Deleted record: {}", args.name));

    Ok(())
}
