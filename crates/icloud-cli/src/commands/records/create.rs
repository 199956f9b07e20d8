//! Create command implementation.

use anyhow::{Result, bail};
use clap::Args;
use icloud::{Client, Database, Field, Record, RecordOperation, RecordsRequest};
use serde_json::Value;

use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Target database (public, private or shared)
    #[arg(long, short = 'd')]
    pub database: Database,

    /// Record type
    #[arg(long = "type", short = 't')]
    pub record_type: String,

    /// Record name (assigned by the server when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Field as NAME=VALUE or NAME:TYPE=VALUE; VALUE is parsed as JSON and
    /// falls back to a plain string
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<Field>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: CreateArgs, client: &Client) -> Result<()> {
    if args.record_type.is_empty() {
        bail!("Record type must not be empty");
    }

    let mut record = Record::new(args.record_type);
    if let Some(name) = args.name {
        record = record.with_name(name);
    }
    record.fields.extend(args.fields);

    let request = RecordsRequest::new(vec![RecordOperation::create(record)]);
    let response = super::send(client, args.database, &request).await?;
    super::print_response(&response, args.pretty)?;

    if let Some(name) = response.records.first().and_then(|r| r.name.as_deref()) {
        output::success(&format!("Created record: {name}"));
    }

    Ok(())
}

fn parse_field(raw: &str) -> Result<Field, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let (name, field_type) = match key.split_once(':') {
        Some((name, field_type)) => (name, Some(field_type)),
        None => (key, None),
    };
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(match field_type {
        Some(field_type) => Field::typed(name, field_type, value),
        None => Field::new(name, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_json_value() {
        let field = parse_field("count=3").unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.field_type, None);
        assert_eq!(field.value, json!(3));
    }

    #[test]
    fn falls_back_to_string() {
        let field = parse_field("title=hello world").unwrap();
        assert_eq!(field.value, json!("hello world"));
    }

    #[test]
    fn parses_type_annotation() {
        let field = parse_field("tags:STRING_LIST=[\"a\",\"b\"]").unwrap();
        assert_eq!(field.name, "tags");
        assert_eq!(field.field_type.as_deref(), Some("STRING_LIST"));
        assert_eq!(field.value, json!(["a", "b"]));
    }

    #[test]
    fn value_may_contain_equals() {
        let field = parse_field("expr=a=b").unwrap();
        assert_eq!(field.value, json!("a=b"));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_field("title").is_err());
        assert!(parse_field("=1").is_err());
    }
}
