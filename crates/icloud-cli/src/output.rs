//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use icloud::ApiError;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Report a command failure on stderr.
///
/// Server errors are shown with their code and its description, plus the
/// retry hint when the server sent one.
pub fn report(err: &anyhow::Error) {
    let api = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<icloud::Error>())
        .and_then(icloud::Error::as_api);

    match api {
        Some(api) => {
            error(&describe_api_error(api));
            if let Some(wait) = api.retry_after {
                eprintln!("  {} {:?}", "retry after:".dimmed(), wait);
            }
        }
        None => error(&format!("{err:#}")),
    }
}

fn describe_api_error(api: &ApiError) -> String {
    format!("{} ({}: {})", api.reason, api.code, api.code.description())
}
