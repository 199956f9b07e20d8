//! Version command implementation.

use crate::output;

pub fn run() {
    println!("icloud {}", env!("ICLOUD_VERSION"));
    output::field("Commit", env!("ICLOUD_COMMIT"));
    output::field("Default user agent", icloud::client::DEFAULT_USER_AGENT);
}
