//! Build script to capture git version information at compile time.
//!
//! Sets `ICLOUD_VERSION` (git describe, falling back to the package version)
//! and `ICLOUD_COMMIT` (short hash, or `unknown` outside a checkout).

use std::path::PathBuf;
use std::process::Command;

fn main() {
    // The git directory is at the workspace root, not next to this crate.
    if let Some(git_dir) = git(&["rev-parse", "--git-dir"]) {
        let git_dir = PathBuf::from(git_dir);
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("index").display());
    }

    let version = git(&["describe", "--tags", "--always", "--dirty"])
        .map(|v| v.strip_prefix('v').map(str::to_string).unwrap_or(v))
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=ICLOUD_VERSION={version}");
    println!("cargo:rustc-env=ICLOUD_COMMIT={commit}");
}

/// Run git and return its trimmed stdout, or `None` on any failure.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let out = String::from_utf8(output.stdout).ok()?;
    let out = out.trim();
    (!out.is_empty()).then(|| out.to_string())
}
