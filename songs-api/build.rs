//! Build script for songs-api
//!
//! Stamps the binary with where it came from. `SONGS_BUILD_INFO` is the
//! one-line summary logged at startup and `SONGS_GIT_REVISION` is reported
//! by `GET /health`.

use std::process::Command;

fn main() {
    let revision = git_revision().unwrap_or_else(|| "unknown".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let built_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");

    println!("cargo:rustc-env=SONGS_GIT_REVISION={}", revision);
    println!(
        "cargo:rustc-env=SONGS_BUILD_INFO={} {}, built {}",
        revision, profile, built_at
    );

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Abbreviated commit, suffixed `-modified` for a dirty checkout
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--abbrev=8", "--dirty=-modified"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}
