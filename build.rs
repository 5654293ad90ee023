use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-changed=.git/index");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let release = env::var("PROFILE").is_ok_and(|profile| profile == "release");

    let full_version = if release {
        version
    } else {
        dev_version(&version)
    };
    println!("cargo:rustc-env=QCLI_AGENTS_VERSION={}", full_version);
}

/// `<version>-dev+<hash>`, suffixed `.dirty` when tracked files have uncommitted changes.
fn dev_version(version: &str) -> String {
    let hash = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());

    format!(
        "{}-dev+{}{}",
        version,
        hash,
        if dirty { ".dirty" } else { "" }
    )
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
