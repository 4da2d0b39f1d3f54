const VERSION_VAR: &str = "VSCODE_PORTABLE_BUILD_VERSION";

/// Embeds the release version, e.g. `VSCODE_PORTABLE_BUILD_VERSION=v1.101.0`,
/// or the crate version when the variable is unset.
fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_VAR}");

    let version = std::env::var(VERSION_VAR)
        .ok()
        .map(|raw| raw.trim().trim_start_matches('v').to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| std::env::var("CARGO_PKG_VERSION").ok())
        .unwrap_or_else(|| "0.0.0".to_string());

    println!("cargo:rustc-env={VERSION_VAR}={version}");
}
