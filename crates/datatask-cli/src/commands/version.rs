use std::env;
use tracing::instrument;

#[instrument]
pub fn get_version_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");

    tracing::debug!(
        package_name = name,
        package_version = version,
        "Gathering package information"
    );

    // Build information, when the build exported it
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let rustc_version = env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".to_string());

    let version_info = format!(
        "{name} {version} - {description}\n\
        Target: {target}\n\
        Rust Compiler: {rustc_version}\n\
        Default Max Depth: {max_depth}\n\
        Correlation ID: {correlation_id}",
        max_depth = datatask::DEFAULT_MAX_DEPTH,
        correlation_id = crate::tracing::correlation_id(),
    );

    tracing::debug!(
        version_info_length = version_info.len(),
        "Version information compiled"
    );

    version_info
}
