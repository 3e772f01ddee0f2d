use std::fs;
use std::path::Path;
use wordtowallet_core::config::RoutesConfig;
use wordtowallet_core::{Result, RouteManifest};

use crate::discover::discover_or_fallback;

/// Read a `routes.json` manifest
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<RouteManifest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a manifest as pretty JSON with a trailing newline
pub fn save_manifest<P: AsRef<Path>>(path: P, manifest: &RouteManifest) -> Result<()> {
    let mut content = serde_json::to_string_pretty(manifest)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Pick the manifest for a build.
///
/// An explicit manifest file wins and its errors are reported; otherwise the
/// app directory is scanned, falling back to the minimal route set.
pub fn resolve_manifest(config: &RoutesConfig) -> Result<RouteManifest> {
    match &config.manifest {
        Some(path) => load_manifest(path),
        None => Ok(discover_or_fallback(&config.app_dir)),
    }
}
