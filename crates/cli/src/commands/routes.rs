use anyhow::{Context, Result};
use std::path::PathBuf;
use wordtowallet_core::RouteKind;
use wordtowallet_core::config::load_site_config;
use wordtowallet_routes::{discover, save_manifest};

/// Scan the route tree and print (or save) the manifest.
///
/// Unlike `build`, an unreadable tree is an error here.
pub async fn run(config_path: PathBuf, app_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_site_config(&config_path).context("Failed to load site config")?;
    let app_dir = app_dir.unwrap_or(config.routes.app_dir);

    println!("🔍 Scanning routes in {}", app_dir.display());
    let manifest = discover(&app_dir)
        .with_context(|| format!("Failed to scan {}", app_dir.display()))?;

    for route in manifest.routes() {
        let marker = match route.kind {
            RouteKind::Static => "static ",
            RouteKind::Dynamic => "dynamic",
        };
        let path = if route.is_root() { "/" } else { route.path.as_str() };
        println!("   {}  {}", marker, path);
    }
    println!(
        "   ✓ {} static, {} dynamic",
        manifest.static_routes().len(),
        manifest.dynamic_routes().len()
    );

    if let Some(output) = output {
        save_manifest(&output, &manifest)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("   ✓ Wrote {}", output.display());
    }

    Ok(())
}
