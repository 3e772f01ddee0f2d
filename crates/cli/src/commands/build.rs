use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use wordtowallet_backend::sources_from_config;
use wordtowallet_core::config::{SiteConfig, load_site_config};
use wordtowallet_core::{RouteManifest, SlugSource};
use wordtowallet_generator::{RobotsPolicy, SitemapBuilder, render_xml};
use wordtowallet_routes::resolve_manifest;

/// Generate sitemap.xml and robots.txt into `output`
pub async fn run(config_path: PathBuf, output: PathBuf, offline: bool) -> Result<()> {
    println!("🔨 Building sitemap and robots.txt...");
    println!("   Config: {}", config_path.display());
    println!("   Output: {}", output.display());
    println!();

    let config = load_site_config(&config_path).context("Failed to load site config")?;
    let manifest = resolve_manifest(&config.routes).context("Failed to load route manifest")?;

    println!("✓ Site: {}", config.site_url);
    println!("  Locales: {}", config.locales.len());
    println!(
        "  Routes: {} static, {} dynamic",
        manifest.static_routes().len(),
        manifest.dynamic_routes().len()
    );
    println!();

    let sources = if offline {
        println!("📴 Offline: skipping backend slug sources");
        Vec::new()
    } else {
        println!("🌐 Fetching slugs from {}", config.api.base_url);
        sources_from_config(&config)?
    };

    build_static_site(&config, &manifest, &sources, &output, Utc::now()).await?;

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());

    Ok(())
}

/// Write both generated files into `output`
pub async fn build_static_site(
    config: &SiteConfig,
    manifest: &RouteManifest,
    sources: &[Box<dyn SlugSource>],
    output: &Path,
    now: DateTime<Utc>,
) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let (xml, count) = build_sitemap(config, manifest, sources, now).await;
    fs::write(output.join("sitemap.xml"), xml).context("Failed to write sitemap.xml")?;
    println!("   ✓ Generated sitemap.xml ({} URLs)", count);

    fs::write(output.join("robots.txt"), build_robots(config))
        .context("Failed to write robots.txt")?;
    println!("   ✓ Generated robots.txt");

    Ok(())
}

/// Render the sitemap document, returning it with its URL count
pub async fn build_sitemap(
    config: &SiteConfig,
    manifest: &RouteManifest,
    sources: &[Box<dyn SlugSource>],
    now: DateTime<Utc>,
) -> (String, usize) {
    let builder = SitemapBuilder::new(config.site_url.clone(), config.locales.clone(), now);
    let entries = builder
        .build(&manifest.static_routes(), &manifest.dynamic_routes(), sources)
        .await;
    (render_xml(&entries), entries.len())
}

pub fn build_robots(config: &SiteConfig) -> String {
    RobotsPolicy::from_segments(&config.robots.protected, &config.default_locale, &config.site_url)
        .render()
}
