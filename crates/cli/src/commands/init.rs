use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use wordtowallet_core::config::DEFAULT_CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# WordToWallet site tooling configuration
# Every section is optional; the values below are the defaults.
# API_BASE_URL, SITE_URL and APP_ENV (or NODE_ENV) override file values.

[site]
# url = "https://wordtowallet.com"
default_locale = "en"
locales = ["en", "fr", "es", "de", "it", "pt", "ar", "zh"]

[api]
base_url = "http://localhost:8000/api"
timeout_secs = 10

[routes]
app_dir = "src/app/[locale]"
# manifest = "routes.json"

[robots]
protected = ["admin", "dashboard", "account", "settings", "checkout", "login", "register", "reset-password"]

[[sitemap.source]]
name = "blog"
template = "/blog/[slug]"
endpoints = ["/blog/posts/published", "/blog/posts?status=published", "/blog"]

[[sitemap.source]]
name = "delivery-links"
template = "/delivery/[slug]"
endpoints = ["/delivery-links/public", "/delivery-links"]

[i18n]
messages_dir = "messages"
source_locale = "en"

[[proxy]]
prefix = "/api/files"
upstream = "/files"

[[proxy]]
prefix = "/api/media"
upstream = "/media"
"#;

const SOURCE_CATALOG_TEMPLATE: &str = r#"{
  "common": {
    "appName": "WordToWallet"
  }
}
"#;

/// Scaffold a project directory. Existing files are left untouched.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("📦 Initializing WordToWallet tooling in {}", path.display());

    let written = scaffold(&path)?;
    if written.is_empty() {
        println!("   ✓ Nothing to do, project already initialized");
    }
    for file in &written {
        println!("   ✓ Created {}", file.display());
    }

    println!();
    println!("Next steps:");
    println!("   wordtowallet validate");
    println!("   wordtowallet build --output public");

    Ok(())
}

/// Returns the files that were created
fn scaffold(base: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(base).context("Failed to create project directory")?;
    let mut written = Vec::new();

    let config_path = base.join(DEFAULT_CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE).context("Failed to write config")?;
        written.push(config_path);
    }

    let messages_dir = base.join("messages");
    fs::create_dir_all(&messages_dir).context("Failed to create messages directory")?;
    let source_catalog = messages_dir.join("en.json");
    if !source_catalog.exists() {
        fs::write(&source_catalog, SOURCE_CATALOG_TEMPLATE)
            .context("Failed to write source catalog")?;
        written.push(source_catalog);
    }

    Ok(written)
}
