use anyhow::{Context, Result};
use std::path::PathBuf;
use wordtowallet_core::config::{SiteConfig, load_site_config};
use wordtowallet_i18n::{FsMessageStore, MessageStore};
use wordtowallet_routes::{discover, load_manifest};

#[derive(Debug, Default)]
struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
}

pub async fn run(config_path: PathBuf) -> Result<()> {
    println!("Validating configuration at: {}", config_path.display());

    let config = load_site_config(&config_path).context("Failed to load site config")?;
    println!("✓ Configuration valid");

    let report = validate_site(&config);
    for line in &report.info {
        println!("  {}", line);
    }
    for line in &report.warnings {
        println!("⚠ {}", line);
    }
    for line in &report.errors {
        println!("✗ {}", line);
    }

    if !report.errors.is_empty() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!("\n✅ All checks passed");
    Ok(())
}

fn validate_site(config: &SiteConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.info.push(format!("Environment: {:?}", config.environment));
    report.info.push(format!("Site URL: {}", config.site_url));
    report.info.push(format!("API: {}", config.api.base_url));
    report.info.push(format!(
        "Locales: {}",
        config
            .locales
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    // Explicit manifest wins, so only check the app dir when there is none
    let routes = match &config.routes.manifest {
        Some(path) => load_manifest(path).map_err(|e| (path.clone(), e)),
        None => discover(&config.routes.app_dir).map_err(|e| (config.routes.app_dir.clone(), e)),
    };
    match routes {
        Ok(manifest) => report.info.push(format!(
            "Routes: {} static, {} dynamic",
            manifest.static_routes().len(),
            manifest.dynamic_routes().len()
        )),
        Err((path, e)) if config.routes.manifest.is_some() => {
            report.errors.push(format!("Route manifest {}: {}", path.display(), e));
        }
        Err((path, e)) => {
            report.warnings.push(format!(
                "Route tree {} unreadable ({}); builds will use fallback routes",
                path.display(),
                e
            ));
        }
    }

    let store = FsMessageStore::new(&config.i18n.messages_dir);
    for locale in &config.locales {
        match store.load(locale) {
            Ok(Some(_)) => {}
            Ok(None) if *locale == config.i18n.source_locale => {
                report.errors.push(format!(
                    "Source catalog missing: {}",
                    store.path_for(locale).display()
                ));
            }
            Ok(None) => {
                report.warnings.push(format!(
                    "Catalog missing for '{}' (run 'wordtowallet translations merge')",
                    locale
                ));
            }
            Err(e) => {
                report.errors.push(format!("Catalog {}: {}", store.path_for(locale).display(), e));
            }
        }
    }

    report
}
