use anyhow::{Context, Result};
use std::path::PathBuf;
use wordtowallet_core::config::load_site_config;
use wordtowallet_i18n::{FsMessageStore, MessageStore, merge_catalogs, missing_keys};

/// Fill every target catalog with the source locale's missing keys
pub async fn merge(config_path: PathBuf, dry_run: bool) -> Result<()> {
    let config = load_site_config(&config_path).context("Failed to load site config")?;
    let mut store = FsMessageStore::new(&config.i18n.messages_dir);

    println!(
        "🌍 Merging '{}' messages into {} locale(s){}",
        config.i18n.source_locale,
        config.locales.len().saturating_sub(1),
        if dry_run { " (dry run)" } else { "" }
    );
    println!("   Catalogs: {}", store.dir().display());

    let reports = merge_catalogs(&mut store, &config.i18n.source_locale, &config.locales, dry_run)
        .context("Translation merge failed")?;

    for entry in &reports {
        let note = if entry.created { " (new catalog)" } else { "" };
        println!(
            "   ✓ {}: {} key(s) added{}",
            entry.locale,
            entry.report.added.len(),
            note
        );
        for conflict in &entry.report.conflicts {
            tracing::warn!(
                locale = %entry.locale,
                key = %conflict,
                "target has a plain value where the source has nested keys, kept target value"
            );
        }
    }

    let total: usize = reports.iter().map(|r| r.report.added.len()).sum();
    println!();
    if dry_run {
        println!("✅ Dry run complete, {} key(s) would be added", total);
    } else {
        println!("✅ Merge complete, {} key(s) added", total);
    }

    Ok(())
}

/// Report missing keys without writing; fails when anything is missing
pub async fn check(config_path: PathBuf) -> Result<()> {
    let config = load_site_config(&config_path).context("Failed to load site config")?;
    let store = FsMessageStore::new(&config.i18n.messages_dir);
    let source = &config.i18n.source_locale;

    let canonical = store
        .load(source)?
        .with_context(|| format!("Source catalog missing: {}", store.path_for(source).display()))?;

    let mut incomplete = 0;
    for locale in config.locales.iter().filter(|l| *l != source) {
        let tree = store.load(locale)?.unwrap_or_default();
        let missing = missing_keys(&canonical, &tree);
        if missing.is_empty() {
            println!("   ✓ {}: complete", locale);
            continue;
        }

        incomplete += 1;
        println!("   ✗ {}: {} missing key(s)", locale, missing.len());
        for key in &missing {
            println!("       {}", key);
        }
    }

    if incomplete > 0 {
        anyhow::bail!(
            "{} locale(s) missing keys; run 'wordtowallet translations merge'",
            incomplete
        );
    }

    println!("✅ All catalogs complete");
    Ok(())
}
