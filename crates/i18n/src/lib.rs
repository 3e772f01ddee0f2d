//! Translation catalog maintenance.
//!
//! Message catalogs are nested JSON objects, one per locale. The source
//! locale is authoritative; [`merge_catalogs`] copies its missing keys into
//! every other locale without ever touching existing translations.

pub mod merge;
pub mod store;

pub use merge::{MergeReport, MessageTree, merge, missing_keys};
pub use store::{FsMessageStore, MemoryMessageStore, MessageStore};

use wordtowallet_core::{Error, LocaleCode, Result};

/// Outcome of merging into one target locale
#[derive(Debug, Clone)]
pub struct LocaleReport {
    pub locale: LocaleCode,
    /// The catalog did not exist before this run
    pub created: bool,
    pub report: MergeReport,
}

/// Merge the `source` catalog into each of `targets` and persist the results.
///
/// A missing target catalog starts out empty. With `dry_run` nothing is
/// written. I/O and parse errors abort the whole run.
pub fn merge_catalogs<S: MessageStore>(
    store: &mut S,
    source: &LocaleCode,
    targets: &[LocaleCode],
    dry_run: bool,
) -> Result<Vec<LocaleReport>> {
    let canonical = store.load(source)?.ok_or_else(|| {
        Error::InvalidData(format!("Source catalog for '{}' not found", source))
    })?;

    let mut reports = Vec::new();
    for locale in targets.iter().filter(|l| *l != source) {
        let existing = store.load(locale)?;
        let created = existing.is_none();
        let mut tree = existing.unwrap_or_default();

        let report = merge(&canonical, &mut tree);
        tracing::debug!(
            locale = %locale,
            added = report.added.len(),
            conflicts = report.conflicts.len(),
            "merged catalog"
        );

        if !dry_run {
            store.save(locale, &tree)?;
        }

        reports.push(LocaleReport {
            locale: locale.clone(),
            created,
            report,
        });
    }

    Ok(reports)
}
