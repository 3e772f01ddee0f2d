use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Write;
use wordtowallet_core::{
    ChangeFrequency, LocaleCode, RouteTemplate, SitemapEntry, SlugRecord, SlugSource,
};

use crate::url::{encode_segment, locale_url, normalize_url};

pub const ROOT_PRIORITY: f32 = 1.0;
pub const PAGE_PRIORITY: f32 = 0.8;

/// Crosses locales with static routes and fetched slugs.
pub struct SitemapBuilder {
    base_url: String,
    locales: Vec<LocaleCode>,
    now: DateTime<Utc>,
}

/// Entries in insertion order, unique by normalized URL
#[derive(Default)]
struct EntrySet {
    seen: HashSet<String>,
    entries: Vec<SitemapEntry>,
}

impl EntrySet {
    fn insert(&mut self, entry: SitemapEntry) {
        let url = normalize_url(&entry.url);
        if self.seen.insert(url.clone()) {
            self.entries.push(SitemapEntry { url, ..entry });
        }
    }
}

impl SitemapBuilder {
    pub fn new(base_url: impl Into<String>, locales: Vec<LocaleCode>, now: DateTime<Utc>) -> Self {
        Self {
            base_url: base_url.into(),
            locales,
            now,
        }
    }

    /// One entry per (locale, static route), plus the locale root even when
    /// the route list lacks it.
    pub fn static_entries(&self, routes: &[RouteTemplate]) -> Vec<SitemapEntry> {
        let mut set = EntrySet::default();
        self.push_static(&mut set, routes);
        set.entries
    }

    /// One entry per (locale, slug) with the slug substituted into `template`
    pub fn slug_entries(&self, template: &RouteTemplate, records: &[SlugRecord]) -> Vec<SitemapEntry> {
        let mut set = EntrySet::default();
        self.push_slugs(&mut set, template, records);
        set.entries
    }

    /// Build the full sitemap.
    ///
    /// Sources are fetched one after another, each exactly once. A failing
    /// source only loses its own entries.
    pub async fn build(
        &self,
        static_routes: &[RouteTemplate],
        dynamic_routes: &[RouteTemplate],
        sources: &[Box<dyn SlugSource>],
    ) -> Vec<SitemapEntry> {
        let mut set = EntrySet::default();
        self.push_static(&mut set, static_routes);

        for route in dynamic_routes {
            if !sources.iter().any(|s| s.template().path == route.path) {
                tracing::debug!(route = %route.path, "no slug source for dynamic route, skipping");
            }
        }

        for source in sources {
            match source.fetch().await {
                Ok(records) => {
                    tracing::debug!(source = source.name(), count = records.len(), "fetched slugs");
                    self.push_slugs(&mut set, source.template(), &records);
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        error = %e,
                        "slug source failed, omitting its sitemap entries"
                    );
                }
            }
        }

        set.entries
    }

    fn push_static(&self, set: &mut EntrySet, routes: &[RouteTemplate]) {
        for locale in &self.locales {
            set.insert(self.entry(locale, "", None));
            for route in routes {
                set.insert(self.entry(locale, &route.path, None));
            }
        }
    }

    fn push_slugs(&self, set: &mut EntrySet, template: &RouteTemplate, records: &[SlugRecord]) {
        for locale in &self.locales {
            for record in records {
                let slug = record.slug.trim();
                if slug.is_empty() {
                    continue;
                }
                if let Some(path) = template.fill(&encode_segment(slug)) {
                    set.insert(self.entry(locale, &path, record.updated_at));
                }
            }
        }
    }

    fn entry(&self, locale: &LocaleCode, path: &str, updated_at: Option<DateTime<Utc>>) -> SitemapEntry {
        let is_root = path.trim_matches('/').is_empty();
        SitemapEntry {
            url: locale_url(&self.base_url, locale.as_str(), path),
            last_modified: updated_at.unwrap_or(self.now),
            change_frequency: if is_root {
                ChangeFrequency::Daily
            } else {
                ChangeFrequency::Weekly
            },
            priority: if is_root { ROOT_PRIORITY } else { PAGE_PRIORITY },
        }
    }
}

/// Render entries as a sitemaps.org `urlset` document
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        // Writing to a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            xml_escape(&entry.url),
            entry.last_modified.format("%Y-%m-%d"),
            entry.change_frequency.as_str(),
            entry.priority,
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
