use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A supported display language, e.g. `en` or `pt-BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Parse a locale code: two or three ASCII letters, optionally followed
    /// by `-` and a two letter region.
    pub fn parse(code: &str) -> Result<Self> {
        let (lang, region) = match code.split_once('-') {
            Some((lang, region)) => (lang, Some(region)),
            None => (code, None),
        };

        let lang_ok = (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_lowercase());
        let region_ok = region
            .map(|r| r.len() == 2 && r.chars().all(|c| c.is_ascii_uppercase()))
            .unwrap_or(true);

        if !lang_ok || !region_ok {
            return Err(Error::InvalidData(format!("Invalid locale code '{}'", code)));
        }

        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LocaleCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        LocaleCode::parse(&value)
    }
}

impl From<LocaleCode> for String {
    fn from(value: LocaleCode) -> Self {
        value.0
    }
}

/// Whether a route can be listed as-is or needs concrete parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Static,
    Dynamic,
}

/// A page path pattern relative to the locale root.
///
/// The locale root itself is the empty path; every other path starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteTemplate {
    pub path: String,
    pub kind: RouteKind,
}

impl RouteTemplate {
    pub fn new(path: impl Into<String>, kind: RouteKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn static_route(path: impl Into<String>) -> Self {
        Self::new(path, RouteKind::Static)
    }

    pub fn dynamic_route(path: impl Into<String>) -> Self {
        Self::new(path, RouteKind::Dynamic)
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Names of the bracketed segments, e.g. `id` for `/courses/[id]`
    /// and `rest` for `/docs/[...rest]`
    pub fn placeholders(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(placeholder_name)
            .collect()
    }

    /// Replace the first placeholder with a concrete value
    pub fn fill(&self, value: &str) -> Option<String> {
        let mut filled = false;
        let segments: Vec<String> = self
            .path
            .split('/')
            .map(|segment| {
                if !filled && placeholder_name(segment).is_some() {
                    filled = true;
                    value.to_string()
                } else {
                    segment.to_string()
                }
            })
            .collect();

        filled.then(|| segments.join("/"))
    }
}

/// Return the parameter name of a bracketed segment
///
/// Handles `[id]`, `[...slug]` and `[[...slug]]`.
pub fn placeholder_name(segment: &str) -> Option<&str> {
    let inner = segment
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
        .or_else(|| segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')))?;

    let name = inner.trim_start_matches("...");
    if name.is_empty() { None } else { Some(name) }
}

/// Ordered, deduplicated set of route templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteManifest {
    routes: Vec<RouteTemplate>,
}

impl RouteManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route unless the same path is already present
    ///
    /// Returns `true` when the route was added.
    pub fn push(&mut self, route: RouteTemplate) -> bool {
        if self.routes.iter().any(|r| r.path == route.path) {
            return false;
        }
        self.routes.push(route);
        true
    }

    pub fn routes(&self) -> &[RouteTemplate] {
        &self.routes
    }

    pub fn static_routes(&self) -> Vec<RouteTemplate> {
        self.of_kind(RouteKind::Static)
    }

    pub fn dynamic_routes(&self) -> Vec<RouteTemplate> {
        self.of_kind(RouteKind::Dynamic)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn of_kind(&self, kind: RouteKind) -> Vec<RouteTemplate> {
        self.routes.iter().filter(|r| r.kind == kind).cloned().collect()
    }
}

impl FromIterator<RouteTemplate> for RouteManifest {
    fn from_iter<I: IntoIterator<Item = RouteTemplate>>(iter: I) -> Self {
        let mut manifest = RouteManifest::new();
        for route in iter {
            manifest.push(route);
        }
        manifest
    }
}

/// Sitemap `changefreq` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// One `<url>` element of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    /// Always within `0.0..=1.0`
    pub priority: f32,
}

/// Deployment environment, selects defaults such as the public site URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Interpret an `APP_ENV` / `NODE_ENV` style value
    pub fn from_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}
