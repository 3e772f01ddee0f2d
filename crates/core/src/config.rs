use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "wordtowallet.toml";

const PRODUCTION_SITE_URL: &str = "https://wordtowallet.com";
const DEVELOPMENT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_LOCALES: &[&str] = &["en", "fr", "es", "de", "it", "pt", "ar", "zh"];

const DEFAULT_PROTECTED: &[&str] = &[
    "admin",
    "dashboard",
    "account",
    "settings",
    "checkout",
    "login",
    "register",
    "reset-password",
];

/// Validated site configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub environment: Environment,
    /// Public origin without trailing slash
    pub site_url: String,
    pub default_locale: LocaleCode,
    pub locales: Vec<LocaleCode>,
    pub api: ApiConfig,
    pub routes: RoutesConfig,
    pub robots: RobotsConfig,
    pub sitemap: SitemapConfig,
    pub i18n: I18nConfig,
    pub proxy: Vec<ProxyMount>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL without trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RoutesConfig {
    pub app_dir: PathBuf,
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RobotsConfig {
    pub protected: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SitemapConfig {
    pub sources: Vec<SourceConfig>,
}

/// A backend collection that fills one dynamic route
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: String,
    pub template: RouteTemplate,
    /// Candidate endpoint paths, tried in order
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct I18nConfig {
    pub messages_dir: PathBuf,
    pub source_locale: LocaleCode,
}

/// Maps `{prefix}/*` on this server to `{api.base_url}{upstream}/*`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyMount {
    pub prefix: String,
    pub upstream: String,
}

/// Raw TOML configuration structure, every section optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    site: RawSite,
    #[serde(default)]
    api: RawApi,
    #[serde(default)]
    routes: RawRoutes,
    #[serde(default)]
    robots: RawRobots,
    #[serde(default)]
    sitemap: RawSitemap,
    #[serde(default)]
    i18n: RawI18n,
    proxy: Option<Vec<ProxyMount>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    url: Option<String>,
    environment: Option<String>,
    default_locale: Option<String>,
    locales: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRoutes {
    app_dir: Option<String>,
    manifest: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRobots {
    protected: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSitemap {
    source: Option<Vec<RawSource>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSource {
    name: String,
    template: String,
    endpoints: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawI18n {
    messages_dir: Option<String>,
    source_locale: Option<String>,
}

/// Load the site config from a file, falling back to defaults when the file
/// does not exist. Process environment overrides are applied.
///
/// Relative paths in the file are resolved against the file's directory.
pub fn load_site_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut config = parse_site_config_str(&content)?;
    if let Some(base) = path.parent() {
        config.rebase_paths(base);
    }
    Ok(config)
}

impl SiteConfig {
    /// Join relative route and catalog paths onto `base`
    pub fn rebase_paths(&mut self, base: &Path) {
        rebase(base, &mut self.routes.app_dir);
        if let Some(manifest) = self.routes.manifest.as_mut() {
            rebase(base, manifest);
        }
        rebase(base, &mut self.i18n.messages_dir);
    }
}

fn rebase(base: &Path, path: &mut PathBuf) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

/// Parse site config from a string, applying process environment overrides
pub fn parse_site_config_str(content: &str) -> Result<SiteConfig> {
    parse_site_config_with_env(content, |key| std::env::var(key).ok())
}

/// Parse site config from a string with an explicit environment lookup
///
/// Recognised variables: `API_BASE_URL`, `SITE_URL`, `APP_ENV` (or `NODE_ENV`).
pub fn parse_site_config_with_env<F>(content: &str, env: F) -> Result<SiteConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let raw: RawConfig = toml::from_str(content)?;

    let env_flag = env("APP_ENV")
        .or_else(|| env("NODE_ENV"))
        .or(raw.site.environment);
    let environment = env_flag
        .as_deref()
        .map(Environment::from_flag)
        .unwrap_or_default();

    let site_url = env("SITE_URL")
        .or(raw.site.url)
        .unwrap_or_else(|| match environment {
            Environment::Production => PRODUCTION_SITE_URL.to_string(),
            Environment::Development => DEVELOPMENT_SITE_URL.to_string(),
        });
    let site_url = validate_url(&site_url, "site.url")?;

    let locales = match raw.site.locales {
        Some(codes) => codes
            .iter()
            .map(|c| LocaleCode::parse(c))
            .collect::<Result<Vec<_>>>()?,
        None => DEFAULT_LOCALES
            .iter()
            .map(|c| LocaleCode::parse(c))
            .collect::<Result<Vec<_>>>()?,
    };
    if locales.is_empty() {
        return Err(Error::ConfigParse(
            "site.locales must list at least one locale".to_string(),
        ));
    }

    let default_locale = match raw.site.default_locale {
        Some(code) => locale_in_set(&code, &locales, "site.default_locale")?,
        None => locales[0].clone(),
    };

    let api_base = env("API_BASE_URL")
        .or(raw.api.base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let api = ApiConfig {
        base_url: validate_url(&api_base, "api.base_url")?,
        timeout: Duration::from_secs(raw.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };

    let routes = RoutesConfig {
        app_dir: PathBuf::from(
            raw.routes
                .app_dir
                .unwrap_or_else(|| "src/app/[locale]".to_string()),
        ),
        manifest: raw.routes.manifest.map(PathBuf::from),
    };

    let robots = RobotsConfig {
        protected: raw
            .robots
            .protected
            .unwrap_or_else(|| DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect()),
    };
    for segment in &robots.protected {
        if segment.is_empty() || segment.contains('/') {
            return Err(Error::ConfigParse(format!(
                "Protected segment must be a single path segment: '{}'",
                segment
            )));
        }
    }

    let sources = match raw.sitemap.source {
        Some(sources) => sources
            .into_iter()
            .map(convert_source)
            .collect::<Result<Vec<_>>>()?,
        None => default_sources(),
    };

    let i18n = I18nConfig {
        messages_dir: PathBuf::from(raw.i18n.messages_dir.unwrap_or_else(|| "messages".to_string())),
        source_locale: locale_in_set(
            raw.i18n.source_locale.as_deref().unwrap_or(default_locale.as_str()),
            &locales,
            "i18n.source_locale",
        )?,
    };

    let proxy = raw.proxy.unwrap_or_else(default_proxy_mounts);
    validate_proxy_mounts(&proxy)?;

    Ok(SiteConfig {
        environment,
        site_url,
        default_locale,
        locales,
        api,
        routes,
        robots,
        sitemap: SitemapConfig { sources },
        i18n,
        proxy,
    })
}

fn validate_proxy_mounts(mounts: &[ProxyMount]) -> Result<()> {
    let mut seen = HashSet::new();
    for mount in mounts {
        let prefix = &mount.prefix;
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            return Err(Error::ConfigParse(format!(
                "Proxy prefix must start with '/' and not end with one: '{}'",
                prefix
            )));
        }
        // Braces would be read as route parameters
        if prefix.contains(['{', '}']) {
            return Err(Error::ConfigParse(format!(
                "Proxy prefix must not contain '{{' or '}}': '{}'",
                prefix
            )));
        }
        if !seen.insert(prefix.as_str()) {
            return Err(Error::ConfigParse(format!(
                "Proxy prefix configured more than once: '{}'",
                prefix
            )));
        }
    }
    Ok(())
}

fn convert_source(raw: RawSource) -> Result<SourceConfig> {
    let template = RouteTemplate::dynamic_route(raw.template);
    if template.placeholders().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Sitemap source '{}' template has no [placeholder]: '{}'",
            raw.name, template.path
        )));
    }
    if raw.endpoints.is_empty() {
        return Err(Error::ConfigParse(format!(
            "Sitemap source '{}' needs at least one endpoint",
            raw.name
        )));
    }
    Ok(SourceConfig {
        name: raw.name,
        template,
        endpoints: raw.endpoints,
    })
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "blog".to_string(),
            template: RouteTemplate::dynamic_route("/blog/[slug]"),
            endpoints: vec![
                "/blog/posts/published".to_string(),
                "/blog/posts?status=published".to_string(),
                "/blog".to_string(),
            ],
        },
        SourceConfig {
            name: "delivery-links".to_string(),
            template: RouteTemplate::dynamic_route("/delivery/[slug]"),
            endpoints: vec![
                "/delivery-links/public".to_string(),
                "/delivery-links".to_string(),
            ],
        },
    ]
}

fn default_proxy_mounts() -> Vec<ProxyMount> {
    vec![
        ProxyMount {
            prefix: "/api/files".to_string(),
            upstream: "/files".to_string(),
        },
        ProxyMount {
            prefix: "/api/media".to_string(),
            upstream: "/media".to_string(),
        },
    ]
}

fn locale_in_set(code: &str, locales: &[LocaleCode], field_name: &str) -> Result<LocaleCode> {
    let locale = LocaleCode::parse(code)?;
    if !locales.contains(&locale) {
        return Err(Error::ConfigParse(format!(
            "'{}' = '{}' is not one of the configured locales",
            field_name, code
        )));
    }
    Ok(locale)
}

/// Require an http(s) URL and strip any trailing slash
fn validate_url(url: &str, field_name: &str) -> Result<String> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::ConfigParse(format!(
            "'{}' must be an http:// or https:// URL: '{}'",
            field_name, url
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}
