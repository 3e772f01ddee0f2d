use std::fmt::Write;
use wordtowallet_core::LocaleCode;

/// Crawler rules for `robots.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    pub sitemap: String,
}

impl RobotsPolicy {
    /// Build the policy for a set of auth-protected top-level segments.
    ///
    /// Each segment is disallowed both bare and behind a locale prefix.
    pub fn from_segments<S: AsRef<str>>(
        segments: &[S],
        default_locale: &LocaleCode,
        site_url: &str,
    ) -> Self {
        let mut disallow: Vec<String> = Vec::with_capacity(segments.len() * 4);
        for segment in segments {
            for pattern in disallow_patterns(segment.as_ref()) {
                if !disallow.contains(&pattern) {
                    disallow.push(pattern);
                }
            }
        }

        Self {
            user_agent: "*".to_string(),
            allow: vec![
                "/".to_string(),
                format!("/{}/", default_locale),
                format!("/{}/*", default_locale),
                "/*/blog/*".to_string(),
            ],
            disallow,
            sitemap: format!("{}/sitemap.xml", site_url.trim_end_matches('/')),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "User-agent: {}", self.user_agent);
        for path in &self.allow {
            let _ = writeln!(out, "Allow: {}", path);
        }
        for path in &self.disallow {
            let _ = writeln!(out, "Disallow: {}", path);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Sitemap: {}", self.sitemap);
        out
    }
}

/// The four shapes a protected segment is blocked in
pub fn disallow_patterns(segment: &str) -> [String; 4] {
    [
        format!("/{}", segment),
        format!("/{}/*", segment),
        format!("/*/{}", segment),
        format!("/*/{}/*", segment),
    ]
}
