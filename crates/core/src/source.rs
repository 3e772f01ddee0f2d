// External slug providers for dynamic sitemap routes

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RouteTemplate;

/// A concrete value for a dynamic route, e.g. one published blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlugRecord {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SlugRecord {
    pub fn new(slug: impl Into<String>, updated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            slug: slug.into(),
            updated_at,
        }
    }
}

/// Something that can enumerate slugs for one dynamic route template.
///
/// Implementations make a single attempt per call; the sitemap builder
/// treats any error as "no entries from this source".
#[async_trait]
pub trait SlugSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Route the slugs are substituted into
    fn template(&self) -> &RouteTemplate;

    async fn fetch(&self) -> anyhow::Result<Vec<SlugRecord>>;
}
