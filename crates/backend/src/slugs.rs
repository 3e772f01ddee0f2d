use anyhow::Result;
use async_trait::async_trait;
use wordtowallet_core::config::{SiteConfig, SourceConfig};
use wordtowallet_core::{RouteTemplate, SlugRecord, SlugSource};

use crate::client::BackendClient;
use crate::payload::{array_payload, parse_records};

/// Slug source backed by one or more equivalent backend endpoints.
///
/// Candidates are tried in order; the first that answers 2xx with a
/// non-empty list wins. If at least one candidate answered but none had
/// records, the result is empty. If none answered at all, the last
/// transport or status error is returned.
pub struct HttpSlugSource {
    name: String,
    template: RouteTemplate,
    endpoints: Vec<String>,
    client: BackendClient,
}

impl HttpSlugSource {
    pub fn new(config: &SourceConfig, client: BackendClient) -> Self {
        Self {
            name: config.name.clone(),
            template: config.template.clone(),
            endpoints: config.endpoints.clone(),
            client,
        }
    }
}

#[async_trait]
impl SlugSource for HttpSlugSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn template(&self) -> &RouteTemplate {
        &self.template
    }

    async fn fetch(&self) -> Result<Vec<SlugRecord>> {
        let mut answered = false;
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let value = match self.client.get_json(endpoint).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(source = %self.name, endpoint = %endpoint, error = %e, "candidate failed");
                    last_error = Some(e);
                    continue;
                }
            };
            answered = true;

            match array_payload(&value) {
                Some(items) if !items.is_empty() => {
                    tracing::debug!(source = %self.name, endpoint = %endpoint, count = items.len(), "candidate matched");
                    return Ok(parse_records(items));
                }
                _ => {
                    tracing::debug!(source = %self.name, endpoint = %endpoint, "candidate returned no list");
                }
            }
        }

        if !answered && let Some(e) = last_error {
            return Err(e.context(format!("every endpoint of source '{}' failed", self.name)));
        }

        tracing::debug!(source = %self.name, "no candidate endpoint returned data");
        Ok(Vec::new())
    }
}

/// One HTTP source per `[[sitemap.source]]`, all sharing a client
pub fn sources_from_config(config: &SiteConfig) -> Result<Vec<Box<dyn SlugSource>>> {
    let client = BackendClient::new(&config.api)?;
    Ok(config
        .sitemap
        .sources
        .iter()
        .map(|source| Box::new(HttpSlugSource::new(source, client.clone())) as Box<dyn SlugSource>)
        .collect())
}
