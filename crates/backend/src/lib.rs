// Backend API access: shared HTTP client and sitemap slug sources

pub mod client;
pub mod payload;
pub mod slugs;

pub use client::BackendClient;
pub use payload::{array_payload, parse_records};
pub use slugs::{HttpSlugSource, sources_from_config};
