//! Page route discovery.
//!
//! Walks a localized route tree (`app/[locale]/...`) and turns it into a
//! [`RouteManifest`]. Consumers such as the sitemap builder only ever see the
//! manifest, so a hand-written `routes.json` works just as well.

pub mod discover;
pub mod manifest;

pub use discover::{FALLBACK_ROUTES, discover, discover_or_fallback, fallback_manifest};
pub use manifest::{load_manifest, resolve_manifest, save_manifest};
