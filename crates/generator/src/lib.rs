// Sitemap and robots.txt generation

pub mod robots;
pub mod sitemap;
pub mod url;

pub use robots::RobotsPolicy;
pub use sitemap::{SitemapBuilder, render_xml};
pub use crate::url::{encode_segment, locale_url, normalize_url};
