pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::{load_site_config, parse_site_config_str};
pub use error::{Error, Result};
pub use source::{SlugRecord, SlugSource};
pub use types::*;
