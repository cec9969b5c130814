//! Shared types, error model, and configuration for orgscrape.
//!
//! This crate is the foundation depended on by all other orgscrape crates.
//! It provides:
//! - [`OrgScrapeError`]: the unified error type
//! - Domain types ([`ScrapedOrganizationProfile`], [`ContactInfo`], [`SocialLinks`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BatchConfig, FetchConfig, ServerConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, render_config,
};
pub use error::{OrgScrapeError, Result};
pub use types::{
    ContactInfo, MAX_IMPACT_NUMBERS, MAX_LIST_ITEMS, ScrapedOrganizationProfile, SocialLinks,
};
