//! Heuristic extraction of nonprofit organization profiles from web pages.
//!
//! This crate provides:
//! - [`PageExtractor`]: fetches one page and extracts a [`ScrapedOrganizationProfile`]
//! - [`extract_from_html`] / [`extract_profile`]: the network-free extraction passes
//! - [`extract_impact_numbers`]: numeric token scanner for impact figures
//! - [`parse_target_url`]: caller-side URL validation with a private-host guard
//!
//! [`ScrapedOrganizationProfile`]: orgscrape_shared::ScrapedOrganizationProfile

pub mod engine;
pub mod numbers;
pub mod profile;
mod rules;
pub mod target;

pub use engine::PageExtractor;
pub use numbers::extract_impact_numbers;
pub use profile::{extract_from_html, extract_profile};
pub use target::parse_target_url;
