//! Core domain types for scraped organization profiles.

use serde::{Deserialize, Serialize};

/// Cap for `programs`, `achievements`, `leadership` and `testimonials`.
pub const MAX_LIST_ITEMS: usize = 10;

/// Cap for `impact_numbers`.
pub const MAX_IMPACT_NUMBERS: usize = 8;

// ---------------------------------------------------------------------------
// ScrapedOrganizationProfile
// ---------------------------------------------------------------------------

/// Best-effort organizational facts pulled from a single web page.
///
/// Every field is independently optional. Scalars that were not found are
/// `None` (and omitted from JSON); lists that were not found are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedOrganizationProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    /// Deduplicated, at most [`MAX_LIST_ITEMS`].
    #[serde(default)]
    pub programs: Vec<String>,
    /// Deduplicated, at most [`MAX_LIST_ITEMS`].
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Deduplicated, at most [`MAX_LIST_ITEMS`].
    #[serde(default)]
    pub leadership: Vec<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub social_links: SocialLinks,
    /// Numeric tokens such as `"2,500+"`; deduplicated, at most [`MAX_IMPACT_NUMBERS`].
    #[serde(default)]
    pub impact_numbers: Vec<String>,
    /// Deduplicated, at most [`MAX_LIST_ITEMS`].
    #[serde(default)]
    pub testimonials: Vec<String>,
}

impl ScrapedOrganizationProfile {
    /// `true` when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Postal and electronic contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Social profile URLs, recorded verbatim from the page's links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}
