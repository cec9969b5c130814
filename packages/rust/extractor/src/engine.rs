//! Single-page fetch and extraction.
//!
//! [`PageExtractor`] issues exactly one GET per call, checks that the response
//! is a successful HTML-ish document, and hands the body to the rule passes in
//! [`crate::profile`]. It holds nothing but the HTTP client, so one instance
//! can serve any number of concurrent calls.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, info, instrument};
use url::Url;

use orgscrape_shared::{FetchConfig, OrgScrapeError, Result, ScrapedOrganizationProfile};

use crate::profile::extract_from_html;
use crate::target::is_private_target;

// ---------------------------------------------------------------------------
// PageExtractor
// ---------------------------------------------------------------------------

/// Fetches a page and extracts a best-effort organization profile from it.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    client: Client,
}

impl PageExtractor {
    /// Create an extractor with the given fetch settings.
    ///
    /// Unless `allow_private` is set, a redirect to a loopback, private or
    /// link-local host fails the fetch instead of being followed.
    pub fn new(config: &FetchConfig, allow_private: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy(config.max_redirects, allow_private))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OrgScrapeError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch `url` and extract a profile from it.
    ///
    /// Fails only when the page cannot be fetched or is not a document;
    /// fields that cannot be found are simply left empty.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn extract(&self, url: &Url) -> Result<ScrapedOrganizationProfile> {
        let body = self.fetch(url).await?;
        let profile = extract_from_html(&body);

        info!(
            name = profile.organization_name.as_deref().unwrap_or("-"),
            programs = profile.programs.len(),
            achievements = profile.achievements.len(),
            leadership = profile.leadership.len(),
            testimonials = profile.testimonials.len(),
            impact_numbers = profile.impact_numbers.len(),
            "profile extracted"
        );

        Ok(profile)
    }

    /// GET `url` and return the decoded body.
    ///
    /// Non-success statuses become [`OrgScrapeError::Fetch`] with the status
    /// attached; non-document content types become [`OrgScrapeError::Parse`].
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| OrgScrapeError::network(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrgScrapeError::http_status(
                url.as_str(),
                status.as_u16(),
                format!("HTTP {status}"),
            ));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_document_type(content_type) {
                return Err(OrgScrapeError::parse(format!(
                    "{url}: expected an HTML document, got '{content_type}'"
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| OrgScrapeError::network(url.as_str(), format!("body read failed: {e}")))?;

        debug!(status = status.as_u16(), bytes = body.len(), "page fetched");
        Ok(body)
    }
}

/// Bounded redirect following that re-checks every hop against the
/// private-host guard.
fn redirect_policy(max_redirects: usize, allow_private: bool) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error(format!("too many redirects (max {max_redirects})"))
        } else if !allow_private && is_private_target(attempt.url()) {
            let blocked = format!(
                "redirect to private or local address {} blocked",
                attempt.url()
            );
            attempt.error(blocked)
        } else {
            attempt.follow()
        }
    })
}

/// Whether a `Content-Type` value can plausibly be parsed as HTML.
fn is_document_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.is_empty()
        || essence.starts_with("text/")
        || essence.contains("html")
        || essence.ends_with("xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    // The mock server is on loopback, so the private-host guard is off here.
    fn extractor() -> PageExtractor {
        PageExtractor::new(&FetchConfig::default(), true).unwrap()
    }

    fn guarded_extractor() -> PageExtractor {
        PageExtractor::new(&FetchConfig::default(), false).unwrap()
    }

    fn redirect_to(location: &str) -> wiremock::ResponseTemplate {
        wiremock::ResponseTemplate::new(302).insert_header("location", location)
    }

    #[test]
    fn document_types() {
        assert!(is_document_type("text/html; charset=utf-8"));
        assert!(is_document_type("application/xhtml+xml"));
        assert!(is_document_type("text/plain"));
        assert!(is_document_type("TEXT/HTML"));
        assert!(!is_document_type("application/pdf"));
        assert!(!is_document_type("image/png"));
        assert!(!is_document_type("application/json"));
    }

    #[tokio::test]
    async fn extracts_profile_from_mock_server() {
        let server = wiremock::MockServer::start().await;

        let page = r#"<html><head><title>Hope Foundation | Home</title></head><body>
            <h1>Hope Foundation</h1>
            <div class="mission">Every child in school.</div>
            <div class="stat-item">1,200+ students</div>
            <a href="https://facebook.com/hopefoundation">Facebook</a>
        </body></html>"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(page, "text/html; charset=utf-8"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let profile = extractor().extract(&url).await.unwrap();

        assert_eq!(profile.organization_name.as_deref(), Some("Hope Foundation"));
        assert_eq!(profile.mission.as_deref(), Some("Every child in school."));
        assert_eq!(profile.impact_numbers, vec!["1,200+"]);
        assert_eq!(
            profile.social_links.facebook.as_deref(),
            Some("https://facebook.com/hopefoundation")
        );
    }

    #[tokio::test]
    async fn not_found_is_fetch_error_with_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::path("/missing"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = extractor().extract(&url).await.unwrap_err();

        assert!(matches!(err, OrgScrapeError::Fetch { status: Some(404), .. }));
        assert_eq!(err.upstream_status(), Some(404));
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::path("/"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let err = extractor().extract(&url).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[tokio::test]
    async fn binary_content_is_parse_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::path("/report.pdf"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/report.pdf", server.uri())).unwrap();
        let err = extractor().extract(&url).await.unwrap_err();
        assert!(matches!(err, OrgScrapeError::Parse { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error_without_status() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let err = extractor().extract(&url).await.unwrap_err();
        assert!(matches!(err, OrgScrapeError::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn redirect_to_private_host_is_blocked() {
        let server = wiremock::MockServer::start().await;
        let internal = format!("{}/internal", server.uri());

        wiremock::Mock::given(wiremock::matchers::path("/start"))
            .respond_with(redirect_to(&internal))
            .expect(1)
            .mount(&server)
            .await;
        wiremock::Mock::given(wiremock::matchers::path("/internal"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_raw("<h1>secret</h1>", "text/html"),
            )
            .expect(0)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/start", server.uri())).unwrap();
        let err = guarded_extractor().extract(&url).await.unwrap_err();
        assert!(matches!(err, OrgScrapeError::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn redirect_to_metadata_address_is_blocked() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::path("/start"))
            .respond_with(redirect_to("http://[::ffff:169.254.169.254]/latest/meta-data"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/start", server.uri())).unwrap();
        let err = guarded_extractor().extract(&url).await.unwrap_err();
        assert!(matches!(err, OrgScrapeError::Fetch { status: None, .. }));
    }

    #[tokio::test]
    async fn redirects_are_followed_when_private_hosts_allowed() {
        let server = wiremock::MockServer::start().await;
        let about = format!("{}/about", server.uri());

        wiremock::Mock::given(wiremock::matchers::path("/start"))
            .respond_with(redirect_to(&about))
            .mount(&server)
            .await;
        wiremock::Mock::given(wiremock::matchers::path("/about"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw("<h1>Hope Foundation</h1>", "text/html"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/start", server.uri())).unwrap();
        let profile = extractor().extract(&url).await.unwrap();
        assert_eq!(profile.organization_name.as_deref(), Some("Hope Foundation"));
    }

    #[tokio::test]
    async fn redirect_loops_stop_at_the_limit() {
        let server = wiremock::MockServer::start().await;
        let start = format!("{}/loop", server.uri());

        wiremock::Mock::given(wiremock::matchers::path("/loop"))
            .respond_with(redirect_to(&start))
            .mount(&server)
            .await;

        let url = Url::parse(&start).unwrap();
        let err = extractor().extract(&url).await.unwrap_err();
        assert!(matches!(err, OrgScrapeError::Fetch { status: None, .. }));
    }
}
