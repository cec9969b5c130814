//! Selector candidate lists for each profile field.
//!
//! Each field owns an ordered list of [`FieldRule`]s. Scalar fields stop at the
//! first rule that matches anything; collection fields accumulate across all
//! of them. The lists are tuned to common nonprofit-site markup and will
//! under-extract on anything else.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

// ---------------------------------------------------------------------------
// FieldRule
// ---------------------------------------------------------------------------

/// A single element-matching rule plus how to read a value from its matches.
pub(crate) enum FieldRule {
    /// Every element matching the selector; value is its text.
    Text(Selector),
    /// Blocks holding text that contains `needle` (case-sensitive).
    ///
    /// Every visible body element whose own text nodes contain the needle is
    /// a hit; each hit resolves to its nearest ancestor-or-self matching
    /// `blocks`. Hits with no such block are dropped. Value is the block's
    /// full text.
    TextContains {
        blocks: Selector,
        needle: &'static str,
    },
    /// Links matching the selector; value is the `href` minus `strip_prefix`
    /// and any query string.
    Href {
        selector: Selector,
        strip_prefix: &'static str,
    },
}

impl FieldRule {
    fn text(selector: &str) -> Self {
        Self::Text(css(selector))
    }

    fn text_contains(blocks: &str, needle: &'static str) -> Self {
        Self::TextContains {
            blocks: css(blocks),
            needle,
        }
    }

    fn href(selector: &str, strip_prefix: &'static str) -> Self {
        Self::Href {
            selector: css(selector),
            strip_prefix,
        }
    }

    /// Matching elements in document order.
    pub(crate) fn elements<'a>(
        &'a self,
        doc: &'a Html,
    ) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a> {
        match self {
            Self::Text(sel) | Self::Href { selector: sel, .. } => Box::new(doc.select(sel)),
            Self::TextContains { blocks, needle } => {
                let mut last = None;
                Box::new(
                    doc.select(&VISIBLE_BODY)
                        .filter(move |el| own_text_contains(el, needle))
                        .filter_map(move |el| enclosing_block(el, blocks))
                        // Several hits inside one block yield it once.
                        .filter(move |block| last.replace(block.id()) != Some(block.id())),
                )
            }
        }
    }

    /// The trimmed value this rule reads from one of its matches.
    pub(crate) fn value(&self, el: &ElementRef<'_>) -> String {
        match self {
            Self::Text(_) | Self::TextContains { .. } => element_text(el),
            Self::Href { strip_prefix, .. } => {
                let href = el.value().attr("href").unwrap_or_default().trim();
                let target = href.strip_prefix(strip_prefix).unwrap_or(href);
                target.split('?').next().unwrap_or_default().trim().to_string()
            }
        }
    }
}

/// Trimmed text content of an element and its descendants.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn own_text_contains(el: &ElementRef<'_>, needle: &str) -> bool {
    el.children()
        .filter_map(|node| node.value().as_text())
        .any(|text| text.contains(needle))
}

/// Nearest ancestor-or-self of `el` matching `blocks`.
fn enclosing_block<'a>(el: ElementRef<'a>, blocks: &Selector) -> Option<ElementRef<'a>> {
    if blocks.matches(&el) {
        return Some(el);
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| blocks.matches(ancestor))
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("built-in selector must parse")
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Visible body elements, minus script/style payloads.
static VISIBLE_BODY: LazyLock<Selector> =
    LazyLock::new(|| css("body *:not(script):not(style):not(noscript)"));

/// Elements a sentence of prose can live in; inline markup climbs to these.
const PROSE_BLOCKS: &str =
    "p, li, div, section, article, blockquote, td, dd, h1, h2, h3, h4, h5, h6";

/// Rule lists for every profile field, in priority order.
pub(crate) struct ProfileRules {
    pub organization_name: Vec<FieldRule>,
    pub mission: Vec<FieldRule>,
    pub vision: Vec<FieldRule>,
    pub address: Vec<FieldRule>,
    pub phone: Vec<FieldRule>,
    pub email: Vec<FieldRule>,
    pub programs: Vec<FieldRule>,
    pub achievements: Vec<FieldRule>,
    pub leadership: Vec<FieldRule>,
    pub testimonials: Vec<FieldRule>,
    pub impact_numbers: Vec<FieldRule>,
    pub facebook: Selector,
    pub twitter: Selector,
    pub instagram: Selector,
    pub linkedin: Selector,
}

impl ProfileRules {
    fn new() -> Self {
        Self {
            organization_name: vec![
                FieldRule::text("h1"),
                FieldRule::text(
                    ".org-name, .organization-name, [class*='org-name'], [class*='organization-name']",
                ),
                FieldRule::text(".logo-text, [class*='logo-text']"),
                FieldRule::text("title"),
            ],
            mission: vec![
                FieldRule::text("[class*='mission']"),
                FieldRule::text_contains(PROSE_BLOCKS, "mission"),
            ],
            vision: vec![
                FieldRule::text("[class*='vision']"),
                FieldRule::text_contains(PROSE_BLOCKS, "vision"),
            ],
            address: vec![FieldRule::text("address"), FieldRule::text("[class*='address']")],
            phone: vec![
                FieldRule::href("a[href^='tel:']", "tel:"),
                FieldRule::text("[class*='phone']"),
            ],
            email: vec![
                FieldRule::href("a[href^='mailto:']", "mailto:"),
                FieldRule::text("[class*='email']"),
            ],
            programs: vec![
                FieldRule::text("[class*='program'], [class*='service'], [class*='initiative']"),
                FieldRule::text_contains("li, div", "Program"),
            ],
            achievements: vec![
                FieldRule::text("[class*='achievement'], [class*='impact'], [class*='stat']"),
                FieldRule::text("[class*='counter']"),
                FieldRule::text("[class*='number']"),
            ],
            leadership: vec![FieldRule::text(
                "[class*='team-member'], [class*='leadership'], [class*='board-member']",
            )],
            testimonials: vec![
                FieldRule::text("[class*='testimonial'], [class*='review']"),
                FieldRule::text("[class*='quote'], blockquote"),
            ],
            impact_numbers: vec![FieldRule::text(
                "[class*='counter'], [class*='stat'], [class*='impact-number']",
            )],
            facebook: css("a[href*='facebook.com']"),
            twitter: css("a[href*='twitter.com']"),
            instagram: css("a[href*='instagram.com']"),
            linkedin: css("a[href*='linkedin.com']"),
        }
    }
}

/// Compiled once; shared read-only by every extraction.
pub(crate) static RULES: LazyLock<ProfileRules> = LazyLock::new(ProfileRules::new);
