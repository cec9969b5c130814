//! Turns a parsed document into a [`ScrapedOrganizationProfile`].

use orgscrape_shared::{
    ContactInfo, MAX_IMPACT_NUMBERS, MAX_LIST_ITEMS, ScrapedOrganizationProfile, SocialLinks,
};
use scraper::{Html, Selector};

use crate::numbers::extract_impact_numbers;
use crate::rules::{FieldRule, RULES, element_text};

/// Parse `html` and extract a profile from it. Pure; no network access.
pub fn extract_from_html(html: &str) -> ScrapedOrganizationProfile {
    let doc = Html::parse_document(html);
    extract_profile(&doc)
}

/// Run every field's rule list against an already-parsed document.
pub fn extract_profile(doc: &Html) -> ScrapedOrganizationProfile {
    let rules = &*RULES;

    ScrapedOrganizationProfile {
        organization_name: first_match(doc, &rules.organization_name),
        mission: first_match(doc, &rules.mission),
        vision: first_match(doc, &rules.vision),
        programs: collect_all(doc, &rules.programs, MAX_LIST_ITEMS),
        achievements: collect_all(doc, &rules.achievements, MAX_LIST_ITEMS),
        leadership: collect_all(doc, &rules.leadership, MAX_LIST_ITEMS),
        contact_info: ContactInfo {
            address: first_match(doc, &rules.address),
            phone: first_match(doc, &rules.phone),
            email: first_match(doc, &rules.email),
        },
        social_links: SocialLinks {
            facebook: first_href(doc, &rules.facebook),
            twitter: first_href(doc, &rules.twitter),
            instagram: first_href(doc, &rules.instagram),
            linkedin: first_href(doc, &rules.linkedin),
        },
        impact_numbers: collect_numbers(doc, &rules.impact_numbers),
        testimonials: collect_all(doc, &rules.testimonials, MAX_LIST_ITEMS),
    }
}

/// First element of the first rule that matches anything.
///
/// A later rule is never consulted once an earlier one matched, even if the
/// match has no text; that case yields `None`.
fn first_match(doc: &Html, rules: &[FieldRule]) -> Option<String> {
    for rule in rules {
        if let Some(el) = rule.elements(doc).next() {
            let value = rule.value(&el);
            return (!value.is_empty()).then_some(value);
        }
    }
    None
}

/// Every match of every rule, in order, skipping blanks and duplicates.
fn collect_all(doc: &Html, rules: &[FieldRule], cap: usize) -> Vec<String> {
    let mut out = Vec::new();
    for rule in rules {
        for el in rule.elements(doc) {
            push_unique(&mut out, rule.value(&el));
            if out.len() >= cap {
                return out;
            }
        }
    }
    out
}

fn collect_numbers(doc: &Html, rules: &[FieldRule]) -> Vec<String> {
    let mut out = Vec::new();
    for rule in rules {
        for el in rule.elements(doc) {
            for token in extract_impact_numbers(&element_text(&el)) {
                push_unique(&mut out, token);
                if out.len() >= MAX_IMPACT_NUMBERS {
                    return out;
                }
            }
        }
    }
    out
}

fn first_href(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string)
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}
