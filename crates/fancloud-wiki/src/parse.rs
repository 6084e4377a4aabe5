//! Field extraction from a canonical article page.
//!
//! Every field is optional. Nothing here fails: a page missing its infobox
//! or body still yields a [`SubjectProfile`] with the absent fields unset.

use fancloud_core::{SocialLinks, SocialPlatform, SubjectProfile};

use crate::document::{Document, Node};

/// Shown instead of flag icons, which infoboxes often carry as their first image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://www.shoshinsha-design.com/wp-content/uploads/2020/05/%E3%83%8E%E3%83%BC%E3%82%A4%E3%83%A1%E3%83%BC%E3%82%B7%E3%82%99-760x460.png";

/// Substring identifying national flag images on the encyclopedia's media host.
pub const FLAG_IMAGE_MARKER: &str = "Flag_of";

const INFOBOX_CLASS: &str = "infobox";
const OFFICIAL_SITE_CLASS: &str = "official-website";
const CONTENT_CLASS: &str = "mw-parser-output";
const CITATION_CLASS: &str = "references";

/// Locale-dependent labels used by the infobox rules.
#[derive(Debug, Clone, Copy)]
pub struct ParseRules {
    /// Exact header text of the profession row.
    pub profession_label: &'static str,
    /// Separator between items in the profession cell.
    pub list_delimiter: char,
}

impl Default for ParseRules {
    /// Japanese-language encyclopedia conventions.
    fn default() -> Self {
        Self {
            profession_label: "職業",
            list_delimiter: '、',
        }
    }
}

/// Extract a profile from `html` using the default (Japanese) rules.
#[must_use]
pub fn parse_profile(canonical_url: &str, html: &str) -> SubjectProfile {
    parse_profile_with(canonical_url, html, ParseRules::default())
}

#[must_use]
pub fn parse_profile_with(canonical_url: &str, html: &str, rules: ParseRules) -> SubjectProfile {
    let doc = Document::parse(html);
    let infobox = doc.first_by_tag_and_class("table", INFOBOX_CLASS);

    SubjectProfile {
        canonical_url: canonical_url.to_owned(),
        official_site_url: official_site(&doc),
        social_links: social_links(&doc),
        image_url: infobox.and_then(|table| primary_image(&table)),
        profession: infobox.and_then(|table| profession(&table, rules)),
        summary: summary(&doc),
        has_infobox: infobox.is_some(),
    }
}

fn official_site(doc: &Document) -> Option<String> {
    doc.first_by_class(OFFICIAL_SITE_CLASS)?
        .first_descendant("a")?
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_owned)
}

fn social_links(doc: &Document) -> SocialLinks {
    let mut links = SocialLinks::default();
    for anchor in doc.anchors() {
        if anchor.within_class(CITATION_CLASS) {
            continue;
        }
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        if let Some(platform) = SocialPlatform::classify(href) {
            links.set(platform, href.trim());
        }
    }
    links
}

fn primary_image(infobox: &Node<'_>) -> Option<String> {
    let src = infobox.first_descendant("img")?.attr("src")?.trim();
    let url = if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with("https://") || src.starts_with("http://") {
        src.to_owned()
    } else {
        return None;
    };

    if url.contains(FLAG_IMAGE_MARKER) {
        Some(PLACEHOLDER_IMAGE_URL.to_owned())
    } else {
        Some(url)
    }
}

fn profession(infobox: &Node<'_>, rules: ParseRules) -> Option<String> {
    let cell = infobox.cell_after_header(rules.profession_label)?;
    join_list_items(&cell.text(), rules.list_delimiter)
}

/// Split `raw` on `delimiter`, trim the items and rejoin them with `", "`.
pub(crate) fn join_list_items(raw: &str, delimiter: char) -> Option<String> {
    let items: Vec<&str> = raw
        .split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}

/// First paragraph of the article body in document order. Empty placeholder
/// paragraphs (`mw-empty-elt`) are skipped.
fn summary(doc: &Document) -> Option<String> {
    doc.first_by_tag_and_class("div", CONTENT_CLASS)?
        .descendants_named("p")
        .map(|p| p.text())
        .find(|text| !text.is_empty())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
