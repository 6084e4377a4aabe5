//! Typed traversal over a parsed article page.
//!
//! Wraps `scraper`'s DOM with the handful of lookups profile extraction
//! needs, so the extraction rules read as plain conditionals.

use scraper::{ElementRef, Html};

/// Elements whose text never belongs to prose: inline styles, scripts and
/// citation markers such as `[1]`.
fn is_non_prose(element: &ElementRef<'_>) -> bool {
    let el = element.value();
    matches!(el.name(), "style" | "script")
        || (el.name() == "sup" && el.classes().any(|c| c == "reference"))
}

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

/// A borrowed element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn root(&self) -> Node<'_> {
        Node {
            element: self.html.root_element(),
        }
    }

    /// First element in document order carrying `class`.
    #[must_use]
    pub fn first_by_class(&self, class: &str) -> Option<Node<'_>> {
        self.root()
            .descendants()
            .find(|node| node.has_class(class))
    }

    /// First `<tag>` element carrying `class`.
    #[must_use]
    pub fn first_by_tag_and_class(&self, tag: &str, class: &str) -> Option<Node<'_>> {
        self.root()
            .descendants()
            .find(|node| node.name() == tag && node.has_class(class))
    }

    /// Every `<a>` with an `href`, in document order.
    pub fn anchors(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.root()
            .descendants()
            .filter(|node| node.name() == "a" && node.attr("href").is_some())
    }
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.element.value().name()
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// True if this element or any ancestor carries `class`.
    #[must_use]
    pub fn within_class(&self, class: &str) -> bool {
        self.has_class(class)
            || self
                .element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().classes().any(|c| c == class))
    }

    /// Descendant elements in document order, excluding `self`.
    fn descendants(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|element| Node { element })
    }

    /// First descendant `<tag>` element.
    #[must_use]
    pub fn first_descendant(&self, tag: &str) -> Option<Node<'a>> {
        self.descendants().find(|node| node.name() == tag)
    }

    /// Descendant `<tag>` elements in document order.
    pub fn descendants_named<'t>(&self, tag: &'t str) -> impl Iterator<Item = Node<'a>> + 't
    where
        'a: 't,
    {
        self.descendants().filter(move |node| node.name() == tag)
    }

    /// In a table, the `<td>` following the `<th>` whose text is exactly
    /// `header`.
    #[must_use]
    pub fn cell_after_header(&self, header: &str) -> Option<Node<'a>> {
        let th = self
            .descendants_named("th")
            .find(|th| th.text() == header)?;
        th.element
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().name() == "td")
            .map(|element| Node { element })
    }

    /// Visible text with whitespace runs collapsed and citation markers,
    /// styles and scripts left out.
    #[must_use]
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(self.element, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !is_non_prose(&child_element) {
                collect_text(child_element, out);
            }
        }
    }
}
