//! Small helpers shared by the listing and detail extractors

use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Compiles a CSS selector, reporting failures as a parse error
pub(crate) fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Text content of an element: trimmed text nodes joined by single spaces
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching `selector` within `scope`, if non-empty
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Text of the first element in the document matching `selector`, if non-empty
pub(crate) fn document_text(document: &Html, selector: &Selector) -> Option<String> {
    first_text(document.root_element(), selector)
}

/// Attribute value of the first element in the document matching `selector`
pub(crate) fn document_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
