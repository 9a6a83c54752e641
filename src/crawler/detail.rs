//! Detail page extractor
//!
//! Every field has its own extraction function returning `Option`; a missing
//! element only empties that one field. Sentinels are substituted later, in
//! [`VacancyRecord::assemble`](crate::record::VacancyRecord::assemble).

use crate::crawler::html::{document_attr, document_text, element_text, first_text, selector};
use crate::record::DetailFields;
use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

static CALENDAR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\b")
        .expect("calendar date pattern is valid")
});

/// Marker text of the beginning-teacher tip box
const BEGINNING_TEACHER_TIP: &str = "suitable for beginning teachers";

/// Parses a vacancy detail page
///
/// # Field Sources
///
/// | Field | Source |
/// |-------|--------|
/// | employment type | `p.title-byline[itemprop='employmentType']`, else `p.title-byline` |
/// | beginning teacher | `div.tip` containing "suitable for beginning teachers" |
/// | school | `div.layout-col-7 h3[itemprop='name']` |
/// | authority, gender | text after `<strong>Authority:</strong>` / `<strong>Gender:</strong>` |
/// | address | `p[itemprop='address'] span[itemprop='streetAddress']` |
/// | map link | `p.link-map a[href*='maps.google.com']` |
/// | listed, closes | `div.cal-icon.start`, `div.cal-icon.end` |
///
/// # Errors
///
/// Returns [`ParseError::NotAVacancyPage`] when none of the fields is present,
/// which means the page is not a vacancy detail page at all.
pub fn parse_detail(html: &str) -> Result<DetailFields, ParseError> {
    let document = Html::parse_document(html);

    let fields = DetailFields {
        employment_type: extract_employment_type(&document)?,
        beginning_teacher_suitable: extract_beginning_teacher(&document)?,
        school: extract_school(&document)?,
        gender: extract_labelled(&document, "Gender:")?,
        address: extract_address(&document)?,
        authority: extract_labelled(&document, "Authority:")?,
        listed: extract_calendar_date(&document, "div.cal-icon.start")?,
        closes: extract_calendar_date(&document, "div.cal-icon.end")?,
        map_url: extract_map_url(&document)?,
    };

    if fields.is_empty() {
        return Err(ParseError::NotAVacancyPage);
    }

    Ok(fields)
}

fn extract_employment_type(document: &Html) -> Result<Option<String>, ParseError> {
    let tagged = selector("p.title-byline[itemprop='employmentType']")?;
    let byline = selector("p.title-byline")?;

    Ok(document_text(document, &tagged).or_else(|| document_text(document, &byline)))
}

fn extract_beginning_teacher(document: &Html) -> Result<bool, ParseError> {
    let tip = selector("div.tip")?;

    Ok(document
        .select(&tip)
        .next()
        .map(|element| element_text(element).to_lowercase().contains(BEGINNING_TEACHER_TIP))
        .unwrap_or(false))
}

fn extract_school(document: &Html) -> Result<Option<String>, ParseError> {
    let name = selector("div.layout-col-7 h3[itemprop='name']")?;
    Ok(document_text(document, &name))
}

fn extract_address(document: &Html) -> Result<Option<String>, ParseError> {
    let street = selector("p[itemprop='address'] span[itemprop='streetAddress']")?;
    Ok(document_text(document, &street))
}

fn extract_map_url(document: &Html) -> Result<Option<String>, ParseError> {
    let map_link = selector("p.link-map a[href*='maps.google.com']")?;
    Ok(document_attr(document, &map_link, "href"))
}

/// Reads the text node right after a `<strong>` label such as `Authority:`
fn extract_labelled(document: &Html, label: &str) -> Result<Option<String>, ParseError> {
    let strong = selector("strong")?;

    let value = document
        .select(&strong)
        .find(|element| element_text(*element) == label)
        .and_then(|element| element.next_sibling())
        .and_then(|node| node.value().as_text().map(|text| text.trim().to_string()))
        .filter(|text| !text.is_empty());

    Ok(value)
}

fn extract_calendar_date(document: &Html, container_css: &str) -> Result<Option<String>, ParseError> {
    let container = selector(container_css)?;

    match document.select(&container).next() {
        Some(element) => read_calendar_date(element),
        None => Ok(None),
    }
}

/// Reads a display date from a calendar icon
///
/// Prefers a `<day> <month> <year>` run in the container's text; falls back to
/// assembling `span.day`, `span.month` and `span.year`, of which day and year
/// are required.
fn read_calendar_date(container: ElementRef<'_>) -> Result<Option<String>, ParseError> {
    let text = element_text(container);
    if let Some(caps) = CALENDAR_DATE.captures(&text) {
        return Ok(Some(format!("{} {} {}", &caps[1], &caps[2], &caps[3])));
    }

    let day = first_text(container, &selector("span.day")?);
    let month = first_text(container, &selector("span.month")?);
    let year = first_text(container, &selector("span.year")?);

    Ok(match (day, year) {
        (Some(day), Some(year)) => {
            let month = month.unwrap_or_default();
            Some(
                format!("{} {} {}", day, month, year)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
        _ => None,
    })
}
