//! Listing page extractor
//!
//! Turns one listing page into candidate summaries plus the link to the next
//! page. The next link is the only signal that ends pagination; the page count
//! read by [`total_page_count`] only feeds progress reporting.

use crate::crawler::html::{document_attr, element_text, first_text, selector};
use crate::record::CandidateSummary;
use crate::url::resolve_link;
use crate::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

static PAGE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"page number\s+(\d+)").expect("page number pattern is valid"));

/// Candidates and pagination extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Candidates in listing order
    pub candidates: Vec<CandidateSummary>,

    /// Absolute URL of the next listing page, if the page offers one
    pub next_page_url: Option<Url>,

    /// Listing blocks skipped for lacking a title, description or link
    pub skipped_blocks: usize,
}

/// Parses a listing page
///
/// # Extraction Rules
///
/// Each `article.block-vacancy-featured` block yields one candidate from:
/// - title: `h3.title`
/// - description: `p.description`, lowercased
/// - detail link: `a.search-statable[href]`, resolved against `page_url`
///
/// A block missing any of the three is skipped; the rest of the page is still
/// extracted. The next page comes from `a.next[href]`.
///
/// # Example
///
/// ```
/// use url::Url;
/// use vacancy_sieve::crawler::parse_listing;
///
/// let html = r#"<article class="block-vacancy-featured">
///     <h3 class="title">Teacher of Maths</h3>
///     <p class="description">Years 9-13</p>
///     <a class="search-statable" href="/vacancies/1">View</a>
/// </article>"#;
/// let page_url = Url::parse("https://example.com/vacancies/").unwrap();
/// let page = parse_listing(html, &page_url).unwrap();
/// assert_eq!(page.candidates[0].detail_url, "https://example.com/vacancies/1");
/// assert!(page.next_page_url.is_none());
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> Result<ListingPage, ParseError> {
    let document = Html::parse_document(html);

    let block_sel = selector("article.block-vacancy-featured")?;
    let title_sel = selector("h3.title")?;
    let description_sel = selector("p.description")?;
    let link_sel = selector("a.search-statable[href]")?;
    let next_sel = selector("a.next[href]")?;

    let mut page = ListingPage::default();

    for block in document.select(&block_sel) {
        let title = first_text(block, &title_sel);
        let description = block.select(&description_sel).next().map(element_text);
        let detail_url = block
            .select(&link_sel)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url));

        match (title, description, detail_url) {
            (Some(title), Some(description), Some(detail_url)) => {
                page.candidates.push(CandidateSummary {
                    title,
                    description: description.to_lowercase(),
                    detail_url: detail_url.to_string(),
                });
            }
            _ => page.skipped_blocks += 1,
        }
    }

    page.next_page_url = document_attr(&document, &next_sel, "href")
        .and_then(|href| resolve_link(&href, page_url));

    Ok(page)
}

/// Reads the number of listing pages from the pagination control
///
/// Takes the highest `N` among `View page number N` link titles; 1 when the
/// page has no pagination control.
pub fn total_page_count(html: &str) -> u32 {
    let Ok(page_link_sel) = selector("nav.nav-pagination ol li a[title*='View page number']")
    else {
        return 1;
    };

    let document = Html::parse_document(html);
    document
        .select(&page_link_sel)
        .filter_map(|link| link.value().attr("title"))
        .filter_map(|title| PAGE_NUMBER.captures(title))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .fold(1, u32::max)
}
