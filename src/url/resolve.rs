use url::Url;

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that do not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use vacancy_sieve::url::resolve_link;
///
/// let page = Url::parse("https://example.com/vacancies/?page=2").unwrap();
/// let link = resolve_link("/vacancies/1234-maths", &page).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/vacancies/1234-maths");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}
