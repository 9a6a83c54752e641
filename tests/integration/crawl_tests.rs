//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the listing service and run the
//! full crawl cycle end-to-end over HTTP.

use tokio_util::sync::CancellationToken;
use url::Url;
use vacancy_sieve::config::{Config, CrawlerConfig, ListingConfig, UserAgentConfig};
use vacancy_sieve::crawler::{crawl, NoProgress};
use vacancy_sieve::{FetchError, FilterConfig, SieveError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that crawls without pauses or retries
fn create_test_config(base_url: &str, max_retries: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_delay_ms: 0,
            max_retries,
            retry_base_delay_ms: 0,
            max_concurrent_details: 1,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        listing: ListingConfig {
            base_url: base_url.to_string(),
            start_url: Some(format!("{}/vacancies/", base_url)),
            ..ListingConfig::default()
        },
        ..Config::default()
    }
}

fn start_url(config: &Config) -> Url {
    vacancy_sieve::url::listing_start_url(&config.listing, false).expect("Failed to build start URL")
}

fn listing_page(entries: &[(&str, &str, &str)], next: Option<&str>, total_pages: u32) -> String {
    let blocks: String = entries
        .iter()
        .map(|(title, description, href)| {
            format!(
                r#"<article class="block-vacancy-featured">
                    <h3 class="title">{}</h3>
                    <p class="description">{}</p>
                    <a class="search-statable" href="{}">View vacancy</a>
                </article>"#,
                title, description, href
            )
        })
        .collect();
    let pages: String = (1..=total_pages)
        .map(|n| format!(r#"<li><a title="View page number {}">{}</a></li>"#, n, n))
        .collect();
    let next = next
        .map(|href| format!(r#"<a class="next" href="{}">Next</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><body>{}<nav class="nav-pagination"><ol>{}</ol></nav>{}</body></html>"#,
        blocks, pages, next
    )
}

fn detail_page(school: &str, employment: &str, closes: &str) -> String {
    format!(
        r#"<html><body>
        <p class="title-byline" itemprop="employmentType">{}</p>
        <div class="layout-col-7">
            <h3 itemprop="name">{}</h3>
            <p><strong>Authority:</strong> State<br><strong>Gender:</strong> Co-Educational</p>
        </div>
        <div class="cal-icon start"><span class="day">01</span><span class="month">Jan</span><span class="year">2026</span></div>
        <div class="cal-icon end">{}</div>
        </body></html>"#,
        employment, school, closes
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(
            &[
                ("Teacher of Mathematics", "Years 9 to 13", "/vacancies/1-maths"),
                ("Teacher of English", "literature", "/vacancies/2-english"),
            ],
            Some("/vacancies/page/2"),
            2,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/page/2",
        listing_page(
            &[("Digital Technology Teacher", "DT and computing", "3-dt")],
            None,
            2,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/1-maths",
        detail_page("Hillside College", "Permanent, Full-time", "27 Feb 2026"),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/page/3-dt",
        detail_page("Riverside High", "Fixed Term, Full-time", "05 Feb 2026"),
    )
    .await;

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.pages_loaded, 2);
    assert_eq!(outcome.total_pages, 2);
    assert_eq!(outcome.candidates_seen, 3);
    assert_eq!(outcome.pre_filtered_out, 1);
    assert!(!outcome.stopped_early);

    let schools: Vec<&str> = outcome.records.iter().map(|r| r.school.as_str()).collect();
    assert_eq!(schools, ["Riverside High", "Hillside College"]);

    let maths = &outcome.records[1];
    assert_eq!(maths.detail_url, format!("{}/vacancies/1-maths", mock_server.uri()));
    assert_eq!(maths.authority, "State");
    assert_eq!(maths.gender, "Co-Educational");
    assert_eq!(maths.listed_date.display(), "01 Jan 2026");
    assert_eq!(maths.address, "Unknown");
}

#[tokio::test]
async fn test_duplicate_detail_fetched_once() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(&[("Maths Teacher", "maths", "/vacancies/7")], Some("/vacancies/page/2"), 2),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/page/2",
        listing_page(&[("Maths Teacher", "maths", "/vacancies/7")], None, 2),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/vacancies/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Hillside College", "Permanent", "27 Feb 2026")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.duplicates_skipped, 1);
}

#[tokio::test]
async fn test_missing_detail_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(
            &[
                ("Maths Teacher", "maths", "/vacancies/gone"),
                ("Maths Teacher", "maths", "/vacancies/8"),
            ],
            None,
            1,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/vacancies/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/vacancies/8",
        detail_page("Hillside College", "Permanent", "Unknown"),
    )
    .await;

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.detail_failures, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].close_date.display(), "Unknown");
    assert!(outcome.records[0].close_date_parsed().is_none());
}

#[tokio::test]
async fn test_first_listing_failure_fails_crawl() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    Mock::given(method("GET"))
        .and(path("/vacancies/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await;

    match result {
        Err(SieveError::Fetch { url, source }) => {
            assert_eq!(url, format!("{}/vacancies/", mock_server.uri()));
            assert_eq!(source, FetchError::HttpStatus(500));
        }
        other => panic!("Expected fetch error, got {:?}", other.map(|o| o.records.len())),
    }
}

#[tokio::test]
async fn test_later_listing_failure_keeps_results() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(&[("Maths Teacher", "maths", "/vacancies/7")], Some("/vacancies/page/2"), 4),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/vacancies/page/2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/vacancies/7",
        detail_page("Hillside College", "Permanent", "27 Feb 2026"),
    )
    .await;

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert!(outcome.stopped_early);
    assert_eq!(outcome.pages_loaded, 1);
    assert_eq!(outcome.total_pages, 4);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_transient_detail_failure_retried() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 2);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(&[("Maths Teacher", "maths", "/vacancies/7")], None, 1),
    )
    .await;
    // first match wins while it has budget left
    Mock::given(method("GET"))
        .and(path("/vacancies/7"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/vacancies/7",
        detail_page("Hillside College", "Permanent", "27 Feb 2026"),
    )
    .await;

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.detail_failures, 0);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_permanent_only_filter() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    mount_html(
        &mock_server,
        "/vacancies/",
        listing_page(
            &[
                ("Maths Teacher", "maths", "/vacancies/1"),
                ("Maths Teacher", "maths", "/vacancies/2"),
            ],
            None,
            1,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/1",
        detail_page("Fixed School", "Fixed Term, Full-time", "01 Feb 2026"),
    )
    .await;
    mount_html(
        &mock_server,
        "/vacancies/2",
        detail_page("Permanent School", "Permanent, Full-time", "02 Feb 2026"),
    )
    .await;

    let outcome = crawl(
        &config,
        FilterConfig::new(false, true, ["maths"]),
        &start_url(&config),
        &NoProgress,
        CancellationToken::new(),
    )
    .await
    .expect("Crawl failed");

    assert_eq!(outcome.post_filtered_out, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].school, "Permanent School");
}

#[tokio::test]
async fn test_cancelled_crawl_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), 0);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None, 1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = crawl(
        &config,
        FilterConfig::default(),
        &start_url(&config),
        &NoProgress,
        cancel,
    )
    .await
    .expect("Crawl failed");

    assert!(outcome.cancelled);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.pages_loaded, 0);
}
