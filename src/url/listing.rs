use crate::config::ListingConfig;
use crate::UrlError;
use url::Url;

/// Path of the vacancy search on the listing service
const VACANCIES_PATH: &str = "/vacancies/";

/// Search parameters for the first listing page
///
/// The crawler never builds later page URLs itself; those come from each
/// page's next link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery<'a> {
    pub region: &'a str,
    pub sectors_and_roles: &'a str,
    pub learning_area: &'a str,
    pub position_type: &'a str,
    pub beginning_teachers: bool,
    pub sort: &'a str,
}

impl<'a> ListingQuery<'a> {
    /// Takes the search parameters from the listing configuration
    pub fn from_config(config: &'a ListingConfig, beginning_teachers: bool) -> Self {
        Self {
            region: &config.region,
            sectors_and_roles: &config.sectors_and_roles,
            learning_area: &config.learning_area,
            position_type: &config.position_type,
            beginning_teachers,
            sort: &config.sort,
        }
    }

    /// Builds the search URL under `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use vacancy_sieve::config::ListingConfig;
    /// use vacancy_sieve::url::ListingQuery;
    ///
    /// let config = ListingConfig::default();
    /// let url = ListingQuery::from_config(&config, true)
    ///     .to_url("https://gazette.education.govt.nz")
    ///     .unwrap();
    /// assert!(url.as_str().contains("IsBeginningTeachers=1"));
    /// ```
    pub fn to_url(&self, base_url: &str) -> Result<Url, UrlError> {
        let base = Url::parse(base_url)?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(UrlError::InvalidScheme(base.scheme().to_string()));
        }

        let mut url = base.join(VACANCIES_PATH)?;
        url.query_pairs_mut()
            .clear()
            .append_pair("Regions", self.region)
            .append_pair("SectorsAndRoles", self.sectors_and_roles)
            .append_pair("LearningAreasStrand", self.learning_area)
            .append_pair("PositionTypes", self.position_type)
            .append_pair(
                "IsBeginningTeachers",
                if self.beginning_teachers { "1" } else { "0" },
            )
            .append_pair("sort", self.sort);

        Ok(url)
    }
}

/// Resolves the first listing URL for a crawl
///
/// An explicit `start_url` wins; otherwise the URL is built from the search
/// parameters, with the beginning-teacher flag taken from the filter.
pub fn listing_start_url(config: &ListingConfig, beginning_teachers: bool) -> Result<Url, UrlError> {
    match &config.start_url {
        Some(start_url) => Ok(Url::parse(start_url)?),
        None => ListingQuery::from_config(config, beginning_teachers).to_url(&config.base_url),
    }
}
