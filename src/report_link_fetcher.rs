use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::fetch_error::FetchError;

/// Words that mark a link as the hotel performance workbook
const HOTEL_KEYWORDS: [&str; 6] = ["ホテル", "運営", "実績", "Hotel", "Performance", "XLS"];

/// First fiscal period number is offset from the calendar year by this amount
const FISCAL_PERIOD_OFFSET: i32 = 1998;

/// An Excel link found on the IR library page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLink {
    pub href: String,
    /// href plus anchor text
    pub own_text: String,
    /// Text of the enclosing element
    pub context: String,
}

/// Discovers the yearly hotel performance workbooks on the IR library page
#[derive(Clone)]
pub struct ReportLinkFetcher {
    client: reqwest::Client,
    url: String,
    base_url: String,
}

/// Texts that identify a year in link context, e.g. "2016年12月期" or "第18期"
fn year_indicators(year: i32) -> Vec<String> {
    vec![
        year.to_string(),
        format!("{year}年"),
        format!("{year}年12月期"),
        format!("第{}期", year - FISCAL_PERIOD_OFFSET),
    ]
}

fn mentions_year(text: &str, year: i32) -> bool {
    year_indicators(year)
        .iter()
        .any(|indicator| text.contains(indicator.as_str()))
}

fn is_excel_href(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

impl ReportLinkFetcher {
    pub fn new(url: String, base_url: String) -> Self {
        Self::with_timeout(url, base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: String, base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            url,
            base_url,
        }
    }

    /// Fetch the library page and map each requested year to an absolute workbook URL
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_report_urls(
        &self,
        years: &[i32],
    ) -> Result<BTreeMap<i32, String>, FetchError> {
        debug!("Sending HTTP request to IR library page");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        debug!("Received HTTP response with status: {}", response.status());

        let html = response.text().await?;
        debug!("Retrieved HTML content, size: {} bytes", html.len());

        self.resolve_report_urls(&html, years)
    }

    /// Parse the page and resolve the links found for each year
    pub fn resolve_report_urls(
        &self,
        html: &str,
        years: &[i32],
    ) -> Result<BTreeMap<i32, String>, FetchError> {
        let links = parse_links(html)?;
        info!("Found {} Excel links on library page", links.len());

        let base = Url::parse(&self.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        let mut urls = BTreeMap::new();
        for (year, link) in match_links(&links, years) {
            match base.join(&link.href) {
                Ok(url) => {
                    info!("{}年 report URL: {}", year, url);
                    urls.insert(year, url.to_string());
                }
                Err(e) => warn!("Skipping unresolvable link '{}': {}", link.href, e),
            }
        }

        for year in years {
            if !urls.contains_key(year) {
                warn!("No report link found for {}年", year);
            }
        }

        Ok(urls)
    }
}

/// Collect every Excel link on the page with its surrounding text
pub fn parse_links(html: &str) -> Result<Vec<ReportLink>, FetchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").map_err(|_| FetchError::ParseError)?;

    let links = document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim().to_string();
            if !is_excel_href(&href) {
                return None;
            }
            let anchor_text = anchor.text().collect::<String>();
            let context = anchor
                .parent()
                .and_then(ElementRef::wrap)
                .map(|parent| parent.text().collect::<String>())
                .unwrap_or_default();
            Some(ReportLink {
                own_text: format!("{href} {}", anchor_text.trim()),
                href,
                context,
            })
        })
        .collect();

    Ok(links)
}

/// Assign at most one link to each year
///
/// Links whose own text names the year win over links that only mention it in
/// the enclosing element. A link is never assigned to two years.
pub fn match_links<'a>(links: &'a [ReportLink], years: &[i32]) -> Vec<(i32, &'a ReportLink)> {
    let mut taken: HashSet<&str> = HashSet::new();
    let mut matched = Vec::new();

    for &year in years {
        let is_hotel_report = |link: &ReportLink| {
            let text = format!("{} {}", link.own_text, link.context);
            HOTEL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        };

        let direct = links.iter().find(|link| {
            !taken.contains(link.href.as_str())
                && mentions_year(&link.own_text, year)
                && is_hotel_report(link)
        });
        let candidate = direct.or_else(|| {
            links.iter().find(|link| {
                !taken.contains(link.href.as_str())
                    && mentions_year(&link.context, year)
                    && is_hotel_report(link)
            })
        });

        if let Some(link) = candidate {
            taken.insert(link.href.as_str());
            matched.push((year, link));
        }
    }

    matched
}
