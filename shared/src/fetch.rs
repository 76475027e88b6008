//! Upstream contribution calendar fetching.

use async_trait::async_trait;
use reqwest::header;
use tracing::{info, warn};

use crate::extract::parse_contributions;
use crate::html;
use crate::models::ParsedResult;
use crate::{Config, Error, Result};

/// Class fragment identifying the calendar table.
pub const CALENDAR_CLASS: &str = "ContributionCalendar-grid";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Raw upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamPage {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl UpstreamPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can GET an HTML page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get(&self, url: &str) -> Result<UpstreamPage>;
}

/// `PageSource` backed by a reqwest client.
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<UpstreamPage> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT_HTML)
            .send()
            .await?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(UpstreamPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Upstream URL for a user's calendar over `[from, to]`.
pub fn contributions_url(base_url: &str, username: &str, from: &str, to: &str) -> String {
    format!(
        "{}/users/{}/contributions?from={}&to={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(username),
        urlencoding::encode(from),
        urlencoding::encode(to)
    )
}

/// Slice out the calendar `<table>` element from a full page.
pub fn isolate_calendar(page: &str) -> Option<&str> {
    let table = html::tags(page).find(|tag| tag.is("table") && tag.has_class_fragment(CALENDAR_CLASS))?;
    let close_rel = html::find_ci(&page[table.end..], "</table>")?;
    Some(&page[table.start..table.end + close_rel + "</table>".len()])
}

/// Fetch and parse a user's contribution calendar.
pub async fn fetch_contributions(
    source: &dyn PageSource,
    base_url: &str,
    username: &str,
    from: &str,
    to: &str,
) -> Result<ParsedResult> {
    let url = contributions_url(base_url, username, from, to);
    info!(%url, "Fetching contributions");

    let page = source.get(&url).await?;
    if !page.is_success() {
        warn!(status = page.status, reason = %page.reason, "Upstream returned an error status");
        return Err(Error::UpstreamHttp {
            status: page.status,
            reason: page.reason,
        });
    }

    let calendar = isolate_calendar(&page.body).ok_or(Error::CalendarNotFound)?;
    let parsed = parse_contributions(calendar);

    info!(
        days = parsed.days.len(),
        total = parsed.total,
        "Parsed contribution calendar"
    );

    Ok(parsed)
}
