//! Request routing for the contributions Lambda.
//!
//! Endpoints:
//! - GET /api/contributions/{username} - Contribution calendar as JSON
//! - GET /api/contributions/{username}/svg - Contribution heatmap as SVG
//! - GET /health - Health check
//! - GET / - Documentation page

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{error, info};

use crate::fetch::{fetch_contributions, HttpPageSource, PageSource};
use crate::http::{self, CONTENT_TYPE_HTML};
use crate::models::{ContributionsResponse, ErrorBody, HealthStatus, ParsedResult};
use crate::render::{render_contributions, render_error};
use crate::{Config, Error, Result};

const CONTRIBUTIONS_PREFIX: &str = "/api/contributions/";
const SVG_SUFFIX: &str = "/svg";

/// Application state shared across invocations.
pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn PageSource>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn PageSource>) -> Self {
        Self { config, source }
    }

    /// Build state from environment configuration with a real HTTP client.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let source = HttpPageSource::new(&config)?;
        Ok(Self::new(config, Arc::new(source)))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Docs,
    Health,
    ContributionsJson(String),
    ContributionsSvg(String),
    NotFound,
}

fn match_route(method: &str, path: &str) -> Route {
    if method != "GET" {
        return Route::NotFound;
    }

    match path {
        "/" => Route::Docs,
        "/health" => Route::Health,
        _ => {
            let Some(rest) = path.strip_prefix(CONTRIBUTIONS_PREFIX) else {
                return Route::NotFound;
            };
            let (username, svg) = match rest.strip_suffix(SVG_SUFFIX) {
                Some(username) => (username, true),
                None => (rest, false),
            };
            if username.is_empty() || username.contains('/') {
                return Route::NotFound;
            }

            let username = urlencoding::decode(username)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| username.to_string());
            if svg {
                Route::ContributionsSvg(username)
            } else {
                Route::ContributionsJson(username)
            }
        }
    }
}

/// Dispatch a request to its endpoint.
pub async fn route(state: &AppState, event: &Request) -> std::result::Result<Response<Body>, lambda_http::Error> {
    let path = event.uri().path();
    let method = event.method().as_str();

    info!("Received request: method={}, path={}", method, path);

    match match_route(method, path) {
        Route::Docs => http::response(200, CONTENT_TYPE_HTML, None, DOCS_PAGE),
        Route::Health => http::json_response(
            200,
            &HealthStatus {
                status: "healthy".to_string(),
                timestamp: timestamp(Utc::now()),
            },
            None,
        ),
        Route::ContributionsJson(username) => contributions_json(state, event, &username).await,
        Route::ContributionsSvg(username) => contributions_svg(state, event, &username).await,
        Route::NotFound => http::text_response(404, "Not Found"),
    }
}

async fn contributions_json(
    state: &AppState,
    event: &Request,
    username: &str,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    let now = Utc::now();

    match load_contributions(state, event, username, now.date_naive()).await {
        Ok((from, to, parsed)) => {
            let body = ContributionsResponse {
                total_contributions: parsed.total,
                contributions: parsed.days,
                username: username.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                timestamp: timestamp(now),
            };
            http::json_response(200, &body, Some(&state.config.cache_control()))
        }
        Err(e) => {
            error!(username, error = %e, "Failed to load contributions");
            http::json_response(
                e.status_code(),
                &ErrorBody {
                    error: e.to_string(),
                    timestamp: timestamp(now),
                },
                None,
            )
        }
    }
}

async fn contributions_svg(
    state: &AppState,
    event: &Request,
    username: &str,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    match load_contributions(state, event, username, Utc::now().date_naive()).await {
        Ok((from, to, parsed)) => {
            let svg = render_contributions(&parsed, username, from, to);
            http::svg_response(200, svg, Some(&state.config.cache_control()))
        }
        Err(e) => {
            error!(username, error = %e, "Failed to render contributions");
            http::svg_response(e.status_code(), render_error(&e.to_string()), None)
        }
    }
}

async fn load_contributions(
    state: &AppState,
    event: &Request,
    username: &str,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate, ParsedResult)> {
    let (from, to) = resolve_range(
        query_param(event, "from").as_deref(),
        query_param(event, "to").as_deref(),
        today,
    )?;

    let parsed = fetch_contributions(
        state.source.as_ref(),
        &state.config.upstream_url,
        username,
        &from.to_string(),
        &to.to_string(),
    )
    .await?;

    Ok((from, to, parsed))
}

/// Resolve the requested range, defaulting to the calendar year of `today`.
pub fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let year = today.year();
    let from = match from {
        Some(raw) => parse_date("from", raw)?,
        None => NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today),
    };
    let to = match to {
        Some(raw) => parse_date("to", raw)?,
        None => NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today),
    };
    Ok((from, to))
}

fn parse_date(name: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!("'{}' must be a date in YYYY-MM-DD format, got {:?}", name, raw))
    })
}

/// Non-empty query parameter, from the API Gateway map or the raw URI.
fn query_param(event: &Request, key: &str) -> Option<String> {
    let from_map = event
        .query_string_parameters_ref()
        .and_then(|params| params.first(key))
        .map(str::to_string);

    from_map
        .or_else(|| {
            event.uri().query()?.split('&').find_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (k == key).then(|| {
                    urlencoding::decode(v)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| v.to_string())
                })
            })
        })
        .filter(|value| !value.is_empty())
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

const DOCS_PAGE: &str = r#"<html>
  <head>
    <title>GitHub Contributions API</title>
    <style>
      body { font-family: Arial, sans-serif; margin: 40px; }
      .endpoint { background: #f5f5f5; padding: 15px; margin: 10px 0; border-radius: 5px; }
      code { background: #e8e8e8; padding: 2px 4px; border-radius: 3px; }
    </style>
  </head>
  <body>
    <h1>GitHub Contributions Heatmap API</h1>
    <p>Fetches a GitHub user's contribution calendar and serves it as JSON or as an SVG heatmap.</p>

    <div class="endpoint">
      <h3>Get Contributions (JSON)</h3>
      <p><strong>Endpoint:</strong> <code>GET /api/contributions/:username</code></p>
      <ul>
        <li><code>username</code> (path): GitHub username</li>
        <li><code>from</code> (query, optional): Start date (YYYY-MM-DD), defaults to January 1 of the current year</li>
        <li><code>to</code> (query, optional): End date (YYYY-MM-DD), defaults to December 31 of the current year</li>
      </ul>
      <p><strong>Example:</strong> <code>/api/contributions/octocat?from=2024-01-01&amp;to=2024-12-31</code></p>
    </div>

    <div class="endpoint">
      <h3>Get Contributions Heatmap (SVG)</h3>
      <p><strong>Endpoint:</strong> <code>GET /api/contributions/:username/svg</code></p>
      <p>Takes the same parameters as the JSON endpoint.</p>
      <p><strong>Example:</strong> <code>/api/contributions/octocat/svg?from=2024-01-01&amp;to=2024-12-31</code></p>
    </div>

    <div class="endpoint">
      <h3>Health Check</h3>
      <p><strong>Endpoint:</strong> <code>GET /health</code></p>
    </div>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::UpstreamPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubUpstream {
        status: u16,
        body: String,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageSource for StubUpstream {
        async fn get(&self, url: &str) -> Result<UpstreamPage> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(UpstreamPage {
                status: self.status,
                reason: (if self.status == 404 { "Not Found" } else { "OK" }).to_string(),
                body: self.body.clone(),
            })
        }
    }

    fn state(status: u16, body: &str) -> (AppState, Arc<StubUpstream>) {
        let stub = Arc::new(StubUpstream {
            status,
            body: body.to_string(),
            requested: Mutex::new(Vec::new()),
        });
        (AppState::new(Config::default(), stub.clone()), stub)
    }

    fn get(uri: &str) -> Request {
        lambda_http::http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::Empty)
            .unwrap()
    }

    fn body_text(response: &Response<Body>) -> String {
        String::from_utf8(response.body().as_ref().to_vec()).unwrap()
    }

    fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    const CALENDAR: &str = r#"<html><body>
        <table class="ContributionCalendar-grid js-calendar-graph-table"><tbody><tr>
          <td data-date="2024-01-03" id="contribution-day-component-3-0" data-level="1" class="ContributionCalendar-day"></td>
          <tool-tip for="contribution-day-component-3-0">3 contributions on January 3rd.</tool-tip>
        </tr></tbody></table>
        </body></html>"#;

    #[test]
    fn test_match_route() {
        assert_eq!(match_route("GET", "/"), Route::Docs);
        assert_eq!(match_route("GET", "/health"), Route::Health);
        assert_eq!(
            match_route("GET", "/api/contributions/octocat"),
            Route::ContributionsJson("octocat".to_string())
        );
        assert_eq!(
            match_route("GET", "/api/contributions/octo%2Dcat/svg"),
            Route::ContributionsSvg("octo-cat".to_string())
        );
        assert_eq!(match_route("GET", "/api/contributions/"), Route::NotFound);
        assert_eq!(match_route("GET", "/api/contributions/a/b"), Route::NotFound);
        assert_eq!(match_route("POST", "/health"), Route::NotFound);
    }

    #[test]
    fn test_resolve_range_defaults_to_current_year() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let (from, to) = resolve_range(None, None, today).unwrap();
        assert_eq!(from.to_string(), "2026-01-01");
        assert_eq!(to.to_string(), "2026-12-31");

        let (from, to) = resolve_range(Some("2024-02-01"), None, today).unwrap();
        assert_eq!(from.to_string(), "2024-02-01");
        assert_eq!(to.to_string(), "2026-12-31");

        assert!(matches!(
            resolve_range(Some("yesterday"), None, today),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_json_endpoint() {
        let (state, stub) = state(200, CALENDAR);
        let response = route(&state, &get("/api/contributions/octocat?from=2024-01-01&to=2024-01-07"))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(header(&response, "content-type"), Some("application/json"));
        assert_eq!(header(&response, "cache-control"), Some("public, max-age=3600"));

        let json: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert_eq!(json["total_contributions"], 3);
        assert_eq!(json["username"], "octocat");
        assert_eq!(json["from"], "2024-01-01");
        assert_eq!(json["to"], "2024-01-07");
        assert_eq!(
            json["contributions"],
            serde_json::json!([{"date": "2024-01-03", "count": 3, "level": 1}])
        );
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));

        assert_eq!(
            stub.requested.lock().unwrap().as_slice(),
            ["https://github.com/users/octocat/contributions?from=2024-01-01&to=2024-01-07"]
        );
    }

    #[tokio::test]
    async fn test_json_endpoint_upstream_404() {
        let (state, _) = state(404, "");
        let response = route(&state, &get("/api/contributions/ghost?from=2024-01-01&to=2024-01-07"))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(header(&response, "cache-control"), None);
        let json: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert!(json["error"].as_str().unwrap().contains("404"));
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_json_endpoint_missing_calendar() {
        let (state, _) = state(200, "<html>no calendar here</html>");
        let response = route(&state, &get("/api/contributions/octocat")).await.unwrap();

        assert_eq!(response.status(), 500);
        let json: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert_eq!(json["error"], "Could not find contribution calendar in response");
    }

    #[tokio::test]
    async fn test_json_endpoint_rejects_bad_date() {
        let (state, stub) = state(200, CALENDAR);
        let response = route(&state, &get("/api/contributions/octocat?from=01/02/2024"))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(header(&response, "content-type"), Some("application/json"));
        let json: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert!(json["error"].as_str().unwrap().contains("01/02/2024"));
        assert!(stub.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_svg_endpoint_rejects_bad_date() {
        let (state, stub) = state(200, CALENDAR);
        let response = route(&state, &get("/api/contributions/octocat/svg?to=2024-13-01"))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(header(&response, "content-type"), Some("image/svg+xml"));
        assert_eq!(header(&response, "cache-control"), None);
        assert!(body_text(&response).contains("Error loading contributions"));
        assert!(stub.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_svg_endpoint() {
        let (state, _) = state(200, CALENDAR);
        let response = route(&state, &get("/api/contributions/octocat/svg?from=2024-01-01&to=2024-01-07"))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(header(&response, "content-type"), Some("image/svg+xml"));
        assert_eq!(header(&response, "cache-control"), Some("public, max-age=3600"));
        let svg = body_text(&response);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("octocat's GitHub Contributions"));
        assert!(svg.contains("<title>3 contributions on 2024-01-03</title>"));
    }

    #[tokio::test]
    async fn test_svg_endpoint_upstream_404() {
        let (state, _) = state(404, "");
        let response = route(&state, &get("/api/contributions/ghost/svg")).await.unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(header(&response, "content-type"), Some("image/svg+xml"));
        assert_eq!(header(&response, "cache-control"), None);
        let svg = body_text(&response);
        assert!(svg.contains("Error loading contributions"));
        assert!(svg.contains("404"));
    }

    #[tokio::test]
    async fn test_health_and_docs() {
        let (state, _) = state(200, "");

        let response = route(&state, &get("/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        let json: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());

        let response = route(&state, &get("/")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(header(&response, "content-type"), Some("text/html"));
        assert!(body_text(&response).contains("/api/contributions/:username/svg"));
    }

    #[tokio::test]
    async fn test_unmatched_route() {
        let (state, stub) = state(200, CALENDAR);
        let response = route(&state, &get("/nonexistent")).await.unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(header(&response, "content-type"), Some("text/plain"));
        assert_eq!(body_text(&response), "Not Found");
        assert!(stub.requested.lock().unwrap().is_empty());
    }
}
