//! Shared library for the GitHub contributions Lambda.
//!
//! Fetches a user's contribution calendar, extracts per-day counts and
//! serves them as JSON or as an SVG heatmap.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod http;
pub mod level;
pub mod models;
pub mod render;
pub mod router;
pub mod streak;
pub mod svg;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::parse_contributions;
pub use fetch::{fetch_contributions, HttpPageSource, PageSource, UpstreamPage};
pub use level::contribution_level;
pub use models::{ContributionsResponse, DayRecord, ErrorBody, HealthStatus, ParsedResult};
pub use render::{render_contributions, render_error, Summary};
pub use router::{route, AppState};
pub use streak::{current_streak, longest_streak};
