//! Contribution calendar extraction.
//!
//! Day cells carry the date (`data-date`) and an `id`; the count lives in a
//! separate `<tool-tip for="...">` element pointing back at that id. Tooltips
//! are bound to cells through that reference. Markup without `for`
//! references falls back to pairing cells and tooltips by position.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::html::{self, Tag};
use crate::models::{DayRecord, ParsedResult};

/// Class fragment identifying a calendar day cell.
pub const DAY_CLASS: &str = "ContributionCalendar-day";

const TOOLTIP_TAG: &str = "tool-tip";

#[derive(Debug)]
struct DayMarker<'a> {
    date: &'a str,
    id: Option<&'a str>,
}

#[derive(Debug)]
struct Tooltip<'a> {
    target: Option<&'a str>,
    text: String,
}

/// Extract per-day contribution counts from a calendar fragment.
///
/// Never fails: a fragment without day cells yields an empty result.
pub fn parse_contributions(html: &str) -> ParsedResult {
    let tooltips = scan_tooltips(html);

    let strict = scan_markers(html, |tag| tag.is("td") && tag.has_class_fragment(DAY_CLASS));
    let mut days = associate(&strict, &tooltips);

    if days.is_empty() {
        let loose = scan_markers(html, |_| true);
        debug!(
            markers = loose.len(),
            tooltips = tooltips.len(),
            "strict day scan found nothing, using loose data-date sweep"
        );
        days = associate(&loose, &tooltips);
    }

    ParsedResult::from_days(days)
}

fn scan_markers<'a>(html: &'a str, accept: impl Fn(&Tag<'a>) -> bool) -> Vec<DayMarker<'a>> {
    html::tags(html)
        .filter(|tag| accept(tag))
        .filter_map(|tag| {
            let date = tag.attr("data-date")?;
            Some(DayMarker {
                date,
                id: tag.attr("id").filter(|id| !id.is_empty()),
            })
        })
        .collect()
}

fn scan_tooltips(html: &str) -> Vec<Tooltip<'_>> {
    html::tags(html)
        .filter(|tag| tag.is(TOOLTIP_TAG))
        .filter_map(|tag| {
            let text = html::element_text(html, &tag)?;
            Some(Tooltip {
                target: tag.attr("for").filter(|target| !target.is_empty()),
                text,
            })
        })
        .collect()
}

fn associate(markers: &[DayMarker<'_>], tooltips: &[Tooltip<'_>]) -> Vec<DayRecord> {
    let by_target: HashMap<&str, &str> = tooltips
        .iter()
        .filter_map(|tip| Some((tip.target?, tip.text.as_str())))
        .collect();

    let bound = markers
        .iter()
        .any(|marker| marker.id.is_some_and(|id| by_target.contains_key(id)));

    let pairs: Vec<(&str, Option<&str>)> = if bound {
        markers
            .iter()
            .map(|marker| {
                let text = marker.id.and_then(|id| by_target.get(id).copied());
                (marker.date, text)
            })
            .collect()
    } else {
        markers
            .iter()
            .zip(tooltips)
            .map(|(marker, tip)| (marker.date, Some(tip.text.as_str())))
            .collect()
    };

    pairs
        .into_iter()
        .filter_map(|(raw_date, text)| {
            let date = match NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    debug!(date = raw_date, "skipping day marker with unparseable date");
                    return None;
                }
            };
            Some(DayRecord::new(date, text.map(parse_count).unwrap_or(0)))
        })
        .collect()
}

/// Read the contribution count out of tooltip text.
///
/// Recognises "N contribution(s)" anywhere in the text; "No contributions"
/// and anything unrecognised count as zero.
pub fn parse_count(text: &str) -> u32 {
    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    for (idx, _) in lower.match_indices(" contribution") {
        let mut start = idx;
        while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b',') {
            start -= 1;
        }
        let digits: String = lower[start..idx].chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            continue;
        }
        if let Ok(count) = digits.parse() {
            return count;
        }
    }

    0
}
