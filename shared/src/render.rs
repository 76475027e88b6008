//! Contribution heatmap SVG rendering.

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, warn};

use crate::level::MAX_LEVEL;
use crate::models::ParsedResult;
use crate::streak::{current_streak, longest_streak};
use crate::svg::Element;

pub const CELL_SIZE: u32 = 11;
pub const CELL_GAP: u32 = 3;
pub const CELL_PITCH: u32 = CELL_SIZE + CELL_GAP;
pub const MIN_CARD_WIDTH: u32 = 550;
/// Widest grid drawn, about five years; later weeks are dropped.
pub const MAX_WEEKS: usize = 265;

const DAY_LABEL_WIDTH: u32 = 35;
const CHART_LEFT_MARGIN: u32 = 50;
const CARD_PADDING: u32 = 30;
/// Room for title, stats and legend around the grid.
const CARD_CHROME_HEIGHT: u32 = 160;

/// Colour per activity level, lightest (no activity) first.
pub const LEVEL_COLORS: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];

const STYLE: &str = r#"
    .header { font: 600 18px 'Segoe UI', Ubuntu, Sans-Serif; fill: #2f80ed; animation: fadeInAnimation 0.8s ease-in-out forwards; }
    @supports(-moz-appearance: auto) { .header { font-size: 15.5px; } }
    .stat { font: 600 14px 'Segoe UI', Ubuntu, "Helvetica Neue", Sans-Serif; fill: #434d58; }
    @supports(-moz-appearance: auto) { .stat { font-size: 12px; } }
    .stagger { opacity: 0; animation: fadeInAnimation 0.3s ease-in-out forwards; }
    .contrib-month { font: 10px 'Segoe UI', Ubuntu, Sans-Serif; fill: #656d76; }
    .contrib-day { font: 9px 'Segoe UI', Ubuntu, Sans-Serif; fill: #656d76; text-anchor: start; }
    .contrib-legend { font: 12px 'Segoe UI', Ubuntu, Sans-Serif; fill: #656d76; }
    .contrib-square, .contrib-swatch { shape-rendering: crispEdges; opacity: 0; animation: fadeInAnimation 0.3s ease-in-out forwards; }
    .bold { font-weight: 700; }
    @keyframes fadeInAnimation { from { opacity: 0; } to { opacity: 1; } }
"#;

/// Colour for an activity level; out-of-range levels use the empty colour.
pub fn level_color(level: u8) -> &'static str {
    LEVEL_COLORS
        .get(usize::from(level))
        .copied()
        .unwrap_or(LEVEL_COLORS[0])
}

/// Headline numbers for a parsed calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: u64,
    pub active_days: usize,
    pub longest_streak: usize,
    pub current_streak: usize,
}

impl Summary {
    pub fn from_parsed(parsed: &ParsedResult) -> Self {
        Self {
            total: parsed.total,
            active_days: parsed.active_days(),
            longest_streak: longest_streak(&parsed.days),
            current_streak: current_streak(&parsed.days),
        }
    }
}

/// Week columns covering a date range; weeks start on Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLayout {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// First day (Sunday) of each week column
    pub weeks: Vec<NaiveDate>,
}

impl CalendarLayout {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        let back = u64::from(from.weekday().num_days_from_sunday());
        let mut week_start = from.checked_sub_days(Days::new(back)).unwrap_or(from);

        let mut weeks = Vec::new();
        while week_start <= to {
            if weeks.len() == MAX_WEEKS {
                warn!(%from, %to, max_weeks = MAX_WEEKS, "Date range truncated to the widest grid");
                break;
            }
            weeks.push(week_start);
            match week_start.checked_add_days(Days::new(7)) {
                Some(next) => week_start = next,
                None => break,
            }
        }

        Self { from, to, weeks }
    }

    pub fn card_width(&self) -> u32 {
        let chart_width = self.weeks.len() as u32 * CELL_PITCH;
        MIN_CARD_WIDTH.max(chart_width + DAY_LABEL_WIDTH + CHART_LEFT_MARGIN + CARD_PADDING * 2)
    }

    pub fn card_height(&self) -> u32 {
        7 * CELL_PITCH + CARD_CHROME_HEIGHT
    }

    /// In-range dates with their (week, weekday) grid position.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, NaiveDate)> + '_ {
        self.weeks.iter().enumerate().flat_map(move |(week_idx, &start)| {
            (0..7u64).filter_map(move |day_idx| {
                let date = start.checked_add_days(Days::new(day_idx))?;
                (date >= self.from && date <= self.to).then_some((week_idx, day_idx as usize, date))
            })
        })
    }

    /// Month label per week column where the month changes, skipping column 0.
    pub fn month_labels(&self) -> Vec<(usize, &'static str)> {
        let mut labels = Vec::new();
        let mut last_month = None;
        for (week_idx, start) in self.weeks.iter().enumerate().skip(1) {
            let month = start.month0();
            if last_month != Some(month) {
                labels.push((week_idx, MONTH_NAMES[month as usize]));
                last_month = Some(month);
            }
        }
        labels
    }
}

/// Render the contribution card for `username` over `[from, to]`.
pub fn render_contributions(
    parsed: &ParsedResult,
    username: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> String {
    build_card(parsed, username, from, to).to_string()
}

/// Build the contribution card as an element tree.
pub fn build_card(parsed: &ParsedResult, username: &str, from: NaiveDate, to: NaiveDate) -> Element {
    let layout = CalendarLayout::new(from, to);
    let summary = Summary::from_parsed(parsed);
    let width = layout.card_width();
    let height = layout.card_height();

    debug!(
        weeks = layout.weeks.len(),
        total = summary.total,
        active_days = summary.active_days,
        longest_streak = summary.longest_streak,
        current_streak = summary.current_streak,
        "rendering contribution card"
    );

    Element::svg(width, height)
        .attr("role", "img")
        .child(Element::new("style").text(STYLE))
        .child(
            Element::new("rect")
                .attr("x", 0.5)
                .attr("y", 0.5)
                .attr("rx", 4.5)
                .attr("height", height - 1)
                .attr("width", width - 1)
                .attr("fill", "#fffefe")
                .attr("stroke", "#e4e2e2")
                .attr("stroke-width", 1),
        )
        .child(
            Element::new("g")
                .attr("data-testid", "card-title")
                .attr("transform", translate(CARD_PADDING, 35))
                .child(
                    Element::new("text")
                        .attr("x", 0)
                        .attr("y", 0)
                        .attr("class", "header")
                        .text(format!("{}'s GitHub Contributions", username)),
                ),
        )
        .child(stats(&summary))
        .child(chart(parsed, &layout))
        .child(legend(width, height))
}

fn translate(x: u32, y: u32) -> String {
    format!("translate({}, {})", x, y)
}

fn stat(label: &str, value: impl std::fmt::Display, value_x: u32) -> [Element; 2] {
    [
        Element::new("text")
            .attr("class", "stat")
            .attr("x", 0)
            .attr("y", 0)
            .text(label),
        Element::new("text")
            .attr("class", "stat bold")
            .attr("x", value_x)
            .attr("y", 0)
            .attr("style", "fill: #2f80ed;")
            .text(value.to_string()),
    ]
}

fn stats(summary: &Summary) -> Element {
    let [total_label, total_value] = stat("Total Contributions:", summary.total, 180);
    let [active_label, active_value] = stat("Active Days:", summary.active_days, 120);

    Element::new("g")
        .attr("transform", translate(CARD_PADDING, 70))
        .child(
            Element::new("g")
                .attr("class", "stagger")
                .attr("style", "animation-delay: 150ms")
                .child(total_label)
                .child(total_value),
        )
        .child(
            Element::new("g")
                .attr("class", "stagger")
                .attr("style", "animation-delay: 300ms")
                .attr("transform", translate(280, 0))
                .child(active_label)
                .child(active_value),
        )
}

fn chart(parsed: &ParsedResult, layout: &CalendarLayout) -> Element {
    let mut group = Element::new("g").attr("transform", translate(CARD_PADDING, 90));

    for (week_idx, month) in layout.month_labels() {
        group.push(
            Element::new("text")
                .attr("x", week_idx as u32 * CELL_PITCH + CHART_LEFT_MARGIN)
                .attr("y", 15)
                .attr("class", "contrib-month")
                .text(month),
        );
    }

    for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        group.push(
            Element::new("text")
                .attr("x", 10)
                .attr("y", 35 + row as u32 * CELL_PITCH)
                .attr("class", "contrib-day")
                .attr("text-anchor", "start")
                .text(*label),
        );
    }

    for (week_idx, day_idx, date) in layout.cells() {
        let (count, level) = parsed
            .day(date)
            .map(|day| (day.count, day.level))
            .unwrap_or((0, 0));
        let delay = (week_idx * 7 + day_idx) * 10;
        let plural = if count == 1 { "" } else { "s" };

        group.push(
            Element::new("rect")
                .attr("class", "contrib-square")
                .attr("x", week_idx as u32 * CELL_PITCH + CHART_LEFT_MARGIN)
                .attr("y", day_idx as u32 * CELL_PITCH + 25)
                .attr("width", CELL_SIZE)
                .attr("height", CELL_SIZE)
                .attr("fill", level_color(level))
                .attr("rx", 2)
                .attr("ry", 2)
                .attr("data-date", date)
                .attr("data-level", level)
                .attr("style", format!("animation-delay: {}ms", delay))
                .child(
                    Element::new("title")
                        .text(format!("{} contribution{} on {}", count, plural, date)),
                ),
        );
    }

    group
}

fn legend(width: u32, height: u32) -> Element {
    let mut group = Element::new("g")
        .attr("transform", translate(width - 150, height - 30))
        .child(
            Element::new("text")
                .attr("x", 0)
                .attr("y", 0)
                .attr("class", "contrib-legend")
                .text("Less"),
        );

    for level in 0..=MAX_LEVEL {
        group.push(
            Element::new("rect")
                .attr("x", 30 + u32::from(level) * CELL_PITCH)
                .attr("y", -8)
                .attr("width", CELL_SIZE)
                .attr("height", CELL_SIZE)
                .attr("fill", level_color(level))
                .attr("rx", 2)
                .attr("ry", 2)
                .attr("class", "contrib-swatch"),
        );
    }

    group.child(
        Element::new("text")
            .attr("x", 30 + 5 * CELL_PITCH + 8)
            .attr("y", 0)
            .attr("class", "contrib-legend")
            .text("More"),
    )
}

/// Small standalone card describing a failure.
pub fn render_error(message: &str) -> String {
    Element::new("svg")
        .attr("width", 400)
        .attr("height", 100)
        .attr("xmlns", crate::svg::SVG_NS)
        .child(
            Element::new("rect")
                .attr("width", "100%")
                .attr("height", "100%")
                .attr("fill", "#f6f8fa"),
        )
        .child(
            Element::new("text")
                .attr("x", 20)
                .attr("y", 30)
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 14)
                .attr("fill", "#d1242f")
                .text("Error loading contributions"),
        )
        .child(
            Element::new("text")
                .attr("x", 20)
                .attr("y", 50)
                .attr("font-family", "Arial, sans-serif")
                .attr("font-size", 12)
                .attr("fill", "#656d76")
                .text(message),
        )
        .to_string()
}
