use common::{TrackerError, TrackerResult};
use serde_json::Value;
use tracing::warn;
use tracker_api::{FieldPresence, QuarterlyAggregate, TopicAnalysis};

use crate::html_escape;

pub const TRAJECTORY_GENERATING: &str = "Trajectory summary is being generated...";
pub const TRAJECTORY_UNAVAILABLE: &str = "No trajectory summary available";
pub const NO_QUARTERLY_DATA: &str = "No quarterly data";
pub const QUARTERLY_ERROR: &str = "Failed to display quarterly data";

const MAX_SAMPLE_TITLES: usize = 2;
const SAMPLE_TITLE_CHARS: usize = 50;

/// Quarter-over-quarter change in paper count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up { percent: u64 },
    Down { percent: u64 },
    Flat,
    /// The previous quarter had no papers, so there is no ratio to report.
    New,
}

impl Trend {
    pub fn between(previous: u64, current: u64) -> Self {
        if previous == 0 {
            return if current > 0 { Trend::New } else { Trend::Flat };
        }

        let change = current as i128 - previous as i128;
        // Halves round toward positive infinity, so -12.5 becomes -12.
        let rounded = ((change as f64 / previous as f64) * 100.0 + 0.5).floor();
        let percent = rounded.abs() as u64;
        match change {
            c if c > 0 => Trend::Up { percent },
            c if c < 0 => Trend::Down { percent },
            _ => Trend::Flat,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Trend::Up { percent } => format!("📈 {}%", percent),
            Trend::Down { percent } => format!("📉 {}%", percent),
            Trend::Flat => "➡️ 0%".to_string(),
            Trend::New => "🆕 new".to_string(),
        }
    }
}

/// Trends for aggregates given newest first. The oldest entry gets `None`.
pub fn compute_trends(aggregates: &[QuarterlyAggregate]) -> Vec<Option<Trend>> {
    let mut trends = vec![None; aggregates.len()];
    for i in (0..aggregates.len().saturating_sub(1)).rev() {
        let previous = aggregates[i + 1].paper_count;
        trends[i] = Some(Trend::between(previous, aggregates[i].paper_count));
    }
    trends
}

/// First `max_chars` characters plus `...`, and whether anything was cut.
pub fn truncate_title(title: &str, max_chars: usize) -> (String, bool) {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}...", &title[..cut]), true),
        None => (title.to_string(), false),
    }
}

pub fn render_trajectory(trajectory: &FieldPresence<String>) -> String {
    match trajectory {
        FieldPresence::Value(text) if !text.trim().is_empty() => format!(
            "<div class=\"trajectory-text\">{}</div>\n",
            html_escape(text.trim())
        ),
        FieldPresence::Value(_) => format!(
            "<div class=\"placeholder trajectory-generating\"><p>✨ {}</p></div>\n",
            TRAJECTORY_GENERATING
        ),
        FieldPresence::Null | FieldPresence::Absent => format!(
            "<div class=\"placeholder trajectory-unavailable\"><p>⚠️ {}</p></div>\n",
            TRAJECTORY_UNAVAILABLE
        ),
    }
}

/// Quarterly cards, or a placeholder / inline error panel. Never fails.
pub fn render_quarterly(raw: &[Value]) -> String {
    if raw.is_empty() {
        return format!(
            "<div class=\"placeholder quarterly-empty\"><p>📊 {}</p></div>\n",
            NO_QUARTERLY_DATA
        );
    }

    match build_quarterly_cards(raw) {
        Ok(html) => html,
        Err(e) => {
            warn!("Error displaying quarterly data: {}", e);
            format!(
                "<div class=\"panel-error quarterly-error\"><p>❌ {}</p><p class=\"error-detail\">{}</p></div>\n",
                QUARTERLY_ERROR,
                html_escape(&e.to_string())
            )
        }
    }
}

fn build_quarterly_cards(raw: &[Value]) -> TrackerResult<String> {
    let aggregates = raw
        .iter()
        .enumerate()
        .map(|(i, value)| {
            QuarterlyAggregate::from_value(value)
                .map_err(|e| TrackerError::Render(format!("quarterly entry {}: {}", i, e)))
        })
        .collect::<TrackerResult<Vec<_>>>()?;

    let trends = compute_trends(&aggregates);
    Ok(aggregates
        .iter()
        .zip(trends)
        .map(|(aggregate, trend)| quarterly_card(aggregate, trend))
        .collect())
}

fn quarterly_card(aggregate: &QuarterlyAggregate, trend: Option<Trend>) -> String {
    let trend_html = trend
        .map(|t| format!(" <span class=\"trend\">{}</span>", t.label()))
        .unwrap_or_default();

    let mut html = format!(
        "<div class=\"quarterly-card\">\n\
         <div class=\"quarterly-header\">{}</div>\n\
         <div class=\"quarterly-stat\">Papers: <strong>{}</strong>{}</div>\n",
        html_escape(&aggregate.quarter),
        aggregate.paper_count,
        trend_html
    );

    if !aggregate.top_venues.is_empty() {
        let venues: String = aggregate
            .top_venues
            .iter()
            .map(|v| format!("<span>{}</span>", html_escape(v)))
            .collect();
        html.push_str(&format!(
            "<div class=\"quarterly-venues\"><strong>Top venues:</strong> {}</div>\n",
            venues
        ));
    }

    if !aggregate.sample_titles.is_empty() {
        let items: String = aggregate
            .sample_titles
            .iter()
            .take(MAX_SAMPLE_TITLES)
            .map(|title| {
                let (shown, _) = truncate_title(title, SAMPLE_TITLE_CHARS);
                format!(
                    "<li title=\"{}\">{}</li>\n",
                    html_escape(title),
                    html_escape(&shown)
                )
            })
            .collect();
        html.push_str(&format!(
            "<div class=\"quarterly-samples\"><strong>Representative papers:</strong>\n<ul>\n{}</ul></div>\n",
            items
        ));
    }

    html.push_str("</div>\n");
    html
}

/// Two-column analysis container: trajectory on the left, quarters on the right.
pub fn render_analysis(analysis: &TopicAnalysis) -> String {
    format!(
        "<section class=\"results-container\">\n\
         <div class=\"trajectory-panel\"><h2>Research trajectory</h2>\n<div class=\"trajectory-content\">\n{}</div></div>\n\
         <div class=\"quarterly-panel\"><h2>Quarterly overview</h2>\n<div class=\"quarterly-content\">\n{}</div></div>\n\
         </section>\n",
        render_trajectory(&analysis.trajectory_summary),
        render_quarterly(&analysis.quarterly_data)
    )
}
