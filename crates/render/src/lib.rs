//! HTML rendering for search results, paper details and the topic-analysis panels.
//!
//! Every function here is a pure transform from records to markup. Optional
//! fields are expected to be missing; nothing in this crate fails because of
//! an absent field.

pub mod card;
pub mod date;
pub mod detail;
pub mod page;
pub mod panels;
pub mod quality;
pub mod stats;
pub mod text;

pub use card::{render_card, render_cards};
pub use detail::render_detail;
pub use page::{render_page, ModalView, PageModel};
pub use panels::{compute_trends, render_analysis, render_quarterly, render_trajectory, Trend};
pub use quality::{AuthorityTier, QualityIndicator};
pub use stats::StatsLine;
pub use text::html_to_text;

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Treats blank strings the same as a missing value.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
