use tracker_api::{FieldPresence, PaperRecord};

use crate::{html_escape, non_blank};

pub const DEFAULT_LEVEL_MARKER: &str = "○";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityTier {
    Highest,
    High,
    Medium,
    Low,
}

impl AuthorityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            AuthorityTier::Highest
        } else if score >= 70.0 {
            AuthorityTier::High
        } else if score >= 50.0 {
            AuthorityTier::Medium
        } else {
            AuthorityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityTier::Highest => "highest",
            AuthorityTier::High => "high",
            AuthorityTier::Medium => "medium",
            AuthorityTier::Low => "low",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AuthorityTier::Highest => "red",
            AuthorityTier::High => "orange",
            AuthorityTier::Medium => "yellow",
            AuthorityTier::Low => "gray",
        }
    }
}

/// The single quality block a card shows, picked by which fields are present.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityIndicator<'a> {
    Authority {
        score: f64,
        tier: AuthorityTier,
        level: &'a str,
        badges: &'a [String],
    },
    Publication {
        venue: &'a str,
        ccf_grade: Option<&'a str>,
        citations: &'a FieldPresence<u64>,
    },
    None,
}

impl<'a> QualityIndicator<'a> {
    pub fn for_paper(paper: &'a PaperRecord) -> Self {
        if let Some(score) = paper.authority_score {
            return QualityIndicator::Authority {
                score,
                tier: AuthorityTier::from_score(score),
                level: non_blank(paper.level.as_deref()).unwrap_or(DEFAULT_LEVEL_MARKER),
                badges: &paper.badges,
            };
        }

        match non_blank(paper.publication_venue.as_deref()) {
            Some(venue) => QualityIndicator::Publication {
                venue,
                ccf_grade: non_blank(paper.ccf_grade.as_deref()),
                citations: &paper.citation_count,
            },
            None => QualityIndicator::None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            QualityIndicator::Authority {
                score,
                tier,
                level,
                badges,
            } => {
                let mut html = format!(
                    "<div class=\"quality authority-badge tier-{}\"><span class=\"authority-score\" style=\"color: {};\">{} {} pts</span></div>\n",
                    tier.as_str(),
                    tier.color(),
                    html_escape(level),
                    score
                );
                if !badges.is_empty() {
                    let spans: String = badges
                        .iter()
                        .map(|badge| {
                            format!(
                                "<span class=\"badge badge-{}\">{}</span>",
                                badge_class(badge),
                                html_escape(badge)
                            )
                        })
                        .collect();
                    html.push_str(&format!("<div class=\"badges-container\">{}</div>\n", spans));
                }
                html
            }
            QualityIndicator::Publication {
                venue,
                ccf_grade,
                citations,
            } => {
                let grade = ccf_grade
                    .map(|g| format!(" [CCF {}]", html_escape(g)))
                    .unwrap_or_default();
                let citation = match citations {
                    FieldPresence::Value(n) => {
                        format!(" <span class=\"citation-count\">{} citations</span>", n)
                    }
                    FieldPresence::Null => {
                        " <span class=\"citation-count citation-unknown\">citations unknown</span>"
                            .to_string()
                    }
                    FieldPresence::Absent => String::new(),
                };
                format!(
                    "<div class=\"quality publication-badge\">{}{}{}</div>\n",
                    html_escape(venue),
                    grade,
                    citation
                )
            }
            QualityIndicator::None => String::new(),
        }
    }
}

/// Lowercased badge name with anything outside `[a-z0-9]` folded to `-`.
pub fn badge_class(badge: &str) -> String {
    badge
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
