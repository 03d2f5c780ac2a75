use tracker_api::{FieldPresence, PaperRecord};

use crate::card::NO_SUMMARY;
use crate::date::format_published;
use crate::{html_escape, non_blank};

pub const UNKNOWN_AUTHORS: &str = "Unknown authors";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Full single-paper view. Each optional section is omitted when its data is missing.
pub fn render_detail(paper: &PaperRecord) -> String {
    let authors = paper
        .authors
        .as_deref()
        .map(|names| {
            names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHORS.to_string());
    let category = non_blank(paper.categories.as_deref()).unwrap_or(UNCATEGORIZED);
    let summary = non_blank(Some(paper.summary.as_str())).unwrap_or(NO_SUMMARY);

    let mut html = format!(
        "<section class=\"paper-detail\" data-arxiv-id=\"{id}\">\n\
         <h2 class=\"detail-title\">{title}</h2>\n\
         <dl class=\"detail-meta\">\n\
         <dt>Authors</dt><dd class=\"detail-authors\">{authors}</dd>\n\
         <dt>Published</dt><dd class=\"detail-date\">{date}</dd>\n\
         <dt>Category</dt><dd class=\"detail-category\">{category}</dd>\n\
         </dl>\n\
         <div class=\"detail-summary\"><h3>Abstract</h3>\n<p>{summary}</p></div>\n",
        id = html_escape(&paper.arxiv_id),
        title = html_escape(&paper.title),
        authors = html_escape(&authors),
        date = format_published(&paper.published),
        category = html_escape(category),
        summary = html_escape(summary),
    );

    if let Some(section) = authority_section(paper) {
        html.push_str(&section);
    } else if let Some(section) = publication_section(paper) {
        html.push_str(&section);
    }

    if let Some(ai_summary) = non_blank(paper.ai_summary.as_deref()) {
        html.push_str(&format!(
            "<div class=\"detail-section ai-summary-section\"><h3>AI summary</h3>\n<p class=\"detail-ai-summary\">{}</p></div>\n",
            html_escape(ai_summary)
        ));
    }

    html.push_str(&format!(
        "<div class=\"detail-links\">\
         <a class=\"detail-arxiv-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">arXiv</a> \
         <a class=\"detail-pdf-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">PDF</a>\
         </div>\n</section>\n",
        html_escape(&paper.url),
        html_escape(&paper.pdf_url)
    ));
    html
}

fn authority_section(paper: &PaperRecord) -> Option<String> {
    let score = paper.authority_score?;
    let level = non_blank(paper.level.as_deref()).unwrap_or("Unrated");
    let citations = paper
        .citation_count
        .as_value()
        .map(u64::to_string)
        .unwrap_or_else(|| "Unknown".to_string());
    let reasons = if paper.reasons.is_empty() {
        "None".to_string()
    } else {
        paper.reasons.join("; ")
    };

    Some(format!(
        "<div class=\"detail-section authority-section\"><h3>Authority</h3>\n<dl>\n\
         <dt>Score</dt><dd class=\"detail-authority-score\">{}/100</dd>\n\
         <dt>Level</dt><dd class=\"detail-authority-level\">{}</dd>\n\
         <dt>Citations</dt><dd class=\"detail-citations\">{}</dd>\n\
         <dt>Reasons</dt><dd class=\"detail-authority-reasons\">{}</dd>\n\
         </dl></div>\n",
        score,
        html_escape(level),
        citations,
        html_escape(&reasons)
    ))
}

fn publication_section(paper: &PaperRecord) -> Option<String> {
    let venue = non_blank(paper.publication_venue.as_deref())?;
    let grade = non_blank(paper.ccf_grade.as_deref()).unwrap_or("Unknown");
    let citations = match &paper.citation_count {
        FieldPresence::Value(n) => format!(
            "<dt>Citations</dt><dd class=\"detail-citation-count\">{} times</dd>\n",
            n
        ),
        FieldPresence::Null => {
            "<dt>Citations</dt><dd class=\"detail-citation-count\">Unknown</dd>\n".to_string()
        }
        FieldPresence::Absent => String::new(),
    };
    let venue_type = non_blank(paper.publication_type.as_deref())
        .map(|t| {
            format!(
                "<dt>Type</dt><dd class=\"detail-publication-type\">{}</dd>\n",
                html_escape(t)
            )
        })
        .unwrap_or_default();

    Some(format!(
        "<div class=\"detail-section publication-section\"><h3>Publication</h3>\n<dl>\n\
         <dt>Venue</dt><dd class=\"detail-publication-venue\">{}</dd>\n\
         {}<dt>CCF grade</dt><dd class=\"detail-ccf-grade\">{}</dd>\n\
         {}</dl></div>\n",
        html_escape(venue),
        venue_type,
        html_escape(grade),
        citations
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn texts(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    fn paper() -> PaperRecord {
        PaperRecord {
            arxiv_id: "2402.00042".into(),
            title: "Scaling Laws".into(),
            summary: "Bigger is better, mostly.".into(),
            published: "2024-02-01T00:00:00Z".into(),
            authors: Some(vec!["Ada Lovelace".into(), "Alan Turing".into()]),
            url: "https://arxiv.org/abs/2402.00042".into(),
            pdf_url: "https://arxiv.org/pdf/2402.00042.pdf".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_detail_core_fields() {
        let html = render_detail(&paper());
        assert_eq!(texts(&html, ".detail-authors"), vec!["Ada Lovelace, Alan Turing"]);
        assert_eq!(texts(&html, ".detail-date"), vec!["2024/2/1"]);
        assert_eq!(texts(&html, ".detail-category"), vec![UNCATEGORIZED]);
        assert_eq!(texts(&html, ".detail-links a").len(), 2);
    }

    #[test]
    fn test_detail_author_fallbacks() {
        let mut p = paper();
        p.authors = Some(vec![]);
        assert_eq!(texts(&render_detail(&p), ".detail-authors"), vec![UNKNOWN_AUTHORS]);
        p.authors = None;
        assert_eq!(texts(&render_detail(&p), ".detail-authors"), vec![UNKNOWN_AUTHORS]);
    }

    #[test]
    fn test_optional_sections_hidden_when_absent() {
        let html = render_detail(&paper());
        assert!(texts(&html, ".authority-section").is_empty());
        assert!(texts(&html, ".publication-section").is_empty());
        assert!(texts(&html, ".ai-summary-section").is_empty());
    }

    #[test]
    fn test_ai_summary_section_shown_independently() {
        let mut p = paper();
        p.ai_summary = Some("A short take.".into());
        let html = render_detail(&p);
        assert_eq!(texts(&html, ".detail-ai-summary"), vec!["A short take."]);
        assert!(texts(&html, ".publication-section").is_empty());

        p.ai_summary = Some("   ".into());
        assert!(texts(&render_detail(&p), ".ai-summary-section").is_empty());
    }

    #[test]
    fn test_authority_section() {
        let mut p = paper();
        p.authority_score = Some(91.0);
        p.reasons = vec!["Top venue".into(), "Highly cited".into()];
        p.citation_count = FieldPresence::Value(150);
        p.publication_venue = Some("NeurIPS".into());

        let html = render_detail(&p);
        assert_eq!(texts(&html, ".detail-authority-score"), vec!["91/100"]);
        assert_eq!(texts(&html, ".detail-authority-level"), vec!["Unrated"]);
        assert_eq!(texts(&html, ".detail-citations"), vec!["150"]);
        assert_eq!(texts(&html, ".detail-authority-reasons"), vec!["Top venue; Highly cited"]);
        assert!(texts(&html, ".publication-section").is_empty());

        p.citation_count = FieldPresence::Null;
        assert_eq!(texts(&render_detail(&p), ".detail-citations"), vec!["Unknown"]);
    }

    #[test]
    fn test_publication_section_citation_states() {
        let mut p = paper();
        p.publication_venue = Some("ICLR".into());

        p.citation_count = FieldPresence::Value(9);
        let html = render_detail(&p);
        assert_eq!(texts(&html, ".detail-publication-venue"), vec!["ICLR"]);
        assert_eq!(texts(&html, ".detail-ccf-grade"), vec!["Unknown"]);
        assert_eq!(texts(&html, ".detail-citation-count"), vec!["9 times"]);

        p.citation_count = FieldPresence::Null;
        assert_eq!(texts(&render_detail(&p), ".detail-citation-count"), vec!["Unknown"]);

        p.citation_count = FieldPresence::Absent;
        assert!(texts(&render_detail(&p), ".detail-citation-count").is_empty());
    }

    #[test]
    fn test_publication_type_shown_when_present() {
        let mut p = paper();
        p.publication_venue = Some("TPAMI".into());
        assert!(texts(&render_detail(&p), ".detail-publication-type").is_empty());

        p.publication_type = Some("journal".into());
        assert_eq!(texts(&render_detail(&p), ".detail-publication-type"), vec!["journal"]);

        p.publication_type = Some("  ".into());
        assert!(texts(&render_detail(&p), ".detail-publication-type").is_empty());
    }
}
