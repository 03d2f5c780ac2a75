use tracker_api::PaperRecord;

use crate::date::format_published;
use crate::quality::QualityIndicator;
use crate::{html_escape, non_blank};

pub const NO_SUMMARY: &str = "No abstract available";
pub const NO_RESULTS: &str = "No matching papers found";

pub fn render_card(paper: &PaperRecord) -> String {
    let summary = non_blank(Some(paper.summary.as_str())).unwrap_or(NO_SUMMARY);
    let category = non_blank(paper.categories.as_deref())
        .map(|c| format!("<span class=\"paper-category\">{}</span>\n", html_escape(c)))
        .unwrap_or_default();

    format!(
        "<article class=\"paper-card\" data-arxiv-id=\"{id}\">\n\
         <header class=\"paper-card-header\">\n\
         <div class=\"paper-id\">{id}</div>\n\
         <h3 class=\"paper-title\">{title}</h3>\n\
         <div class=\"paper-meta\"><strong>Published:</strong> {date}</div>\n\
         {quality}{category}\
         </header>\n\
         <p class=\"paper-summary\">{summary}</p>\n\
         <div class=\"paper-actions\">\
         <a class=\"action-view\" href=\"{url}\" target=\"_blank\" rel=\"noopener\">View</a> \
         <a class=\"action-pdf\" href=\"{pdf}\" target=\"_blank\" rel=\"noopener\">PDF</a>\
         </div>\n\
         </article>\n",
        id = html_escape(&paper.arxiv_id),
        title = html_escape(&paper.title),
        date = format_published(&paper.published),
        quality = QualityIndicator::for_paper(paper).to_html(),
        category = category,
        summary = html_escape(summary),
        url = html_escape(&paper.url),
        pdf = html_escape(&paper.pdf_url),
    )
}

/// The result grid. An empty list renders a single "no results" message.
pub fn render_cards(papers: &[PaperRecord]) -> String {
    if papers.is_empty() {
        return format!("<p class=\"no-results\">{}</p>\n", NO_RESULTS);
    }

    let cards: String = papers.iter().map(render_card).collect();
    format!("<div class=\"results\">\n{}</div>\n", cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};
    use tracker_api::FieldPresence;

    fn select_text(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    fn paper() -> PaperRecord {
        PaperRecord {
            arxiv_id: "2401.01234".into(),
            title: "Attention <Is> All You Need".into(),
            summary: "We propose & evaluate.".into(),
            published: "2024-01-15T10:00:00Z".into(),
            categories: Some("cs.CL".into()),
            url: "https://arxiv.org/abs/2401.01234".into(),
            pdf_url: "https://arxiv.org/pdf/2401.01234.pdf".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_card_always_renders_core_fields() {
        let html = render_card(&paper());
        assert!(html.contains("Attention &lt;Is&gt; All You Need"));
        assert!(html.contains("We propose &amp; evaluate."));
        assert_eq!(select_text(&html, ".paper-id"), vec!["2401.01234"]);
        assert_eq!(select_text(&html, ".paper-category"), vec!["cs.CL"]);
        assert!(html.contains("2024/1/15"));
        assert!(html.contains("href=\"https://arxiv.org/pdf/2401.01234.pdf\""));
        assert_eq!(select_text(&html, ".paper-actions a").len(), 2);
    }

    #[test]
    fn test_card_without_quality_fields_has_no_quality_block() {
        let html = render_card(&paper());
        assert!(select_text(&html, ".quality").is_empty());
    }

    #[test]
    fn test_card_fallbacks_for_sparse_record() {
        let sparse = PaperRecord {
            arxiv_id: "x".into(),
            categories: Some(String::new()),
            ..Default::default()
        };
        let html = render_card(&sparse);
        assert_eq!(select_text(&html, ".paper-summary"), vec![NO_SUMMARY]);
        assert!(select_text(&html, ".paper-category").is_empty());
        assert!(html.contains("Unknown date"));
    }

    #[test]
    fn test_card_shows_exactly_one_indicator() {
        let mut p = paper();
        p.publication_venue = Some("ACL".into());
        p.citation_count = FieldPresence::Value(3);
        let html = render_card(&p);
        assert_eq!(select_text(&html, ".quality").len(), 1);
        assert_eq!(select_text(&html, ".publication-badge").len(), 1);

        p.authority_score = Some(88.0);
        let html = render_card(&p);
        assert_eq!(select_text(&html, ".quality").len(), 1);
        assert_eq!(select_text(&html, ".authority-badge").len(), 1);
    }

    #[test]
    fn test_ai_summary_never_on_card() {
        let mut p = paper();
        p.ai_summary = Some("Machine written digest".into());
        assert!(!render_card(&p).contains("Machine written digest"));
    }

    #[test]
    fn test_cards_keep_order_and_empty_message() {
        let mut second = paper();
        second.arxiv_id = "2401.09999".into();
        let html = render_cards(&[paper(), second]);
        assert_eq!(select_text(&html, ".paper-id"), vec!["2401.01234", "2401.09999"]);

        assert_eq!(select_text(&render_cards(&[]), ".no-results"), vec![NO_RESULTS]);
    }
}
