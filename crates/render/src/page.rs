use tracker_api::{CacheStats, PaperRecord, TopicAnalysis};

use crate::card::render_cards;
use crate::detail::render_detail;
use crate::html_escape;
use crate::panels::render_analysis;
use crate::stats::StatsLine;

/// The modal currently open on the page, if any.
#[derive(Debug, Clone, Copy)]
pub enum ModalView<'a> {
    Detail(&'a PaperRecord),
    CacheStats(&'a CacheStats),
}

/// A borrowed snapshot of everything the page shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageModel<'a> {
    pub query: &'a str,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub stats: Option<&'a StatsLine>,
    /// `None` before the first search and after a clear.
    pub papers: Option<&'a [PaperRecord]>,
    pub analysis: Option<&'a TopicAnalysis>,
    pub modal: Option<ModalView<'a>>,
}

pub fn render_page(model: &PageModel<'_>) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<header class=\"search-bar\"><h1>arXiv Paper Tracker</h1>\n<p class=\"search-query\">{}</p></header>\n",
        html_escape(model.query)
    ));

    if model.loading {
        body.push_str("<div class=\"loading\">Searching...</div>\n");
    }
    if let Some(error) = model.error {
        body.push_str(&format!("<div class=\"error\">{}</div>\n", html_escape(error)));
    }
    if let Some(notice) = model.notice {
        body.push_str(&format!("<div class=\"notice\">{}</div>\n", html_escape(notice)));
    }
    if let Some(stats) = model.stats {
        body.push_str(&format!(
            "<div class=\"stats\" data-count=\"{}\">{}</div>\n",
            stats.count, stats
        ));
    }
    if let Some(papers) = model.papers {
        body.push_str(&render_cards(papers));
    }
    if let Some(analysis) = model.analysis {
        body.push_str(&render_analysis(analysis));
    }
    if let Some(modal) = model.modal {
        body.push_str(&render_modal(modal));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>arXiv Paper Tracker</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        body
    )
}

fn render_modal(modal: ModalView<'_>) -> String {
    let (id, content) = match modal {
        ModalView::Detail(paper) => ("detailModal", render_detail(paper)),
        ModalView::CacheStats(stats) => (
            "statsModal",
            format!(
                "<div class=\"modal-meta\">\n<p><strong>Cached files:</strong> {}</p>\n\
                 <p><strong>Cache size:</strong> {} MB</p>\n</div>\n\
                 <button class=\"btn btn-secondary\" data-action=\"clear-cache\">Clear cache</button>\n",
                stats.file_count, stats.total_size_mb
            ),
        ),
    };

    format!(
        "<div class=\"modal\" id=\"{}\">\n<div class=\"modal-content\">\n\
         <span class=\"close\" data-action=\"close-modal\">&times;</span>\n{}</div>\n</div>\n",
        id, content
    )
}
