//! View state for one controller session.

use render::{ModalView, PageModel, StatsLine};
use tracker_api::{CacheStats, PaperRecord, SearchResult, TopicAnalysis};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub query: String,
    pub max_results: u32,
    pub ai_summary: bool,
    pub enable_authority: bool,
}

impl SearchForm {
    pub fn new(query: &str, max_results: u32) -> Self {
        Self {
            query: query.to_string(),
            max_results,
            ai_summary: false,
            enable_authority: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Detail,
    CacheStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Detail(PaperRecord),
    CacheStats(CacheStats),
}

impl Modal {
    pub fn kind(&self) -> ModalKind {
        match self {
            Modal::Detail(_) => ModalKind::Detail,
            Modal::CacheStats(_) => ModalKind::CacheStats,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub form: SearchForm,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub stats: Option<StatsLine>,
    pub papers: Option<Vec<PaperRecord>>,
    pub analysis: Option<TopicAnalysis>,
    pub modal: Option<Modal>,
}

impl ViewState {
    pub fn new(form: SearchForm) -> Self {
        Self {
            form,
            loading: false,
            error: None,
            notice: None,
            stats: None,
            papers: None,
            analysis: None,
            modal: None,
        }
    }

    pub fn begin_search(&mut self) {
        self.loading = true;
        self.error = None;
        self.notice = None;
    }

    pub fn end_search(&mut self) {
        self.loading = false;
    }

    /// Stale results stay visible underneath the error.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn show_results(&mut self, result: SearchResult) {
        self.stats = Some(StatsLine {
            count: result.papers.len(),
            from_cache: result.from_cache,
            sort_by: result.sort_by,
        });
        self.papers = Some(result.papers);
        self.analysis = result.analysis;
    }

    pub fn clear(&mut self) {
        self.form.query.clear();
        self.error = None;
        self.notice = None;
        self.stats = None;
        self.papers = None;
        self.analysis = None;
    }

    /// Opening a modal replaces whichever one was open.
    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn click_outside(&mut self, kind: ModalKind) {
        if self.modal.as_ref().map(Modal::kind) == Some(kind) {
            self.modal = None;
        }
    }

    pub fn find_paper(&self, arxiv_id: &str) -> Option<&PaperRecord> {
        self.papers
            .as_deref()
            .and_then(|papers| papers.iter().find(|p| p.arxiv_id == arxiv_id))
    }

    pub fn page_model(&self) -> PageModel<'_> {
        PageModel {
            query: &self.form.query,
            loading: self.loading,
            error: self.error.as_deref(),
            notice: self.notice.as_deref(),
            stats: self.stats.as_ref(),
            papers: self.papers.as_deref(),
            analysis: self.analysis.as_ref(),
            modal: self.modal.as_ref().map(|modal| match modal {
                Modal::Detail(paper) => ModalView::Detail(paper),
                Modal::CacheStats(stats) => ModalView::CacheStats(stats),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: usize) -> SearchResult {
        SearchResult {
            papers: (0..n)
                .map(|i| PaperRecord {
                    arxiv_id: format!("id-{i}"),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_results_are_replaced_wholesale() {
        let mut state = ViewState::new(SearchForm::new("q", 10));
        state.show_results(result(3));
        state.show_results(result(1));
        assert_eq!(state.papers.as_ref().map(Vec::len), Some(1));
        assert_eq!(state.stats.as_ref().map(|s| s.count), Some(1));
    }

    #[test]
    fn test_error_keeps_stale_results() {
        let mut state = ViewState::new(SearchForm::new("q", 10));
        state.show_results(result(2));
        state.begin_search();
        assert!(state.loading);
        state.end_search();
        state.show_error("Search error: boom");
        assert!(!state.loading);
        assert_eq!(state.papers.as_ref().map(Vec::len), Some(2));
        assert!(state.error.is_some());
    }

    #[test]
    fn test_modals_replace_each_other_and_click_outside() {
        let mut state = ViewState::new(SearchForm::new("q", 10));
        state.open_modal(Modal::CacheStats(CacheStats {
            file_count: 1,
            total_size_mb: 0.1,
        }));
        state.open_modal(Modal::Detail(PaperRecord::default()));
        assert_eq!(state.modal.as_ref().map(Modal::kind), Some(ModalKind::Detail));

        state.click_outside(ModalKind::CacheStats);
        assert!(state.modal.is_some());
        state.click_outside(ModalKind::Detail);
        assert!(state.modal.is_none());
    }

    #[test]
    fn test_clear_resets_everything_but_modal_and_options() {
        let mut state = ViewState::new(SearchForm::new("q", 25));
        state.show_results(result(2));
        state.show_error("x");
        state.clear();
        assert_eq!(state.form.query, "");
        assert_eq!(state.form.max_results, 25);
        assert!(state.papers.is_none() && state.stats.is_none() && state.error.is_none());
    }
}
