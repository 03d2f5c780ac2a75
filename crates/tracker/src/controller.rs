use std::collections::HashMap;
use std::sync::Arc;

use common::{Config, KeyValueStore, LastSearch, TrackerError, LAST_SEARCH_KEY};
use tracing::{debug, error, info, warn};
use tracker_api::{PaperApi, PaperRecord, SearchRequest, SearchResult};

use crate::events::UiEvent;
use crate::state::{Modal, ModalKind, SearchForm, ViewState};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search query";

pub struct Controller {
    api: Arc<dyn PaperApi>,
    store: KeyValueStore,
    summary_max_length: u32,
    state: ViewState,
}

impl Controller {
    /// Builds a controller and pre-fills the form from the last saved search.
    pub fn new(api: Arc<dyn PaperApi>, store: KeyValueStore, config: &Config) -> Self {
        let mut controller = Self {
            api,
            store,
            summary_max_length: config.search.summary_max_length,
            state: ViewState::new(SearchForm::new("", config.search.max_results)),
        };
        controller.restore();
        controller
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    fn restore(&mut self) {
        match self.store.get::<LastSearch>(LAST_SEARCH_KEY) {
            Ok(Some(last)) => {
                debug!("Restoring last search {:?}", last.query);
                self.state.form = SearchForm {
                    query: last.query,
                    max_results: last.max_results,
                    ai_summary: last.ai_summary,
                    enable_authority: last.enable_authority.unwrap_or(false),
                };
            }
            Ok(None) => {}
            Err(e) => warn!("Error loading cached search: {}", e),
        }
    }

    pub async fn dispatch(&mut self, event: UiEvent) {
        debug!(event = event.name(), "dispatching ui event");
        match event {
            UiEvent::Search(form) => self.handle_search(form).await,
            UiEvent::Clear => self.handle_clear(),
            UiEvent::OpenDetail { arxiv_id } => self.handle_open_detail(&arxiv_id),
            UiEvent::ShowPaper { arxiv_id } => self.handle_show_paper(&arxiv_id).await,
            UiEvent::ShowCacheStats => self.handle_show_cache_stats().await,
            UiEvent::ClearCache => self.handle_clear_cache().await,
            UiEvent::CloseModal => self.state.close_modal(),
            UiEvent::ClickOutside(kind) => self.state.click_outside(kind),
        }
    }

    async fn handle_search(&mut self, form: SearchForm) {
        let query = form.query.trim().to_string();
        self.state.form = form;

        if query.is_empty() {
            let err = TrackerError::Validation(EMPTY_QUERY_MESSAGE.to_string());
            warn!("Rejected search: {}", err);
            self.state.show_error(err.to_string());
            return;
        }

        let request = SearchRequest::new(
            &query,
            self.state.form.max_results,
            self.state.form.enable_authority,
        );

        self.state.begin_search();
        let outcome = self.api.search(&request).await;
        self.state.end_search();

        let mut result = match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("Search error: {}", e);
                self.state.show_error(format!("Search error: {}", e));
                return;
            }
        };

        self.save_last_search(&query);

        if self.state.form.ai_summary && !result.papers.is_empty() {
            let summaries = self.fetch_ai_summaries(&result.papers).await;
            merge_summaries(&mut result, &summaries);
        }

        info!("Rendering {} papers for {:?}", result.papers.len(), query);
        self.state.show_results(result);
    }

    /// Best effort: any failure means no AI summaries, never an error.
    async fn fetch_ai_summaries(&self, papers: &[PaperRecord]) -> HashMap<String, String> {
        match self.api.summarize(papers, self.summary_max_length).await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!("AI summarization error: {}", e);
                HashMap::new()
            }
        }
    }

    fn save_last_search(&self, query: &str) {
        let form = &self.state.form;
        let record = LastSearch::new(
            query,
            form.max_results,
            form.ai_summary,
            Some(form.enable_authority),
        );
        if let Err(e) = self.store.put(LAST_SEARCH_KEY, &record) {
            warn!("Failed to save last search: {}", e);
        }
    }

    fn handle_clear(&mut self) {
        self.state.clear();
        if let Err(e) = self.store.remove(LAST_SEARCH_KEY) {
            warn!("Failed to remove last search: {}", e);
        }
    }

    fn handle_open_detail(&mut self, arxiv_id: &str) {
        match self.state.find_paper(arxiv_id).cloned() {
            Some(paper) => self.state.open_modal(Modal::Detail(paper)),
            None => warn!("No paper {} in the current results", arxiv_id),
        }
    }

    async fn handle_show_paper(&mut self, arxiv_id: &str) {
        match self.api.get_paper(arxiv_id).await {
            Ok(paper) => self.state.open_modal(Modal::Detail(paper)),
            Err(e) => {
                error!("Paper lookup error: {}", e);
                self.state.show_error(format!("Failed to load paper: {}", e));
            }
        }
    }

    async fn handle_show_cache_stats(&mut self) {
        match self.api.cache_stats().await {
            Ok(stats) => self.state.open_modal(Modal::CacheStats(stats)),
            Err(e) => {
                warn!("Cache stats error: {}", e);
                self.state.show_error("Failed to fetch cache statistics");
            }
        }
    }

    async fn handle_clear_cache(&mut self) {
        match self.api.clear_cache().await {
            Ok(()) => {
                self.state.show_notice("Cache cleared");
                self.state.click_outside(ModalKind::CacheStats);
            }
            Err(e) => {
                warn!("Cache clear error: {}", e);
                self.state.show_error("Failed to clear cache");
            }
        }
    }
}

fn merge_summaries(result: &mut SearchResult, summaries: &HashMap<String, String>) {
    for paper in &mut result.papers {
        paper.ai_summary = summaries.get(&paper.arxiv_id).cloned();
    }
}
