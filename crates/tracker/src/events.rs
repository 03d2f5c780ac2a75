use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::controller::Controller;
use crate::state::{ModalKind, SearchForm};

/// Everything a user can do on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Search(SearchForm),
    Clear,
    OpenDetail { arxiv_id: String },
    ShowPaper { arxiv_id: String },
    ShowCacheStats,
    ClearCache,
    CloseModal,
    ClickOutside(ModalKind),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Search(_) => "search",
            UiEvent::Clear => "clear",
            UiEvent::OpenDetail { .. } => "open_detail",
            UiEvent::ShowPaper { .. } => "show_paper",
            UiEvent::ShowCacheStats => "show_cache_stats",
            UiEvent::ClearCache => "clear_cache",
            UiEvent::CloseModal => "close_modal",
            UiEvent::ClickOutside(_) => "click_outside",
        }
    }
}

/// Serializes events onto one controller. A search submitted while another
/// is in flight waits in the queue, so results always land in submit order.
pub struct EventLoop {
    controller: Controller,
    rx: UnboundedReceiver<UiEvent>,
}

impl EventLoop {
    pub fn new(controller: Controller) -> (Self, UnboundedSender<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { controller, rx }, tx)
    }

    /// Runs until every sender is dropped, then hands the controller back.
    pub async fn run(mut self) -> Controller {
        let mut handled = 0usize;
        while let Some(event) = self.rx.recv().await {
            debug!("Queued event {} received", event.name());
            self.controller.dispatch(event).await;
            handled += 1;
        }
        info!("Event loop finished after {} events", handled);
        self.controller
    }
}
