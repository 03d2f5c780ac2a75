pub mod controller;
pub mod events;
pub mod state;

pub use controller::Controller;
pub use events::{EventLoop, UiEvent};
pub use state::{Modal, ModalKind, SearchForm, ViewState};
