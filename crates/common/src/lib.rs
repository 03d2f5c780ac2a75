pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{TrackerError, TrackerResult};
pub use store::{KeyValueStore, LastSearch, LAST_SEARCH_KEY};
