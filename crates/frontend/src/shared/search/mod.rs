pub mod orchestrator;
pub mod search_bar;
pub mod url_params;

pub use orchestrator::{RemoteSearchFn, RemoteSearchFuture, SearchOptions, SearchOrchestrator};
pub use search_bar::{SearchBar, SearchField};
pub use url_params::UrlParamsSync;
