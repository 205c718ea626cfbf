pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod orchestrator;
pub mod query;

pub use config::{ApiConfig, AppConfig, SearchConfig};
pub use debounce::Debouncer;
pub use error::FetchError;
pub use fetch::ArticleClient;
pub use filter::{end_of_day, start_of_day, DateField, FilterRecord, FilterStore, TextField};
pub use models::{Article, ArticleListResponse};
pub use orchestrator::shared_fetch_state;
pub use orchestrator::{spawn_searcher, SearchHandle, SearchOrchestrator};
pub use orchestrator::{ErrorInfo, FetchState, SharedFetchState};
pub use query::{serialize_filters, QueryParams, ARTICLES_PATH};
