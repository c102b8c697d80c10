pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{ContractError, DraftCodecError};
pub use service::{EditorHistory, QuoteService};
