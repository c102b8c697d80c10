pub mod contract;
pub mod document;
pub mod draft_codec;
pub mod editor;
pub mod history;
pub mod paginator;
pub mod pl_projector;
pub mod pricing;
pub mod quote;
pub mod templating;

pub use contract::ContractDraft;
pub use editor::reduce;
pub use history::EditorHistory;
pub use quote::{QuoteService, TotalsSummary};
