pub mod amount;
pub mod backend;
pub mod contract;
pub mod draft;
pub mod editor;
pub mod line_item;
pub mod page;
pub mod pl;

pub use backend::{
    BackendLineRecord, InitialData, NeedHit, ProductHit, QuoteRecord, QuoteStatus, SavePayload,
    SiteContact,
};
pub use contract::{ContractLine, ContractSections, ContractTotals, Frequency};
pub use draft::{DraftState, RestoreSource, RestoredDraft, Strategy};
pub use editor::{
    DisplayOptions, DisplayToggle, EditorAction, EditorState, Effect, Notice, NoticeLevel,
    PaymentOptions, PaymentToggle, PlGate, QuoteHeader, RowEdit, ServiceModal, Step,
    TemplateTarget, Transition, CLIENT_PLACEHOLDER,
};
pub use line_item::{
    DiscountKind, EntryMode, PricedLine, QuoteLine, QuoteTotals, SeparatorLine, SiteLineInput,
};
pub use page::{DocumentView, Page, PageBudget};
pub use pl::{MarginBand, PlComparison, PlField, PlResult, PlScenario, PlYear};
