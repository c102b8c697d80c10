use super::backend::{NeedHit, ProductHit, SavePayload, SiteContact};
use super::draft::{DraftState, Strategy};
use super::line_item::{EntryMode, SiteLineInput};
use super::pl::{PlField, PlYear};
use super::QuoteStatus;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// 未选择站点时的客户名占位
pub const CLIENT_PLACEHOLDER: &str = "Seleccione una sede...";

/// 固定的四步流程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Strategy,
    Sites,
    Services,
    Document,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Strategy => 1,
            Step::Sites => 2,
            Step::Services => 3,
            Step::Document => 4,
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Strategy => Some(Step::Sites),
            Step::Sites => Some(Step::Services),
            Step::Services => Some(Step::Document),
            Step::Document => None,
        }
    }

    pub fn prev(self) -> Option<Step> {
        match self {
            Step::Strategy => None,
            Step::Sites => Some(Step::Strategy),
            Step::Services => Some(Step::Sites),
            Step::Document => Some(Step::Services),
        }
    }
}

/// 报价头部信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteHeader {
    pub record_id: Option<String>,
    pub subject: String,
    pub intro: String,
    pub warranty: String,
    pub payment_notes: String,
    pub folio: String,
    pub client_name: String,
    pub agent_name: String,
    pub created_on: NaiveDate,
    pub approved_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub show_total: bool,
    pub show_taxes: bool,
    pub show_line_items: bool,
    pub show_description: bool,
    pub show_discount_column: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_total: true,
            show_taxes: true,
            show_line_items: true,
            show_description: true,
            show_discount_column: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayToggle {
    Total,
    Taxes,
    LineItems,
    Description,
}

/// 付款方式与工作类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOptions {
    pub transfer: bool,
    pub card: bool,
    pub one_off_job: bool,
    pub product_sale: bool,
    pub maintenance_contract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentToggle {
    Transfer,
    Card,
    OneOffJob,
    ProductSale,
    MaintenanceContract,
}

/// 添加服务弹窗
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceModal {
    pub product: Option<ProductHit>,
    pub description_html: String,
    /// 受影响区域 (保序去重)
    pub zones: IndexSet<String>,
    pub zone_input: String,
    pub convert_zones: bool,
    pub rows: Vec<SiteLineInput>,
    pub site_filter: String,
}

impl ServiceModal {
    /// 按站点名过滤 (不区分大小写)
    pub fn visible_rows(&self) -> Vec<&SiteLineInput> {
        let term = self.site_filter.to_lowercase();
        self.rows
            .iter()
            .filter(|row| term.is_empty() || row.site_label.to_lowercase().contains(&term))
            .collect()
    }
}

/// 损益面板访问控制：仅在后端确认密码后解锁，关闭即重新上锁
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlGate {
    #[default]
    Locked,
    AwaitingPassword,
    Unlocked,
}

impl PlGate {
    pub fn is_unlocked(self) -> bool {
        self == PlGate::Unlocked
    }
}

/// 编辑器完整状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub step: Step,
    pub header: QuoteHeader,
    pub draft: DraftState,
    pub sites: Vec<SiteContact>,
    pub business_lines: IndexSet<String>,
    pub allow_other_lines: bool,
    pub entry_mode: EntryMode,
    pub modal: Option<ServiceModal>,
    pub pl_gate: PlGate,
    pub operating_cost: BigDecimal,
    pub desired_margin: BigDecimal,
    pub display: DisplayOptions,
    pub payment: PaymentOptions,
    pub need_results: Vec<NeedHit>,
    pub product_results: Vec<ProductHit>,
    pub default_tax_rate: BigDecimal,
    /// 行 ID 序号
    pub line_seq: u64,
}

impl EditorState {
    pub fn new(today: NaiveDate, default_tax_rate: BigDecimal) -> Self {
        Self {
            step: Step::Strategy,
            header: QuoteHeader {
                record_id: None,
                subject: String::new(),
                intro: String::new(),
                warranty: String::new(),
                payment_notes: String::new(),
                folio: "Cargando...".to_string(),
                client_name: CLIENT_PLACEHOLDER.to_string(),
                agent_name: String::new(),
                created_on: today,
                approved_on: None,
            },
            draft: DraftState::default(),
            sites: Vec::new(),
            business_lines: IndexSet::new(),
            allow_other_lines: false,
            entry_mode: EntryMode::UnitPrice,
            modal: None,
            pl_gate: PlGate::Locked,
            operating_cost: BigDecimal::from(0),
            desired_margin: BigDecimal::from(35),
            display: DisplayOptions::default(),
            payment: PaymentOptions::default(),
            need_results: Vec::new(),
            product_results: Vec::new(),
            default_tax_rate,
            line_seq: 0,
        }
    }

    /// 当前策略允许选择的站点数
    pub fn max_site_selection(&self) -> usize {
        self.draft
            .strategy
            .map(Strategy::max_site_selection)
            .unwrap_or(1)
    }

    /// 已选站点 (按选择顺序)
    pub fn selected_sites(&self) -> Vec<&SiteContact> {
        self.draft
            .selected_site_ids
            .iter()
            .filter_map(|id| self.sites.iter().find(|s| &s.id == id))
            .collect()
    }
}

/// 弹窗行编辑
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Quantity(String),
    Amount(String),
    Discount(String),
    TaxRate(String),
    ToggleDiscountKind,
    Selected(bool),
}

/// 模板渲染目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateTarget {
    Intro,
    Warranty,
    PaymentNotes,
    ServiceDescription,
}

/// 编辑器动作
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    InitialDataLoaded(super::backend::InitialData),
    SetStrategy(Strategy),
    SearchNeeds(String),
    NeedsFound(Vec<NeedHit>),
    SelectNeed(String),
    SetSubject(String),
    SetIntro(String),
    SetWarranty(String),
    SetPaymentNotes(String),
    SetApprovalDate(Option<NaiveDate>),
    ToggleBusinessLine { value: String, checked: bool },
    SetAllowOtherLines(bool),
    SelectSites(Vec<String>),
    OpenServiceModal,
    CloseServiceModal,
    SearchProducts(String),
    ProductsFound(Vec<ProductHit>),
    PickProduct(String),
    SetEntryMode(EntryMode),
    EditRow { site_id: String, edit: RowEdit },
    SelectAllRows(bool),
    SetSiteFilter(String),
    SetServiceDescription(String),
    ZoneInput(String),
    RemoveZone(String),
    SetConvertZones(bool),
    CommitServiceLines { close: bool },
    AddSeparator(String),
    RemoveLine(String),
    ApplyTemplate { template_id: String, target: TemplateTarget },
    TemplateRendered { target: TemplateTarget, html: String },
    OpenPlPanel,
    SubmitPassword(String),
    PasswordChecked(bool),
    ClosePlPanel,
    EditPl { year: PlYear, field: PlField, raw: String },
    SetOperatingCost(String),
    SetDesiredMargin(String),
    SetDisplay(DisplayToggle, bool),
    ToggleDiscountColumn,
    SetPayment(PaymentToggle, bool),
    Next,
    Back,
    SaveDraft,
    AutoSaved(Option<String>),
    Saved { record_id: Option<String>, status: QuoteStatus },
    BackendFailed { title: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 用户提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// 需要外部协作方执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AutoSave(SavePayload),
    Save(SavePayload),
    CheckPassword(String),
    SearchNeeds(String),
    SearchProducts {
        term: String,
        quote_id: Option<String>,
        business_lines: Vec<String>,
        allow_other_lines: bool,
    },
    RenderTemplate {
        template_id: String,
        quote_id: Option<String>,
        target: TemplateTarget,
    },
    Reload(String),
    Notify(Notice),
    Completed(Option<String>),
    Cancel,
}

impl Effect {
    pub fn notify(level: NoticeLevel, title: &str, message: &str) -> Self {
        Effect::Notify(Notice::new(level, title, message))
    }

    pub fn save_status(&self) -> Option<QuoteStatus> {
        match self {
            Effect::AutoSave(p) | Effect::Save(p) => Some(p.status),
            _ => None,
        }
    }
}

/// 一次状态转换的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: EditorState,
    pub effects: Vec<Effect>,
}
