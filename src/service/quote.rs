use crate::config::AppConfig;
use crate::error::{ContractError, DraftCodecError};
use crate::models::{
    BackendLineRecord, ContractLine, ContractSections, ContractTotals, DocumentView, DraftState,
    EditorState, EntryMode, Frequency, Page, PlComparison, PlScenario, PricedLine, QuoteLine,
    QuoteTotals, RestoredDraft, SiteLineInput,
};
use crate::service::contract::{contract_totals, contract_url};
use crate::service::pricing::{self, LineDescriptor};
use crate::service::templating::plain_detail;
use crate::service::{document, draft_codec, paginator, pl_projector};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// 报价计算服务 (无状态，可在请求间共享)
pub struct QuoteService {
    config: AppConfig,
}

/// 报价合计及折扣汇总
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsSummary {
    pub totals: QuoteTotals,
    pub total_discount: BigDecimal,
    pub has_any_discount: bool,
}

impl QuoteService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 新编辑器会话的初始状态
    pub fn new_editor(&self, today: NaiveDate) -> EditorState {
        EditorState::new(today, self.config.default_tax_rate())
    }

    /// 为单个站点行定价
    pub fn price_line(
        &self,
        id: &str,
        product_id: &str,
        product_name: &str,
        description_html: &str,
        row: &SiteLineInput,
        mode: EntryMode,
    ) -> PricedLine {
        let desc = LineDescriptor {
            id: id.to_string(),
            product_id,
            product_name,
            technical_detail: plain_detail(description_html),
            technical_detail_html: description_html,
            execution_notes: String::new(),
            create_new_zones: false,
        };
        pricing::price_line(desc, row, mode)
    }

    pub fn totals(&self, lines: &[QuoteLine]) -> TotalsSummary {
        TotalsSummary {
            totals: pricing::quote_totals(lines, &self.config.default_tax_rate()),
            total_discount: pricing::total_discount(lines),
            has_any_discount: pricing::has_any_discount(lines),
        }
    }

    /// 两年损益对比 (展示精度)
    pub fn compare_pl(&self, year_one: &PlScenario, year_two: &PlScenario) -> PlComparison {
        let comparison = pl_projector::compare(year_one, year_two);
        PlComparison {
            year_one: comparison.year_one.rounded(),
            year_two: comparison.year_two.rounded(),
        }
    }

    pub fn pages(&self, lines: &[QuoteLine], first_page_constrained: bool) -> Vec<Page> {
        let pages = paginator::paginate(lines, &self.config.layout, first_page_constrained);
        tracing::info!("Paginated {} lines into {} pages", lines.len(), pages.len());
        pages
    }

    /// 按配置的页面预算组装打印视图
    pub fn document(&self, state: &EditorState) -> DocumentView {
        document::assemble(state, &self.config.layout)
    }

    pub fn encode_draft(&self, draft: &DraftState) -> Result<String, DraftCodecError> {
        draft_codec::encode(draft)
    }

    pub fn restore_draft(
        &self,
        blob: Option<&str>,
        raw_lines: &[BackendLineRecord],
        technical_sites: Option<&str>,
    ) -> RestoredDraft {
        draft_codec::restore(blob, raw_lines, technical_sites)
    }

    pub fn contract_totals(&self, lines: &[ContractLine]) -> ContractTotals {
        contract_totals(lines)
    }

    pub fn contract_url(
        &self,
        record_id: &str,
        lines: &[ContractLine],
        sections: &ContractSections,
        frequency: Frequency,
    ) -> Result<String, ContractError> {
        contract_url(&self.config.contract.pdf_path, record_id, lines, sections, frequency)
    }
}
