use crate::models::{
    BackendLineRecord, ContractLine, ContractSections, ContractTotals, DraftState, EntryMode,
    Frequency, Page, PlComparison, PlScenario, PricedLine, QuoteLine, RestoredDraft,
    SiteLineInput,
};
use crate::service::{QuoteService, TotalsSummary};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 统一响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    let response = ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn fail(status: StatusCode, message: String) -> Response {
    let response: ApiResponse<()> = ApiResponse {
        success: false,
        message,
        data: None,
    };
    (status, Json(response)).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLineRequest {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub description_html: String,
    pub row: SiteLineInput,
    #[serde(default)]
    pub entry_mode: EntryMode,
}

#[derive(Debug, Deserialize)]
pub struct LinesRequest {
    pub lines: Vec<QuoteLine>,
}

#[derive(Debug, Deserialize)]
pub struct PlCompareRequest {
    #[serde(default = "PlScenario::year_one")]
    pub pl1: PlScenario,
    #[serde(default = "PlScenario::year_two")]
    pub pl2: PlScenario,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagesRequest {
    pub lines: Vec<QuoteLine>,
    #[serde(default = "first_page_constrained")]
    pub first_page_constrained: bool,
}

fn first_page_constrained() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct DraftEncodeRequest {
    pub draft: DraftState,
}

#[derive(Debug, Serialize)]
pub struct DraftBlob {
    pub blob: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRestoreRequest {
    #[serde(default)]
    pub blob: Option<String>,
    #[serde(default)]
    pub line_items: Vec<BackendLineRecord>,
    #[serde(default)]
    pub technical_sites: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContractLinesRequest {
    pub lines: Vec<ContractLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUrlRequest {
    pub record_id: String,
    pub lines: Vec<ContractLine>,
    #[serde(default)]
    pub sections: ContractSections,
    #[serde(default)]
    pub frequency: Frequency,
}

#[derive(Debug, Serialize)]
pub struct ContractUrl {
    pub url: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单行定价
pub async fn price_line(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<PriceLineRequest>,
) -> Response {
    let line: PricedLine = service.price_line(
        &req.id,
        &req.product_id,
        &req.product_name,
        &req.description_html,
        &req.row,
        req.entry_mode,
    );
    ok(format!("Priced line {}", line.id), line)
}

/// 报价合计
pub async fn quote_totals(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<LinesRequest>,
) -> Response {
    let summary: TotalsSummary = service.totals(&req.lines);
    ok(format!("Totals over {} lines", req.lines.len()), summary)
}

/// 两年损益对比
pub async fn compare_pl(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<PlCompareRequest>,
) -> Response {
    let comparison: PlComparison = service.compare_pl(&req.pl1, &req.pl2);
    ok("P&L projected", comparison)
}

/// 打印分页
pub async fn document_pages(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<PagesRequest>,
) -> Response {
    let pages: Vec<Page> = service.pages(&req.lines, req.first_page_constrained);
    ok(format!("{} pages", pages.len()), pages)
}

/// 草稿快照编码
pub async fn encode_draft(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<DraftEncodeRequest>,
) -> Response {
    match service.encode_draft(&req.draft) {
        Ok(blob) => ok("Draft encoded", DraftBlob { blob }),
        Err(e) => {
            tracing::error!("草稿编码失败: {}", e);
            fail(StatusCode::UNPROCESSABLE_ENTITY, format!("Error: {}", e))
        }
    }
}

/// 草稿恢复 (快照优先，损坏时回退)
pub async fn restore_draft(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<DraftRestoreRequest>,
) -> Response {
    let restored: RestoredDraft = service.restore_draft(
        req.blob.as_deref(),
        &req.line_items,
        req.technical_sites.as_deref(),
    );
    ok(format!("Draft restored from {:?}", restored.source), restored)
}

/// 合同合计
pub async fn contract_totals(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<ContractLinesRequest>,
) -> Response {
    let totals: ContractTotals = service.contract_totals(&req.lines);
    ok("Contract totals", totals)
}

/// 合同文档链接
pub async fn contract_url(
    State(service): State<Arc<QuoteService>>,
    Json(req): Json<ContractUrlRequest>,
) -> Response {
    match service.contract_url(&req.record_id, &req.lines, &req.sections, req.frequency) {
        Ok(url) => ok("Contract url built", ContractUrl { url }),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}
