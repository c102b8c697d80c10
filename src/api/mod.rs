pub mod handlers;

pub use handlers::*;

use crate::service::QuoteService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(service: Arc<QuoteService>) -> Router {
    let api_routes = Router::new()
        .route("/api/pricing/line", post(price_line))
        .route("/api/quote/totals", post(quote_totals))
        .route("/api/pl/compare", post(compare_pl))
        .route("/api/document/pages", post(document_pages))
        .route("/api/draft/encode", post(encode_draft))
        .route("/api/draft/restore", post(restore_draft))
        .route("/api/contract/totals", post(contract_totals))
        .route("/api/contract/url", post(contract_url))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes)
}
