use std::sync::Arc;
use tech_quote_rust::{api, AppConfig, QuoteService};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置 (默认值 + TECH_QUOTE__* 环境变量)
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let service = Arc::new(QuoteService::new(config));
    let app = api::router(service);

    // 启动服务器
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/pricing/line     - 单行定价");
    info!("  POST /api/quote/totals     - 报价合计");
    info!("  POST /api/pl/compare       - 两年损益对比");
    info!("  POST /api/document/pages   - 打印分页");
    info!("  POST /api/draft/encode     - 草稿快照编码");
    info!("  POST /api/draft/restore    - 草稿恢复");
    info!("  POST /api/contract/totals  - 合同合计");
    info!("  POST /api/contract/url     - 合同文档链接");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
