use crate::error::DraftCodecError;
use crate::models::line_item::default_tax_rate;
use crate::models::{
    BackendLineRecord, DiscountKind, DraftState, PricedLine, QuoteLine, RestoreSource,
    RestoredDraft,
};
use crate::service::pricing::{gross_with_rate, tax_amount};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bigdecimal::{BigDecimal, Zero};

/// 草稿快照编码：JSON → base64 (UTF-8 安全)
pub fn encode(draft: &DraftState) -> Result<String, DraftCodecError> {
    let json = serde_json::to_string(draft)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// 草稿快照解码：base64 → JSON
pub fn decode(blob: &str) -> Result<DraftState, DraftCodecError> {
    let bytes = STANDARD.decode(blob.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// 恢复草稿：优先使用快照，快照损坏或缺失时由原始明细行重建
pub fn restore(
    blob: Option<&str>,
    raw_lines: &[BackendLineRecord],
    technical_sites: Option<&str>,
) -> RestoredDraft {
    if let Some(blob) = blob.filter(|b| !b.trim().is_empty()) {
        match decode(blob) {
            Ok(draft) => {
                tracing::info!(
                    "Draft snapshot restored: {} lines, {} sites",
                    draft.line_items.len(),
                    draft.selected_site_ids.len()
                );
                return RestoredDraft {
                    draft,
                    source: RestoreSource::Snapshot,
                };
            }
            Err(e) => {
                tracing::warn!("快照解析失败，回退到原始明细行: {}", e);
            }
        }
    }

    if raw_lines.is_empty() {
        return RestoredDraft {
            draft: DraftState::default(),
            source: RestoreSource::Empty,
        };
    }

    let draft = DraftState {
        line_items: reconstruct_lines(raw_lines, technical_sites),
        ..DraftState::default()
    };
    RestoredDraft {
        draft,
        source: RestoreSource::BackendLines,
    }
}

/// 由原始明细行重建报价行
pub fn reconstruct_lines(raw_lines: &[BackendLineRecord], technical_sites: Option<&str>) -> Vec<QuoteLine> {
    let sites: Vec<&str> = technical_sites
        .map(|s| s.split(", ").filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let rate = default_tax_rate();

    raw_lines
        .iter()
        .map(|record| {
            let description = record.description.clone().unwrap_or_default();
            let site_label = sites
                .iter()
                .find(|site| description.contains(*site))
                .map(|site| site.to_string())
                .unwrap_or_else(|| "Sede Principal".to_string());

            let discount = record.discount.clone().unwrap_or_else(BigDecimal::zero);
            let discount_kind = if discount > BigDecimal::zero() {
                DiscountKind::Percentage
            } else {
                DiscountKind::Fixed
            };

            let net = match &record.total_price {
                Some(total) if !total.is_zero() => total.clone(),
                _ => &record.unit_price * BigDecimal::from(record.quantity),
            };
            let tax = tax_amount(&net, &rate);
            let gross = gross_with_rate(&net, &rate);

            QuoteLine::Priced(PricedLine {
                id: record.id.clone(),
                product_id: record.pricebook_entry_id.clone(),
                description: record
                    .product_name
                    .clone()
                    .unwrap_or_else(|| "Producto".to_string()),
                technical_detail: description.clone(),
                technical_detail_html: description,
                execution_notes: String::new(),
                create_new_zones: false,
                site_label,
                quantity: record.quantity,
                unit_amount: record.unit_price.clone(),
                discount,
                discount_kind,
                tax_rate: rate.clone(),
                tax_amount: tax,
                net_subtotal: net,
                gross_total: gross,
            })
        })
        .collect()
}
