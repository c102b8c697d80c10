//! 报价编辑器状态机：纯函数 reduce(state, action) -> (state, effects)
//!
//! 所有后端交互 (保存、搜索、密码校验、模板渲染) 以 Effect 形式返回，
//! 由调用方执行后再以 Action 回送结果。

use crate::error::DraftCodecError;
use crate::models::amount::{parse_decimal, parse_quantity};
use crate::models::{
    DisplayToggle, EditorAction, EditorState, Effect, MarginBand, NoticeLevel, PaymentToggle,
    PlComparison, PlGate, PlYear, QuoteLine, QuoteStatus, QuoteTotals, RestoreSource, RowEdit,
    SavePayload, SeparatorLine, ServiceModal, SiteLineInput, Step, TemplateTarget, Transition,
    CLIENT_PLACEHOLDER,
};
use crate::service::draft_codec;
use crate::service::pl_projector;
use crate::service::pricing::{self, LineDescriptor};
use crate::service::templating::{self, BLANK};
use bigdecimal::{BigDecimal, Zero};

/// 搜索关键字最小长度
pub const MIN_SEARCH_CHARS: usize = 3;

const DEFAULT_SITE_ID: &str = "temp-1";
const DEFAULT_SITE_LABEL: &str = "Sede Principal (Default)";
pub const MAIN_SITE: &str = "Sede Principal";

/// 应用一个动作，返回新状态和待执行的副作用
pub fn reduce(state: &EditorState, action: EditorAction) -> Transition {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        EditorAction::InitialDataLoaded(data) => load_initial_data(&mut next, data),

        EditorAction::SetStrategy(strategy) => {
            next.draft.strategy = Some(strategy);
            let limit = strategy.max_site_selection();
            if next.draft.selected_site_ids.len() > limit {
                next.draft.selected_site_ids.truncate(limit);
            }
            refresh_subject(&mut next);
        }

        EditorAction::SearchNeeds(term) => {
            if term.chars().count() >= MIN_SEARCH_CHARS {
                effects.push(Effect::SearchNeeds(term));
            } else {
                next.need_results.clear();
            }
        }
        EditorAction::NeedsFound(hits) => next.need_results = hits,
        EditorAction::SelectNeed(id) => {
            if let Some(hit) = next.need_results.iter().find(|h| h.id == id).cloned() {
                next.draft.need_id = hit.id;
                next.draft.need_name = hit.name;
                next.need_results.clear();
                refresh_subject(&mut next);
            }
        }

        EditorAction::SetSubject(subject) => next.header.subject = subject,
        EditorAction::SetIntro(text) => next.header.intro = text,
        EditorAction::SetWarranty(text) => next.header.warranty = text,
        EditorAction::SetPaymentNotes(text) => next.header.payment_notes = text,
        EditorAction::SetApprovalDate(date) => next.header.approved_on = date,

        EditorAction::ToggleBusinessLine { value, checked } => {
            if checked {
                next.business_lines.insert(value);
            } else {
                next.business_lines.shift_remove(&value);
            }
        }
        EditorAction::SetAllowOtherLines(allow) => next.allow_other_lines = allow,

        EditorAction::SelectSites(ids) => select_sites(&mut next, ids),

        EditorAction::OpenServiceModal => next.modal = Some(fresh_modal(&next)),
        EditorAction::CloseServiceModal => {
            next.modal = None;
            next.product_results.clear();
        }

        EditorAction::SearchProducts(term) => {
            if term.chars().count() >= MIN_SEARCH_CHARS {
                effects.push(Effect::SearchProducts {
                    term,
                    quote_id: next.header.record_id.clone(),
                    business_lines: next.business_lines.iter().cloned().collect(),
                    allow_other_lines: next.allow_other_lines,
                });
            } else {
                next.product_results.clear();
            }
        }
        EditorAction::ProductsFound(hits) => next.product_results = hits,
        EditorAction::PickProduct(id) => pick_product(&mut next, &id),

        EditorAction::SetEntryMode(mode) => {
            next.entry_mode = mode;
            if let Some(modal) = next.modal.as_mut() {
                modal.rows = pricing::recalculate_rows(&modal.rows, mode);
            }
        }
        EditorAction::EditRow { site_id, edit } => {
            let mode = next.entry_mode;
            if let Some(row) = next
                .modal
                .as_mut()
                .and_then(|m| m.rows.iter_mut().find(|r| r.site_id == site_id))
            {
                apply_row_edit(row, edit);
                *row = pricing::recalculate_row(row, mode);
            }
        }
        EditorAction::SelectAllRows(selected) => {
            if let Some(modal) = next.modal.as_mut() {
                modal.rows.iter_mut().for_each(|r| r.selected = selected);
            }
        }
        EditorAction::SetSiteFilter(filter) => {
            if let Some(modal) = next.modal.as_mut() {
                modal.site_filter = filter;
            }
        }
        EditorAction::SetServiceDescription(html) => {
            if let Some(modal) = next.modal.as_mut() {
                modal.description_html = html;
            }
        }
        EditorAction::ZoneInput(value) => {
            if let Some(modal) = next.modal.as_mut() {
                apply_zone_input(modal, value);
            }
        }
        EditorAction::RemoveZone(zone) => {
            if let Some(modal) = next.modal.as_mut() {
                modal.zones.shift_remove(&zone);
            }
        }
        EditorAction::SetConvertZones(convert) => {
            if let Some(modal) = next.modal.as_mut() {
                modal.convert_zones = convert;
            }
        }

        EditorAction::CommitServiceLines { close } => commit_service_lines(&mut next, close, &mut effects),

        EditorAction::AddSeparator(label) => {
            let label = label.trim();
            if !label.is_empty() {
                next.line_seq += 1;
                next.draft.line_items.push(QuoteLine::Separator(SeparatorLine {
                    id: format!("sep-{}", next.line_seq),
                    label: label.to_string(),
                }));
            }
        }
        EditorAction::RemoveLine(id) => next.draft.line_items.retain(|line| line.id() != id),

        EditorAction::ApplyTemplate { template_id, target } => {
            if !template_id.is_empty() {
                effects.push(Effect::RenderTemplate {
                    template_id,
                    quote_id: next.header.record_id.clone(),
                    target,
                });
            }
        }
        EditorAction::TemplateRendered { target, html } => match target {
            TemplateTarget::Intro => next.header.intro = html,
            TemplateTarget::Warranty => next.header.warranty = html,
            TemplateTarget::PaymentNotes => next.header.payment_notes = html,
            TemplateTarget::ServiceDescription => {
                if let Some(modal) = next.modal.as_mut() {
                    modal.description_html = html;
                }
            }
        },

        EditorAction::OpenPlPanel => {
            if !next.pl_gate.is_unlocked() {
                next.pl_gate = PlGate::AwaitingPassword;
            }
        }
        EditorAction::SubmitPassword(attempt) => {
            if next.pl_gate == PlGate::AwaitingPassword {
                effects.push(Effect::CheckPassword(attempt));
            }
        }
        EditorAction::PasswordChecked(valid) => {
            // 面板已关闭时忽略迟到的结果
            if next.pl_gate == PlGate::AwaitingPassword {
                if valid {
                    next.pl_gate = PlGate::Unlocked;
                } else {
                    effects.push(Effect::notify(
                        NoticeLevel::Error,
                        "Acceso Denegado",
                        "La contraseña es incorrecta. Contacte al administrador.",
                    ));
                }
            }
        }
        EditorAction::ClosePlPanel => next.pl_gate = PlGate::Locked,
        EditorAction::EditPl { year, field, raw } => {
            let value = parse_decimal(&raw);
            match year {
                PlYear::One => next.draft.pl1 = next.draft.pl1.with_field(field, value),
                PlYear::Two => next.draft.pl2 = next.draft.pl2.with_field(field, value),
            }
        }
        EditorAction::SetOperatingCost(raw) => next.operating_cost = parse_decimal(&raw),
        EditorAction::SetDesiredMargin(raw) => next.desired_margin = parse_decimal(&raw),

        EditorAction::SetDisplay(toggle, value) => match toggle {
            DisplayToggle::Total => next.display.show_total = value,
            DisplayToggle::Taxes => next.display.show_taxes = value,
            DisplayToggle::LineItems => next.display.show_line_items = value,
            DisplayToggle::Description => next.display.show_description = value,
        },
        EditorAction::ToggleDiscountColumn => {
            next.display.show_discount_column = !next.display.show_discount_column
        }
        EditorAction::SetPayment(toggle, value) => match toggle {
            PaymentToggle::Transfer => next.payment.transfer = value,
            PaymentToggle::Card => next.payment.card = value,
            PaymentToggle::OneOffJob => next.payment.one_off_job = value,
            PaymentToggle::ProductSale => next.payment.product_sale = value,
            PaymentToggle::MaintenanceContract => next.payment.maintenance_contract = value,
        },

        EditorAction::Next => match next.step {
            Step::Document => push_save(&next, QuoteStatus::Presented, false, &mut effects),
            step => {
                if matches!(step, Step::Strategy | Step::Sites) {
                    push_save(&next, QuoteStatus::Draft, true, &mut effects);
                }
                if let Some(step) = step.next() {
                    next.step = step;
                }
            }
        },
        EditorAction::Back => match next.step.prev() {
            Some(step) => next.step = step,
            None => effects.push(Effect::Cancel),
        },
        EditorAction::SaveDraft => push_save(&next, QuoteStatus::Draft, false, &mut effects),

        EditorAction::AutoSaved(record_id) => {
            if let Some(id) = record_id {
                next.header.record_id = Some(id.clone());
                effects.push(Effect::Reload(id));
            }
        }
        EditorAction::Saved { record_id, status } => {
            let message = match status {
                QuoteStatus::Draft => "Borrador guardado",
                QuoteStatus::Presented => "Cotización finalizada con éxito",
            };
            effects.push(Effect::notify(NoticeLevel::Success, "Éxito", message));
            if let Some(id) = record_id {
                next.header.record_id = Some(id.clone());
                effects.push(Effect::Reload(id));
            }
            effects.push(Effect::Completed(next.header.record_id.clone()));
        }
        EditorAction::BackendFailed { title, message } => {
            tracing::warn!("后端调用失败: {} - {}", title, message);
            effects.push(Effect::notify(NoticeLevel::Error, &title, &message));
        }
    }

    Transition { state: next, effects }
}

fn load_initial_data(state: &mut EditorState, data: crate::models::InitialData) {
    if let Some(agent) = data.agent_name {
        state.header.agent_name = agent;
    }

    if let Some(quote) = data.quote {
        if let Some(name) = quote.name {
            state.header.subject = name;
        }
        if let Some(intro) = quote.introduction_text {
            state.header.intro = intro;
        }
        if let Some(folio) = quote.quote_number {
            state.header.folio = folio;
        }
        if let Some(warranty) = quote.warranty_text {
            state.header.warranty = warranty;
        }
        if let Some(notes) = quote.description {
            state.header.payment_notes = notes;
        }
        state.display.show_description = quote.show_warranty;
        if let Some(account) = quote.account_name.filter(|a| !a.is_empty()) {
            state.header.client_name = account;
        }
        if let Some(date) = quote.created_date.as_deref().and_then(templating::parse_record_date) {
            state.header.created_on = date;
        }
        if let Some(lines) = quote.business_lines_selected.filter(|l| !l.is_empty()) {
            state.business_lines = lines
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
        }

        let restored = draft_codec::restore(
            quote.markers_data.as_deref(),
            &quote.line_items,
            quote.technical_sites.as_deref(),
        );
        if restored.source != RestoreSource::Empty {
            state.draft = restored.draft;
        }
    }

    state.sites = data
        .contacts
        .into_iter()
        .enumerate()
        .map(|(index, contact)| contact.normalized(index))
        .collect();
}

/// 主题为空或仍是自动生成时，按 策略 @ 需求 刷新
fn refresh_subject(state: &mut EditorState) {
    if templating::subject_is_automatic(&state.header.subject) {
        state.header.subject = templating::auto_subject(state.draft.strategy, &state.draft.need_name);
    }
}

fn select_sites(state: &mut EditorState, ids: Vec<String>) {
    let limit = state.max_site_selection();
    state.draft.selected_site_ids = ids.into_iter().take(limit).collect();

    let fill_client = state.header.client_name == CLIENT_PLACEHOLDER || state.header.record_id.is_none();
    if !fill_client {
        return;
    }
    let account = state
        .draft
        .selected_site_ids
        .first()
        .and_then(|id| state.sites.iter().find(|s| &s.id == id))
        .and_then(|site| site.account_name.clone());
    if let Some(account) = account {
        state.header.client_name = account;
    }
}

/// 新弹窗：每个已选站点一行，未选站点时使用默认行
fn fresh_modal(state: &EditorState) -> ServiceModal {
    let mut rows: Vec<SiteLineInput> = state
        .selected_sites()
        .into_iter()
        .map(|site| SiteLineInput::new(site.id.clone(), site.display_label(), state.default_tax_rate.clone()))
        .collect();
    if rows.is_empty() {
        rows.push(SiteLineInput::new(
            DEFAULT_SITE_ID,
            DEFAULT_SITE_LABEL,
            state.default_tax_rate.clone(),
        ));
    }
    ServiceModal {
        rows: pricing::recalculate_rows(&rows, state.entry_mode),
        ..ServiceModal::default()
    }
}

fn pick_product(state: &mut EditorState, id: &str) {
    let Some(product) = state.product_results.iter().find(|p| p.id == id).cloned() else {
        return;
    };
    let mode = state.entry_mode;
    if let Some(modal) = state.modal.as_mut() {
        modal.description_html = product.description.clone().unwrap_or_default();
        for row in modal.rows.iter_mut() {
            row.amount = product.unit_price.clone();
        }
        modal.rows = pricing::recalculate_rows(&modal.rows, mode);
        modal.product = Some(product);
    }
    state.product_results.clear();
}

fn apply_row_edit(row: &mut SiteLineInput, edit: RowEdit) {
    match edit {
        RowEdit::Quantity(raw) => row.quantity = parse_quantity(&raw),
        RowEdit::Amount(raw) => row.amount = parse_decimal(&raw),
        RowEdit::Discount(raw) => row.discount = parse_decimal(&raw),
        RowEdit::TaxRate(raw) => row.tax_rate = parse_decimal(&raw),
        RowEdit::ToggleDiscountKind => row.discount_kind = row.discount_kind.toggled(),
        RowEdit::Selected(selected) => row.selected = selected,
    }
}

/// 逗号结束一个区域名
fn apply_zone_input(modal: &mut ServiceModal, value: String) {
    match value.strip_suffix(',') {
        Some(zone) => {
            let zone = zone.trim();
            if !zone.is_empty() {
                modal.zones.insert(zone.to_string());
            }
            modal.zone_input.clear();
        }
        None => modal.zone_input = value,
    }
}

fn commit_service_lines(state: &mut EditorState, close: bool, effects: &mut Vec<Effect>) {
    let Some(modal) = state.modal.as_ref() else {
        return;
    };
    let Some(product) = modal.product.as_ref() else {
        effects.push(Effect::notify(NoticeLevel::Warning, "Aviso", "Seleccione un producto"));
        return;
    };

    let billable: Vec<&SiteLineInput> = modal.rows.iter().filter(|r| r.is_billable()).collect();
    if billable.is_empty() {
        effects.push(Effect::notify(
            NoticeLevel::Warning,
            "Aviso",
            "Debe seleccionar al menos una sede con cantidad e importe mayores a cero.",
        ));
        return;
    }

    let technical_detail = templating::plain_detail(&modal.description_html);
    let execution_notes = modal.zones.iter().cloned().collect::<Vec<_>>().join(", ");
    let mut seq = state.line_seq;
    let lines: Vec<QuoteLine> = billable
        .into_iter()
        .map(|row| {
            seq += 1;
            let desc = LineDescriptor {
                id: format!("{}-{}-{}", product.id, row.site_id, seq),
                product_id: &product.id,
                product_name: &product.name,
                technical_detail: technical_detail.clone(),
                technical_detail_html: &modal.description_html,
                execution_notes: execution_notes.clone(),
                create_new_zones: modal.convert_zones,
            };
            QuoteLine::Priced(pricing::price_line(desc, row, state.entry_mode))
        })
        .collect();

    tracing::debug!("添加 {} 条报价行 (产品 {})", lines.len(), product.id);
    state.line_seq = seq;
    state.draft.line_items.extend(lines);

    if close {
        state.modal = None;
    } else if let Some(modal) = state.modal.as_mut() {
        // 保留弹窗与站点行，仅清空产品、描述和区域
        modal.product = None;
        modal.description_html.clear();
        modal.zones.clear();
        modal.zone_input.clear();
        modal.convert_zones = false;
        effects.push(Effect::notify(
            NoticeLevel::Success,
            "Añadido",
            "Líneas añadidas correctamente. Puede continuar con otro producto.",
        ));
    }
    state.product_results.clear();
}

fn push_save(state: &EditorState, status: QuoteStatus, automatic: bool, effects: &mut Vec<Effect>) {
    match save_payload(state, status) {
        Ok(payload) if automatic => effects.push(Effect::AutoSave(payload)),
        Ok(payload) => effects.push(Effect::Save(payload)),
        Err(e) => {
            tracing::error!("保存数据编码失败: {}", e);
            effects.push(Effect::notify(
                NoticeLevel::Error,
                "Error",
                "Hay caracteres no permitidos en las descripciones.",
            ));
        }
    }
}

/// 构建保存请求
pub fn save_payload(state: &EditorState, status: QuoteStatus) -> Result<SavePayload, DraftCodecError> {
    let first_site = state.selected_sites().into_iter().next();
    let contact = contact_display(state);
    let account = account_display(state);

    Ok(SavePayload {
        quote_id: state.header.record_id.clone(),
        account_id: first_site.and_then(|s| s.account_id.clone()),
        contact_id: first_site.map(|s| s.id.clone()),
        name: state.header.subject.clone(),
        status,
        intro: templating::merge_dynamic_tags(&state.header.intro, &contact, &account),
        warranty: templating::merge_dynamic_tags(&state.header.warranty, &contact, &account),
        business_lines: state.business_lines.iter().cloned().collect::<Vec<_>>().join(", "),
        technical_sites: sites_display(state),
        line_items: serde_json::to_string(&state.draft.line_items)?,
        show_intro: state.display.show_description,
        show_warranty: state.display.show_description,
        payment_notes: state.header.payment_notes.clone(),
        pay_transfer: state.payment.transfer,
        pay_card: state.payment.card,
        product_sale: state.payment.product_sale,
        markers_data: draft_codec::encode(&state.draft)?,
    })
}

/// 已选站点名 (逗号分隔)，无选择时为 "Sede Principal"
pub fn sites_display(state: &EditorState) -> String {
    let labels: Vec<String> = state.selected_sites().iter().map(|s| s.display_label()).collect();
    if labels.is_empty() {
        MAIN_SITE.to_string()
    } else {
        labels.join(", ")
    }
}

/// 合并标记中的联系人
pub fn contact_display(state: &EditorState) -> String {
    let sites = sites_display(state);
    if sites == MAIN_SITE {
        BLANK.to_string()
    } else {
        sites
    }
}

/// 合并标记中的客户账户
pub fn account_display(state: &EditorState) -> String {
    if state.header.client_name == CLIENT_PLACEHOLDER || state.header.client_name.is_empty() {
        BLANK.to_string()
    } else {
        state.header.client_name.clone()
    }
}

pub fn totals(state: &EditorState) -> QuoteTotals {
    pricing::quote_totals(&state.draft.line_items, &state.default_tax_rate)
}

pub fn pl_comparison(state: &EditorState) -> PlComparison {
    pl_projector::compare(&state.draft.pl1, &state.draft.pl2)
}

/// 快速指标：按当前净额与运营成本
pub fn quick_margin(state: &EditorState) -> (BigDecimal, MarginBand) {
    let margin = pl_projector::current_margin(&totals(state).base, &state.operating_cost);
    let band = pl_projector::margin_band(&margin);
    (margin, band)
}

pub fn quick_suggested_price(state: &EditorState) -> BigDecimal {
    if state.operating_cost.is_zero() {
        return BigDecimal::zero();
    }
    pl_projector::suggested_price(&state.operating_cost, &state.desired_margin)
}
