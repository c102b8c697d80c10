use crate::models::{DocumentView, EditorState, PageBudget};
use crate::service::editor::{account_display, contact_display, sites_display, totals};
use crate::service::paginator::paginate;
use crate::service::pricing::total_discount;
use crate::service::templating::{format_date, join_or_unspecified, merge_dynamic_tags};

/// 组装打印视图
pub fn assemble(state: &EditorState, budget: &PageBudget) -> DocumentView {
    let contact = contact_display(state);
    let account = account_display(state);
    let pages = paginate(&state.draft.line_items, budget, true);
    tracing::debug!("文档分页完成: {} 页", pages.len());

    DocumentView {
        subject: state.header.subject.clone(),
        folio: state.header.folio.clone(),
        client_name: state.header.client_name.clone(),
        agent_name: state.header.agent_name.clone(),
        date: format_date(state.header.created_on),
        approved_on: state.header.approved_on.map(format_date),
        intro: merge_dynamic_tags(&state.header.intro, &contact, &account),
        warranty: merge_dynamic_tags(&state.header.warranty, &contact, &account),
        payment_notes: state.header.payment_notes.clone(),
        sites: sites_display(state),
        pages,
        totals: totals(state),
        total_discount: total_discount(&state.draft.line_items),
        payment_methods: payment_methods(state),
        work_types: work_types(state),
        display: state.display,
    }
}

pub fn payment_methods(state: &EditorState) -> String {
    let mut parts = Vec::new();
    if state.payment.transfer {
        parts.push("Transferencia");
    }
    if state.payment.card {
        parts.push("Tarjeta");
    }
    join_or_unspecified(&parts, " / ")
}

pub fn work_types(state: &EditorState) -> String {
    let mut parts = Vec::new();
    if state.payment.one_off_job {
        parts.push("Trabajo único/puntual");
    }
    if state.payment.product_sale {
        parts.push("Venta producto");
    }
    if state.payment.maintenance_contract {
        parts.push("Contrato de mantenimiento");
    }
    join_or_unspecified(&parts, ", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditorAction, PaymentToggle, SiteContact, Strategy};
    use crate::service::editor::reduce;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn base_state() -> EditorState {
        EditorState::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), BigDecimal::from(16))
    }

    #[test]
    fn test_empty_document() {
        let mut state = base_state();
        state.header.intro = "Atención: [[CONTACTO]] / [[CUENTA]]".into();
        let view = assemble(&state, &PageBudget::default());

        assert_eq!(view.date, "01/05/2024");
        assert_eq!(view.intro, "Atención: ________________ / ________________");
        assert_eq!(view.sites, "Sede Principal");
        assert_eq!(view.pages.len(), 1);
        assert_eq!(view.payment_methods, "No especificado");
        assert_eq!(view.work_types, "No especificado");
        assert_eq!(view.totals.label, "I.V.A. (16%)");
    }

    #[test]
    fn test_document_with_site_and_options() {
        let mut state = base_state();
        state.sites = vec![SiteContact {
            id: "003A".into(),
            account_id: None,
            account_name: Some("Liverpool".into()),
            name: "Mariana".into(),
            phone: None,
            mailing_street: None,
            mailing_city: Some("CDMX".into()),
            mailing_state: None,
            internal_code: "CON-101".into(),
        }];
        let state = [
            EditorAction::SetStrategy(Strategy::E1),
            EditorAction::SelectSites(vec!["003A".into()]),
            EditorAction::SetWarranty("{!Quote.Account} garantiza 6 meses".into()),
            EditorAction::SetPayment(PaymentToggle::Transfer, true),
            EditorAction::SetPayment(PaymentToggle::Card, true),
            EditorAction::SetPayment(PaymentToggle::OneOffJob, true),
            EditorAction::SetPayment(PaymentToggle::MaintenanceContract, true),
            EditorAction::SetApprovalDate(NaiveDate::from_ymd_opt(2024, 6, 10)),
        ]
        .into_iter()
        .fold(state, |s, a| reduce(&s, a).state);

        let view = assemble(&state, &PageBudget::default());
        assert_eq!(view.client_name, "Liverpool");
        assert_eq!(view.warranty, "Liverpool garantiza 6 meses");
        assert_eq!(view.sites, "Liverpool - CDMX");
        assert_eq!(view.payment_methods, "Transferencia / Tarjeta");
        assert_eq!(view.work_types, "Trabajo único/puntual, Contrato de mantenimiento");
        assert_eq!(view.approved_on.as_deref(), Some("10/06/2024"));
    }
}
