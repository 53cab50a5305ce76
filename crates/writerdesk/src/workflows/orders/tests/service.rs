use super::common::*;
use crate::store::{DocumentId, ListQuery, PageRequest, Repository, RepositoryError};
use crate::workflows::errors::{LedgerError, ValidationError};
use crate::workflows::orders::{
    priority_sort, ImportRow, Order, OrderFilter, OrderKind, OrderService, OrderStatus,
};
use std::sync::Arc;

#[test]
fn create_derives_budget_and_opens_dissertation_ledger() {
    let (service, repository) = build_service();

    let order = service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");

    assert!(order.id.as_str().starts_with("ord-"));
    assert_eq!(order.budget, 14_250.0);
    let ledger = order.payment.as_ref().expect("ledger opened");
    assert_eq!(ledger.remaining_balance, 14_250.0);
    assert!(!ledger.is_fully_paid);

    let stored = repository
        .fetch(&order.id)
        .expect("fetch succeeds")
        .expect("order stored");
    assert_eq!(stored, order);
}

#[test]
fn create_without_code_prices_pages_only() {
    let (service, _) = build_service();
    let mut submission = dissertation_submission();
    submission.has_code = false;

    let order = service
        .create(OrderKind::Dissertation, submission)
        .expect("order created");
    assert_eq!(order.budget, 4_250.0);
}

#[test]
fn create_rejects_invalid_submissions_without_persisting() {
    let (service, repository) = build_service();
    let mut submission = dissertation_submission();
    submission.project_name = "  ".to_string();

    match service.create(OrderKind::Dissertation, submission) {
        Err(LedgerError::Validation(ValidationError::MissingField("project_name"))) => {}
        other => panic!("expected missing project name, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn record_payment_recomputes_balance_and_keeps_budget() {
    let (service, _) = build_service();
    let order = service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");

    let paid = service
        .record_payment(&order.id, payment(5_000.0))
        .expect("payment recorded");
    assert_eq!(paid.budget, 14_250.0);
    assert_eq!(paid.pricing.word_count, 2750);
    let ledger = paid.payment.as_ref().expect("ledger");
    assert_eq!(ledger.remaining_balance, 9_250.0);
    assert_eq!(ledger.words_paid, 1000);

    let overpaid = service
        .record_payment(&order.id, payment(20_000.0))
        .expect("payment recorded");
    assert_eq!(overpaid.remaining_balance(), Some(0.0));
}

#[test]
fn fully_paid_flag_is_independent_of_balance() {
    let (service, _) = build_service();
    let order = service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");

    let mut update = payment(1_000.0);
    update.is_fully_paid = true;
    let paid = service
        .record_payment(&order.id, update)
        .expect("payment recorded");

    let ledger = paid.payment.expect("ledger");
    assert!(ledger.is_fully_paid);
    assert_eq!(ledger.remaining_balance, 13_250.0);
}

#[test]
fn record_payment_on_normal_order_is_rejected() {
    let (service, _) = build_service();
    let order = service
        .create(OrderKind::Normal, normal_submission("Essay"))
        .expect("order created");

    match service.record_payment(&order.id, payment(100.0)) {
        Err(LedgerError::Validation(ValidationError::PaymentsNotTracked {
            kind: OrderKind::Normal,
        })) => {}
        other => panic!("expected payments not tracked, got {other:?}"),
    }
}

#[test]
fn record_payment_rejects_negative_amounts() {
    let (service, _) = build_service();
    let order = service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");

    assert!(matches!(
        service.record_payment(&order.id, payment(-5.0)),
        Err(LedgerError::Validation(ValidationError::Negative { .. }))
    ));
}

#[test]
fn update_overwrites_fields_and_keeps_payments() {
    let (service, _) = build_service();
    let order = service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");
    service
        .record_payment(&order.id, payment(5_000.0))
        .expect("payment recorded");

    let mut edit = dissertation_submission();
    edit.status = OrderStatus::Completed;
    edit.word_count = 5500.0;
    edit.has_code = false;
    let updated = service.update(&order.id, edit).expect("update succeeds");

    assert_eq!(updated.kind, OrderKind::Dissertation);
    assert_eq!(updated.details.status, OrderStatus::Completed);
    assert_eq!(updated.budget, 8_500.0);
    let ledger = updated.payment.expect("ledger kept");
    assert_eq!(ledger.total_paid, 5_000.0);
    assert_eq!(ledger.remaining_balance, 3_500.0);
}

#[test]
fn status_can_move_backwards_through_an_edit() {
    let (service, _) = build_service();
    let mut submission = normal_submission("Essay");
    submission.status = OrderStatus::Completed;
    let order = service
        .create(OrderKind::Normal, submission)
        .expect("order created");

    let reopened = service
        .update(&order.id, normal_submission("Essay"))
        .expect("update succeeds");
    assert_eq!(reopened.details.status, OrderStatus::Pending);
}

#[test]
fn missing_orders_surface_not_found() {
    let (service, _) = build_service();
    let missing = DocumentId::from("ord-999999");

    assert!(matches!(
        service.get(&missing),
        Err(LedgerError::Persistence(RepositoryError::NotFound))
    ));
    assert!(matches!(
        service.delete(&missing),
        Err(LedgerError::Persistence(RepositoryError::NotFound))
    ));
    assert!(matches!(
        service.update(&missing, normal_submission("Essay")),
        Err(LedgerError::Persistence(RepositoryError::NotFound))
    ));
}

#[test]
fn delete_removes_the_order() {
    let (service, repository) = build_service();
    let order = service
        .create(OrderKind::Normal, normal_submission("Essay"))
        .expect("order created");

    service.delete(&order.id).expect("delete succeeds");
    assert!(repository.fetch(&order.id).expect("fetch").is_none());
}

#[test]
fn list_filters_by_kind_and_paginates() {
    let (service, _) = build_service();
    for name in ["Essay A", "Essay B", "Essay C"] {
        service
            .create(OrderKind::Normal, normal_submission(name))
            .expect("order created");
    }
    service
        .create(OrderKind::Dissertation, dissertation_submission())
        .expect("order created");

    let query = ListQuery::<Order>::new(OrderFilter::for_kind(OrderKind::Normal))
        .sorted(priority_sort(date(2025, 5, 10)))
        .paged(service.default_page());
    let page = service.list(&query).expect("list succeeds");

    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);

    let last = service
        .list(&query.paged(PageRequest::new(2, 2)))
        .expect("list succeeds");
    assert_eq!(last.items.len(), 1);
}

#[test]
fn import_creates_valid_rows_and_reports_rejections() {
    let (service, repository) = build_service();
    let mut bad = normal_submission("Broken");
    bad.progress = 250.0;

    let rows = vec![
        ImportRow {
            line: 2,
            kind: None,
            submission: Ok(normal_submission("Essay")),
        },
        ImportRow {
            line: 3,
            kind: None,
            submission: Ok(bad),
        },
        ImportRow {
            line: 4,
            kind: None,
            submission: Err(ValidationError::InvalidDate {
                field: "submission_date",
                value: "soon".to_string(),
            }),
        },
    ];

    let summary = service.import(OrderKind::Normal, rows).expect("import runs");
    assert_eq!(summary.created.len(), 1);
    assert_eq!(summary.created[0].budget, 400.0);
    let lines: Vec<_> = summary.rejected.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert_eq!(repository.len(), 1);
}

#[test]
fn repository_outages_propagate() {
    let service = OrderService::new(Arc::new(UnavailableRepository), ledger_config());

    assert!(matches!(
        service.create(OrderKind::Normal, normal_submission("Essay")),
        Err(LedgerError::Persistence(RepositoryError::Unavailable(_)))
    ));

    let rows = vec![ImportRow {
        line: 2,
        kind: None,
        submission: Ok(normal_submission("Essay")),
    }];
    assert!(service.import(OrderKind::Normal, rows).is_err());
}
