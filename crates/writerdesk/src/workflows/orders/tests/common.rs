use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::LedgerConfig;
use crate::store::{DocumentId, InMemoryCollection, ListQuery, Page, Repository, RepositoryError};
use crate::workflows::orders::{Order, OrderService, OrderStatus, OrderSubmission, PaymentUpdate};

pub(super) type MemoryOrders = InMemoryCollection<Order>;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn ledger_config() -> LedgerConfig {
    LedgerConfig {
        records_per_page: 2,
        currency: "Ksh.".to_string(),
    }
}

pub(super) fn build_service() -> (OrderService<MemoryOrders>, Arc<MemoryOrders>) {
    let repository = Arc::new(MemoryOrders::default());
    let service = OrderService::new(repository.clone(), ledger_config());
    (service, repository)
}

/// 2750 words at 425 per page with a 10000 code surcharge: budget 14250.
pub(super) fn dissertation_submission() -> OrderSubmission {
    OrderSubmission {
        project_name: "Soil salinity thesis".to_string(),
        order_date: Some(date(2025, 5, 1)),
        submission_date: Some(date(2025, 6, 30)),
        supervisor_name: "Achieng".to_string(),
        season: "Spring".to_string(),
        status: OrderStatus::InProgress,
        word_count: 2750.0,
        cost_per_page: Some(425.0),
        has_code: true,
        code_price: Some(10_000.0),
        progress: 30.0,
        payment: None,
    }
}

/// 550 words at the default 200 per page: budget 400.
pub(super) fn normal_submission(name: &str) -> OrderSubmission {
    OrderSubmission {
        project_name: name.to_string(),
        order_date: Some(date(2025, 5, 2)),
        submission_date: Some(date(2025, 5, 20)),
        supervisor_name: "Otieno".to_string(),
        season: "Spring".to_string(),
        status: OrderStatus::Pending,
        word_count: 550.0,
        cost_per_page: None,
        has_code: false,
        code_price: None,
        progress: 0.0,
        payment: None,
    }
}

pub(super) fn payment(total_paid: f64) -> PaymentUpdate {
    PaymentUpdate {
        words_paid: 1000.0,
        total_paid,
        date_paid: Some(date(2025, 5, 15)),
        is_fully_paid: false,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Repository whose backing store is down.
pub(super) struct UnavailableRepository;

impl Repository<Order> for UnavailableRepository {
    fn insert(&self, _document: Order) -> Result<Order, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _document: Order) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn delete(&self, _id: &DocumentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &DocumentId) -> Result<Option<Order>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self, _query: &ListQuery<Order>) -> Result<Page<Order>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}
