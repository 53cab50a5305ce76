use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{Invoice, InvoiceCohort, InvoiceFilter, InvoiceRequest, InvoiceSortKey};
use super::service::InvoiceService;
use crate::store::{DocumentId, ListQuery, Page, PageRequest, Repository, Sort, SortDirection};
use crate::workflows::errors::LedgerError;
use crate::workflows::orders::Order;

type SharedService<O, I> = Arc<InvoiceService<O, I>>;

pub fn invoice_router<O, I>(service: SharedService<O, I>) -> Router
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    Router::new()
        .route(
            "/api/v1/invoices",
            get(list_handler::<O, I>).post(generate_handler::<O, I>),
        )
        .route(
            "/api/v1/invoices/:invoice_id",
            get(get_handler::<O, I>).delete(delete_handler::<O, I>),
        )
        .route(
            "/api/v1/invoices/:invoice_id/paid",
            put(paid_handler::<O, I>),
        )
        .route("/api/v1/cohorts", get(cohort_handler::<O, I>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
struct InvoiceListParams {
    supervisor_name: Option<String>,
    season: Option<String>,
    is_paid: Option<bool>,
    sort: Option<String>,
    direction: Option<SortDirection>,
    page: Option<usize>,
    per_page: Option<usize>,
}

/// Explicit flag, or a toggle when the body omits it.
#[derive(Debug, Default, Deserialize)]
struct PaidUpdate {
    #[serde(default)]
    is_paid: Option<bool>,
}

async fn list_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Query(params): Query<InvoiceListParams>,
) -> Result<Json<Page<Invoice>>, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    let mut query = ListQuery::new(InvoiceFilter {
        supervisor_name: params.supervisor_name,
        season: params.season,
        is_paid: params.is_paid,
    });
    if let Some(key) = params.sort.as_deref().and_then(InvoiceSortKey::parse) {
        query = query.sorted(Sort {
            key,
            direction: params.direction.unwrap_or_default(),
        });
    }
    if params.page.is_some() || params.per_page.is_some() {
        query = query.paged(PageRequest::new(
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(PageRequest::default().per_page),
        ));
    }

    Ok(Json(service.list(&query)?))
}

async fn generate_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Json(request): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    let invoice = service.generate(&request)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn get_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Path(invoice_id): Path<String>,
) -> Result<Json<Invoice>, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    Ok(Json(service.get(&DocumentId(invoice_id))?))
}

async fn paid_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Path(invoice_id): Path<String>,
    Json(update): Json<PaidUpdate>,
) -> Result<Json<Invoice>, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    let id = DocumentId(invoice_id);
    let invoice = match update.is_paid {
        Some(is_paid) => service.set_paid(&id, is_paid)?,
        None => service.toggle_paid(&id)?,
    };
    Ok(Json(invoice))
}

async fn delete_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Path(invoice_id): Path<String>,
) -> Result<StatusCode, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    service.delete(&DocumentId(invoice_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cohort_handler<O, I>(
    State(service): State<SharedService<O, I>>,
    Query(request): Query<InvoiceRequest>,
) -> Result<Json<InvoiceCohort>, LedgerError>
where
    O: Repository<Order> + 'static,
    I: Repository<Invoice> + 'static,
{
    let (supervisor_name, season) = request.validate()?;
    Ok(Json(service.cohort(
        &supervisor_name,
        &season,
        request.project_type,
    )?))
}
