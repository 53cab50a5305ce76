use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{Order, OrderKind, OrderStatus, OrderSubmission, PaymentUpdate};
use super::query::{priority_sort, OrderFilter, OrderSortKey};
use super::schedule::{BadgeVariant, Priority};
use super::service::OrderService;
use crate::store::{DocumentId, ListQuery, Page, PageRequest, Repository, Sort, SortDirection};
use crate::workflows::errors::LedgerError;

/// Router exposing order CRUD and the dissertation payment endpoint.
pub fn order_router<R>(service: Arc<OrderService<R>>) -> Router
where
    R: Repository<Order> + 'static,
{
    Router::new()
        .route(
            "/api/v1/orders",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/orders/:order_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/orders/:order_id/payment",
            post(payment_handler::<R>),
        )
        .with_state(service)
}

/// Order as rendered to clients, with the date-dependent classification attached.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub overdue: bool,
    pub priority: Priority,
    pub badge: BadgeVariant,
}

impl OrderView {
    pub fn new(order: Order, today: NaiveDate) -> Self {
        Self {
            overdue: order.is_overdue(today),
            priority: order.priority(today),
            badge: order.badge(today),
            order,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub kind: OrderKind,
    pub order: OrderSubmission,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub kind: Option<OrderKind>,
    pub writer: Option<String>,
    pub season: Option<String>,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Evaluation date for overdue and priority; defaults to the server's local date.
    pub today: Option<NaiveDate>,
}

impl OrderListParams {
    fn into_query(self, today: NaiveDate, default_page: PageRequest) -> ListQuery<Order> {
        let sort = match self.sort.as_deref().and_then(|raw| OrderSortKey::parse(raw, today)) {
            Some(key) => Sort {
                key,
                direction: self.direction.unwrap_or_default(),
            },
            None => priority_sort(today),
        };
        let page = PageRequest::new(
            self.page.unwrap_or(default_page.page),
            self.per_page.unwrap_or(default_page.per_page),
        );

        ListQuery::new(OrderFilter {
            kind: self.kind,
            writer: self.writer,
            season: self.season,
            status: self.status,
            search: self.search,
            due_from: self.due_from,
            due_to: self.due_to,
        })
        .sorted(sort)
        .paged(page)
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Page<OrderView>>, LedgerError>
where
    R: Repository<Order> + 'static,
{
    let today = params.today.unwrap_or_else(local_today);
    let query = params.into_query(today, service.default_page());
    let page = service.list(&query)?;
    Ok(Json(page.map(|order| OrderView::new(order, today))))
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, LedgerError>
where
    R: Repository<Order> + 'static,
{
    let order = service.create(request.kind, request.order)?;
    Ok((StatusCode::CREATED, Json(OrderView::new(order, local_today()))))
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderView>, LedgerError>
where
    R: Repository<Order> + 'static,
{
    let order = service.get(&DocumentId(order_id))?;
    Ok(Json(OrderView::new(order, local_today())))
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(order_id): Path<String>,
    Json(submission): Json<OrderSubmission>,
) -> Result<Json<OrderView>, LedgerError>
where
    R: Repository<Order> + 'static,
{
    let order = service.update(&DocumentId(order_id), submission)?;
    Ok(Json(OrderView::new(order, local_today())))
}

pub(crate) async fn payment_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(order_id): Path<String>,
    Json(payment): Json<PaymentUpdate>,
) -> Result<Json<OrderView>, LedgerError>
where
    R: Repository<Order> + 'static,
{
    let order = service.record_payment(&DocumentId(order_id), payment)?;
    Ok(Json(OrderView::new(order, local_today())))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, LedgerError>
where
    R: Repository<Order> + 'static,
{
    service.delete(&DocumentId(order_id))?;
    Ok(StatusCode::NO_CONTENT)
}
