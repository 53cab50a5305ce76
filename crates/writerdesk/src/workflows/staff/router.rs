use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::domain::{Employee, EmployeeFilter, EmployeeSortKey, EmployeeStatus, EmployeeSubmission};
use super::service::StaffService;
use crate::store::{DocumentId, ListQuery, Page, PageRequest, Repository, Sort, SortDirection};
use crate::workflows::errors::LedgerError;

pub fn staff_router<R>(service: Arc<StaffService<R>>, records_per_page: usize) -> Router
where
    R: Repository<Employee> + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(StaffState {
            service,
            records_per_page,
        })
}

struct StaffState<R> {
    service: Arc<StaffService<R>>,
    records_per_page: usize,
}

impl<R> Clone for StaffState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            records_per_page: self.records_per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct EmployeeListParams {
    status: Option<EmployeeStatus>,
    search: Option<String>,
    sort: Option<String>,
    direction: Option<SortDirection>,
    page: Option<usize>,
    per_page: Option<usize>,
}

async fn list_handler<R>(
    State(state): State<StaffState<R>>,
    Query(params): Query<EmployeeListParams>,
) -> Result<Json<Page<Employee>>, LedgerError>
where
    R: Repository<Employee> + 'static,
{
    let mut query = ListQuery::new(EmployeeFilter {
        status: params.status,
        search: params.search,
    })
    .paged(PageRequest::new(
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(state.records_per_page),
    ));
    if let Some(key) = params.sort.as_deref().and_then(EmployeeSortKey::parse) {
        query = query.sorted(Sort {
            key,
            direction: params.direction.unwrap_or_default(),
        });
    }

    Ok(Json(state.service.list(&query)?))
}

async fn create_handler<R>(
    State(state): State<StaffState<R>>,
    Json(submission): Json<EmployeeSubmission>,
) -> Result<impl IntoResponse, LedgerError>
where
    R: Repository<Employee> + 'static,
{
    let employee = state.service.create(submission)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_handler<R>(
    State(state): State<StaffState<R>>,
    Path(employee_id): Path<String>,
) -> Result<Json<Employee>, LedgerError>
where
    R: Repository<Employee> + 'static,
{
    Ok(Json(state.service.get(&DocumentId(employee_id))?))
}

async fn update_handler<R>(
    State(state): State<StaffState<R>>,
    Path(employee_id): Path<String>,
    Json(submission): Json<EmployeeSubmission>,
) -> Result<Json<Employee>, LedgerError>
where
    R: Repository<Employee> + 'static,
{
    Ok(Json(
        state.service.update(&DocumentId(employee_id), submission)?,
    ))
}

async fn delete_handler<R>(
    State(state): State<StaffState<R>>,
    Path(employee_id): Path<String>,
) -> Result<StatusCode, LedgerError>
where
    R: Repository<Employee> + 'static,
{
    state.service.delete(&DocumentId(employee_id))?;
    Ok(StatusCode::NO_CONTENT)
}
