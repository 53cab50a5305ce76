use crate::infra::{deserialize_optional_date, AppState, Backoffice, ImportOutcome};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use writerdesk::error::AppError;
use writerdesk::store::ListQuery;
use writerdesk::workflows::invoicing::invoice_router;
use writerdesk::workflows::orders::{order_router, OrderKind};
use writerdesk::workflows::reports::{DashboardStats, OrderReport, ReportFilter, SummaryRow};
use writerdesk::workflows::spreadsheet::write_roster;
use writerdesk::workflows::staff::{staff_router, EmployeeFilter};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardParams {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderReportRequest {
    /// Sheet to report on instead of the stored orders.
    #[serde(default)]
    pub(crate) csv: Option<String>,
    /// Order type for sheet rows without a Type column.
    #[serde(default)]
    pub(crate) kind: Option<OrderKind>,
    #[serde(default)]
    pub(crate) filter: ReportFilter,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderReportResponse {
    pub(crate) today: NaiveDate,
    pub(crate) data_source: ReportDataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) import: Option<ImportOutcome>,
    pub(crate) filter: ReportFilter,
    pub(crate) report: OrderReport,
    pub(crate) summary: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportDataSource {
    Sheet,
    Ledger,
}

pub(crate) fn with_backoffice_routes(backoffice: &Backoffice) -> Router {
    order_router(backoffice.orders.clone())
        .merge(staff_router(
            backoffice.staff.clone(),
            backoffice.config.records_per_page,
        ))
        .merge(invoice_router(backoffice.invoices.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard", get(dashboard_endpoint))
        .route("/api/v1/reports/orders", post(order_report_endpoint))
        .route("/api/v1/exports/employees", get(roster_export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardStats>, AppError> {
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let orders = state.backoffice.orders.all()?;
    let employees = state.backoffice.staff.all()?;

    Ok(Json(DashboardStats::build(
        &orders,
        &employees,
        today,
        Utc::now(),
    )))
}

pub(crate) async fn order_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<OrderReportRequest>,
) -> Result<Json<OrderReportResponse>, AppError> {
    let OrderReportRequest {
        csv,
        kind,
        filter,
        today,
    } = payload;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    // Uploaded sheets are reported on in isolation and never touch the stored orders.
    let (outcome, import, data_source) = if let Some(csv) = csv {
        let scratch = Backoffice::in_memory(state.backoffice.config.clone());
        let import = scratch.import_sheet(
            Cursor::new(csv.into_bytes()),
            kind.unwrap_or(OrderKind::Normal),
        )?;
        (
            scratch.report(&filter, today)?,
            Some(import),
            ReportDataSource::Sheet,
        )
    } else {
        (
            state.backoffice.report(&filter, today)?,
            None,
            ReportDataSource::Ledger,
        )
    };

    Ok(Json(OrderReportResponse {
        today,
        data_source,
        import,
        filter: outcome.filter,
        report: outcome.report,
        summary: outcome.summary,
    }))
}

/// Staff roster as a CSV download, narrowed by the same filter as the employee list.
pub(crate) async fn roster_export_endpoint(
    Extension(state): Extension<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> Result<impl IntoResponse, AppError> {
    let employees = state.backoffice.staff.list(&ListQuery::new(filter))?.items;
    let mut buffer = Vec::new();
    write_roster(&mut buffer, &employees)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employees.csv\"",
            ),
        ],
        buffer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;
    use writerdesk::config::LedgerConfig;
    use writerdesk::workflows::orders::{OrderStatus, OrderSubmission};
    use writerdesk::workflows::staff::{EmployeeStatus, EmployeeSubmission};

    const SHEET: &str = "\
Project Name,Order Date,Submission Date,Writer,Season,Status,Word Count,CPP,Has Code
Essay,2025-03-01,2025-03-20,Wanjiru,2025,Completed,550,200,No
Brief,2025-03-02,2025-03-28,Wanjiru,2025,Pending,275,200,No
Report,2025-03-02,2025-04-30,Kamau,2026,Pending,275,200,Yes
";

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, d).expect("valid date")
    }

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            backoffice: Backoffice::in_memory(LedgerConfig::default()),
        }
    }

    fn app(state: &AppState) -> Router {
        with_backoffice_routes(&state.backoffice).layer(Extension(state.clone()))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let state = state(false);
        let response = app(&state)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = app(&state)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sheet_report_does_not_touch_stored_orders() {
        let state = state(true);
        let request = OrderReportRequest {
            csv: Some(SHEET.to_string()),
            kind: None,
            filter: ReportFilter {
                season: Some("2025".to_string()),
                ..ReportFilter::default()
            },
            today: Some(day(3, 25)),
        };

        let Json(body) = order_report_endpoint(Extension(state.clone()), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, ReportDataSource::Sheet);
        assert_eq!(body.import.as_ref().map(|import| import.imported), Some(3));
        assert_eq!(body.report.total_orders, 2);
        assert_eq!(body.report.completed, 1);
        assert_eq!(body.report.total_budget, 600.0);
        assert!(state.backoffice.orders.all().expect("orders").is_empty());
    }

    #[tokio::test]
    async fn ledger_report_reads_stored_orders() {
        let state = state(true);
        state
            .backoffice
            .orders
            .create(
                OrderKind::Normal,
                OrderSubmission {
                    project_name: "Essay".to_string(),
                    order_date: Some(day(3, 1)),
                    submission_date: Some(day(3, 10)),
                    supervisor_name: "Wanjiru".to_string(),
                    season: "2025".to_string(),
                    status: OrderStatus::InProgress,
                    word_count: 550.0,
                    ..OrderSubmission::default()
                },
            )
            .expect("order created");

        let response = app(&state)
            .oneshot(
                Request::post("/api/v1/reports/orders")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"today":"2025-03-15"}"#))
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data_source"], "ledger");
        assert_eq!(body["report"]["overdue"], 1);
        assert!(body.get("import").is_none());
    }

    #[tokio::test]
    async fn sheet_rows_without_due_dates_are_listed_as_rejected() {
        let state = state(true);
        let request = OrderReportRequest {
            csv: Some(
                "Project Name,Order Date,Submission Date,Writer,Season\n\
                 Essay,2025-03-01,,Wanjiru,2025\n\
                 Brief,2025-03-01,2025-03-09,Wanjiru,2025\n"
                    .to_string(),
            ),
            kind: Some(OrderKind::Dissertation),
            filter: ReportFilter::default(),
            today: Some(day(3, 5)),
        };

        let Json(body) = order_report_endpoint(Extension(state), Json(request))
            .await
            .expect("report builds");

        let import = body.import.expect("sheet import reported");
        assert_eq!(import.imported, 1);
        assert_eq!(import.rejected.len(), 1);
        assert_eq!(import.rejected[0].line, 2);
        assert_eq!(body.report.by_kind.dissertation, 1);
    }

    #[tokio::test]
    async fn dashboard_combines_orders_and_staff() {
        let state = state(true);
        state
            .backoffice
            .staff
            .create(EmployeeSubmission {
                employee_name: "Wanjiru Njeri".to_string(),
                hire_date: Some(day(1, 6)),
                department: "Writing".to_string(),
                position: "Writer".to_string(),
                status: EmployeeStatus::Active,
                phone_number: "0700 000 000".to_string(),
                performance_score: 88.0,
            })
            .expect("employee created");

        let response = app(&state)
            .oneshot(
                Request::get("/api/v1/dashboard?today=2025-03-15")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["total_employees"], 1);
        assert_eq!(body["active_employees"], 1);
        assert_eq!(body["total_orders"], 0);
        assert_eq!(body["activity"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn roster_export_lists_filtered_staff_as_csv() {
        let state = state(true);
        for (name, status) in [
            ("Wanjiru Njeri", EmployeeStatus::Active),
            ("Kamau Mwangi", EmployeeStatus::Inactive),
        ] {
            state
                .backoffice
                .staff
                .create(EmployeeSubmission {
                    employee_name: name.to_string(),
                    hire_date: Some(day(1, 6)),
                    department: "Writing".to_string(),
                    position: "Writer".to_string(),
                    status,
                    phone_number: "0700 000 000".to_string(),
                    performance_score: 88.0,
                })
                .expect("employee created");
        }

        let response = app(&state)
            .oneshot(
                Request::get("/api/v1/exports/employees?status=active")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");
        let csv = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Employee Name,Hire Date,Department,Position,Status,Phone Number,Performance Score"
        );
        assert_eq!(
            &lines[1..],
            &["Wanjiru Njeri,01/06/2025,Writing,Writer,Active,0700 000 000,88"]
        );
    }

    #[tokio::test]
    async fn merged_routers_serve_orders_staff_and_invoices() {
        let state = state(true);
        for uri in ["/api/v1/orders", "/api/v1/employees", "/api/v1/invoices", "/health"] {
            let response = app(&state)
                .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
                .await
                .expect("router responds");
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}
