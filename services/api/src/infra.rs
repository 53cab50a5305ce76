use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use writerdesk::config::LedgerConfig;
use writerdesk::error::AppError;
use writerdesk::store::InMemoryCollection;
use writerdesk::workflows::invoicing::{Invoice, InvoiceService};
use writerdesk::workflows::orders::{ImportRow, Order, OrderKind, OrderService, RejectedRow};
use writerdesk::workflows::reports::{OrderReport, ReportFilter, SummaryRow};
use writerdesk::workflows::spreadsheet::{Column, OrderSheetReader};
use writerdesk::workflows::staff::{Employee, StaffService};

pub(crate) type OrderStore = InMemoryCollection<Order>;
pub(crate) type EmployeeStore = InMemoryCollection<Employee>;
pub(crate) type InvoiceStore = InMemoryCollection<Invoice>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) backoffice: Backoffice,
}

/// Services over one set of collections.
#[derive(Clone)]
pub(crate) struct Backoffice {
    pub(crate) orders: Arc<OrderService<OrderStore>>,
    pub(crate) staff: Arc<StaffService<EmployeeStore>>,
    pub(crate) invoices: Arc<InvoiceService<OrderStore, InvoiceStore>>,
    pub(crate) config: LedgerConfig,
}

impl Backoffice {
    pub(crate) fn in_memory(config: LedgerConfig) -> Self {
        let orders = Arc::new(OrderStore::default());
        let employees = Arc::new(EmployeeStore::default());
        let invoices = Arc::new(InvoiceStore::default());

        Self {
            orders: Arc::new(OrderService::new(orders.clone(), config.clone())),
            staff: Arc::new(StaffService::new(employees)),
            invoices: Arc::new(InvoiceService::new(orders, invoices)),
            config,
        }
    }

    /// Loads a sheet into the order collection and returns the import outcome.
    pub(crate) fn import_sheet<R: Read>(
        &self,
        reader: R,
        kind: OrderKind,
    ) -> Result<ImportOutcome, AppError> {
        let rows = OrderSheetReader::from_reader(reader, kind)?;
        self.import_rows(kind, rows)
    }

    pub(crate) fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        kind: OrderKind,
    ) -> Result<ImportOutcome, AppError> {
        let rows = OrderSheetReader::from_path(path, kind)?;
        self.import_rows(kind, rows)
    }

    fn import_rows(
        &self,
        kind: OrderKind,
        rows: Vec<ImportRow>,
    ) -> Result<ImportOutcome, AppError> {
        let summary = self.orders.import(kind, rows)?;
        Ok(ImportOutcome {
            imported: summary.created.len(),
            rejected: summary.rejected,
        })
    }

    pub(crate) fn report(
        &self,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Result<ReportOutcome, AppError> {
        let orders = self.orders.all()?;
        let selected = filter.select(&orders);
        let report = OrderReport::build(selected.iter().copied(), today);
        let summary = report.summary_rows(&self.config.currency);

        Ok(ReportOutcome {
            filter: filter.clone(),
            report,
            summary,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImportOutcome {
    pub(crate) imported: usize,
    pub(crate) rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReportOutcome {
    pub(crate) filter: ReportFilter,
    pub(crate) report: OrderReport,
    pub(crate) summary: Vec<SummaryRow>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    writerdesk::workflows::input::parse_date(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or MM/DD/YYYY"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn parse_kind(raw: &str) -> Result<OrderKind, String> {
    OrderKind::from_label(raw).ok_or_else(|| format!("unknown order type '{raw}'"))
}

pub(crate) fn parse_column(raw: &str) -> Result<Column, String> {
    Column::from_label(raw).ok_or_else(|| format!("unknown column '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Project Name,Order Date,Submission Date,Writer,Season,Status,Type,Word Count,CPP,Has Code
Thesis,2025-02-01,2025-04-01,Achieng,2025,Completed,Dissertation,2750,425,Yes
Essay,2025-02-01,2025-04-03,Otieno,2025,Pending,Normal,550,200,No
Broken,2025-02-01,,Otieno,2025,Pending,Normal,550,200,No
";

    #[test]
    fn import_and_report_share_one_collection() {
        let backoffice = Backoffice::in_memory(LedgerConfig::default());
        let outcome = backoffice
            .import_sheet(SHEET.as_bytes(), OrderKind::Normal)
            .expect("import runs");
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].line, 4);

        let today = NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date");
        let report = backoffice
            .report(&ReportFilter::default(), today)
            .expect("report builds");
        assert_eq!(report.report.total_orders, 2);
        assert_eq!(report.report.total_budget, 14_650.0);
        assert_eq!(report.summary[0].value, "2");
    }

    #[test]
    fn sheet_files_import_like_uploaded_sheets() {
        let path = std::env::temp_dir().join(format!("writerdesk-{}.csv", std::process::id()));
        std::fs::write(&path, SHEET).expect("sheet written");

        let backoffice = Backoffice::in_memory(LedgerConfig::default());
        let outcome = backoffice.import_file(&path, OrderKind::Normal);
        std::fs::remove_file(&path).expect("sheet removed");

        let outcome = outcome.expect("import runs");
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.rejected[0].line, 4);

        let missing = backoffice.import_file(path, OrderKind::Normal);
        assert!(matches!(missing, Err(AppError::Spreadsheet(_))));
    }

    #[test]
    fn cli_parsers_accept_labels() {
        assert_eq!(parse_kind("Dissertation"), Ok(OrderKind::Dissertation));
        assert!(parse_kind("poem").is_err());
        assert_eq!(parse_column("Balance"), Ok(Column::Balance));
        assert!(parse_date("2025-13-01").is_err());
    }
}
