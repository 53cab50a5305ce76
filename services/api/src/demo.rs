use crate::infra::{Backoffice, ImportOutcome, ReportOutcome};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use writerdesk::config::AppConfig;
use writerdesk::error::AppError;
use writerdesk::workflows::invoicing::{Invoice, InvoiceRequest};
use writerdesk::workflows::orders::{OrderKind, OrderStatus, OrderSubmission, PaymentUpdate};
use writerdesk::workflows::reports::{DashboardStats, ReportFilter};
use writerdesk::workflows::spreadsheet::{
    format_money, Column, OrderSheetWriter, INVOICE_COLUMNS,
};
use writerdesk::workflows::staff::{EmployeeStatus, EmployeeSubmission};
use writerdesk::workflows::LedgerError;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Order sheet (CSV) to report on
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Order type for rows without a Type column
    #[arg(long, default_value = "Normal", value_parser = crate::infra::parse_kind)]
    pub(crate) kind: OrderKind,
    /// Only report on one order type
    #[arg(long, value_parser = crate::infra::parse_kind)]
    pub(crate) only: Option<OrderKind>,
    #[arg(long)]
    pub(crate) season: Option<String>,
    #[arg(long)]
    pub(crate) writer: Option<String>,
    /// Evaluation date for overdue counts (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write the selected orders to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
    /// Columns to export, by header label (repeatable); defaults to every column
    #[arg(long = "column", value_parser = crate::infra::parse_column)]
    pub(crate) columns: Vec<Column>,
}

#[derive(Args, Debug)]
pub(crate) struct InvoiceArgs {
    /// Order sheet (CSV) holding the writer's projects
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long, default_value = "Normal", value_parser = crate::infra::parse_kind)]
    pub(crate) kind: OrderKind,
    /// Writer being invoiced
    #[arg(long)]
    pub(crate) writer: String,
    #[arg(long)]
    pub(crate) season: String,
    /// Restrict the invoice to one order type
    #[arg(long, value_parser = crate::infra::parse_kind)]
    pub(crate) project_type: Option<OrderKind>,
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write the invoiced projects to this CSV file
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date for the walkthrough (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn load_config() -> Result<AppConfig, AppError> {
    Ok(AppConfig::load()?)
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let backoffice = Backoffice::in_memory(config.ledger);

    let imported = backoffice.import_file(&args.csv, args.kind)?;
    let filter = ReportFilter {
        season: args.season,
        writer: args.writer,
        kind: args.only,
    };
    let outcome = backoffice.report(&filter, today)?;

    println!("Order report for {}", today);
    println!("Source: {}", args.csv.display());
    render_import(&imported);
    render_report(&outcome);

    if let Some(path) = args.export {
        let orders = backoffice.orders.all()?;
        let selected: Vec<_> = filter.select(&orders).into_iter().cloned().collect();
        OrderSheetWriter::new(backoffice.config.currency.clone(), today)
            .with_columns(&args.columns)
            .write(File::create(&path)?, &selected)?;
        println!("\nExported {} orders to {}", selected.len(), path.display());
    }

    Ok(())
}

pub(crate) fn run_invoice(args: InvoiceArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let backoffice = Backoffice::in_memory(config.ledger);

    let imported = backoffice.import_file(&args.csv, args.kind)?;
    render_import(&imported);

    let request = InvoiceRequest {
        supervisor_name: args.writer,
        season: args.season,
        project_type: args.project_type,
    };
    let invoice = match backoffice.invoices.generate(&request) {
        Ok(invoice) => invoice,
        Err(LedgerError::EmptyCohort {
            supervisor_name,
            season,
            ..
        }) => {
            println!("No projects found for {supervisor_name} in season {season}; no invoice created.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    render_invoice(&invoice, &backoffice.config.currency);

    if let Some(path) = args.out {
        let cohort = backoffice.invoices.cohort(
            &invoice.supervisor_name,
            &invoice.season,
            invoice.project_type,
        )?;
        OrderSheetWriter::new(backoffice.config.currency.clone(), today)
            .with_columns(&INVOICE_COLUMNS)
            .write_cohort(File::create(&path)?, &cohort)?;
        println!("Invoice sheet written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let backoffice = Backoffice::in_memory(config.ledger);

    println!("=== Writer desk walkthrough ({today}) ===");

    println!("\n-- Staff --");
    for (name, position, score) in [
        ("Achieng Odhiambo", "Senior Writer", 92.0),
        ("Brian Kiprono", "Editor", 78.0),
    ] {
        let employee = backoffice.staff.create(EmployeeSubmission {
            employee_name: name.to_string(),
            hire_date: Some(today - Duration::days(400)),
            department: "Writing".to_string(),
            position: position.to_string(),
            status: EmployeeStatus::Active,
            phone_number: "0712 345 678".to_string(),
            performance_score: score,
        })?;
        println!(
            "Hired {} as {} ({})",
            employee.employee_name, employee.position, employee.id
        );
    }

    println!("\n-- Orders --");
    let thesis = backoffice.orders.create(
        OrderKind::Dissertation,
        OrderSubmission {
            project_name: "Soil Nutrient Thesis".to_string(),
            order_date: Some(today - Duration::days(30)),
            submission_date: Some(today + Duration::days(2)),
            supervisor_name: "Achieng Odhiambo".to_string(),
            season: "2025".to_string(),
            status: OrderStatus::InProgress,
            word_count: 2750.0,
            has_code: true,
            progress: 60.0,
            ..OrderSubmission::default()
        },
    )?;
    let essay = backoffice.orders.create(
        OrderKind::Normal,
        OrderSubmission {
            project_name: "Market Analysis Essay".to_string(),
            order_date: Some(today - Duration::days(10)),
            submission_date: Some(today - Duration::days(1)),
            supervisor_name: "Achieng Odhiambo".to_string(),
            season: "2025".to_string(),
            status: OrderStatus::Pending,
            word_count: 1100.0,
            ..OrderSubmission::default()
        },
    )?;
    for order in [&thesis, &essay] {
        println!(
            "{} [{}] budget {} priority {}",
            order.details.project_name,
            order.kind.label(),
            format_money(order.budget, &backoffice.config.currency),
            order.priority(today).label()
        );
    }

    let thesis = backoffice.orders.record_payment(
        &thesis.id,
        PaymentUpdate {
            words_paid: 1375.0,
            total_paid: 7_000.0,
            date_paid: Some(today),
            is_fully_paid: false,
        },
    )?;
    if let Some(balance) = thesis.remaining_balance() {
        println!(
            "Recorded payment on {}: balance {}",
            thesis.details.project_name,
            format_money(balance, &backoffice.config.currency)
        );
    }

    println!("\n-- Report --");
    let outcome = backoffice.report(&ReportFilter::default(), today)?;
    render_report(&outcome);

    println!("\n-- Invoice --");
    let invoice = backoffice.invoices.generate(&InvoiceRequest {
        supervisor_name: "Achieng Odhiambo".to_string(),
        season: "2025".to_string(),
        project_type: None,
    })?;
    render_invoice(&invoice, &backoffice.config.currency);
    let invoice = backoffice.invoices.toggle_paid(&invoice.id)?;
    println!("Invoice {} marked {}", invoice.id, invoice.payment_label());

    println!("\n-- Dashboard --");
    let orders = backoffice.orders.all()?;
    let employees = backoffice.staff.all()?;
    let stats = DashboardStats::build(&orders, &employees, today, Utc::now());
    render_dashboard(&stats);

    Ok(())
}

fn render_import(outcome: &ImportOutcome) {
    println!("Imported {} orders", outcome.imported);
    if !outcome.rejected.is_empty() {
        println!("Rejected rows:");
        for row in &outcome.rejected {
            println!("  - line {}: {}", row.line, row.reason);
        }
    }
}

fn render_report(outcome: &ReportOutcome) {
    let filter = &outcome.filter;
    if filter.season.is_some() || filter.writer.is_some() || filter.kind.is_some() {
        println!(
            "Filter: season={} writer={} type={}",
            filter.season.as_deref().unwrap_or("*"),
            filter.writer.as_deref().unwrap_or("*"),
            filter.kind.map(OrderKind::label).unwrap_or("*")
        );
    }

    println!("\nSummary");
    for row in &outcome.summary {
        println!("  {:<24} {}", row.label, row.value);
    }

    if !outcome.report.trend.is_empty() {
        println!("\nMonthly trend");
        for bucket in &outcome.report.trend {
            println!(
                "  {} {}: {} orders, {} completed",
                bucket.month, bucket.year, bucket.total, bucket.completed
            );
        }
    }
}

fn render_invoice(invoice: &Invoice, currency: &str) {
    let scope = invoice
        .project_type
        .map(OrderKind::label)
        .unwrap_or("All");
    println!(
        "Invoice {} for {} ({}, {}): {} projects, {} [{}]",
        invoice.id,
        invoice.supervisor_name,
        invoice.season,
        scope,
        invoice.project_count,
        format_money(invoice.total_amount, currency),
        invoice.payment_label()
    );
}

fn render_dashboard(stats: &DashboardStats) {
    println!(
        "Employees: {} ({} active)",
        stats.total_employees, stats.active_employees
    );
    println!(
        "Orders: {} total, {} completed, {} pending, {} overdue",
        stats.total_orders, stats.completed_orders, stats.pending_orders, stats.overdue_orders
    );
    println!("Seasons: {}", stats.seasons.join(", "));
    println!("Recent activity:");
    for entry in stats.activity.entries() {
        println!(
            "  {} {:?}: {}",
            entry.at.format("%Y-%m-%d %H:%M"),
            entry.kind,
            entry.description
        );
    }
}
