use chrono::NaiveDate;
use std::io::Write;

use super::SpreadsheetError;
use crate::workflows::invoicing::InvoiceCohort;
use crate::workflows::orders::Order;

/// Exportable order columns, in the order the screens show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ProjectName,
    OrderDate,
    SubmissionDate,
    Writer,
    Season,
    Status,
    Kind,
    Budget,
    WordCount,
    HasCode,
    CostPerPage,
    CodePrice,
    Progress,
    WordsPaid,
    AmountPaid,
    Balance,
    FullyPaid,
    DatePaid,
    Overdue,
}

impl Column {
    pub const ALL: [Column; 19] = [
        Column::ProjectName,
        Column::OrderDate,
        Column::SubmissionDate,
        Column::Writer,
        Column::Season,
        Column::Status,
        Column::Kind,
        Column::Budget,
        Column::WordCount,
        Column::HasCode,
        Column::CostPerPage,
        Column::CodePrice,
        Column::Progress,
        Column::WordsPaid,
        Column::AmountPaid,
        Column::Balance,
        Column::FullyPaid,
        Column::DatePaid,
        Column::Overdue,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Column::ProjectName => "Project Name",
            Column::OrderDate => "Order Date",
            Column::SubmissionDate => "Submission Date",
            Column::Writer => "Writer",
            Column::Season => "Season",
            Column::Status => "Status",
            Column::Kind => "Type",
            Column::Budget => "Total Amount",
            Column::WordCount => "Word Count",
            Column::HasCode => "Has Code",
            Column::CostPerPage => "CPP",
            Column::CodePrice => "Code Price",
            Column::Progress => "Progress",
            Column::WordsPaid => "Words Paid",
            Column::AmountPaid => "Amount Paid",
            Column::Balance => "Balance",
            Column::FullyPaid => "Fully Paid",
            Column::DatePaid => "Date Paid",
            Column::Overdue => "Overdue",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.label().eq_ignore_ascii_case(wanted))
    }

    fn render(self, order: &Order, currency: &str, today: NaiveDate) -> String {
        let details = &order.details;
        let ledger = order.payment.as_ref();
        match self {
            Column::ProjectName => details.project_name.clone(),
            Column::OrderDate => details.order_date.to_string(),
            Column::SubmissionDate => details.submission_date.to_string(),
            Column::Writer => details.supervisor_name.clone(),
            Column::Season => details.season.clone(),
            Column::Status => details.status.label().to_string(),
            Column::Kind => order.kind.label().to_string(),
            Column::Budget => format_money(order.budget, currency),
            Column::WordCount => format_count(u64::from(order.pricing.word_count)),
            Column::HasCode => yes_no(order.pricing.has_code),
            Column::CostPerPage => format_money(order.pricing.cost_per_page, currency),
            Column::CodePrice => format_money(order.pricing.code_price, currency),
            Column::Progress => format!("{}%", details.progress),
            Column::WordsPaid => ledger
                .map(|paid| format_count(u64::from(paid.words_paid)))
                .unwrap_or_default(),
            Column::AmountPaid => ledger
                .map(|paid| format_money(paid.total_paid, currency))
                .unwrap_or_default(),
            Column::Balance => ledger
                .map(|paid| format_money(paid.remaining_balance, currency))
                .unwrap_or_default(),
            Column::FullyPaid => ledger.map(|paid| yes_no(paid.is_fully_paid)).unwrap_or_default(),
            Column::DatePaid => ledger
                .and_then(|paid| paid.date_paid)
                .map(|date| date.to_string())
                .unwrap_or_default(),
            Column::Overdue => yes_no(order.is_overdue(today)),
        }
    }
}

/// Columns written next to a generated invoice.
pub const INVOICE_COLUMNS: [Column; 7] = [
    Column::ProjectName,
    Column::OrderDate,
    Column::SubmissionDate,
    Column::Kind,
    Column::Status,
    Column::WordCount,
    Column::Budget,
];

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

/// Groups thousands with commas, e.g. `2,750`.
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// `<currency><grouped amount>` with at most two decimals, e.g. `Ksh.14,250` or `Ksh.727.27`.
pub fn format_money(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_digits(&(cents / 100).to_string());
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    if fraction == 0 {
        format!("{sign}{currency}{whole}")
    } else if fraction % 10 == 0 {
        format!("{sign}{currency}{whole}.{}", fraction / 10)
    } else {
        format!("{sign}{currency}{whole}.{fraction:02}")
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Writes order rows followed by a "Total Amount" row summing their budgets.
pub struct OrderSheetWriter {
    columns: Vec<Column>,
    currency: String,
    today: NaiveDate,
}

impl OrderSheetWriter {
    pub fn new(currency: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            columns: Column::ALL.to_vec(),
            currency: currency.into(),
            today,
        }
    }

    /// Restricts output to `columns`; an empty selection keeps every column.
    pub fn with_columns(mut self, columns: &[Column]) -> Self {
        if !columns.is_empty() {
            self.columns = columns.to_vec();
        }
        self
    }

    pub fn write<W: Write>(&self, writer: W, orders: &[Order]) -> Result<(), SpreadsheetError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.columns.iter().map(|column| column.label()))?;

        for order in orders {
            csv_writer.write_record(
                self.columns
                    .iter()
                    .map(|column| column.render(order, &self.currency, self.today)),
            )?;
        }

        let total: f64 = orders.iter().map(|order| order.budget).sum();
        csv_writer.write_record(self.total_row(total))?;
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_cohort<W: Write>(
        &self,
        writer: W,
        cohort: &InvoiceCohort,
    ) -> Result<(), SpreadsheetError> {
        self.write(writer, &cohort.orders)
    }

    /// One cell per column. The amount sits under "Total Amount" and the label under the
    /// title column; without a budget column both share the title cell.
    fn total_row(&self, total: f64) -> Vec<String> {
        let mut cells = vec![String::new(); self.columns.len()];
        let amount = format_money(total, &self.currency);
        let label = Column::Budget.label();
        let budget = self.columns.iter().position(|column| *column == Column::Budget);
        let title = self
            .columns
            .iter()
            .position(|column| *column == Column::ProjectName)
            .or_else(|| (0..self.columns.len()).find(|index| Some(*index) != budget));

        match (budget, title) {
            (Some(budget), Some(title)) => {
                cells[budget] = amount;
                cells[title] = label.to_string();
            }
            (Some(budget), None) => cells[budget] = amount,
            (None, Some(title)) => cells[title] = format!("{label}: {amount}"),
            (None, None) => {}
        }
        cells
    }
}
