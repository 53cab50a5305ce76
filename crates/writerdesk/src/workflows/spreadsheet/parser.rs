use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::errors::ValidationError;
use crate::workflows::input::{coerce_number, parse_date, parse_flag};
use crate::workflows::orders::{ImportRow, OrderKind, OrderStatus, OrderSubmission, PaymentUpdate};

pub(crate) fn parse_rows<R: Read>(
    reader: R,
    default_kind: OrderKind,
) -> Result<Vec<ImportRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        // Line 1 is the header row.
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);
        let row: SheetRow = record.deserialize(Some(&headers))?;

        if row.is_total_row() {
            continue;
        }

        let kind = row.kind();
        let submission = row.into_submission(kind.unwrap_or(default_kind));
        rows.push(ImportRow {
            line,
            kind,
            submission,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(
        rename = "Project Name",
        alias = "Dissertation Title",
        default,
        deserialize_with = "blank_as_none"
    )]
    project_name: Option<String>,
    #[serde(rename = "Order Date", default, deserialize_with = "blank_as_none")]
    order_date: Option<String>,
    #[serde(rename = "Submission Date", default, deserialize_with = "blank_as_none")]
    submission_date: Option<String>,
    #[serde(
        rename = "Writer",
        alias = "Supervisor Name",
        default,
        deserialize_with = "blank_as_none"
    )]
    writer: Option<String>,
    #[serde(rename = "Season", default, deserialize_with = "blank_as_none")]
    season: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "blank_as_none")]
    status: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "blank_as_none")]
    kind: Option<String>,
    #[serde(rename = "Word Count", default, deserialize_with = "blank_as_none")]
    word_count: Option<String>,
    #[serde(rename = "Has Code", default, deserialize_with = "blank_as_none")]
    has_code: Option<String>,
    #[serde(
        rename = "CPP",
        alias = "Cost Per Page",
        default,
        deserialize_with = "blank_as_none"
    )]
    cost_per_page: Option<String>,
    #[serde(rename = "Code Price", default, deserialize_with = "blank_as_none")]
    code_price: Option<String>,
    #[serde(rename = "Progress", default, deserialize_with = "blank_as_none")]
    progress: Option<String>,
    #[serde(rename = "Words Paid", default, deserialize_with = "blank_as_none")]
    words_paid: Option<String>,
    #[serde(rename = "Amount Paid", default, deserialize_with = "blank_as_none")]
    total_paid: Option<String>,
    #[serde(rename = "Fully Paid", default, deserialize_with = "blank_as_none")]
    fully_paid: Option<String>,
    #[serde(rename = "Date Paid", default, deserialize_with = "blank_as_none")]
    date_paid: Option<String>,
}

impl SheetRow {
    /// Exports end with a "Total Amount" summary row that carries no order, either as a bare
    /// label or as "Total Amount: <amount>" when the sheet has no amount column.
    fn is_total_row(&self) -> bool {
        let label = self.project_name.as_deref().unwrap_or_default();
        label.to_ascii_lowercase().starts_with("total amount") && self.submission_date.is_none()
    }

    fn kind(&self) -> Option<OrderKind> {
        self.kind.as_deref().and_then(OrderKind::from_label)
    }

    fn has_payment(&self) -> bool {
        self.words_paid.is_some()
            || self.total_paid.is_some()
            || self.fully_paid.is_some()
            || self.date_paid.is_some()
    }

    /// Sheets carry their own prices: a blank or unreadable CPP is zero, and only
    /// dissertations fall back to the standard code price.
    fn into_submission(self, kind: OrderKind) -> Result<OrderSubmission, ValidationError> {
        let code_price = match number(&self.code_price) {
            price if price == 0.0 && kind == OrderKind::Dissertation => {
                kind.default_pricing().code_price
            }
            price => price,
        };

        let payment = if self.has_payment() {
            Some(PaymentUpdate {
                words_paid: number(&self.words_paid),
                total_paid: number(&self.total_paid),
                date_paid: date("date_paid", &self.date_paid)?,
                is_fully_paid: self.fully_paid.as_deref().is_some_and(parse_flag),
            })
        } else {
            None
        };

        Ok(OrderSubmission {
            order_date: date("order_date", &self.order_date)?,
            submission_date: date("submission_date", &self.submission_date)?,
            project_name: self.project_name.unwrap_or_default(),
            supervisor_name: self.writer.unwrap_or_default(),
            season: self.season.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .and_then(OrderStatus::from_label)
                .unwrap_or_default(),
            word_count: number(&self.word_count),
            cost_per_page: Some(number(&self.cost_per_page)),
            has_code: self.has_code.as_deref().is_some_and(parse_flag),
            code_price: Some(code_price),
            progress: number(&self.progress),
            payment,
        })
    }
}

fn number(cell: &Option<String>) -> f64 {
    cell.as_deref().map(coerce_number).unwrap_or_default()
}

fn date(
    field: &'static str,
    cell: &Option<String>,
) -> Result<Option<chrono::NaiveDate>, ValidationError> {
    match cell.as_deref() {
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidDate {
                field,
                value: raw.to_string(),
            }),
        None => Ok(None),
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
