use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Ordering;

use super::domain::{Order, OrderKind, OrderStatus};
use super::schedule::compare_priority;
use crate::store::{Document, DocumentId, Sort, SortDirection};

/// Listing filter for orders. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    pub kind: Option<OrderKind>,
    #[serde(default)]
    pub writer: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Case-insensitive match over project name, writer, status label and season.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub due_from: Option<NaiveDate>,
    #[serde(default)]
    pub due_to: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn for_kind(kind: OrderKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Cohort selection used for invoicing: exact writer and season, optional kind.
    pub fn cohort(supervisor_name: &str, season: &str, kind: Option<OrderKind>) -> Self {
        Self {
            kind,
            writer: Some(supervisor_name.trim().to_string()),
            season: Some(season.trim().to_string()),
            ..Self::default()
        }
    }
}

fn text_matches(expected: &Option<String>, actual: &str) -> bool {
    match expected {
        Some(value) if !value.trim().is_empty() => value.trim() == actual,
        _ => true,
    }
}

impl Document for Order {
    type Filter = OrderFilter;
    type SortKey = OrderSortKey;

    const COLLECTION: &'static str = "orders";
    const ID_PREFIX: &'static str = "ord";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        if filter.kind.is_some_and(|kind| kind != self.kind) {
            return false;
        }
        if filter.status.is_some_and(|status| status != self.details.status) {
            return false;
        }
        if !text_matches(&filter.writer, &self.details.supervisor_name)
            || !text_matches(&filter.season, &self.details.season)
        {
            return false;
        }
        if filter
            .due_from
            .is_some_and(|from| self.details.submission_date < from)
            || filter
                .due_to
                .is_some_and(|to| self.details.submission_date > to)
        {
            return false;
        }

        match filter.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [
                    self.details.project_name.as_str(),
                    self.details.supervisor_name.as_str(),
                    self.details.status.label(),
                    self.details.season.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    fn compare(&self, other: &Self, key: &OrderSortKey) -> Ordering {
        let (a, b) = (&self.details, &other.details);
        match key {
            OrderSortKey::ProjectName => a.project_name.cmp(&b.project_name),
            OrderSortKey::Writer => a.supervisor_name.cmp(&b.supervisor_name),
            OrderSortKey::Status => a.status.label().cmp(b.status.label()),
            OrderSortKey::Season => a.season.cmp(&b.season),
            OrderSortKey::HasCode => self.pricing.has_code.cmp(&other.pricing.has_code),
            OrderSortKey::Budget => self.budget.total_cmp(&other.budget),
            OrderSortKey::WordCount => self.pricing.word_count.cmp(&other.pricing.word_count),
            OrderSortKey::CostPerPage => self
                .pricing
                .cost_per_page
                .total_cmp(&other.pricing.cost_per_page),
            OrderSortKey::CodePrice => self.pricing.code_price.total_cmp(&other.pricing.code_price),
            OrderSortKey::Progress => a.progress.cmp(&b.progress),
            OrderSortKey::TotalPaid => compare_money(self.total_paid(), other.total_paid()),
            OrderSortKey::RemainingBalance => {
                compare_money(self.remaining_balance(), other.remaining_balance())
            }
            OrderSortKey::OrderDate => a.order_date.cmp(&b.order_date),
            OrderSortKey::SubmissionDate => a.submission_date.cmp(&b.submission_date),
            OrderSortKey::Priority(today) => compare_priority(
                (a.status, a.submission_date),
                (b.status, b.submission_date),
                *today,
            ),
        }
    }

    /// Most recent due date first.
    fn default_order(&self, other: &Self) -> Ordering {
        other
            .details
            .submission_date
            .cmp(&self.details.submission_date)
            .then_with(|| self.id.cmp(&other.id))
    }
}

fn compare_money(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0))
}

/// Sortable order columns. Priority ordering depends on the day it is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortKey {
    ProjectName,
    Writer,
    Status,
    Season,
    HasCode,
    Budget,
    WordCount,
    CostPerPage,
    CodePrice,
    Progress,
    TotalPaid,
    RemainingBalance,
    OrderDate,
    SubmissionDate,
    Priority(NaiveDate),
}

impl OrderSortKey {
    /// Parses a column name as used in query strings (`budget`, `submission_date`, ...).
    pub fn parse(raw: &str, today: NaiveDate) -> Option<Self> {
        let key = match raw.trim().to_ascii_lowercase().as_str() {
            "project_name" => Self::ProjectName,
            "writer" | "supervisor_name" => Self::Writer,
            "status" => Self::Status,
            "season" => Self::Season,
            "has_code" => Self::HasCode,
            "budget" => Self::Budget,
            "word_count" => Self::WordCount,
            "cost_per_page" => Self::CostPerPage,
            "code_price" => Self::CodePrice,
            "progress" => Self::Progress,
            "total_paid" => Self::TotalPaid,
            "remaining_balance" => Self::RemainingBalance,
            "order_date" => Self::OrderDate,
            "submission_date" => Self::SubmissionDate,
            "priority" => Self::Priority(today),
            _ => return None,
        };
        Some(key)
    }
}

/// Default list ordering: overdue first, then due soon, open, completed.
pub fn priority_sort(today: NaiveDate) -> Sort<OrderSortKey> {
    Sort {
        key: OrderSortKey::Priority(today),
        direction: SortDirection::Asc,
    }
}
