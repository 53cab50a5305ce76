use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::store::{Document, DocumentId};
use crate::workflows::errors::ValidationError;
use crate::workflows::orders::{Order, OrderKind};

/// Billing snapshot for one writer's season. Totals are fixed at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: DocumentId,
    pub supervisor_name: String,
    pub season: String,
    pub project_type: Option<OrderKind>,
    pub total_amount: f64,
    pub project_count: usize,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn payment_label(&self) -> &'static str {
        if self.is_paid {
            "Paid"
        } else {
            "Unpaid"
        }
    }
}

/// Orders selected for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceCohort {
    pub supervisor_name: String,
    pub season: String,
    pub project_type: Option<OrderKind>,
    pub orders: Vec<Order>,
}

impl InvoiceCohort {
    pub fn total_amount(&self) -> f64 {
        self.orders.iter().map(|order| order.budget).sum()
    }

    pub fn project_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    #[serde(default)]
    pub supervisor_name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub project_type: Option<OrderKind>,
}

impl InvoiceRequest {
    pub(crate) fn validate(&self) -> Result<(String, String), ValidationError> {
        Ok((
            ValidationError::required_text("supervisor_name", &self.supervisor_name)?,
            ValidationError::required_text("season", &self.season)?,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InvoiceFilter {
    #[serde(default)]
    pub supervisor_name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub is_paid: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceSortKey {
    Writer,
    Season,
    TotalAmount,
    ProjectCount,
    IsPaid,
    CreatedAt,
}

impl InvoiceSortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "supervisor_name" | "writer" => Some(Self::Writer),
            "season" => Some(Self::Season),
            "total_amount" => Some(Self::TotalAmount),
            "project_count" => Some(Self::ProjectCount),
            "is_paid" => Some(Self::IsPaid),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

impl Document for Invoice {
    type Filter = InvoiceFilter;
    type SortKey = InvoiceSortKey;

    const COLLECTION: &'static str = "invoices";
    const ID_PREFIX: &'static str = "inv";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn matches(&self, filter: &InvoiceFilter) -> bool {
        let same = |expected: &Option<String>, actual: &str| {
            expected
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map_or(true, |value| value == actual)
        };

        same(&filter.supervisor_name, &self.supervisor_name)
            && same(&filter.season, &self.season)
            && filter.is_paid.map_or(true, |paid| paid == self.is_paid)
    }

    fn compare(&self, other: &Self, key: &InvoiceSortKey) -> Ordering {
        match key {
            InvoiceSortKey::Writer => self.supervisor_name.cmp(&other.supervisor_name),
            InvoiceSortKey::Season => self.season.cmp(&other.season),
            InvoiceSortKey::TotalAmount => self.total_amount.total_cmp(&other.total_amount),
            InvoiceSortKey::ProjectCount => self.project_count.cmp(&other.project_count),
            InvoiceSortKey::IsPaid => self.is_paid.cmp(&other.is_paid),
            InvoiceSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn default_order(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}
