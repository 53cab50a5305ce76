use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trend::{monthly_trend, TrendBucket};
use crate::store::Document;
use crate::workflows::orders::{Order, OrderFilter, OrderKind, OrderStatus};

/// Completion rate at or above this is reported as "High".
pub const HIGH_COMPLETION_RATE: f64 = 0.75;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ByStatus<T> {
    pub pending: T,
    pub in_progress: T,
    pub completed: T,
}

impl<T> ByStatus<T> {
    pub fn get(&self, status: OrderStatus) -> &T {
        match status {
            OrderStatus::Pending => &self.pending,
            OrderStatus::InProgress => &self.in_progress,
            OrderStatus::Completed => &self.completed,
        }
    }

    fn get_mut(&mut self, status: OrderStatus) -> &mut T {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::InProgress => &mut self.in_progress,
            OrderStatus::Completed => &mut self.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ByKind<T> {
    pub normal: T,
    pub dissertation: T,
}

impl<T> ByKind<T> {
    pub fn get(&self, kind: OrderKind) -> &T {
        match kind {
            OrderKind::Normal => &self.normal,
            OrderKind::Dissertation => &self.dissertation,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: OrderKind) -> &mut T {
        match kind {
            OrderKind::Normal => &mut self.normal,
            OrderKind::Dissertation => &mut self.dissertation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionCategory {
    High,
    Moderate,
}

impl CompletionCategory {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= HIGH_COMPLETION_RATE {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
        }
    }
}

/// Narrows a report to one season and/or writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub writer: Option<String>,
    #[serde(default)]
    pub kind: Option<OrderKind>,
}

impl ReportFilter {
    pub fn order_filter(&self) -> OrderFilter {
        OrderFilter {
            kind: self.kind,
            writer: self.writer.clone(),
            season: self.season.clone(),
            ..OrderFilter::default()
        }
    }

    pub fn select<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        let filter = self.order_filter();
        orders.iter().filter(|order| order.matches(&filter)).collect()
    }
}

/// Counts and sums over a set of orders, evaluated for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReport {
    pub today: NaiveDate,
    pub total_orders: usize,
    pub by_status: ByStatus<usize>,
    pub by_kind: ByKind<usize>,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub total_budget: f64,
    pub budget_by_kind: ByKind<f64>,
    pub budget_by_status: ByStatus<f64>,
    pub completion_rate: f64,
    pub completion_category: CompletionCategory,
    pub trend: Vec<TrendBucket>,
}

impl OrderReport {
    pub fn build<'a, I>(orders: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
        I::IntoIter: Clone,
    {
        let orders = orders.into_iter();
        let mut by_status = ByStatus::<usize>::default();
        let mut by_kind = ByKind::<usize>::default();
        let mut budget_by_status = ByStatus::<f64>::default();
        let mut budget_by_kind = ByKind::<f64>::default();
        let mut total_orders = 0;
        let mut overdue = 0;
        let mut total_budget = 0.0;

        for order in orders.clone() {
            let status = order.details.status;
            total_orders += 1;
            *by_status.get_mut(status) += 1;
            *by_kind.get_mut(order.kind) += 1;
            *budget_by_status.get_mut(status) += order.budget;
            *budget_by_kind.get_mut(order.kind) += order.budget;
            total_budget += order.budget;
            if order.is_overdue(today) {
                overdue += 1;
            }
        }

        let completed = by_status.completed;
        let completion_rate = if total_orders == 0 {
            0.0
        } else {
            completed as f64 / total_orders as f64
        };

        Self {
            today,
            total_orders,
            completed,
            pending: by_status.pending,
            overdue,
            by_status,
            by_kind,
            total_budget,
            budget_by_kind,
            budget_by_status,
            completion_rate,
            completion_category: CompletionCategory::from_rate(completion_rate),
            trend: monthly_trend(orders, today),
        }
    }

    /// Completion rate as a percentage with one decimal, e.g. `66.7`.
    pub fn completion_percent(&self) -> f64 {
        (self.completion_rate * 1000.0).round() / 10.0
    }
}
