use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use super::activity::ActivityFeed;
use super::summary::OrderReport;
use super::trend::TrendBucket;
use crate::workflows::orders::{Order, OrderKind, OrderStatus};
use crate::workflows::spreadsheet::format_money;
use crate::workflows::staff::Employee;

/// Label/value pair for console and spreadsheet summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

impl OrderReport {
    pub fn summary_rows(&self, currency: &str) -> Vec<SummaryRow> {
        let mut rows = vec![
            SummaryRow::new("Total Projects", self.total_orders),
            SummaryRow::new(
                "Completion Rate",
                format!(
                    "{:.1}% ({})",
                    self.completion_percent(),
                    self.completion_category.label()
                ),
            ),
            SummaryRow::new("Overdue", self.overdue),
            SummaryRow::new("Total Amount", format_money(self.total_budget, currency)),
        ];

        for kind in OrderKind::ordered() {
            rows.push(SummaryRow::new(
                format!("{} Projects", kind.label()),
                format!(
                    "{} / {}",
                    self.by_kind.get(kind),
                    format_money(*self.budget_by_kind.get(kind), currency)
                ),
            ));
        }
        for status in OrderStatus::ordered() {
            rows.push(SummaryRow::new(
                status.label(),
                format!(
                    "{} / {}",
                    self.by_status.get(status),
                    format_money(*self.budget_by_status.get(status), currency)
                ),
            ));
        }

        rows
    }
}

/// Everything the dashboard screen renders in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_employees: usize,
    pub active_employees: usize,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub overdue_orders: usize,
    /// Distinct seasons, newest label first.
    pub seasons: Vec<String>,
    pub writers: Vec<String>,
    pub trend: Vec<TrendBucket>,
    pub activity: ActivityFeed,
}

impl DashboardStats {
    pub fn build(
        orders: &[Order],
        employees: &[Employee],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        let report = OrderReport::build(orders, today);
        let seasons: BTreeSet<&str> = orders
            .iter()
            .map(|order| order.details.season.as_str())
            .collect();
        let writers: BTreeSet<&str> = orders
            .iter()
            .map(|order| order.details.supervisor_name.as_str())
            .collect();

        Self {
            total_employees: employees.len(),
            active_employees: employees.iter().filter(|e| e.is_active()).count(),
            total_orders: report.total_orders,
            completed_orders: report.completed,
            pending_orders: report.pending,
            overdue_orders: report.overdue,
            seasons: seasons.into_iter().rev().map(str::to_string).collect(),
            writers: writers.into_iter().map(str::to_string).collect(),
            trend: report.trend,
            activity: ActivityFeed::build(orders, employees, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentId;
    use crate::workflows::orders::{OrderDetails, PricingInputs};
    use crate::workflows::staff::EmployeeStatus;

    fn order(season: &str, writer: &str, status: OrderStatus) -> Order {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date");
        Order {
            id: DocumentId::generate("ord"),
            kind: OrderKind::Normal,
            details: OrderDetails {
                project_name: "Essay".to_string(),
                order_date: date,
                submission_date: date,
                supervisor_name: writer.to_string(),
                season: season.to_string(),
                status,
                progress: 0,
            },
            pricing: PricingInputs {
                word_count: 2750,
                cost_per_page: 200.0,
                has_code: false,
                code_price: 500.0,
            },
            budget: 2000.0,
            payment: None,
            updated_at: Utc::now(),
        }
    }

    fn employee(status: EmployeeStatus) -> Employee {
        Employee {
            id: DocumentId::generate("emp"),
            employee_name: "Wanjiru".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date"),
            department: "Research".to_string(),
            position: "Writer".to_string(),
            status,
            phone_number: "0700".to_string(),
            performance_score: 50,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn dashboard_collects_selectors_and_staff_counts() {
        let orders = vec![
            order("2024", "Otieno", OrderStatus::Completed),
            order("2025", "Achieng", OrderStatus::Pending),
            order("2025", "Otieno", OrderStatus::InProgress),
        ];
        let employees = vec![
            employee(EmployeeStatus::Active),
            employee(EmployeeStatus::Inactive),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 4, 10).expect("valid date");

        let stats = DashboardStats::build(&orders, &employees, today, Utc::now());
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.active_employees, 1);
        assert_eq!(stats.overdue_orders, 2);
        assert_eq!(stats.seasons, vec!["2025", "2024"]);
        assert_eq!(stats.writers, vec!["Achieng", "Otieno"]);
        assert_eq!(stats.activity.entries().len(), 5);
    }

    #[test]
    fn summary_rows_format_money() {
        let orders = vec![order("2025", "Otieno", OrderStatus::Completed)];
        let today = NaiveDate::from_ymd_opt(2025, 4, 10).expect("valid date");
        let report = OrderReport::build(&orders, today);
        let rows = report.summary_rows("Ksh.");

        assert_eq!(rows[0], SummaryRow::new("Total Projects", 1));
        assert_eq!(rows[1].value, "100.0% (High)");
        assert_eq!(rows[3].value, "Ksh.2,000");
    }
}
