use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::workflows::orders::Order;
use crate::workflows::staff::Employee;

/// The feed always holds exactly this many entries.
pub const FEED_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Order,
    Hire,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub description: String,
    pub at: DateTime<Utc>,
}

/// Most-recent-first list of order changes and hires, padded with system entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActivityFeed {
    entries: Vec<ActivityEntry>,
}

impl ActivityFeed {
    pub fn build(orders: &[Order], employees: &[Employee], now: DateTime<Utc>) -> Self {
        let mut events: Vec<ActivityEntry> = orders
            .iter()
            .map(|order| ActivityEntry {
                kind: ActivityKind::Order,
                description: format!(
                    "{} ({}) is {}",
                    order.details.project_name,
                    order.details.supervisor_name,
                    order.details.status.label()
                ),
                at: order.updated_at,
            })
            .chain(employees.iter().map(|employee| ActivityEntry {
                kind: ActivityKind::Hire,
                description: format!(
                    "{} joined as {}",
                    employee.employee_name, employee.position
                ),
                at: employee.hire_date.and_time(NaiveTime::MIN).and_utc(),
            }))
            .collect();

        events.sort_by(|a, b| b.at.cmp(&a.at));
        events.truncate(FEED_LENGTH);
        while events.len() < FEED_LENGTH {
            events.push(ActivityEntry {
                kind: ActivityKind::System,
                description: "System check completed".to_string(),
                at: now,
            });
        }

        Self { entries: events }
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }
}
