//! Overdue detection, priority ranking and badge colouring.

use super::domain::OrderStatus;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Orders due within this many days (and not yet completed) rank as due soon.
pub const DUE_SOON_DAYS: i64 = 3;

pub fn is_overdue(status: OrderStatus, submission_date: NaiveDate, today: NaiveDate) -> bool {
    status != OrderStatus::Completed && submission_date < today
}

/// Ordinal rank used for the default order listing; lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Overdue = 0,
    DueSoon = 1,
    Open = 2,
    Completed = 3,
}

impl Priority {
    pub const fn score(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::DueSoon => "Due Soon",
            Self::Open => "Open",
            Self::Completed => "Completed",
        }
    }
}

pub fn priority(status: OrderStatus, submission_date: NaiveDate, today: NaiveDate) -> Priority {
    if status == OrderStatus::Completed {
        Priority::Completed
    } else if submission_date < today {
        Priority::Overdue
    } else if (submission_date - today).num_days() <= DUE_SOON_DAYS {
        Priority::DueSoon
    } else {
        Priority::Open
    }
}

pub fn priority_score(status: OrderStatus, submission_date: NaiveDate, today: NaiveDate) -> u8 {
    priority(status, submission_date, today).score()
}

/// Priority first, then the earlier due date.
pub fn compare_priority(
    left: (OrderStatus, NaiveDate),
    right: (OrderStatus, NaiveDate),
    today: NaiveDate,
) -> Ordering {
    priority(left.0, left.1, today)
        .cmp(&priority(right.0, right.1, today))
        .then_with(|| left.1.cmp(&right.1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Danger,
    Success,
    Warning,
    Info,
}

impl BadgeVariant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

pub fn badge_variant(status: OrderStatus, overdue: bool) -> BadgeVariant {
    if overdue && status != OrderStatus::Completed {
        return BadgeVariant::Danger;
    }

    match status {
        OrderStatus::Completed => BadgeVariant::Success,
        OrderStatus::InProgress => BadgeVariant::Warning,
        OrderStatus::Pending => BadgeVariant::Info,
    }
}
