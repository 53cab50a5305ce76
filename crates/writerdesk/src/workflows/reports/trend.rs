use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use super::summary::ByKind;
use crate::workflows::orders::{Order, OrderStatus};

/// Trailing calendar months shown in the trend series, current month included.
pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    /// Month abbreviation, e.g. `Jan`.
    pub month: String,
    pub year: i32,
    pub total: usize,
    pub completed: usize,
    pub by_kind: ByKind<usize>,
}

impl TrendBucket {
    fn empty(start: NaiveDate) -> Self {
        Self {
            month: start.format("%b").to_string(),
            year: start.year(),
            total: 0,
            completed: 0,
            by_kind: ByKind::default(),
        }
    }
}

/// Six buckets keyed by month and year of the due date, oldest first. Orders outside the window
/// are ignored; months without orders stay as zero buckets.
pub fn monthly_trend<'a, I>(orders: I, today: NaiveDate) -> Vec<TrendBucket>
where
    I: IntoIterator<Item = &'a Order>,
{
    let current = today.with_day(1).unwrap_or(today);
    let starts: Vec<NaiveDate> = (0..TREND_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect();
    let mut buckets: Vec<TrendBucket> = starts.iter().copied().map(TrendBucket::empty).collect();

    for order in orders {
        let due = order.details.submission_date;
        let slot = starts
            .iter()
            .position(|start| start.year() == due.year() && start.month() == due.month());

        if let Some(index) = slot {
            let bucket = &mut buckets[index];
            bucket.total += 1;
            *bucket.by_kind.get_mut(order.kind) += 1;
            if order.details.status == OrderStatus::Completed {
                bucket.completed += 1;
            }
        }
    }

    buckets
}
