//! Aggregates over order and staff collections for the dashboard and reports screens.

pub mod activity;
pub mod summary;
pub mod trend;
pub mod views;

pub use activity::{ActivityEntry, ActivityFeed, ActivityKind, FEED_LENGTH};
pub use summary::{
    ByKind, ByStatus, CompletionCategory, OrderReport, ReportFilter, HIGH_COMPLETION_RATE,
};
pub use trend::{monthly_trend, TrendBucket, TREND_MONTHS};
pub use views::{DashboardStats, SummaryRow};
