//! Orders: normal orders and dissertations share one pricing, payment and progress model.
//!
//! Budgets and balances are derived on every write and never accepted from callers.

pub mod domain;
pub mod pricing;
pub mod query;
pub mod router;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ImportRow, Order, OrderDetails, OrderFields, OrderKind, OrderStatus, OrderSubmission,
    PaymentLedger, PaymentUpdate, PricingInputs,
};
pub use pricing::{
    compute_budget, compute_remaining_balance, PricingDefaults, DISSERTATION_PRICING,
    NORMAL_PRICING, WORDS_PER_PAGE,
};
pub use query::{priority_sort, OrderFilter, OrderSortKey};
pub use router::{order_router, CreateOrderRequest, OrderListParams, OrderView};
pub use schedule::{
    badge_variant, compare_priority, is_overdue, priority, priority_score, BadgeVariant, Priority,
    DUE_SOON_DAYS,
};
pub use service::{ImportSummary, OrderService, RejectedRow};
