//! Business workflows: orders, staff, invoicing, reporting and spreadsheet exchange.

pub mod errors;
pub mod input;
pub mod invoicing;
pub mod orders;
pub mod reports;
pub mod spreadsheet;
pub mod staff;

pub use errors::{LedgerError, ValidationError};
