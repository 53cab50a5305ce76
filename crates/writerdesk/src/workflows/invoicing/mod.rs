//! Invoice assembly from writer/season cohorts.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{Invoice, InvoiceCohort, InvoiceFilter, InvoiceRequest, InvoiceSortKey};
pub use router::invoice_router;
pub use service::InvoiceService;
