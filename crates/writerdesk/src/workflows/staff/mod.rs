//! Writer roster: the employees orders are assigned to.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{Employee, EmployeeFilter, EmployeeSortKey, EmployeeStatus, EmployeeSubmission};
pub use router::staff_router;
pub use service::StaffService;
