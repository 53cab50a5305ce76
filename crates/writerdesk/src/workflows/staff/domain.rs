use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::store::{Document, DocumentId};
use crate::workflows::errors::ValidationError;
use crate::workflows::input::{deserialize_lenient_number, deserialize_optional_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// A writer on the roster. Orders reference writers by name, not by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: DocumentId,
    pub employee_name: String,
    pub hire_date: NaiveDate,
    pub department: String,
    pub position: String,
    pub status: EmployeeStatus,
    pub phone_number: String,
    pub performance_score: u8,
    pub updated_at: chrono::DateTime<Utc>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSubmission {
    #[serde(default)]
    pub employee_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub performance_score: f64,
}

pub(crate) struct EmployeeFields {
    employee_name: String,
    hire_date: NaiveDate,
    department: String,
    position: String,
    status: EmployeeStatus,
    phone_number: String,
    performance_score: u8,
}

impl EmployeeSubmission {
    pub(crate) fn validate(self) -> Result<EmployeeFields, ValidationError> {
        Ok(EmployeeFields {
            employee_name: ValidationError::required_text("employee_name", &self.employee_name)?,
            hire_date: self
                .hire_date
                .ok_or(ValidationError::MissingField("hire_date"))?,
            department: ValidationError::required_text("department", &self.department)?,
            position: ValidationError::required_text("position", &self.position)?,
            status: self.status,
            phone_number: ValidationError::required_text("phone_number", &self.phone_number)?,
            performance_score: ValidationError::percentage(
                "performance_score",
                self.performance_score,
            )?,
        })
    }
}

impl EmployeeFields {
    pub(crate) fn into_employee(self, id: DocumentId) -> Employee {
        Employee {
            id,
            employee_name: self.employee_name,
            hire_date: self.hire_date,
            department: self.department,
            position: self.position,
            status: self.status,
            phone_number: self.phone_number,
            performance_score: self.performance_score,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeFilter {
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    /// Case-insensitive over name, department, position and status; phone numbers match as typed.
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSortKey {
    Name,
    HireDate,
    Department,
    Performance,
}

impl EmployeeSortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "employee_name" | "name" => Some(Self::Name),
            "hire_date" => Some(Self::HireDate),
            "department" => Some(Self::Department),
            "performance_score" | "performance" => Some(Self::Performance),
            _ => None,
        }
    }
}

impl Document for Employee {
    type Filter = EmployeeFilter;
    type SortKey = EmployeeSortKey;

    const COLLECTION: &'static str = "employees";
    const ID_PREFIX: &'static str = "emp";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn matches(&self, filter: &EmployeeFilter) -> bool {
        if filter.status.is_some_and(|status| status != self.status) {
            return false;
        }

        match filter.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let lowered = needle.to_lowercase();
                [
                    self.employee_name.as_str(),
                    self.department.as_str(),
                    self.position.as_str(),
                    self.status.label(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&lowered))
                    || self.phone_number.contains(needle)
            }
            _ => true,
        }
    }

    fn compare(&self, other: &Self, key: &EmployeeSortKey) -> Ordering {
        match key {
            EmployeeSortKey::Name => self.employee_name.cmp(&other.employee_name),
            EmployeeSortKey::HireDate => self.hire_date.cmp(&other.hire_date),
            EmployeeSortKey::Department => self.department.cmp(&other.department),
            EmployeeSortKey::Performance => self.performance_score.cmp(&other.performance_score),
        }
    }

    /// Newest hires first.
    fn default_order(&self, other: &Self) -> Ordering {
        other
            .hire_date
            .cmp(&self.hire_date)
            .then_with(|| self.id.cmp(&other.id))
    }
}
