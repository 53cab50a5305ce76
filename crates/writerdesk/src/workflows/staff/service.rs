use std::sync::Arc;

use super::domain::{Employee, EmployeeSubmission};
use crate::store::{Document, DocumentId, ListQuery, Page, Repository, RepositoryError};
use crate::workflows::errors::LedgerError;

/// Writer roster maintenance.
pub struct StaffService<R> {
    repository: Arc<R>,
}

impl<R> StaffService<R>
where
    R: Repository<Employee> + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn create(&self, submission: EmployeeSubmission) -> Result<Employee, LedgerError> {
        let employee = submission
            .validate()?
            .into_employee(DocumentId::generate(Employee::ID_PREFIX));
        let stored = self.repository.insert(employee)?;
        tracing::info!(
            collection = Employee::COLLECTION,
            employee_id = %stored.id,
            "employee added"
        );
        Ok(stored)
    }

    pub fn update(
        &self,
        id: &DocumentId,
        submission: EmployeeSubmission,
    ) -> Result<Employee, LedgerError> {
        let fields = submission.validate()?;
        if self.repository.fetch(id)?.is_none() {
            return Err(RepositoryError::NotFound.into());
        }

        let employee = fields.into_employee(id.clone());
        self.repository.update(employee.clone())?;
        tracing::info!(
            collection = Employee::COLLECTION,
            employee_id = %id,
            "employee updated"
        );
        Ok(employee)
    }

    pub fn delete(&self, id: &DocumentId) -> Result<(), LedgerError> {
        self.repository.delete(id)?;
        tracing::info!(collection = Employee::COLLECTION, employee_id = %id, "employee deleted");
        Ok(())
    }

    pub fn get(&self, id: &DocumentId) -> Result<Employee, LedgerError> {
        self.repository
            .fetch(id)?
            .ok_or(LedgerError::Persistence(RepositoryError::NotFound))
    }

    pub fn list(&self, query: &ListQuery<Employee>) -> Result<Page<Employee>, LedgerError> {
        Ok(self.repository.list(query)?)
    }

    pub fn all(&self) -> Result<Vec<Employee>, LedgerError> {
        Ok(self.repository.list(&ListQuery::all())?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryCollection, Sort};
    use crate::workflows::errors::ValidationError;
    use crate::workflows::staff::{EmployeeFilter, EmployeeSortKey, EmployeeStatus};
    use chrono::NaiveDate;

    fn submission(name: &str, hired: (i32, u32, u32)) -> EmployeeSubmission {
        EmployeeSubmission {
            employee_name: format!(" {name} "),
            hire_date: NaiveDate::from_ymd_opt(hired.0, hired.1, hired.2),
            department: "Research".to_string(),
            position: "Writer".to_string(),
            status: EmployeeStatus::Active,
            phone_number: "+254 700 000 111".to_string(),
            performance_score: 80.0,
        }
    }

    fn service() -> StaffService<InMemoryCollection<Employee>> {
        StaffService::new(Arc::new(InMemoryCollection::default()))
    }

    #[test]
    fn create_trims_and_assigns_prefixed_id() {
        let staff = service();
        let employee = staff
            .create(submission("Achieng", (2024, 1, 10)))
            .expect("employee created");
        assert_eq!(employee.employee_name, "Achieng");
        assert!(employee.id.as_str().starts_with("emp-"));
    }

    #[test]
    fn create_requires_phone_number() {
        let staff = service();
        let mut form = submission("Achieng", (2024, 1, 10));
        form.phone_number = String::new();
        assert!(matches!(
            staff.create(form),
            Err(LedgerError::Validation(ValidationError::MissingField(
                "phone_number"
            )))
        ));
    }

    #[test]
    fn update_overwrites_existing_and_rejects_unknown() {
        let staff = service();
        let employee = staff
            .create(submission("Achieng", (2024, 1, 10)))
            .expect("employee created");

        let mut form = submission("Achieng Odhiambo", (2024, 1, 10));
        form.status = EmployeeStatus::Inactive;
        let updated = staff.update(&employee.id, form).expect("update succeeds");
        assert_eq!(updated.employee_name, "Achieng Odhiambo");
        assert!(!updated.is_active());

        let missing = DocumentId::from("emp-404404");
        assert!(matches!(
            staff.update(&missing, submission("X", (2024, 1, 1))),
            Err(LedgerError::Persistence(RepositoryError::NotFound))
        ));
    }

    #[test]
    fn default_listing_is_newest_hire_first() {
        let staff = service();
        staff.create(submission("Older", (2022, 3, 1))).expect("created");
        staff.create(submission("Newer", (2025, 3, 1))).expect("created");

        let names: Vec<_> = staff
            .all()
            .expect("list succeeds")
            .into_iter()
            .map(|employee| employee.employee_name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn search_matches_department_and_phone() {
        let staff = service();
        staff.create(submission("Achieng", (2024, 1, 10))).expect("created");
        let mut form = submission("Otieno", (2024, 2, 10));
        form.department = "Editing".to_string();
        form.phone_number = "0711 222 333".to_string();
        staff.create(form).expect("created");

        let query = ListQuery::new(EmployeeFilter {
            search: Some("edit".to_string()),
            ..EmployeeFilter::default()
        });
        let page = staff.list(&query).expect("list succeeds");
        assert_eq!(page.total_items, 1);

        let query = ListQuery::new(EmployeeFilter {
            search: Some("0711".to_string()),
            ..EmployeeFilter::default()
        })
        .sorted(Sort::desc(EmployeeSortKey::Performance));
        let page = staff.list(&query).expect("list succeeds");
        assert_eq!(page.items[0].employee_name, "Otieno");
    }
}
