use serde::Serialize;
use std::io::Write;

use super::SpreadsheetError;
use crate::workflows::staff::Employee;

#[derive(Serialize)]
struct RosterRow<'a> {
    #[serde(rename = "Employee Name")]
    employee_name: &'a str,
    #[serde(rename = "Hire Date")]
    hire_date: String,
    #[serde(rename = "Department")]
    department: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Phone Number")]
    phone_number: &'a str,
    #[serde(rename = "Performance Score")]
    performance_score: u8,
}

impl<'a> From<&'a Employee> for RosterRow<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            employee_name: &employee.employee_name,
            hire_date: employee.hire_date.format("%m/%d/%Y").to_string(),
            department: &employee.department,
            position: &employee.position,
            status: employee.status.label(),
            phone_number: &employee.phone_number,
            performance_score: employee.performance_score,
        }
    }
}

/// Writes the staff roster, one employee per row.
pub fn write_roster<W: Write>(writer: W, employees: &[Employee]) -> Result<(), SpreadsheetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if employees.is_empty() {
        csv_writer.write_record([
            "Employee Name",
            "Hire Date",
            "Department",
            "Position",
            "Status",
            "Phone Number",
            "Performance Score",
        ])?;
    }
    for employee in employees {
        csv_writer.serialize(RosterRow::from(employee))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentId;
    use crate::workflows::staff::EmployeeStatus;
    use chrono::{NaiveDate, Utc};

    fn employee(name: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: DocumentId::generate("emp"),
            employee_name: name.to_string(),
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date"),
            department: "Writing".to_string(),
            position: "Editor, Senior".to_string(),
            status,
            phone_number: "0712 345 678".to_string(),
            performance_score: 88,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn roster_rows_follow_the_header() {
        let mut buffer = Vec::new();
        write_roster(
            &mut buffer,
            &[
                employee("Achieng Odhiambo", EmployeeStatus::Active),
                employee("Brian Kiprono", EmployeeStatus::Inactive),
            ],
        )
        .expect("export succeeds");

        let text = String::from_utf8(buffer).expect("utf8 output");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Employee Name,Hire Date,Department,Position,Status,Phone Number,Performance Score"
        );
        assert_eq!(
            lines[1],
            "Achieng Odhiambo,03/09/2024,Writing,\"Editor, Senior\",Active,0712 345 678,88"
        );
        assert!(lines[2].contains(",Inactive,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_roster_still_has_a_header() {
        let mut buffer = Vec::new();
        write_roster(&mut buffer, &[]).expect("export succeeds");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8 output").trim_end(),
            "Employee Name,Hire Date,Department,Position,Status,Phone Number,Performance Score"
        );
    }
}
