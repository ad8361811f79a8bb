use crate::models::AttendanceStatus;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Field name to message. Empty means the input may be submitted.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Raw employee form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeInput<'a> {
    pub employee_id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub department: &'a str,
}

/// Raw attendance form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceInput<'a> {
    pub employee_id: &'a str,
    pub date: &'a str,
    pub status: &'a str,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn validate_employee(input: &EmployeeInput<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if input.employee_id.trim().is_empty() {
        errors.insert("employee_id", "Employee ID is required".into());
    }
    if input.full_name.trim().is_empty() {
        errors.insert("full_name", "Full Name is required".into());
    }
    if input.email.trim().is_empty() {
        errors.insert("email", "Email is required".into());
    } else if !is_valid_email(input.email) {
        errors.insert("email", "Please enter a valid email address".into());
    }
    if input.department.trim().is_empty() {
        errors.insert("department", "Department is required".into());
    }

    errors
}

/// Dates after `today` are rejected here only; the server accepts them.
pub fn validate_attendance(input: &AttendanceInput<'_>, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if input.employee_id.trim().is_empty() {
        errors.insert("employee_id", "Employee is required".into());
    }

    let date = input.date.trim();
    if date.is_empty() {
        errors.insert("date", "Date is required".into());
    } else {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) if parsed > today => {
                errors.insert("date", "Date cannot be in the future".into());
            }
            Ok(_) => {}
            Err(_) => {
                errors.insert("date", "Please enter a valid date".into());
            }
        }
    }

    let status = input.status.trim();
    if status.is_empty() {
        errors.insert("status", "Status is required".into());
    } else if AttendanceStatus::parse(status).is_none() {
        errors.insert("status", "Status must be Present or Absent".into());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn employee_requires_every_field() {
        let errors = validate_employee(&EmployeeInput {
            employee_id: "  ",
            ..EmployeeInput::default()
        });

        assert_eq!(errors.len(), 4);
        assert_eq!(errors["employee_id"], "Employee ID is required");
        assert_eq!(errors["full_name"], "Full Name is required");
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["department"], "Department is required");
    }

    #[test]
    fn malformed_email_is_a_field_error() {
        let errors = validate_employee(&EmployeeInput {
            employee_id: "EMP001",
            full_name: "Jane Doe",
            email: "not-an-email",
            department: "Engineering",
        });

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], "Please enter a valid email address");
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("jane@company.com"));
        assert!(is_valid_email("a.b@c.d.e"));
        assert!(!is_valid_email("jane@company"));
        assert!(!is_valid_email("jane doe@company.com"));
        assert!(!is_valid_email("@company.com"));
        assert!(!is_valid_email("jane@@company.com"));
    }

    #[test]
    fn valid_attendance_passes() {
        let errors = validate_attendance(
            &AttendanceInput {
                employee_id: "EMP001",
                date: "2026-01-05",
                status: "Present",
            },
            today(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn attendance_rejects_future_and_garbage_dates() {
        let future = validate_attendance(
            &AttendanceInput {
                employee_id: "EMP001",
                date: "2026-01-06",
                status: "Absent",
            },
            today(),
        );
        assert_eq!(future["date"], "Date cannot be in the future");

        let garbage = validate_attendance(
            &AttendanceInput {
                employee_id: "EMP001",
                date: "05/01/2026",
                status: "Absent",
            },
            today(),
        );
        assert_eq!(garbage["date"], "Please enter a valid date");
    }

    #[test]
    fn attendance_requires_employee_and_status() {
        let errors = validate_attendance(
            &AttendanceInput {
                employee_id: "",
                date: "",
                status: "Late",
            },
            today(),
        );

        assert_eq!(errors["employee_id"], "Employee is required");
        assert_eq!(errors["date"], "Date is required");
        assert_eq!(errors["status"], "Status must be Present or Absent");
    }
}
