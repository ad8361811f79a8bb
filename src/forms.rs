//! Form state for the two submission forms.
//!
//! A submission runs in two halves around the network call:
//! `begin_submit` validates and hands out the payload, `finish_submit`
//! either resets the form and raises a success flash or keeps the input and
//! records the failure as a non-field error.

use crate::errors::OperationError;
use crate::models::{AttendanceStatus, NewAttendance, NewEmployee};
use crate::validate::{self, AttendanceInput, EmployeeInput, FieldErrors};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Deserialize;

const SUCCESS_TTL_MS: i64 = 3_000;

/// Transient acknowledgment shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub message: String,
    pub expires_at: DateTime<Local>,
}

impl Flash {
    pub fn new(message: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            message: message.into(),
            expires_at: now + Duration::milliseconds(SUCCESS_TTL_MS),
        }
    }

    pub fn is_visible(&self, now: DateTime<Local>) -> bool {
        now < self.expires_at
    }

    pub fn remaining_ms(&self, now: DateTime<Local>) -> i64 {
        (self.expires_at - now).num_milliseconds().max(0)
    }
}

fn prune_flash(flash: &mut Option<Flash>, now: DateTime<Local>) {
    if flash.as_ref().is_some_and(|flash| !flash.is_visible(now)) {
        *flash = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    pub fields: NewEmployee,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
    pub success: Option<Flash>,
}

impl EmployeeForm {
    /// Stores the typed values, clearing errors of fields that changed.
    pub fn update(&mut self, input: NewEmployee) {
        let changed = [
            ("employee_id", self.fields.employee_id != input.employee_id),
            ("full_name", self.fields.full_name != input.full_name),
            ("email", self.fields.email != input.email),
            ("department", self.fields.department != input.department),
        ];
        for (field, did_change) in changed {
            if did_change {
                self.errors.remove(field);
            }
        }
        self.fields = input;
    }

    pub fn begin_submit(&mut self) -> Option<NewEmployee> {
        self.submit_error = None;
        self.errors = validate::validate_employee(&EmployeeInput {
            employee_id: &self.fields.employee_id,
            full_name: &self.fields.full_name,
            email: &self.fields.email,
            department: &self.fields.department,
        });

        if self.errors.is_empty() {
            Some(self.fields.clone())
        } else {
            None
        }
    }

    pub fn finish_submit(&mut self, result: Result<(), OperationError>, now: DateTime<Local>) {
        match result {
            Ok(()) => {
                self.fields = NewEmployee::default();
                self.errors.clear();
                self.success = Some(Flash::new("Employee added successfully!", now));
            }
            Err(err) => self.submit_error = Some(err.message),
        }
    }

    pub fn dismiss_error(&mut self) {
        self.submit_error = None;
    }

    pub fn prune(&mut self, now: DateTime<Local>) {
        prune_flash(&mut self.success, now);
    }
}

/// Attendance form values exactly as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttendanceFields {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: String,
}

impl AttendanceFields {
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            employee_id: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            status: AttendanceStatus::Present.as_str().to_string(),
        }
    }
}

/// Attendance form. Until the user types anything it has no input of its
/// own and shows the defaults for whatever day it is rendered on.
#[derive(Debug, Clone, Default)]
pub struct AttendanceForm {
    input: Option<AttendanceFields>,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
    pub success: Option<Flash>,
}

impl AttendanceForm {
    pub fn fields(&self, today: NaiveDate) -> AttendanceFields {
        self.input
            .clone()
            .unwrap_or_else(|| AttendanceFields::defaults(today))
    }

    pub fn update(&mut self, input: AttendanceFields, today: NaiveDate) {
        let current = self.fields(today);
        let changed = [
            ("employee_id", current.employee_id != input.employee_id),
            ("date", current.date != input.date),
            ("status", current.status != input.status),
        ];
        for (field, did_change) in changed {
            if did_change {
                self.errors.remove(field);
            }
        }
        self.input = Some(input);
    }

    pub fn begin_submit(&mut self, today: NaiveDate) -> Option<NewAttendance> {
        self.submit_error = None;
        let fields = self.fields(today);
        self.errors = validate::validate_attendance(
            &AttendanceInput {
                employee_id: &fields.employee_id,
                date: &fields.date,
                status: &fields.status,
            },
            today,
        );
        if !self.errors.is_empty() {
            return None;
        }

        let date = NaiveDate::parse_from_str(fields.date.trim(), "%Y-%m-%d").ok()?;
        let status = AttendanceStatus::parse(&fields.status)?;
        Some(NewAttendance {
            employee_id: fields.employee_id.trim().to_string(),
            date,
            status,
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), OperationError>, now: DateTime<Local>) {
        match result {
            Ok(()) => {
                self.input = None;
                self.errors.clear();
                self.success = Some(Flash::new("Attendance marked successfully!", now));
            }
            Err(err) => self.submit_error = Some(err.message),
        }
    }

    pub fn dismiss_error(&mut self) {
        self.submit_error = None;
    }

    pub fn prune(&mut self, now: DateTime<Local>) {
        prune_flash(&mut self.success, now);
    }
}
