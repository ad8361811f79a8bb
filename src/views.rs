//! Read-only view models derived from controller and UI state.
//!
//! Each list view is in exactly one of four states, checked in the order
//! loading, error, empty, populated.

use crate::controller::{Store, Tab};
use crate::errors::OperationError;
use crate::models::{AttendanceRecord, Employee};
use crate::stats::{self, AttendanceSummary};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Empty,
    Populated(T),
}

pub fn resolve<T>(
    loading: bool,
    error: Option<&str>,
    is_empty: bool,
    populated: impl FnOnce() -> T,
) -> ViewState<T> {
    if loading {
        ViewState::Loading
    } else if let Some(error) = error.filter(|error| !error.is_empty()) {
        ViewState::Error(error.to_string())
    } else if is_empty {
        ViewState::Empty
    } else {
        ViewState::Populated(populated())
    }
}

/// Which part of the page is on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Employees,
    Attendance,
    EmployeeDetail(String),
}

impl Screen {
    pub fn of(store: &Store) -> Self {
        match (&store.selected_employee, store.active_tab) {
            (Some(employee), _) => Self::EmployeeDetail(employee.employee_id.clone()),
            (None, Tab::Employees) => Self::Employees,
            (None, Tab::Attendance) => Self::Attendance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRows<'a> {
    pub count: usize,
    pub employees: &'a [Employee],
}

pub fn employee_list(store: &Store) -> ViewState<EmployeeRows<'_>> {
    resolve(
        store.loading,
        store.employee_error.as_deref(),
        store.employees.is_empty(),
        || EmployeeRows {
            count: store.employees.len(),
            employees: &store.employees,
        },
    )
}

/// The attendance overview for one day. `records` may be empty even when
/// the view is populated: emptiness of the view is judged on the whole
/// collection, the counts on the day's subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAttendance<'a> {
    pub date: NaiveDate,
    pub records: Vec<&'a AttendanceRecord>,
    pub summary: AttendanceSummary,
}

pub fn attendance_records(store: &Store, date: NaiveDate) -> ViewState<DailyAttendance<'_>> {
    resolve(
        store.loading,
        store.attendance_error.as_deref(),
        store.attendance_records.is_empty(),
        || {
            let records = stats::filter_by_date(&store.attendance_records, date);
            let summary = stats::summarize(records.iter().copied());
            DailyAttendance {
                date,
                records,
                summary,
            }
        },
    )
}

/// Attendance history of the drilled-into employee. It loads on its own,
/// independent of the attendance collection held by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAttendancePanel {
    pub employee: Employee,
    pub loading: bool,
    pub error: Option<String>,
    pub records: Vec<AttendanceRecord>,
    ticket: u64,
}

impl EmployeeAttendancePanel {
    /// A freshly mounted panel, waiting for the load issued under `ticket`.
    pub fn mount(employee: Employee, ticket: u64) -> Self {
        Self {
            employee,
            loading: true,
            error: None,
            records: Vec::new(),
            ticket,
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee.employee_id
    }

    /// Applies a load result. Results issued for an earlier mount are
    /// dropped and `false` is returned.
    pub fn finish_load(
        &mut self,
        ticket: u64,
        result: Result<Vec<AttendanceRecord>, OperationError>,
    ) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                self.error = None;
                self.records = records;
            }
            Err(err) => {
                self.error = Some(err.message);
                self.records.clear();
            }
        }
        true
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn state(&self) -> ViewState<&[AttendanceRecord]> {
        resolve(
            self.loading,
            self.error.as_deref(),
            self.records.is_empty(),
            || self.records.as_slice(),
        )
    }

    /// Counts over the full history; absent while there is nothing to count.
    pub fn summary(&self) -> Option<AttendanceSummary> {
        if self.records.is_empty() {
            None
        } else {
            Some(stats::summarize(&self.records))
        }
    }
}
