use crate::api::ApiClient;
use crate::controller::{Controller, RequestGeneration};
use crate::forms::{AttendanceForm, EmployeeForm};
use crate::models::Employee;
use crate::views::{EmployeeAttendancePanel, Screen};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

/// State local to the page components: form input, the attendance date
/// filter and the drill-down panel. It lives only while its component is on
/// screen.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub employee_form: EmployeeForm,
    pub attendance_form: AttendanceForm,
    /// Day picked in the records filter. `None` means today.
    pub records_date: Option<NaiveDate>,
    pub detail: Option<EmployeeAttendancePanel>,
    panel_generation: RequestGeneration,
}

impl UiState {
    pub fn records_date(&self, today: NaiveDate) -> NaiveDate {
        self.records_date.unwrap_or(today)
    }

    /// Resets whatever was on `before` once the page shows `after` instead.
    pub fn unmount(&mut self, before: &Screen, after: &Screen) {
        if before == after {
            return;
        }
        match before {
            Screen::Employees => self.employee_form = EmployeeForm::default(),
            Screen::Attendance => {
                self.attendance_form = AttendanceForm::default();
                self.records_date = None;
            }
            Screen::EmployeeDetail(_) => self.detail = None,
        }
    }

    /// Mounts a fresh drill-down panel and returns the ticket its load must
    /// present.
    pub fn mount_panel(&mut self, employee: Employee) -> u64 {
        let ticket = self.panel_generation.next();
        self.detail = Some(EmployeeAttendancePanel::mount(employee, ticket));
        ticket
    }

    /// The panel for `employee_id`, if it is the one mounted.
    pub fn panel_for(&mut self, employee_id: &str) -> Option<&mut EmployeeAttendancePanel> {
        self.detail
            .as_mut()
            .filter(|panel| panel.employee_id() == employee_id)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub controller: Controller,
    pub ui: Arc<Mutex<UiState>>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            controller: Controller::new(api),
            ui: Arc::new(Mutex::new(UiState::default())),
        }
    }
}
