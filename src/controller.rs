//! Application state controller.
//!
//! The controller owns the employee and attendance collections together with
//! the active tab, the drilled-into employee and the loading/error flags.
//! Views only ever see a [`Store`] snapshot; every mutation goes through one
//! of the methods below, which talk to the HR API and then reload the
//! affected collection.
//!
//! The store lock is never held across a network call. Loads take a ticket
//! from the collection's [`RequestGeneration`] first and only apply their
//! result if no newer load has started in the meantime.

use crate::api::ApiClient;
use crate::errors::{Operation, OperationError};
use crate::models::{AttendanceRecord, Employee, NewAttendance, NewEmployee};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Employees,
    Attendance,
}

impl Tab {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "employees" => Some(Self::Employees),
            "attendance" => Some(Self::Attendance),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Attendance => "attendance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    TabSelected(Tab),
    EmployeeSelected(Employee),
    EmployeeDeselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReloadAttendance,
    NoOp,
}

/// What an event triggers, given the tab and whether an employee is
/// currently drilled into.
pub fn transition(active_tab: Tab, has_selection: bool, event: &Event) -> Action {
    match event {
        Event::TabSelected(tab) if *tab == active_tab => Action::NoOp,
        Event::TabSelected(Tab::Attendance) if !has_selection => Action::ReloadAttendance,
        Event::TabSelected(_) => Action::NoOp,
        Event::EmployeeSelected(_) => Action::NoOp,
        Event::EmployeeDeselected if has_selection && active_tab == Tab::Attendance => {
            Action::ReloadAttendance
        }
        Event::EmployeeDeselected => Action::NoOp,
    }
}

/// Monotonic load counter for one collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Store {
    pub active_tab: Tab,
    pub employees: Vec<Employee>,
    pub attendance_records: Vec<AttendanceRecord>,
    pub selected_employee: Option<Employee>,
    pub loading: bool,
    pub employee_error: Option<String>,
    pub attendance_error: Option<String>,
    /// Failure of the last delete. Shown above the list, never instead of it.
    pub employee_notice: Option<String>,
    #[serde(skip)]
    in_flight: u32,
    #[serde(skip)]
    employees_generation: RequestGeneration,
    #[serde(skip)]
    attendance_generation: RequestGeneration,
    #[serde(skip)]
    activated: bool,
}

impl Store {
    /// Applies the state change of `event` and returns what it triggers.
    pub fn apply(&mut self, event: Event) -> Action {
        let action = transition(self.active_tab, self.selected_employee.is_some(), &event);
        match event {
            Event::TabSelected(tab) => self.active_tab = tab,
            Event::EmployeeSelected(employee) => self.selected_employee = Some(employee),
            Event::EmployeeDeselected => self.selected_employee = None,
        }
        action
    }

    pub fn find_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees
            .iter()
            .find(|employee| employee.employee_id == employee_id)
    }

    fn begin_loading(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    fn end_loading(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}

#[derive(Clone)]
pub struct Controller {
    api: ApiClient,
    store: Arc<Mutex<Store>>,
}

impl Controller {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            store: Arc::new(Mutex::new(Store::default())),
        }
    }

    pub async fn snapshot(&self) -> Store {
        self.store.lock().await.clone()
    }

    /// Loads the employee collection the first time it is called.
    pub async fn activate(&self) {
        {
            let mut store = self.store.lock().await;
            if store.activated {
                return;
            }
            store.activated = true;
        }
        info!(base_url = %self.api.base_url(), "loading employee roster");
        self.fetch_employees().await;
    }

    pub async fn dispatch(&self, event: Event) -> Action {
        let action = self.store.lock().await.apply(event);
        if action == Action::ReloadAttendance {
            self.fetch_attendance_records().await;
        }
        action
    }

    pub async fn select_tab(&self, tab: Tab) -> Action {
        self.dispatch(Event::TabSelected(tab)).await
    }

    /// Drills into an employee already held in memory. Unknown ids leave the
    /// selection untouched.
    pub async fn view_employee_attendance(&self, employee_id: &str) -> Option<Employee> {
        let employee = self.store.lock().await.find_employee(employee_id).cloned();
        match &employee {
            Some(employee) => {
                self.dispatch(Event::EmployeeSelected(employee.clone())).await;
            }
            None => debug!(employee_id, "drill-down for unknown employee ignored"),
        }
        employee
    }

    pub async fn close_employee_attendance(&self) -> Action {
        self.dispatch(Event::EmployeeDeselected).await
    }

    pub async fn fetch_employees(&self) {
        let ticket = {
            let mut store = self.store.lock().await;
            store.begin_loading();
            store.employee_error = None;
            store.employees_generation.next()
        };

        let result = self.api.list_employees().await;

        let mut store = self.store.lock().await;
        store.end_loading();
        if !store.employees_generation.is_current(ticket) {
            debug!(ticket, "discarding stale employee list");
            return;
        }
        match result {
            Ok(employees) => store.employees = employees,
            Err(err) => {
                let err = OperationError::new(Operation::FetchEmployees, &err);
                warn!(error = %err, "employee list load failed");
                store.employee_error = Some(err.message);
            }
        }
    }

    pub async fn fetch_attendance_records(&self) {
        let ticket = {
            let mut store = self.store.lock().await;
            store.attendance_error = None;
            store.attendance_generation.next()
        };

        let result = self.api.list_attendance().await;

        let mut store = self.store.lock().await;
        if !store.attendance_generation.is_current(ticket) {
            debug!(ticket, "discarding stale attendance list");
            return;
        }
        match result {
            Ok(records) => store.attendance_records = records,
            Err(err) => {
                let err = OperationError::new(Operation::FetchAttendance, &err);
                warn!(error = %err, "attendance list load failed");
                store.attendance_error = Some(err.message);
            }
        }
    }

    /// Creates the employee and reloads the roster. The error is handed back
    /// so the form can show it next to the input.
    pub async fn add_employee(&self, data: &NewEmployee) -> Result<(), OperationError> {
        self.store.lock().await.begin_loading();

        let outcome = match self.api.create_employee(data).await {
            Ok(_) => {
                info!(employee_id = %data.employee_id, "employee created");
                self.fetch_employees().await;
                Ok(())
            }
            Err(err) => {
                let err = OperationError::new(Operation::AddEmployee, &err);
                warn!(employee_id = %data.employee_id, error = %err, "employee create failed");
                Err(err)
            }
        };

        self.store.lock().await.end_loading();
        outcome
    }

    /// Deletes the employee and reloads the roster. Confirmation is the
    /// caller's job.
    pub async fn delete_employee(&self, employee_id: &str) -> Result<(), OperationError> {
        {
            let mut store = self.store.lock().await;
            store.begin_loading();
            store.employee_notice = None;
        }

        let outcome = match self.api.delete_employee(employee_id).await {
            Ok(()) => {
                info!(employee_id, "employee deleted");
                self.fetch_employees().await;
                Ok(())
            }
            Err(err) => {
                let err = OperationError::new(Operation::DeleteEmployee, &err);
                warn!(employee_id, error = %err, "employee delete failed");
                self.store.lock().await.employee_notice = Some(err.message.clone());
                Err(err)
            }
        };

        self.store.lock().await.end_loading();
        outcome
    }

    /// Records attendance and reloads the attendance list. An open
    /// employee-scoped view is not refreshed.
    pub async fn mark_attendance(&self, data: &NewAttendance) -> Result<(), OperationError> {
        self.store.lock().await.begin_loading();

        let outcome = match self.api.create_attendance(data).await {
            Ok(_) => {
                info!(employee_id = %data.employee_id, date = %data.date, status = %data.status, "attendance marked");
                self.fetch_attendance_records().await;
                Ok(())
            }
            Err(err) => {
                let err = OperationError::new(Operation::MarkAttendance, &err);
                warn!(employee_id = %data.employee_id, error = %err, "attendance create failed");
                Err(err)
            }
        };

        self.store.lock().await.end_loading();
        outcome
    }

    /// One employee's full history, for the drill-down view only. Neither the
    /// loading flag nor the stored errors are touched.
    pub async fn fetch_employee_attendance(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, OperationError> {
        self.api
            .get_attendance_by_employee(employee_id)
            .await
            .map_err(|err| OperationError::new(Operation::FetchEmployeeAttendance, &err))
    }

    pub async fn dismiss_error(&self, tab: Tab) {
        let mut store = self.store.lock().await;
        match tab {
            Tab::Employees => store.employee_error = None,
            Tab::Attendance => store.attendance_error = None,
        }
    }

    pub async fn dismiss_notice(&self) {
        self.store.lock().await.employee_notice = None;
    }
}
