use crate::controller::{Store, Tab};
use crate::errors::AppError;
use crate::forms::AttendanceFields;
use crate::models::NewEmployee;
use crate::state::AppState;
use crate::ui::render_index;
use crate::views::Screen;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct EmployeeSelection {
    pub employee_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    #[serde(default)]
    pub date: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    state.controller.activate().await;

    let now = Local::now();
    let store = state.controller.snapshot().await;
    let mut ui = state.ui.lock().await;
    ui.employee_form.prune(now);
    ui.attendance_form.prune(now);

    Html(render_index(&store, &ui, now.date_naive(), now))
}

pub async fn get_session(State(state): State<AppState>) -> Json<Store> {
    Json(state.controller.snapshot().await)
}

pub async fn select_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab = parse_tab(&tab)?;
    let before = screen(&state).await;
    state.controller.select_tab(tab).await;
    settle_screen(&state, before).await;
    Ok(Redirect::to("/"))
}

pub async fn add_employee(
    State(state): State<AppState>,
    Form(input): Form<NewEmployee>,
) -> Redirect {
    let payload = {
        let mut ui = state.ui.lock().await;
        ui.employee_form.update(input);
        ui.employee_form.begin_submit()
    };

    let Some(payload) = payload else {
        debug!("employee form rejected by validation");
        return Redirect::to("/");
    };

    let result = state.controller.add_employee(&payload).await;
    state
        .ui
        .lock()
        .await
        .employee_form
        .finish_submit(result, Local::now());
    Redirect::to("/")
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Form(selection): Form<EmployeeSelection>,
) -> Redirect {
    // The failure is already in the store as a notice.
    if let Err(err) = state.controller.delete_employee(&selection.employee_id).await {
        debug!(employee_id = %selection.employee_id, error = %err, "delete failure left to the notice");
    }
    Redirect::to("/")
}

pub async fn view_employee_attendance(
    State(state): State<AppState>,
    Form(selection): Form<EmployeeSelection>,
) -> Redirect {
    let before = screen(&state).await;
    state
        .controller
        .view_employee_attendance(&selection.employee_id)
        .await;
    settle_screen(&state, before).await;
    Redirect::to("/")
}

pub async fn close_employee_attendance(State(state): State<AppState>) -> Redirect {
    let before = screen(&state).await;
    state.controller.close_employee_attendance().await;
    settle_screen(&state, before).await;
    Redirect::to("/")
}

pub async fn dismiss_detail_error(State(state): State<AppState>) -> Redirect {
    if let Some(panel) = state.ui.lock().await.detail.as_mut() {
        panel.dismiss_error();
    }
    Redirect::to("/")
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Form(input): Form<AttendanceFields>,
) -> Redirect {
    let today = Local::now().date_naive();
    let payload = {
        let mut ui = state.ui.lock().await;
        ui.attendance_form.update(input, today);
        ui.attendance_form.begin_submit(today)
    };

    let Some(payload) = payload else {
        debug!("attendance form rejected by validation");
        return Redirect::to("/");
    };

    let result = state.controller.mark_attendance(&payload).await;
    state
        .ui
        .lock()
        .await
        .attendance_form
        .finish_submit(result, Local::now());
    Redirect::to("/")
}

/// Dates after today, or anything unparseable, leave the filter as it was.
pub async fn filter_attendance(
    State(state): State<AppState>,
    Form(filter): Form<DateFilter>,
) -> Redirect {
    let today = Local::now().date_naive();
    match NaiveDate::parse_from_str(filter.date.trim(), "%Y-%m-%d") {
        Ok(date) if date <= today => state.ui.lock().await.records_date = Some(date),
        _ => debug!(date = %filter.date, "ignoring attendance filter date"),
    }
    Redirect::to("/")
}

pub async fn dismiss_tab_error(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab = parse_tab(&tab)?;
    state.controller.dismiss_error(tab).await;
    Ok(Redirect::to("/"))
}

pub async fn dismiss_notice(State(state): State<AppState>) -> Redirect {
    state.controller.dismiss_notice().await;
    Redirect::to("/")
}

pub async fn dismiss_form_error(
    State(state): State<AppState>,
    Path(form): Path<String>,
) -> Result<Redirect, AppError> {
    let mut ui = state.ui.lock().await;
    match form.as_str() {
        "employee" => ui.employee_form.dismiss_error(),
        "attendance" => ui.attendance_form.dismiss_error(),
        _ => return Err(AppError::bad_request("form must be 'employee' or 'attendance'")),
    }
    Ok(Redirect::to("/"))
}

fn parse_tab(value: &str) -> Result<Tab, AppError> {
    Tab::parse(value).ok_or_else(|| AppError::bad_request("tab must be 'employees' or 'attendance'"))
}

async fn screen(state: &AppState) -> Screen {
    Screen::of(&state.controller.snapshot().await)
}

/// Unmounts what left the screen and mounts the drill-down panel when a new
/// employee is shown, loading that employee's history.
async fn settle_screen(state: &AppState, before: Screen) {
    let store = state.controller.snapshot().await;
    let after = Screen::of(&store);

    let ticket = {
        let mut ui = state.ui.lock().await;
        ui.unmount(&before, &after);

        let Some(employee) = store.selected_employee.clone() else {
            return;
        };
        if ui.panel_for(&employee.employee_id).is_some() {
            return;
        }
        ui.mount_panel(employee)
    };

    let Screen::EmployeeDetail(employee_id) = after else {
        return;
    };
    let result = state.controller.fetch_employee_attendance(&employee_id).await;
    let applied = state
        .ui
        .lock()
        .await
        .panel_for(&employee_id)
        .is_some_and(|panel| panel.finish_load(ticket, result));
    if !applied {
        debug!(%employee_id, ticket, "discarding drill-down records for a closed panel");
    }
}
