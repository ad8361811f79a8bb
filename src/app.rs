use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", get(handlers::get_session))
        .route("/tabs/:tab", post(handlers::select_tab))
        .route("/employees", post(handlers::add_employee))
        .route("/employees/delete", post(handlers::delete_employee))
        .route("/employees/view", post(handlers::view_employee_attendance))
        .route("/detail/close", post(handlers::close_employee_attendance))
        .route("/detail/error/dismiss", post(handlers::dismiss_detail_error))
        .route("/attendance", post(handlers::mark_attendance))
        .route("/attendance/filter", post(handlers::filter_attendance))
        .route("/errors/:tab/dismiss", post(handlers::dismiss_tab_error))
        .route("/notice/dismiss", post(handlers::dismiss_notice))
        .route("/forms/:form/error/dismiss", post(handlers::dismiss_form_error))
        .with_state(state)
}
