//! Application state controller against a mocked HR API.

mod common;

use chrono::NaiveDate;
use common::{api_for, attendance_json, employee_json};
use hrms_lite::controller::{Action, Tab};
use hrms_lite::models::{AttendanceStatus, NewAttendance, NewEmployee};
use hrms_lite::Controller;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn roster(ids: &[&str]) -> serde_json::Value {
    json!(
        ids.iter()
            .map(|id| employee_json(id, &format!("Name {id}"), "Engineering"))
            .collect::<Vec<_>>()
    )
}

async fn mock_roster(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(ids)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn activation_loads_the_roster_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&["EMP001", "EMP002"])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.activate().await;
    controller.activate().await;

    let store = controller.snapshot().await;
    assert_eq!(store.employees.len(), 2);
    assert!(!store.loading);
    assert!(store.employee_error.is_none());
}

#[tokio::test]
async fn add_employee_reloads_the_roster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/employees"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(employee_json("EMP002", "Name EMP002", "Engineering")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&["EMP001", "EMP002"])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller
        .add_employee(&NewEmployee {
            employee_id: "EMP002".into(),
            full_name: "Name EMP002".into(),
            email: "emp002@company.com".into(),
            department: "Engineering".into(),
        })
        .await
        .unwrap();

    let store = controller.snapshot().await;
    assert_eq!(store.employees.len(), 2);
    assert!(!store.loading);
}

#[tokio::test]
async fn add_employee_failure_returns_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/employees"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Employee ID already exists" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&["EMP001"])))
        .expect(0)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    let err = controller
        .add_employee(&NewEmployee {
            employee_id: "EMP001".into(),
            ..NewEmployee::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "Employee ID already exists");
    let store = controller.snapshot().await;
    assert!(store.employee_error.is_none());
    assert!(!store.loading);
}

#[tokio::test]
async fn delete_removes_exactly_one_employee() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(roster(&["EMP001", "EMP002", "EMP003"])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mock_roster(&server, &["EMP001", "EMP003"]).await;
    Mock::given(method("DELETE"))
        .and(path("/api/employees/EMP002"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.activate().await;
    let before = controller.snapshot().await.employees;

    controller.delete_employee("EMP002").await.unwrap();

    let after = controller.snapshot().await.employees;
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|employee| employee.employee_id != "EMP002"));
}

#[tokio::test]
async fn delete_failure_is_a_notice_not_a_list_error() {
    let server = MockServer::start().await;
    mock_roster(&server, &["EMP001"]).await;
    Mock::given(method("DELETE"))
        .and(path("/api/employees/EMP001"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Employee not found" })))
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.activate().await;
    let err = controller.delete_employee("EMP001").await.unwrap_err();
    assert_eq!(err.message, "Employee not found");

    let store = controller.snapshot().await;
    assert_eq!(store.employee_notice.as_deref(), Some("Employee not found"));
    assert!(store.employee_error.is_none());
    assert_eq!(store.employees.len(), 1);

    controller.dismiss_notice().await;
    assert!(controller.snapshot().await.employee_notice.is_none());
}

#[tokio::test]
async fn roster_failure_without_detail_uses_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.activate().await;

    let store = controller.snapshot().await;
    assert_eq!(
        store.employee_error.as_deref(),
        Some("Request failed with status code 503")
    );

    controller.dismiss_error(Tab::Employees).await;
    assert!(controller.snapshot().await.employee_error.is_none());
}

#[tokio::test]
async fn attendance_tab_reloads_only_on_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            attendance_json("EMP001", "2026-01-05", "Present"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    assert_eq!(controller.select_tab(Tab::Attendance).await, Action::ReloadAttendance);
    assert_eq!(controller.select_tab(Tab::Attendance).await, Action::NoOp);
    assert_eq!(controller.select_tab(Tab::Employees).await, Action::NoOp);

    let store = controller.snapshot().await;
    assert_eq!(store.active_tab, Tab::Employees);
    assert_eq!(store.attendance_records.len(), 1);
}

#[tokio::test]
async fn drill_down_uses_memory_and_closing_on_attendance_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(roster(&["EMP001", "EMP002"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.activate().await;

    let selected = controller.view_employee_attendance("EMP002").await;
    assert_eq!(selected.map(|e| e.employee_id), Some("EMP002".to_string()));
    assert!(controller.view_employee_attendance("EMP404").await.is_none());
    assert_eq!(
        controller.snapshot().await.selected_employee.map(|e| e.employee_id),
        Some("EMP002".to_string())
    );

    assert_eq!(controller.select_tab(Tab::Attendance).await, Action::NoOp);
    assert_eq!(
        controller.close_employee_attendance().await,
        Action::ReloadAttendance
    );
    assert!(controller.snapshot().await.selected_employee.is_none());
}

#[tokio::test]
async fn mark_attendance_reloads_records() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "employee_id": "EMP001",
            "date": "2026-01-05",
            "status": "Absent",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            attendance_json("EMP001", "2026-01-05", "Absent"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller
        .mark_attendance(&NewAttendance {
            employee_id: "EMP001".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status: AttendanceStatus::Absent,
        })
        .await
        .unwrap();

    let store = controller.snapshot().await;
    assert_eq!(store.attendance_records.len(), 1);
    assert_eq!(store.attendance_records[0].status, AttendanceStatus::Absent);
    assert!(!store.loading);
}

#[tokio::test]
async fn employee_attendance_failure_stays_with_the_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .and(query_param("employee_id", "EMP001"))
        .respond_with(ResponseTemplate::new(500).set_body_string(""))
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    let err = controller
        .fetch_employee_attendance("EMP001")
        .await
        .unwrap_err();
    assert_eq!(err.message, "Request failed with status code 500");

    let store = controller.snapshot().await;
    assert!(store.attendance_error.is_none());
    assert!(store.employee_error.is_none());
    assert!(!store.loading);
}

#[tokio::test]
async fn stale_roster_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(roster(&["EMP001"]))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mock_roster(&server, &["EMP001", "EMP002"]).await;

    let controller = Controller::new(api_for(&server));
    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_employees().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.fetch_employees().await;
    slow.await.unwrap();

    let store = controller.snapshot().await;
    let ids: Vec<String> = store.employees.into_iter().map(|e| e.employee_id).collect();
    assert_eq!(ids, ["EMP001", "EMP002"]);
    assert!(!store.loading);
}

#[tokio::test]
async fn mark_attendance_failure_leaves_records_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            attendance_json("EMP001", "2026-01-05", "Present"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Attendance already marked for this date",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    controller.select_tab(Tab::Attendance).await;

    let err = controller
        .mark_attendance(&NewAttendance {
            employee_id: "EMP001".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status: AttendanceStatus::Absent,
        })
        .await
        .unwrap_err();
    assert_eq!(err.message, "Attendance already marked for this date");

    let store = controller.snapshot().await;
    assert!(store.attendance_error.is_none());
    assert_eq!(store.attendance_records.len(), 1);
    assert_eq!(store.attendance_records[0].status, AttendanceStatus::Present);
    assert!(!store.loading);
}

#[tokio::test]
async fn stale_attendance_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([attendance_json("EMP001", "2026-01-05", "Present")]))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/attendance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            attendance_json("EMP001", "2026-01-05", "Absent"),
            attendance_json("EMP002", "2026-01-05", "Present"),
        ])))
        .mount(&server)
        .await;

    let controller = Controller::new(api_for(&server));
    let slow = tokio::spawn({
        let controller = controller.clone();
        async move { controller.fetch_attendance_records().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.fetch_attendance_records().await;
    slow.await.unwrap();

    let store = controller.snapshot().await;
    assert_eq!(store.attendance_records.len(), 2);
    assert_eq!(store.attendance_records[0].status, AttendanceStatus::Absent);
    assert!(store.attendance_error.is_none());
}
