//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use hrms_lite::ApiClient;
use serde_json::{json, Value};
use url::Url;
use wiremock::MockServer;

pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).expect("mock server uri")).expect("api client")
}

pub fn employee_json(employee_id: &str, full_name: &str, department: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "full_name": full_name,
        "email": format!("{}@company.com", employee_id.to_lowercase()),
        "department": department,
    })
}

pub fn attendance_json(employee_id: &str, date: &str, status: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "date": date,
        "status": status,
        "employee_name": format!("Name {employee_id}"),
        "department": "Engineering",
    })
}
