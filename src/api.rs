//! Gateway to the remote HR API.
//!
//! Every method issues exactly one request against the configured base URL
//! and hands back the decoded body. There is no retry, caching or timeout
//! policy beyond what reqwest does by default.

use crate::errors::RequestError;
use crate::models::{
    AttendanceQuery, AttendanceRecord, Dashboard, Department, Employee, NewAttendance,
    NewEmployee,
};
use chrono::NaiveDate;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, RequestError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>, RequestError> {
        let request = self.request(Method::GET, &["api", "employees"]);
        self.send_list(request).await
    }

    pub async fn create_employee(&self, data: &NewEmployee) -> Result<Employee, RequestError> {
        let request = self.request(Method::POST, &["api", "employees"]).json(data);
        self.send_json(request).await
    }

    pub async fn delete_employee(&self, employee_id: &str) -> Result<(), RequestError> {
        let request = self.request(Method::DELETE, &["api", "employees", employee_id]);
        self.send(request).await.map(|_| ())
    }

    pub async fn get_employee(&self, employee_id: &str) -> Result<Employee, RequestError> {
        let request = self.request(Method::GET, &["api", "employees", employee_id]);
        self.send_json(request).await
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, RequestError> {
        let request = self.request(Method::GET, &["api", "departments"]);
        self.send_list(request).await
    }

    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, RequestError> {
        self.query_attendance(&AttendanceQuery::default()).await
    }

    pub async fn create_attendance(
        &self,
        data: &NewAttendance,
    ) -> Result<AttendanceRecord, RequestError> {
        let request = self.request(Method::POST, &["api", "attendance"]).json(data);
        self.send_json(request).await
    }

    pub async fn get_attendance_by_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, RequestError> {
        self.query_attendance(&AttendanceQuery::for_employee(employee_id))
            .await
    }

    pub async fn get_attendance_by_date_range(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, RequestError> {
        self.query_attendance(&AttendanceQuery::between(date_from, date_to))
            .await
    }

    pub async fn get_dashboard(&self) -> Result<Dashboard, RequestError> {
        let request = self.request(Method::GET, &["api", "dashboard"]);
        self.send_json(request).await
    }

    async fn query_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>, RequestError> {
        let request = self.request(Method::GET, &["api", "attendance"]).query(query);
        self.send_list(request).await
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        // Base URLs are checked to be hierarchical when the config is loaded.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        debug!(%method, path = url.path(), "hr api request");
        self.http.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, RequestError> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "hr api unreachable");
            RequestError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(%status, %path, error = %err, "hr api error body unreadable");
                Default::default()
            }
        };
        let err = RequestError::status(status, &body);
        warn!(%status, %path, detail = err.detail(), "hr api rejected request");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// A `null` body counts as an empty list.
    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, RequestError> {
        let items: Option<Vec<T>> = self.send_json(request).await?;
        Ok(items.unwrap_or_default())
    }
}
