//! Super Admin REST API client.

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{AppointmentList, Branch, BranchList, SettingsUpdate, StatsResponse};
use reqwest::{Client, cookie::Jar};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Appointment list endpoint.
pub const APPOINTMENT_LIST_PATH: &str = "/super-admin/appointment-list";
/// Dashboard counters endpoint.
pub const DASHBOARD_STATS_PATH: &str = "/super-admin/dashboard-stats";
/// Branch directory endpoint.
pub const BRANCHES_PATH: &str = "/super-admin/branches";
/// Settings update endpoint.
pub const SETTINGS_PATH: &str = "/settings";

/// HTTP client for the hospital backend.
///
/// Cheap to clone; clones share the connection pool and cookie jar, so
/// background tasks can each take their own copy.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client instance.
    ///
    /// Every request is bounded by `timeout_secs` so a hung backend ends in
    /// an error instead of an endless loading state.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| AppError::config(format!("invalid API base URL '{base_url}': {e}")))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    /// GET `path` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode(path, &body)
    }

    /// Fetch all appointments.
    pub async fn fetch_appointments(&self) -> Result<AppointmentList> {
        let list: AppointmentList = self.get_json(APPOINTMENT_LIST_PATH).await?;
        tracing::debug!("Fetched {} appointments (count {})", list.appointments.len(), list.count);
        Ok(list)
    }

    /// Fetch dashboard counters. The caller decides what a non-200 in-body
    /// status means; only transport and HTTP-level failures are errors here.
    pub async fn fetch_dashboard_stats(&self) -> Result<StatsResponse> {
        self.get_json(DASHBOARD_STATS_PATH).await
    }

    /// Fetch the branch directory.
    pub async fn fetch_branches(&self) -> Result<Vec<Branch>> {
        let list: BranchList = self.get_json(BRANCHES_PATH).await?;
        Ok(list.branches)
    }

    /// Send edited settings, scoped by branch id or `all`.
    pub async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let response = self
            .client
            .put(self.url(SETTINGS_PATH))
            .query(&[("branch", update.branch.as_str())])
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                endpoint: SETTINGS_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::info!(
            "Saved {} setting(s) for branch '{}'",
            update.changes.len(),
            update.branch
        );
        Ok(())
    }

    /// Test connection to the backend.
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self.client.get(self.url("/")).send().await?;
        Ok(!response.status().is_server_error())
    }
}

/// Decode a JSON body, naming the endpoint in the error.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| AppError::parse(format!("Invalid response from {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, SettingChange, SettingValue};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response; yields the raw request text.
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
            len = body.len()
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{addr}"), rx)
    }

    /// Headers received and, if announced, the full body.
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client_for("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url(APPOINTMENT_LIST_PATH),
            "http://localhost:8000/api/super-admin/appointment-list"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_decode_error_names_endpoint() {
        let err = decode::<AppointmentList>(APPOINTMENT_LIST_PATH, "<html>").unwrap_err();
        assert!(err.to_string().contains(APPOINTMENT_LIST_PATH));
    }

    #[tokio::test]
    async fn test_fetch_appointments() {
        let body = r#"{"appointments": [{"id": 1, "patient_name": "A", "status": "confirmed", "payment_status": "paid"}], "count": 1}"#;
        let (url, request) = serve_once("200 OK", body).await;

        let list = client_for(&url).fetch_appointments().await.unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.appointments[0].status, AppointmentStatus::Confirmed);

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /super-admin/appointment-list "));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, _request) = serve_once("503 Service Unavailable", "{}").await;

        let err = client_for(&url).fetch_appointments().await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_stats_keeps_body_status() {
        let (url, _request) = serve_once("200 OK", r#"{"status": 401, "data": {}}"#).await;

        let resp = client_for(&url).fetch_dashboard_stats().await.unwrap();
        assert_eq!(resp.status, 401);
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn test_fetch_branches() {
        let body = r#"{"branches": [{"id": "b1", "name": "Central", "location": "Pune"}]}"#;
        let (url, _request) = serve_once("200 OK", body).await;

        let branches = client_for(&url).fetch_branches().await.unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].name, "Central");
    }

    #[tokio::test]
    async fn test_update_settings_sends_scope() {
        let (url, request) = serve_once("204 No Content", "").await;
        let update = SettingsUpdate {
            branch: "b7".to_string(),
            changes: vec![SettingChange {
                category_id: "billing".to_string(),
                item_id: "tax_rate".to_string(),
                value: SettingValue::Number(18.0),
            }],
        };

        client_for(&url).update_settings(&update).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("PUT /settings?branch=b7 "));
        assert!(request.contains("\"tax_rate\""));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(&format!("http://{addr}")).fetch_appointments().await;
        assert!(matches!(result, Err(AppError::Http(_))));
    }
}
