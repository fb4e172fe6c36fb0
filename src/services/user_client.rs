use std::time::Duration;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use crate::models::Operation;

/// HTTP client for any backend that serves the `/users` API.
#[derive(Clone)]
pub struct UserClient {
    http: Client,
}

impl UserClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        // Backends are addressed directly, never through a proxy from the environment
        let http = Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self { http })
    }

    fn request(&self, base_url: &str, operation: &Operation) -> RequestBuilder {
        let users = format!("{}/users", base_url);
        match operation {
            Operation::ListAll => self.http.get(users),
            Operation::Get { id } => self.http.get(format!("{}/{}", users, id)),
            Operation::Create { name } => self.http.post(users).json(&json!({ "name": name })),
            Operation::Rename { id, name } => self
                .http
                .put(format!("{}/{}", users, id))
                .json(&json!({ "name": name })),
            Operation::AddHours { id, hours } => self
                .http
                .patch(format!("{}/{}", users, id))
                .json(&json!({ "hoursToAdd": hours })),
            Operation::Delete { id } => self.http.delete(format!("{}/{}", users, id)),
            Operation::DeleteAll => self.http.delete(users),
        }
    }

    /// Sends one operation and renders the response for display and assertions.
    ///
    /// HTTP error statuses are part of the rendered result (`"Error: <body>"`);
    /// only transport failures come back as `Err`.
    pub async fn send(&self, base_url: &str, operation: &Operation) -> Result<String, reqwest::Error> {
        tracing::debug!("Sending {} to {}", operation.kind(), base_url);

        let response = self.request(base_url, operation).send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(render_response(status, body))
    }
}

pub fn render_response(status: StatusCode, body: String) -> String {
    if !status.is_success() {
        return format!("Error: {}", body);
    }

    // JSON bodies are shown pretty-printed; anything else is passed through
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or(body)
}
