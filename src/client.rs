use base64::{engine::general_purpose, Engine as _};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::json;
use tracing::debug;

use crate::config::{Action, Config};
use crate::error::{Result, SpaceError};
use crate::space::{CreateSpaceRequest, CreatedSpace, SpaceInfo, UpdateSpaceRequest};

const AUTH_HEADER: &str = "X-Cybozu-Authorization";

pub struct KintoneClient {
    http: Client,
    base_url: String,
    auth: String,
    guest: bool,
    action: Action,
    space_id: Option<String>,
    headers_echo: String,
}

impl KintoneClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let auth = general_purpose::STANDARD
            .encode(format!("{}:{}", config.username, config.password));
        let headers_echo = serde_json::to_string_pretty(&json!({
            "X-Cybozu-Authorization": auth,
            "Content-Type": "application/json",
        }))?;

        Ok(Self {
            http,
            base_url: format!("https://{}", config.domain),
            auth,
            guest: config.guest,
            action: config.action,
            space_id: config.space_id.clone(),
            headers_echo,
        })
    }

    /// Resolves the logical path against the guest-space URL scheme. Guest
    /// spaces are created through the standard endpoint (the template carries
    /// the guest attribute); every other guest operation is addressed under
    /// `/k/guest/<spaceId>/v1`.
    pub fn api_path(&self, path: &str) -> String {
        if self.guest && self.action == Action::Create {
            return format!("/k/v1{path}");
        }
        if self.guest {
            let space_id = self.space_id.as_deref().unwrap_or_default();
            return format!("/k/guest/{space_id}/v1{path}");
        }
        format!("/k/v1{path}")
    }

    pub async fn get_space(&self, space_id: &str) -> Result<SpaceInfo> {
        let value = self
            .execute(Method::GET, "/space.json", Some(json!({ "id": space_id })))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create_space(&self, body: &CreateSpaceRequest) -> Result<CreatedSpace> {
        let path = if body.id.is_some() {
            "/template/space.json"
        } else {
            "/space.json"
        };
        let value = self
            .execute(Method::POST, path, Some(serde_json::to_value(body)?))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn update_space(&self, body: &UpdateSpaceRequest) -> Result<()> {
        self.execute(Method::PUT, "/space.json", Some(serde_json::to_value(body)?))
            .await?;
        Ok(())
    }

    pub async fn delete_space(&self, space_id: &str) -> Result<()> {
        self.execute(
            Method::DELETE,
            "/space.json",
            Some(json!({ "id": space_id })),
        )
        .await?;
        Ok(())
    }

    /// Sends one request and surfaces any non-2xx response as an API error
    /// carrying the status, response body and an echo of what was sent.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, self.api_path(path));
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTH_HEADER, self.auth.clone())
            .header(CONTENT_TYPE, "application/json");

        let request_body = body.as_ref().map(|value| value.to_string());
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SpaceError::Api {
                status: status.as_u16(),
                body: text,
                request_body,
                request_headers: self.headers_echo.clone(),
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(action: Action, guest: bool, space_id: Option<&str>) -> Config {
        Config {
            domain: "example.cybozu.com".to_string(),
            username: "taro".to_string(),
            password: "secret".to_string(),
            action,
            space_id: space_id.map(str::to_string),
            space_name: None,
            fixed_member: None,
            create_app_permission: None,
            guest,
            template_id: None,
        }
    }

    #[test]
    fn standard_spaces_use_the_plain_prefix() {
        let client = KintoneClient::new(&config(Action::Show, false, Some("5"))).unwrap();
        assert_eq!(client.api_path("/space.json"), "/k/v1/space.json");
    }

    #[test]
    fn guest_operations_route_through_the_guest_prefix() {
        let client = KintoneClient::new(&config(Action::Update, true, Some("abc"))).unwrap();
        assert_eq!(client.api_path("/space.json"), "/k/guest/abc/v1/space.json");
    }

    #[test]
    fn guest_creation_uses_the_standard_prefix() {
        let client = KintoneClient::new(&config(Action::Create, true, None)).unwrap();
        assert_eq!(client.api_path("/space.json"), "/k/v1/space.json");
        assert_eq!(
            client.api_path("/template/space.json"),
            "/k/v1/template/space.json"
        );
    }

    #[test]
    fn auth_header_is_base64_of_credentials() {
        let client = KintoneClient::new(&config(Action::Show, false, Some("5"))).unwrap();
        assert_eq!(client.auth, general_purpose::STANDARD.encode("taro:secret"));
        assert!(client.headers_echo.contains("X-Cybozu-Authorization"));
    }
}
