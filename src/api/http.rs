use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{faculty_path, DirectoryApi, SearchTarget, LIST_ALL_PATH, RELIST_PATH, UPDATE_PATH};
use crate::app_error::AppError;
use crate::models::faculty::{FacultyDetail, FacultyId, FacultyListItem};
use crate::models::update::{AdminCredentials, ErrorDetail, UpdateReceipt};
use crate::AppConfig;

#[derive(Clone, Debug)]
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            AppError::Anyhow(anyhow::anyhow!("invalid base_url {:?}: {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::Anyhow(anyhow::anyhow!(
                "base_url {:?} is not an http origin",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorDetail>(&body)
            .ok()
            .and_then(ErrorDetail::into_text);
        if status == StatusCode::UNAUTHORIZED && detail.is_none() {
            return Err(AppError::Unauthorized);
        }
        return Err(AppError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_all(&self) -> Result<Vec<FacultyListItem>, AppError> {
        self.get_json(LIST_ALL_PATH).await
    }

    async fn search(&self, target: &SearchTarget) -> Result<Vec<FacultyListItem>, AppError> {
        self.get_json(&target.path_and_query()).await
    }

    async fn faculty_detail(&self, id: FacultyId) -> Result<FacultyDetail, AppError> {
        self.get_json(&faculty_path(id)).await
    }

    async fn run_update(&self, credentials: &AdminCredentials) -> Result<UpdateReceipt, AppError> {
        let url = self.url(UPDATE_PATH);
        tracing::debug!("POST {} as {}", url, credentials.username);

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?;
        decode(response).await
    }

    async fn list_after_update(&self) -> Result<Vec<FacultyListItem>, AppError> {
        self.get_json(RELIST_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpDirectoryClient {
        let config = AppConfig {
            base_url: format!("{}/", server.base_url()),
            ..AppConfig::default()
        };
        HttpDirectoryClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn list_all_parses_roster() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search/all");
                then.status(200).json_body(json!([
                    {"id": 1, "name": "Ada Smith"},
                    {"id": 2, "name": "Bo Chen"}
                ]));
            })
            .await;

        let roster = client_for(&server).list_all().await.unwrap();

        mock.assert_async().await;
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].display_name, "Bo Chen");
    }

    #[tokio::test]
    async fn search_sends_decoded_query_param() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/search/research")
                    .query_param("q", "signal processing & control");
                then.status(200).json_body(json!([{"id": 3, "name": "Cy Diaz"}]));
            })
            .await;

        let results = client_for(&server)
            .search(&SearchTarget::Interest("signal processing & control".into()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(results[0].id, 3);
    }

    #[tokio::test]
    async fn detail_not_found_maps_to_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/faculty/99");
                then.status(404).json_body(json!({"detail": "Faculty not found"}));
            })
            .await;

        let err = client_for(&server).faculty_detail(99).await.unwrap_err();
        assert!(matches!(err, AppError::Status { status: 404, .. }));
        assert_eq!(err.detail(), Some("Faculty not found"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search/name");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = client_for(&server)
            .search(&SearchTarget::Name("x".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn update_sends_basic_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/update")
                    .header("authorization", "Basic YWRtaW46cHc=");
                then.status(200).json_body(json!({"record_count": 118}));
            })
            .await;

        let receipt = client_for(&server)
            .run_update(&AdminCredentials::new("admin", "pw"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.record_count, 118);
    }

    #[tokio::test]
    async fn update_rejection_carries_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/update");
                then.status(401).json_body(json!({"detail": "Invalid credentials"}));
            })
            .await;

        let err = client_for(&server)
            .run_update(&AdminCredentials::new("admin", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.detail(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn bare_unauthorized_without_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/update");
                then.status(401);
            })
            .await;

        let err = client_for(&server)
            .run_update(&AdminCredentials::new("admin", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = AppConfig {
            base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(HttpDirectoryClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let config = AppConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..AppConfig::default()
        };
        let err = HttpDirectoryClient::new(&config)
            .unwrap()
            .list_after_update()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
