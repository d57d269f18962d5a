// HTTP client wrapper for the Devlog API

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found")]
    NotFound,
}

pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;
        self.handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.patch(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct TestUser {
        id: i64,
        username: String,
    }

    #[tokio::test]
    async fn test_get_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "alice"})),
            )
            .mount(&server)
            .await;

        let client = Client::new(&server.uri());
        let user: TestUser = client.get("/users/1").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"username": "bob"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 2, "username": "bob"})),
            )
            .mount(&server)
            .await;

        let client = Client::new(&server.uri());
        let user: TestUser = client
            .post("/users", &json!({"username": "bob"}))
            .await
            .unwrap();
        assert_eq!(user.id, 2);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_dedicated_variant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = Client::new(&server.uri());
        let result: Result<TestUser, ClientError> = client.get("/users/999").await;
        assert!(matches!(result, Err(ClientError::NotFound)));
    }

    #[tokio::test]
    async fn test_api_error_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
            .mount(&server)
            .await;

        let client = Client::new(&server.uri());
        let result: Result<TestUser, ClientError> =
            client.post("/users", &json!({"username": "alice"})).await;
        match result {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate");
            }
            other => panic!("expected Api error, got {:?}", other.map(|u| u.id)),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = Client::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
