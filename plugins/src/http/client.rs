use kanban_core::api::ApiError;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{decode_error, from_reqwest, preview_body};

async fn read_body(resp: reqwest::Response, url: &str) -> Result<(u16, String), ApiError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|err| from_reqwest(err, url))?;

    if !status.is_success() {
        let preview = preview_body(&body);
        return Err(ApiError::status_error(status.as_u16(), url, preview));
    }
    Ok((status.as_u16(), body))
}

async fn parse_json_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    url: &str,
) -> Result<T, ApiError> {
    let (status, body) = read_body(resp, url).await?;
    serde_json::from_str::<T>(&body).map_err(|err| {
        let preview = preview_body(&body);
        decode_error(status, url, err, preview)
    })
}

/// Thin JSON-over-HTTP client bound to one backend base URL.
///
/// Every failure comes back as an [`ApiError`] with its kind already
/// classified. `token` values are sent verbatim as the `Authorization` header.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(
            target: "kanban.http",
            stage = "http.request.in",
            method = %method,
            url = %url,
            authorized = token.is_some()
        );
        let mut req = self.http.request(method.clone(), url);
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, token);
        }
        let resp = build(req).send().await.map_err(|err| {
            let err = from_reqwest(err, url);
            tracing::debug!(
                target: "kanban.http",
                stage = "http.request.err",
                method = %method,
                url = %url,
                kind = %err.kind()
            );
            err
        })?;
        tracing::debug!(
            target: "kanban.http",
            stage = "http.request.out",
            method = %method,
            url = %url,
            status = %resp.status()
        );
        Ok(resp)
    }

    /// Liveness: `GET /`, body returned as plain text.
    pub async fn check_status(&self) -> Result<String, ApiError> {
        let url = self.url("/");
        let resp = self.send(Method::GET, &url, None, |req| req).await?;
        let (_, body) = read_body(resp, &url).await?;
        Ok(body)
    }

    /// Bodiless request decoded as JSON.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send(method, &url, token, |req| req).await?;
        parse_json_response(resp, &url).await
    }

    /// Request with a JSON body, response decoded as JSON.
    pub async fn call_with<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self.send(method, &url, token, |req| req.json(body)).await?;
        parse_json_response(resp, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::api::{ApiErrorKind, MessageResponse, User};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_check_status_returns_text() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("API running")
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), 1_000).unwrap();
        assert_eq!(client.check_status().await.unwrap(), "API running");
    }

    #[tokio::test]
    async fn test_non_success_is_status_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(503)
            .with_body("service unavailable")
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), 1_000).unwrap();
        let err = client.check_status().await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Status);
        assert_eq!(err.status(), Some(503));
        assert!(err.message().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_error() {
        let client = HttpClient::new("http://127.0.0.1:1", 1_000).unwrap();
        let err = client.check_status().await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Connect);
    }

    #[tokio::test]
    async fn test_silent_server_is_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HttpClient::new(&format!("http://{addr}"), 200).unwrap();
        let err = client.check_status().await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/users/auth/me")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), 1_000).unwrap();
        let err = client
            .call::<User>(Method::GET, "/api/users/auth/me", Some("Bearer t"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Decode);
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn test_token_sent_verbatim() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/users/5")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(r#"{"message":"User deleted"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(&server.url(), 1_000).unwrap();
        let resp: MessageResponse = client
            .call(Method::DELETE, "/api/users/5", Some("Bearer abc"))
            .await
            .unwrap();
        assert_eq!(resp.message, "User deleted");
    }

    #[tokio::test]
    async fn test_no_auth_header_without_token() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = HttpClient::new(&format!("{}/", server.url()), 1_000).unwrap();
        client.check_status().await.unwrap();
    }
}
