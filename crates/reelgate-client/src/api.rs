use bytes::Bytes;
use reqwest::{Client, Response, Url};
use tracing::debug;

use reelgate_types::api::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, VideoListResponse,
};

use crate::error::ClientError;

/// Thin typed wrapper over the server's HTTP endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST /register. Returns the server's confirmation message.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.endpoint(&["register"])?)
            .json(&RegisterRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let body: MessageResponse = check(resp).await?.json().await?;
        Ok(body.message)
    }

    /// POST /login. Returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.endpoint(&["login"])?)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let body: LoginResponse = check(resp).await?.json().await?;
        Ok(body.token)
    }

    /// GET /videos.
    pub async fn list_videos(&self, token: &str) -> Result<Vec<String>, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(&["videos"])?)
            .bearer_auth(token)
            .send()
            .await?;

        let body: VideoListResponse = check(resp).await?.json().await?;
        Ok(body.videos)
    }

    /// GET /video/{filename}. The whole file is buffered in memory.
    pub async fn fetch_video(&self, token: &str, filename: &str) -> Result<Bytes, ClientError> {
        let resp = self
            .http
            .get(self.endpoint(&["video", filename])?)
            .bearer_auth(token)
            .send()
            .await?;

        let bytes = check(resp).await?.bytes().await?;
        debug!("Fetched {} ({} bytes)", filename, bytes.len());
        Ok(bytes)
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turn a non-success response into [`ClientError::Status`], keeping the
/// server's `message` when the body has one.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("HTTP error! status: {}", status.as_u16()));

    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let api = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            api.endpoint(&["videos"]).unwrap().as_str(),
            "http://localhost:8080/videos"
        );

        let api = ApiClient::new("http://example.com/media/").unwrap();
        assert_eq!(
            api.endpoint(&["video", "demo.mp4"]).unwrap().as_str(),
            "http://example.com/media/video/demo.mp4"
        );
    }

    #[test]
    fn filenames_are_a_single_segment() {
        let api = ApiClient::new("http://localhost:8080").unwrap();
        let url = api.endpoint(&["video", "../etc/passwd"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/video/..%2Fetc%2Fpasswd");
    }

    #[test]
    fn bad_base_urls_are_rejected() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
