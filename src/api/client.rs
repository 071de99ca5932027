use super::types::*;
use crate::config::BackendConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The six backend operations the client consumes. The session layer is
/// generic over this trait so tests can substitute implementations.
#[async_trait]
pub trait LunaApi: Send + Sync {
    async fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;
    async fn analyze_image(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisResponse>;
    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedImage>;
    async fn gallery(&self, user_id: &str, search: Option<&str>) -> Result<Vec<GalleryItem>>;
    async fn generated_images(&self, user_id: &str) -> Result<Vec<GeneratedImage>>;
}

pub struct HttpClient {
    origin: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            origin: config.origin.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The backend origin this client targets.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.origin.trim_end_matches('/'), path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::api(status.as_u16(), message))
    }
}

#[async_trait]
impl LunaApi for HttpClient {
    async fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        debug!("Fetching chat history for: {}", user_id);

        let response = self
            .client
            .get(self.api_url(&format!("history/{}", user_id)))
            .send()
            .await?;
        let entries = Self::check(response).await?.json().await?;

        Ok(entries)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        debug!(
            "Sending chat message for {} ({} chars)",
            request.user_id,
            request.message.len()
        );

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&request)
            .send()
            .await?;
        let reply = Self::check(response).await?.json().await?;

        Ok(reply)
    }

    async fn analyze_image(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisResponse> {
        debug!(
            "Uploading {} ({} bytes) for analysis",
            file_name,
            bytes.len()
        );

        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| Error::internal(format!("Failed to build multipart: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("user_id", user_id.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.api_url("analyze-image"))
            .multipart(form)
            .send()
            .await?;
        let analysis = Self::check(response).await?.json().await?;

        Ok(analysis)
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedImage> {
        debug!("Requesting image generation: {}", request.prompt);

        let response = self
            .client
            .post(self.api_url("generate-luna"))
            .json(&request)
            .send()
            .await?;
        let image = Self::check(response).await?.json().await?;

        Ok(image)
    }

    async fn gallery(&self, user_id: &str, search: Option<&str>) -> Result<Vec<GalleryItem>> {
        debug!("Fetching gallery for {} (search: {:?})", user_id, search);

        let mut builder = self
            .client
            .get(self.api_url(&format!("gallery/{}", user_id)));
        if let Some(term) = search {
            builder = builder.query(&[("search", term)]);
        }

        let response = builder.send().await?;
        let items = Self::check(response).await?.json().await?;

        Ok(items)
    }

    async fn generated_images(&self, user_id: &str) -> Result<Vec<GeneratedImage>> {
        debug!("Fetching generated images for: {}", user_id);

        let response = self
            .client
            .get(self.api_url(&format!("generated-images/{}", user_id)))
            .send()
            .await?;
        let images = Self::check(response).await?.json().await?;

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config(origin: &str) -> BackendConfig {
        BackendConfig {
            origin: origin.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn api_url_joins_origin_and_path() {
        let client = HttpClient::new(test_config("http://127.0.0.1:8000")).unwrap();
        assert_eq!(
            client.api_url("history/user_1"),
            "http://127.0.0.1:8000/api/history/user_1"
        );
    }

    #[test]
    fn trailing_origin_slash_is_tolerated() {
        let client = HttpClient::new(test_config("http://127.0.0.1:8000/")).unwrap();
        assert_eq!(client.api_url("chat"), "http://127.0.0.1:8000/api/chat");
        assert_eq!(client.origin(), "http://127.0.0.1:8000");
    }
}
