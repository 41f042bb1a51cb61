//! HTTP access to the analysis backend.
//!
//! The flows only see the `Transport` trait. Each call returns a boxed
//! `'static` future so the caller can hand it to the runtime and keep working
//! on the UI thread while it is outstanding.

use crate::core::{AnalyzeRequestBody, AnalyzeResponse, UploadFile, UploadResponse};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client as HttpClient, Url};
use tracing::debug;

pub type TransportFuture<T> = BoxFuture<'static, Result<T>>;

pub trait Transport: Send + Sync {
    /// `POST /upload` with the file as multipart field `file`
    fn upload(&self, file: UploadFile) -> TransportFuture<UploadResponse>;

    /// `POST /analyze` with a JSON body
    fn analyze(&self, body: AnalyzeRequestBody) -> TransportFuture<AnalyzeResponse>;

    /// GET raw bytes of an image reference
    fn fetch_bytes(&self, reference: &str) -> TransportFuture<Vec<u8>>;
}

/// reqwest-backed transport bound to one server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        // Without a trailing slash `Url::join` would drop the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| eyre!("Invalid server URL '{base_url}': {e}"))?;
        let client = HttpClient::builder().user_agent(user_agent).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint or a server-relative reference such as
    /// `/static/images/x.png` against the base URL
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        let relative = reference.trim_start_matches('/');
        if let Ok(absolute) = Url::parse(reference) {
            return Ok(absolute);
        }
        if reference.starts_with('/') {
            // Server-absolute path: keep it rooted at the host, not the base path.
            let mut root = self.base_url.clone();
            root.set_path("/");
            return Ok(root.join(relative)?);
        }
        Ok(self.base_url.join(relative)?)
    }
}

impl Transport for HttpTransport {
    fn upload(&self, file: UploadFile) -> TransportFuture<UploadResponse> {
        let client = self.client.clone();
        let url = self.resolve("upload");
        async move {
            let url = url?;
            let bytes = tokio::fs::read(&file.path).await?;
            debug!("Uploading {} ({} bytes) to {}", file.file_name, bytes.len(), url);
            let part = reqwest::multipart::Part::bytes(bytes).file_name(file.file_name.clone());
            let form = reqwest::multipart::Form::new().part("file", part);
            let response: UploadResponse = client
                .post(url)
                .multipart(form)
                .send()
                .await?
                .json()
                .await?;
            Ok(response)
        }
        .boxed()
    }

    fn analyze(&self, body: AnalyzeRequestBody) -> TransportFuture<AnalyzeResponse> {
        let client = self.client.clone();
        let url = self.resolve("analyze");
        async move {
            let url = url?;
            debug!("Requesting {} analysis from {}", body.analysis_type, url);
            let response: AnalyzeResponse = client
                .post(url)
                .json(&body)
                .send()
                .await?
                .json()
                .await?;
            Ok(response)
        }
        .boxed()
    }

    fn fetch_bytes(&self, reference: &str) -> TransportFuture<Vec<u8>> {
        let client = self.client.clone();
        let url = self.resolve(reference);
        async move {
            let url = url?;
            let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
            Ok(bytes.to_vec())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, "datadash-test").unwrap()
    }

    #[test]
    fn test_endpoints_resolve_under_base() {
        let t = transport("http://127.0.0.1:8080");
        assert_eq!(t.resolve("upload").unwrap().as_str(), "http://127.0.0.1:8080/upload");

        let t = transport("http://example.com/dash");
        assert_eq!(t.resolve("analyze").unwrap().as_str(), "http://example.com/dash/analyze");
    }

    #[test]
    fn test_server_relative_plot_keeps_query() {
        let t = transport("http://example.com/dash/");
        let url = t.resolve("/static/images/s1_histogram.png?t=1700000000000").unwrap();
        assert_eq!(
            url.as_str(),
            "http://example.com/static/images/s1_histogram.png?t=1700000000000"
        );
    }

    #[test]
    fn test_absolute_reference_passes_through() {
        let t = transport("http://example.com");
        let url = t.resolve("https://cdn.example.org/plot.png").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.org/plot.png");
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        assert!(HttpTransport::new("not a url", "ua").is_err());
    }
}
