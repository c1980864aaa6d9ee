use crate::error::{Result, ScoutError};
use crate::scrapers::traits::Renderer;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

/// Renderer that fetches markup over plain HTTP
///
/// No script runs, so this only works for pages whose listings are rendered
/// server-side.
pub struct HttpRenderer {
    client: Client,
    current: Mutex<Option<String>>,
}

impl HttpRenderer {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScoutError::Browser(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            current: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let failed = |message: String| ScoutError::Navigation {
            url: url.to_string(),
            message,
        };

        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            return Err(failed(format!("status {}", response.status())));
        }

        let html = response.text().await.map_err(|e| failed(e.to_string()))?;
        debug!("Downloaded {} bytes of HTML", html.len());

        *self.current.lock().await = Some(html);
        Ok(())
    }

    async fn current_html(&self) -> Result<String> {
        self.current
            .lock()
            .await
            .clone()
            .ok_or_else(|| ScoutError::Browser("no page has been loaded".to_string()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_current_html_before_navigation_fails() {
        let renderer = HttpRenderer::new("hotel-scout-test", Duration::from_secs(5)).unwrap();

        assert!(matches!(
            renderer.current_html().await,
            Err(ScoutError::Browser(_))
        ));
        assert_eq!(renderer.name(), "http");
    }
}
