use crate::error::{Result, ScoutError};
use crate::scrapers::traits::Renderer;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Renderer backed by a headless Chrome session with a single tab
pub struct ChromeRenderer {
    // Dropping the browser closes the tab, so it lives as long as the renderer
    _browser: Browser,
    tab: Arc<Tab>,
    settle_delay: Duration,
}

impl ChromeRenderer {
    /// Launch Chrome and open the tab every page is rendered in
    pub fn launch(headless: bool, settle_delay: Duration) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .build()
            .map_err(|e| ScoutError::Browser(format!("failed to build launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| ScoutError::Browser(format!("failed to launch Chrome: {:#}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScoutError::Browser(format!("failed to open tab: {:#}", e)))?;

        Ok(Self {
            _browser: browser,
            tab,
            settle_delay,
        })
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn navigate(&self, url: &Url) -> Result<()> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();
        let settle_delay = self.settle_delay;

        let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            tab.navigate_to(&target)?;
            tab.wait_until_navigated()?;

            // Listings are rendered client-side after the load event
            debug!("Waiting {:?} for page to settle", settle_delay);
            thread::sleep(settle_delay);
            Ok(())
        })
        .await;

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScoutError::Navigation {
                url: url.to_string(),
                message: format!("{:#}", e),
            }),
            Err(e) => Err(ScoutError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn current_html(&self) -> Result<String> {
        let tab = Arc::clone(&self.tab);

        let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<String>> {
            let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
            Ok(html_result
                .value
                .and_then(|value| value.as_str().map(str::to_owned)))
        })
        .await
        .map_err(|e| ScoutError::Browser(e.to_string()))?;

        match outcome {
            Ok(Some(html)) => {
                debug!("Captured {} bytes of rendered HTML", html.len());
                Ok(html)
            }
            Ok(None) => Err(ScoutError::Browser(
                "could not get HTML from page".to_string(),
            )),
            Err(e) => Err(ScoutError::Browser(format!("{:#}", e))),
        }
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}
