use crate::error::{Result, ScoutError};
use crate::models::{HotelFragment, StateLink};
use crate::scrapers::traits::Renderer;
use crate::scrapers::types::Selectors;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Walks the locations index and the per-state listing pages
pub struct Navigator {
    renderer: Box<dyn Renderer>,
    selectors: Arc<Selectors>,
    base_url: Url,
    locations_path: String,
    page_timeout: Duration,
}

impl Navigator {
    pub fn new(
        renderer: Box<dyn Renderer>,
        selectors: Arc<Selectors>,
        base_url: Url,
        locations_path: impl Into<String>,
        page_timeout: Duration,
    ) -> Self {
        Self {
            renderer,
            selectors,
            base_url,
            locations_path: locations_path.into(),
            page_timeout,
        }
    }

    /// Render the locations index
    pub async fn fetch_root_listing_page(&self) -> Result<String> {
        let url = self.resolve(&self.locations_path)?;
        info!("Opening locations page {} with {} renderer", url, self.renderer.name());
        self.render(&url).await
    }

    /// Collect the link of every state listed on the locations page
    pub fn list_state_links(&self, html: &str) -> Result<Vec<StateLink>> {
        let document = Html::parse_document(html);

        let section = document
            .select(&self.selectors.locations_section)
            .next()
            .ok_or_else(|| ScoutError::Navigation {
                url: self.base_url.to_string(),
                message: "locations section not found".to_string(),
            })?;

        let mut links = Vec::new();
        for (idx, state) in section.select(&self.selectors.state_name).enumerate() {
            let href = state
                .select(&self.selectors.state_anchor)
                .next()
                .and_then(|anchor| anchor.value().attr("href"));

            match href {
                Some(href) => links.push(StateLink {
                    href: href.to_string(),
                    url: self.resolve(href)?,
                }),
                None => {
                    let label = state.text().collect::<String>();
                    warn!("Skipped state {} ({}): no link", idx, label.trim());
                }
            }
        }

        info!("Found {} states", links.len());
        Ok(links)
    }

    /// Render one state's hotel listing page
    pub async fn fetch_state_page(&self, link: &StateLink) -> Result<String> {
        debug!("Opening state page {}", link.url);
        self.render(&link.url).await
    }

    /// Split a state page into one fragment per hotel
    pub fn list_hotel_fragments(&self, html: &str) -> Vec<HotelFragment> {
        let document = Html::parse_document(html);
        let fragments: Vec<_> = document
            .select(&self.selectors.hotel_item)
            .map(|element| HotelFragment(element.html()))
            .collect();

        debug!("Found {} hotel cards in HTML", fragments.len());
        fragments
    }

    async fn render(&self, url: &Url) -> Result<String> {
        let page = async {
            self.renderer.navigate(url).await?;
            self.renderer.current_html().await
        };

        tokio::time::timeout(self.page_timeout, page)
            .await
            .map_err(|_| ScoutError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {:?}", self.page_timeout),
            })?
    }

    fn resolve(&self, href: &str) -> Result<Url> {
        self.base_url.join(href).map_err(|e| ScoutError::Navigation {
            url: href.to_string(),
            message: format!("invalid link: {}", e),
        })
    }
}
