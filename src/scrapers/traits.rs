use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Page rendering backend used by the navigator
///
/// A renderer holds one browsing session: `navigate` loads a page and blocks
/// until its markup has settled, `current_html` returns the markup of the page
/// loaded last.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load `url` and wait until it is rendered
    async fn navigate(&self, url: &Url) -> Result<()>;

    /// Markup of the most recently loaded page
    async fn current_html(&self) -> Result<String>;

    /// Get the name of the rendering backend
    fn name(&self) -> &'static str;
}
