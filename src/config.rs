use crate::recorder::QuoteStyle;
use crate::scrapers::SiteLayout;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "hotel-scout.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Chrome,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_locations_path")]
    pub locations_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default)]
    pub summary_path: Option<PathBuf>,
    #[serde(default = "default_renderer")]
    pub renderer: RendererKind,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_extractions")]
    pub max_concurrent_extractions: usize,
    #[serde(default)]
    pub quote_style: QuoteStyle,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub layout: SiteLayout,
}

fn default_base_url() -> String {
    "https://www.woodspring.com".to_string()
}

fn default_locations_path() -> String {
    "/locations".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_renderer() -> RendererKind {
    RendererKind::Chrome
}

fn default_headless() -> bool {
    true
}

fn default_settle_delay_ms() -> u64 {
    3000 // listings are filled in by client-side scripts
}

fn default_page_timeout_secs() -> u64 {
    60
}

fn default_max_concurrent_extractions() -> usize {
    16
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_tracing_level() -> String {
    "info".to_string()
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locations_path: default_locations_path(),
            output_path: default_output_path(),
            summary_path: None,
            renderer: default_renderer(),
            headless: default_headless(),
            settle_delay_ms: default_settle_delay_ms(),
            page_timeout_secs: default_page_timeout_secs(),
            max_concurrent_extractions: default_max_concurrent_extractions(),
            quote_style: QuoteStyle::default(),
            user_agent: default_user_agent(),
            tracing_level: default_tracing_level(),
            layout: SiteLayout::default(),
        }
    }
}

impl ScoutConfig {
    /// Load `path` if it exists, apply environment overrides, then validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(config_str) => Self::from_yaml(&config_str)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(config_str)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = env::var("HOTEL_SCOUT_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(output) = env::var("HOTEL_SCOUT_OUTPUT") {
            self.output_path = PathBuf::from(output);
        }

        if let Ok(summary) = env::var("HOTEL_SCOUT_SUMMARY") {
            self.summary_path = Some(PathBuf::from(summary));
        }

        if let Ok(renderer) = env::var("HOTEL_SCOUT_RENDERER") {
            self.renderer = match renderer.to_lowercase().as_str() {
                "chrome" => RendererKind::Chrome,
                "http" => RendererKind::Http,
                other => anyhow::bail!("Unknown HOTEL_SCOUT_RENDERER '{}' (expected chrome or http)", other),
            };
        }

        if let Ok(concurrency) = env::var("HOTEL_SCOUT_CONCURRENCY") {
            self.max_concurrent_extractions = concurrency
                .parse()
                .context("Failed to parse HOTEL_SCOUT_CONCURRENCY environment variable")?;
        }

        if let Ok(timeout) = env::var("HOTEL_SCOUT_PAGE_TIMEOUT_SECS") {
            self.page_timeout_secs = timeout
                .parse()
                .context("Failed to parse HOTEL_SCOUT_PAGE_TIMEOUT_SECS environment variable")?;
        }

        if let Ok(tracing_level) = env::var("TRACING_LEVEL") {
            self.tracing_level = tracing_level;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.max_concurrent_extractions == 0 {
            anyhow::bail!("max_concurrent_extractions must be at least 1");
        }

        if self.page_timeout_secs == 0 {
            anyhow::bail!("page_timeout_secs must be at least 1");
        }

        if self.output_path.as_os_str().is_empty() {
            anyhow::bail!("output_path is required");
        }

        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base_url '{}'", self.base_url))
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
