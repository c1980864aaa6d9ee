use crate::error::{Result, ScoutError};
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// CSS signatures of the elements the crawler reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLayout {
    /// Section on the locations page that lists every state
    pub locations_section: String,
    /// One state entry inside the locations section
    pub state_name: String,
    /// Anchor inside a state entry
    pub state_anchor: String,
    /// One hotel on a state listing page
    pub hotel_item: String,
    pub hotel_details: String,
    pub hotel_name: String,
    pub hotel_address: String,
    pub currency: String,
    pub price_whole: String,
    pub price_fraction: String,
    pub nightly_rate: String,
    pub weekly_rate: String,
    /// Rating widget; the rating is the `alt` of its first child element
    pub rating: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            locations_section: "section.ws-locations-list-section".to_string(),
            state_name: "div.subdiv-name".to_string(),
            state_anchor: "a".to_string(),
            hotel_item: "div.list-view".to_string(),
            hotel_details: "div.hotel-details".to_string(),
            hotel_name: "div.hotel-name".to_string(),
            hotel_address: "div.hotel-address".to_string(),
            currency: "div.currency".to_string(),
            price_whole: "div.price-whole".to_string(),
            price_fraction: "div.price-fraction".to_string(),
            nightly_rate: "div.nightly-rate".to_string(),
            weekly_rate: "div.weekly-rate".to_string(),
            rating: "div.ta-rating".to_string(),
        }
    }
}

/// Compiled form of [`SiteLayout`], shared by the navigator and every extraction task
#[derive(Debug)]
pub struct Selectors {
    pub locations_section: Selector,
    pub state_name: Selector,
    pub state_anchor: Selector,
    pub hotel_item: Selector,
    pub hotel_details: Selector,
    pub hotel_name: Selector,
    pub hotel_address: Selector,
    pub currency: Selector,
    pub price_whole: Selector,
    pub price_fraction: Selector,
    pub nightly_rate: Selector,
    pub weekly_rate: Selector,
    pub rating: Selector,
}

impl Selectors {
    pub fn compile(layout: &SiteLayout) -> Result<Self> {
        Ok(Self {
            locations_section: parse(&layout.locations_section)?,
            state_name: parse(&layout.state_name)?,
            state_anchor: parse(&layout.state_anchor)?,
            hotel_item: parse(&layout.hotel_item)?,
            hotel_details: parse(&layout.hotel_details)?,
            hotel_name: parse(&layout.hotel_name)?,
            hotel_address: parse(&layout.hotel_address)?,
            currency: parse(&layout.currency)?,
            price_whole: parse(&layout.price_whole)?,
            price_fraction: parse(&layout.price_fraction)?,
            nightly_rate: parse(&layout.nightly_rate)?,
            weekly_rate: parse(&layout.weekly_rate)?,
            rating: parse(&layout.rating)?,
        })
    }
}

fn parse(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScoutError::Selector(format!("{:?}: {:?}", css, e)))
}
