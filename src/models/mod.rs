use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Column order of the output file
pub const COLUMNS: [&str; 5] = ["name", "location", "price", "frequency", "rating"];

/// One hotel listing as written to the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub location: String,
    pub price: String,
    pub frequency: String,
    pub rating: String,
}

impl HotelRecord {
    /// Field values in column order
    pub fn fields(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.location.as_str(),
            self.price.as_str(),
            self.frequency.as_str(),
            self.rating.as_str(),
        ]
    }
}

/// Outer HTML of a single hotel list item
#[derive(Debug, Clone)]
pub struct HotelFragment(pub String);

impl HotelFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Link to one state's hotel listing page
#[derive(Debug, Clone, PartialEq)]
pub struct StateLink {
    pub href: String,
    pub url: Url,
}

/// Outcome counts for a whole crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub states_visited: usize,
    pub states_total: usize,
    pub hotels_seen: usize,
    pub recorded: usize,
    pub parse_failures: usize,
    pub write_failures: usize,
    pub task_failures: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn start() -> Self {
        Self {
            states_visited: 0,
            states_total: 0,
            hotels_seen: 0,
            recorded: 0,
            parse_failures: 0,
            write_failures: 0,
            task_failures: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn failures(&self) -> usize {
        self.parse_failures + self.write_failures + self.task_failures
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Completion line followed by the outcome counts
    pub fn report(&self) -> String {
        format!(
            "Success!\n{} states, {} hotels seen, {} recorded, {} failed ({} parse, {} write, {} task)",
            self.states_visited,
            self.hotels_seen,
            self.recorded,
            self.failures(),
            self.parse_failures,
            self.write_failures,
            self.task_failures
        )
    }
}
