use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Structural element of a hotel listing that extraction depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelField {
    Details,
    Name,
    Location,
    Currency,
    PriceWhole,
    PriceFraction,
    Frequency,
    Rating,
}

impl fmt::Display for HotelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HotelField::Details => "hotel details",
            HotelField::Name => "hotel name",
            HotelField::Location => "hotel address",
            HotelField::Currency => "currency symbol",
            HotelField::PriceWhole => "price whole part",
            HotelField::PriceFraction => "price fraction part",
            HotelField::Frequency => "nightly or weekly rate",
            HotelField::Rating => "rating",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("missing {0} in hotel listing")]
    Parse(HotelField),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode row: {0}")]
    Encode(#[from] csv::Error),

    #[error("worker pool closed before the hotel could run")]
    PoolClosed,

    #[error("invalid selector: {0}")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
