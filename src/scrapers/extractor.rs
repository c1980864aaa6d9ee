use crate::error::{HotelField, Result, ScoutError};
use crate::models::{HotelFragment, HotelRecord};
use crate::scrapers::types::Selectors;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

/// Builds a [`HotelRecord`] out of one hotel list item
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Arc<Selectors>,
}

impl Extractor {
    pub fn new(selectors: Arc<Selectors>) -> Self {
        Self { selectors }
    }

    /// Extract every field of a hotel, failing on the first missing element
    pub fn extract(&self, fragment: &HotelFragment) -> Result<HotelRecord> {
        let s = &self.selectors;
        let document = Html::parse_fragment(fragment.as_str());
        let hotel = document.root_element();

        let details = first(hotel, &s.hotel_details, HotelField::Details)?;

        let name = strip_name_prefix(&text_of(details, &s.hotel_name, HotelField::Name)?);
        let location = text_of(details, &s.hotel_address, HotelField::Location)?;

        // Price parts sit next to the details block, not inside it
        let mut price = text_of(hotel, &s.currency, HotelField::Currency)?;
        price.push_str(&text_of(hotel, &s.price_whole, HotelField::PriceWhole)?);
        price.push('.');
        price.push_str(&text_of(hotel, &s.price_fraction, HotelField::PriceFraction)?);

        let frequency = match hotel.select(&s.nightly_rate).next() {
            Some(nightly) => nightly.text().collect(),
            None => text_of(hotel, &s.weekly_rate, HotelField::Frequency)?,
        };

        let rating = first(details, &s.rating, HotelField::Rating)?
            .children()
            .find_map(ElementRef::wrap)
            .and_then(|icon| icon.value().attr("alt"))
            .map(str::to_owned)
            .ok_or(ScoutError::Parse(HotelField::Rating))?;

        Ok(HotelRecord {
            name,
            location,
            price,
            frequency,
            rating,
        })
    }
}

fn first<'a>(scope: ElementRef<'a>, selector: &Selector, field: HotelField) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or(ScoutError::Parse(field))
}

fn text_of(scope: ElementRef<'_>, selector: &Selector, field: HotelField) -> Result<String> {
    Ok(first(scope, selector, field)?.text().collect())
}

/// The hotel name element starts with one decorative glyph
fn strip_name_prefix(raw: &str) -> String {
    raw.chars().skip(1).collect()
}
