use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::WatchError;
use crate::parser::Listing;

/// What a rendered listing page contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// The page showed its "no results" marker; a valid, empty outcome.
    NoResults,
    /// The listing cards found on the page (possibly none).
    Listings(Vec<Listing>),
}

/// Pulls listing records out of rendered SSSB page HTML.
///
/// Each listing card renders every detail field twice (a hidden label/value
/// pair); the visible value is always the second node with the field class,
/// so all detail fields are read from the second occurrence.
pub struct ListingExtractor {
    no_result_selector: Selector,
    card_selector: Selector,
    type_link_selector: Selector,
    address_link_selector: Selector,
    details_selector: Selector,
    number_selector: Selector,
    area_selector: Selector,
    floor_selector: Selector,
    space_selector: Selector,
    rent_selector: Selector,
    move_in_selector: Selector,
}

impl ListingExtractor {
    pub fn new() -> Result<Self, WatchError> {
        Ok(Self {
            no_result_selector: parse_selector(".NoResult")?,
            card_selector: parse_selector(".ObjektListItem")?,
            type_link_selector: parse_selector(".ObjektTyp a")?,
            address_link_selector: parse_selector(".ObjektAdress a")?,
            details_selector: parse_selector(".ObjektDetaljer")?,
            number_selector: parse_selector(".ObjektNummer")?,
            area_selector: parse_selector(".ObjektOmrade")?,
            floor_selector: parse_selector(".ObjektVaning")?,
            space_selector: parse_selector(".ObjektYta")?,
            rent_selector: parse_selector(".ObjektHyra")?,
            move_in_selector: parse_selector(".ObjektInflytt")?,
        })
    }

    pub fn extract_page(&self, html: &str) -> Result<PageContent, WatchError> {
        let document = Html::parse_document(html);

        if document.select(&self.no_result_selector).next().is_some() {
            return Ok(PageContent::NoResults);
        }

        let mut listings = Vec::new();
        for card in document.select(&self.card_selector) {
            listings.push(self.extract_card(&card)?);
        }

        debug!("extracted {} listings from page", listings.len());
        Ok(PageContent::Listings(listings))
    }

    fn extract_card(&self, card: &ElementRef) -> Result<Listing, WatchError> {
        let type_link = card.select(&self.type_link_selector).next().ok_or_else(|| {
            WatchError::ExtractionError("listing card has no type link (.ObjektTyp a)".to_string())
        })?;
        let kind = normalize(&text_of(&type_link));
        let url = type_link
            .value()
            .attr("href")
            .map(normalize)
            .ok_or_else(|| {
                WatchError::ExtractionError(format!(
                    "listing card '{}' has no href on its type link",
                    kind
                ))
            })?;

        let address_link = card
            .select(&self.address_link_selector)
            .next()
            .ok_or_else(|| {
                WatchError::ExtractionError(format!(
                    "listing card '{}' ({}) has no address link (.ObjektAdress a)",
                    kind, url
                ))
            })?;
        let address = normalize(&text_of(&address_link));

        let details = card.select(&self.details_selector).next().ok_or_else(|| {
            WatchError::ExtractionError(format!(
                "listing at '{}' ({}) has no detail section (.ObjektDetaljer)",
                address, url
            ))
        })?;

        Ok(Listing {
            object_number: self.detail_field(&details, &self.number_selector, "ObjektNummer", &address, &url)?,
            area: self.detail_field(&details, &self.area_selector, "ObjektOmrade", &address, &url)?,
            floor: self.detail_field(&details, &self.floor_selector, "ObjektVaning", &address, &url)?,
            space: self.detail_field(&details, &self.space_selector, "ObjektYta", &address, &url)?,
            rent: self.detail_field(&details, &self.rent_selector, "ObjektHyra", &address, &url)?,
            move_in: self.detail_field(&details, &self.move_in_selector, "ObjektInflytt", &address, &url)?,
            kind,
            url,
            address,
        })
    }

    // detail fields are read from the second occurrence of the field class
    fn detail_field(
        &self,
        details: &ElementRef,
        selector: &Selector,
        class_name: &str,
        address: &str,
        url: &str,
    ) -> Result<String, WatchError> {
        details
            .select(selector)
            .nth(1)
            .map(|element| normalize(&text_of(&element)))
            .ok_or_else(|| {
                WatchError::ExtractionError(format!(
                    "listing at '{}' ({}) has no second {} element",
                    address, url, class_name
                ))
            })
    }
}

fn parse_selector(css: &str) -> Result<Selector, WatchError> {
    Selector::parse(css)
        .map_err(|e| WatchError::ExtractionError(format!("invalid selector '{}': {}", css, e)))
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Replace every character that is not representable in ASCII with a `?`
/// placeholder, then trim surrounding whitespace.
fn normalize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect();
    replaced.trim().to_string()
}
