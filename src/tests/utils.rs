// src/tests/utils.rs

use std::cell::RefCell;

use crate::errors::ScrapeError;
use crate::scraper::PageFetcher;

/// Markup for one synthetic listing card carrying every field the patterns
/// scan for: the card link, coordinate and price JSON fragments, address
/// metadata, three amenities divs and five encoded photo URLs.
pub fn listing_card(slug: &str, pos: u32, price: i64, size: i64) -> String {
    let mut card = String::new();
    card.push_str(&format!(
        r#"<a class="pcom-property-card-body-main-info-street" href="https://propiedades.com/inmuebles/{slug}?pos={pos}">ver detalle</a>"#
    ));
    card.push_str(&format!(
        r#"<script>{{"latitude":"19.4326","longitude":"-99.1332","rental_price_real":{price},"size_m2":"{size}"}}</script>"#
    ));
    card.push_str(r#"<meta itemprop="postalCode" content="06700"/>"#);
    card.push_str(&format!(
        r#"<meta itemprop="streetAddress" content="Calle {slug} 12"/>"#
    ));
    card.push_str(r#"<meta itemprop="addressLocality" content="Cuauhtemoc"/>"#);
    card.push_str(r#"<meta itemprop="addressRegion" content="Ciudad de Mexico"/>"#);
    card.push_str(r#"<div class="amenities-number">2<!-- --></div>"#);
    card.push_str(r#"<div class="amenities-number">1<!-- --></div>"#);
    card.push_str(r#"<div class="amenities-number">4<!-- --></div>"#);
    for photo in 1..=5 {
        card.push_str(&format!(
            "https%3A%2F%2Fpropiedadescom.s3.amazonaws.com%2Ffiles%2F292x200%2F{slug}-{photo}.jpg "
        ));
    }
    card
}

/// A full synthetic results page: the results banner plus the given cards.
pub fn results_page(total_results: usize, cards: &[String]) -> String {
    let mut page = format!("<html><body><h1>{total_results} resultados</h1>");
    for card in cards {
        page.push_str(card);
    }
    page.push_str("</body></html>");
    page
}

/// Serves canned page bodies and records which pages were asked for. Pages
/// are indexed from 1; an Err entry stands in for a page that stayed down.
pub struct StubFetcher {
    pages: Vec<Result<String, String>>,
    pub calls: RefCell<Vec<u32>>,
}

impl StubFetcher {
    pub fn new(pages: Vec<Result<String, String>>) -> Self {
        Self {
            pages,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl PageFetcher for StubFetcher {
    fn fetch_page(&self, page_num: u32) -> Result<String, ScrapeError> {
        self.calls.borrow_mut().push(page_num);
        match self.pages.get(page_num as usize - 1) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(msg)) => Err(ScrapeError::Network(msg.clone())),
            None => Err(ScrapeError::Network(format!(
                "no stub content for page {page_num}"
            ))),
        }
    }
}
