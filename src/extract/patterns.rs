// src/extract/patterns.rs

use regex::Regex;

use crate::errors::ScrapeError;

/// Card photos live on S3; captured fragments get substituted back into
/// this template to rebuild the full URL.
const IMAGE_URL_BASE: &str = "https://propiedadescom.s3.amazonaws.com/files/292x200";

/// The amenities div matches three times per card. Only the first two
/// carry the counts we keep (bedrooms, bathrooms).
const AMENITY_GROUP_SIZE: usize = 3;

/// Photos shown per listing card.
pub const IMAGES_PER_LISTING: usize = 5;

/// (bedrooms, bathrooms) for one listing.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct AmenityCounts {
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
}

/// The ordered field sequences scanned out of one results page. Each
/// sequence comes from an independent pattern pass; nothing is aligned to
/// listings yet.
#[derive(Debug, Default)]
pub struct RawListingFields {
    pub urls: Vec<String>,
    pub latitudes: Vec<String>,
    pub longitudes: Vec<String>,
    pub rent_prices: Vec<i64>,
    pub sizes: Vec<i64>,
    pub postal_codes: Vec<String>,
    pub street_addresses: Vec<String>,
    pub localities: Vec<String>,
    pub regions: Vec<String>,
    pub amenities: Vec<AmenityCounts>,
    pub image_windows: Vec<[Option<String>; IMAGES_PER_LISTING]>,
}

/// The fixed patterns recognized on a results page, compiled once per run.
/// These are tied to the current propiedades.com markup and JSON blobs; a
/// site redesign shows up as empty sequences, not as errors.
pub struct ListingPatterns {
    url: Regex,
    latitude: Regex,
    longitude: Regex,
    rental_price: Regex,
    size: Regex,
    postal_code: Regex,
    street_address: Regex,
    locality: Regex,
    region: Regex,
    amenity: Regex,
    image: Regex,
    total_results: Regex,
}

impl ListingPatterns {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            url: compile(
                r#"class="pcom-property-card-body-main-info-street" href="(https://propiedades\.com/inmuebles/.*?pos=\d+)""#,
            )?,
            latitude: compile(r#""latitude":"([0-9.-]+)""#)?,
            longitude: compile(r#""longitude":"([0-9.-]+)""#)?,
            rental_price: compile(r#""rental_price_real":(\d+)"#)?,
            size: compile(r#""size_m2":"(\d+)""#)?,
            postal_code: compile(r#""postalCode" content="(\d+)""#)?,
            street_address: compile(r#""streetAddress" content="(.*?)""#)?,
            locality: compile(r#""addressLocality" content="(.*?)""#)?,
            region: compile(r#""addressRegion" content="(.*?)""#)?,
            amenity: compile(r#"<div class="amenities-number">(\d+)<!--\s*-->\s*</div>"#)?,
            image: compile(
                r"https%3A%2F%2Fpropiedadescom\.s3\.amazonaws\.com%2Ffiles%2F292x200%2F(.*?)\.jpg",
            )?,
            total_results: compile(r"(\d+)\s*resultados")?,
        })
    }

    /// Runs every field pattern over the raw page text. Sequences come back
    /// in text order; a pattern that never fires yields an empty sequence.
    pub fn extract_fields(&self, page: &str) -> RawListingFields {
        RawListingFields {
            urls: captures(&self.url, page),
            latitudes: captures(&self.latitude, page),
            longitudes: captures(&self.longitude, page),
            rent_prices: numeric_captures(&self.rental_price, page),
            sizes: numeric_captures(&self.size, page),
            postal_codes: captures(&self.postal_code, page),
            street_addresses: captures(&self.street_address, page),
            localities: captures(&self.locality, page),
            regions: captures(&self.region, page),
            amenities: group_amenities(&numeric_captures(&self.amenity, page)),
            image_windows: group_images(&captures(&self.image, page)),
        }
    }

    /// Total listing count advertised on the page, if the banner is present.
    pub fn total_results(&self, page: &str) -> Option<usize> {
        self.total_results
            .captures(page)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

fn compile(pattern: &str) -> Result<Regex, ScrapeError> {
    Regex::new(pattern).map_err(|e| ScrapeError::Pattern(e.to_string()))
}

/// First capture group of every match, in text order.
fn captures(re: &Regex, page: &str) -> Vec<String> {
    re.captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Like `captures`, but parses each hit as an integer. Hits that do not
/// fit an i64 are dropped rather than failing the page.
fn numeric_captures(re: &Regex, page: &str) -> Vec<i64> {
    re.captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Collapses the flat amenities sequence into per-listing pairs, reading
/// the first two entries of every group of three and skipping the third.
/// A trailing group with a single entry yields no counts at all.
// TODO: check against live markup whether the third amenities-number match
// ever carries data (parking?) before touching the group size.
fn group_amenities(raw: &[i64]) -> Vec<AmenityCounts> {
    raw.chunks(AMENITY_GROUP_SIZE)
        .map(|group| {
            if group.len() >= 2 {
                AmenityCounts {
                    bedrooms: Some(group[0]),
                    bathrooms: Some(group[1]),
                }
            } else {
                AmenityCounts::default()
            }
        })
        .collect()
}

/// Groups photo fragments into windows of five per listing and expands
/// each fragment to a full URL. A short final window is padded with None.
fn group_images(fragments: &[String]) -> Vec<[Option<String>; IMAGES_PER_LISTING]> {
    fragments
        .chunks(IMAGES_PER_LISTING)
        .map(|window| -> [Option<String>; IMAGES_PER_LISTING] {
            std::array::from_fn(|slot| window.get(slot).map(|fragment| image_url(fragment)))
        })
        .collect()
}

fn image_url(fragment: &str) -> String {
    format!("{IMAGE_URL_BASE}/{fragment}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_urls_come_back_in_page_order() {
        let page = concat!(
            r#"<a class="pcom-property-card-body-main-info-street" href="https://propiedades.com/inmuebles/casa-roma?pos=1">x</a>"#,
            r#"<a class="pcom-property-card-body-main-info-street" href="https://propiedades.com/inmuebles/depto-condesa?pos=2">x</a>"#,
        );

        let patterns = ListingPatterns::new().unwrap();
        let fields = patterns.extract_fields(page);

        assert_eq!(
            fields.urls,
            vec![
                "https://propiedades.com/inmuebles/casa-roma?pos=1",
                "https://propiedades.com/inmuebles/depto-condesa?pos=2",
            ]
        );
    }

    #[test]
    fn unrecognized_page_yields_empty_sequences() {
        let patterns = ListingPatterns::new().unwrap();
        let fields = patterns.extract_fields("<html><body>nothing here</body></html>");

        assert!(fields.urls.is_empty());
        assert!(fields.rent_prices.is_empty());
        assert!(fields.amenities.is_empty());
        assert!(fields.image_windows.is_empty());
        assert_eq!(patterns.total_results("<html></html>"), None);
    }

    #[test]
    fn amenity_groups_keep_first_two_entries() {
        let grouped = group_amenities(&[2, 1, 3, 2]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[0],
            AmenityCounts {
                bedrooms: Some(2),
                bathrooms: Some(1),
            }
        );
        // One leftover entry is not enough for a (bedrooms, bathrooms) pair.
        assert_eq!(grouped[1], AmenityCounts::default());
    }

    #[test]
    fn amenity_markup_tolerates_whitespace_after_comment() {
        let page = concat!(
            r#"<div class="amenities-number">3<!-- --></div>"#,
            r#"<div class="amenities-number">2<!-- -->
            </div>"#,
        );

        let patterns = ListingPatterns::new().unwrap();
        let fields = patterns.extract_fields(page);

        assert_eq!(fields.amenities.len(), 1);
        assert_eq!(fields.amenities[0].bedrooms, Some(3));
        assert_eq!(fields.amenities[0].bathrooms, Some(2));
    }

    #[test]
    fn image_fragments_group_into_padded_windows() {
        let fragments: Vec<String> = (1..=7).map(|n| format!("casa-{n}")).collect();
        let windows = group_images(&fragments);

        assert_eq!(windows.len(), 2);
        assert_eq!(
            windows[0][0].as_deref(),
            Some("https://propiedadescom.s3.amazonaws.com/files/292x200/casa-1.jpg")
        );
        assert!(windows[0].iter().all(|slot| slot.is_some()));

        // Second window holds the two leftovers and three empty slots.
        assert_eq!(
            windows[1][1].as_deref(),
            Some("https://propiedadescom.s3.amazonaws.com/files/292x200/casa-7.jpg")
        );
        assert_eq!(windows[1][2], None);
        assert_eq!(windows[1][4], None);
    }

    #[test]
    fn encoded_image_urls_are_detected_and_rebuilt() {
        let page = "src=https%3A%2F%2Fpropiedadescom.s3.amazonaws.com%2Ffiles%2F292x200%2Fabc123.jpg";

        let patterns = ListingPatterns::new().unwrap();
        let fields = patterns.extract_fields(page);

        assert_eq!(fields.image_windows.len(), 1);
        assert_eq!(
            fields.image_windows[0][0].as_deref(),
            Some("https://propiedadescom.s3.amazonaws.com/files/292x200/abc123.jpg")
        );
    }

    #[test]
    fn total_results_reads_the_banner_count() {
        let patterns = ListingPatterns::new().unwrap();

        assert_eq!(
            patterns.total_results("<h1>8651 resultados en renta</h1>"),
            Some(8651)
        );
        assert_eq!(patterns.total_results("<h1>24resultados</h1>"), Some(24));
    }

    #[test]
    fn numeric_captures_drop_values_too_big_for_i64() {
        let re = Regex::new(r"price:(\d+)").unwrap();
        let values = numeric_captures(&re, "price:100 price:99999999999999999999 price:200");

        assert_eq!(values, vec![100, 200]);
    }
}
