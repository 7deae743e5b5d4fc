// src/domain/property.rs

use serde::Serialize;

/// Fixed exchange rate used to derive the USD rent column from MXN.
pub const MXN_TO_USD_CONVERSION_RATE: f64 = 20.34;

/// A single rental listing pulled off a results page, flattened into the
/// exact column layout of the output CSV. Field order here is column order
/// in the file, so reordering fields is a schema change.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct PropertyRecord {
    // Identity
    pub url: String,

    // Location
    pub latitude: Option<String>,
    pub longitude: Option<String>,

    // Pricing. Purchase columns are kept for schema compatibility with the
    // sales dataset and always stay zero on rental scrapes.
    pub buy_price_mxn: i64,
    pub buy_price_usd: i64,
    pub rent_price_mxn: i64,
    pub rent_price_usd: f64,

    // Physical attributes and address metadata
    pub size: Option<i64>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,

    // Up to five card photos, already expanded to full URLs
    pub image_1: Option<String>,
    pub image_2: Option<String>,
    pub image_3: Option<String>,
    pub image_4: Option<String>,
    pub image_5: Option<String>,

    // Per-page z-scores, filled in after the whole page is assembled
    pub standardized_price: Option<f64>,
    pub standardized_size: Option<f64>,
}
