// src/extract/assemble.rs

use log::warn;

use crate::domain::{PropertyRecord, MXN_TO_USD_CONVERSION_RATE};
use crate::extract::patterns::RawListingFields;

/// Builds one record per detected listing URL by reading the same index off
/// every field sequence. The URL count decides how many listings the page
/// holds; shorter sequences fall back to null (zero for prices).
///
/// Alignment is positional only. A pattern that fires a different number of
/// times than there are cards shifts every later value onto the wrong
/// listing, so mismatched lengths are logged for the operator.
pub fn assemble_records(fields: &RawListingFields) -> Vec<PropertyRecord> {
    let count = fields.urls.len();
    warn_on_length_mismatch(fields, count);

    (0..count)
        .map(|i| {
            let amenities = fields.amenities.get(i).copied().unwrap_or_default();
            let images = fields.image_windows.get(i);
            let image = |slot: usize| images.and_then(|window| window[slot].clone());

            PropertyRecord {
                url: fields.urls[i].clone(),
                latitude: fields.latitudes.get(i).cloned(),
                longitude: fields.longitudes.get(i).cloned(),
                buy_price_mxn: 0,
                buy_price_usd: 0,
                rent_price_mxn: fields.rent_prices.get(i).copied().unwrap_or(0),
                rent_price_usd: fields
                    .rent_prices
                    .get(i)
                    .map(|&price| price as f64 / MXN_TO_USD_CONVERSION_RATE)
                    .unwrap_or(0.0),
                size: fields.sizes.get(i).copied(),
                postal_code: fields.postal_codes.get(i).cloned(),
                street_address: fields.street_addresses.get(i).cloned(),
                locality: fields.localities.get(i).cloned(),
                region: fields.regions.get(i).cloned(),
                bedrooms: amenities.bedrooms,
                bathrooms: amenities.bathrooms,
                image_1: image(0),
                image_2: image(1),
                image_3: image(2),
                image_4: image(3),
                image_5: image(4),
                standardized_price: None,
                standardized_size: None,
            }
        })
        .collect()
}

fn warn_on_length_mismatch(fields: &RawListingFields, count: usize) {
    let lengths = [
        ("latitude", fields.latitudes.len()),
        ("longitude", fields.longitudes.len()),
        ("rental_price", fields.rent_prices.len()),
        ("size_m2", fields.sizes.len()),
        ("postal_code", fields.postal_codes.len()),
        ("street_address", fields.street_addresses.len()),
        ("locality", fields.localities.len()),
        ("region", fields.regions.len()),
        ("amenities", fields.amenities.len()),
        ("images", fields.image_windows.len()),
    ];

    for (name, len) in lengths {
        if len != count {
            warn!("Pattern '{name}' matched {len} times on a page with {count} listings; later values may be misaligned");
        }
    }
}
