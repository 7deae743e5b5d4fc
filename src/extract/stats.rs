// src/extract/stats.rs

use crate::domain::PropertyRecord;

/// Fills in the per-page z-score columns for one batch of records.
///
/// Zero prices and absent or zero sizes stay out of the statistics and
/// keep a null score, matching how missing raw values default. If a page
/// has no usable prices or no usable sizes at all, every record in the
/// batch gets null for both scores.
pub fn standardize_batch(records: &mut [PropertyRecord]) {
    let prices: Vec<f64> = records
        .iter()
        .filter(|record| record.rent_price_mxn != 0)
        .map(|record| record.rent_price_mxn as f64)
        .collect();
    let sizes: Vec<f64> = records.iter().filter_map(usable_size).collect();

    if prices.is_empty() || sizes.is_empty() {
        for record in records.iter_mut() {
            record.standardized_price = None;
            record.standardized_size = None;
        }
        return;
    }

    let (price_mean, price_std) = mean_and_population_std(&prices);
    let (size_mean, size_std) = mean_and_population_std(&sizes);

    for record in records.iter_mut() {
        record.standardized_price = if record.rent_price_mxn != 0 {
            z_score(record.rent_price_mxn as f64, price_mean, price_std)
        } else {
            None
        };
        record.standardized_size =
            usable_size(record).and_then(|size| z_score(size, size_mean, size_std));
    }
}

fn usable_size(record: &PropertyRecord) -> Option<f64> {
    record.size.filter(|&size| size != 0).map(|size| size as f64)
}

/// Population statistics, dividing by n rather than n - 1. Callers only
/// pass non-empty slices.
fn mean_and_population_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// A zero standard deviation (every value identical) yields no score
/// rather than a division by zero.
fn z_score(value: f64, mean: f64, std: f64) -> Option<f64> {
    if std == 0.0 {
        None
    } else {
        Some((value - mean) / std)
    }
}
