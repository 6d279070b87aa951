//! Result formatting: catalog entry -> caller-facing [`ResultEntry`].

use shop_rank::extract_keywords;
use shop_types::{CatalogEntry, ResultEntry};

/// At most two decimals, trailing zeros dropped: `4.33`, `4.5`, `4`.
pub fn format_average(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        s => s.to_string(),
    }
}

pub fn result_entry(entry: &CatalogEntry) -> ResultEntry {
    let keywords = extract_keywords(&entry.reviews);
    ResultEntry {
        title: entry.meta.title.clone(),
        image_url: entry.meta.image_url.clone(),
        rating_line: format!(
            "Avg Rating: {} {}",
            format_average(entry.average_rating),
            keywords.descriptor()
        ),
    }
}
