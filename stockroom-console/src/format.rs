//! Display helpers shared by the TUI and the `list` command

use chrono::NaiveDate;
use shared::{Page, SortDirection, SortField, SortSpec};

/// `$ 12.50`
pub fn price(value: f64) -> String {
    format!("$ {value:.2}")
}

pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Direction arrow and priority for a sorted column, e.g. `^1` or `v2`
pub fn sort_indicator(sort: &SortSpec, field: SortField) -> String {
    match sort.position(field) {
        Some(index) => {
            let arrow = match sort.direction_of(field) {
                Some(SortDirection::Desc) => 'v',
                _ => '^',
            };
            format!("{arrow}{}", index + 1)
        }
        None => String::new(),
    }
}

/// Column header with its sort indicator appended
pub fn column_header(sort: &SortSpec, field: SortField) -> String {
    let indicator = sort_indicator(sort, field);
    if indicator.is_empty() {
        field.label().to_string()
    } else {
        format!("{} {indicator}", field.label())
    }
}

/// `Page 2 of 7`; an empty result reads `Page 1 of 1`
pub fn pager<T>(page: &Page<T>) -> String {
    format!(
        "Page {} of {}",
        page.page_number.saturating_add(1),
        page.total_pages().max(1)
    )
}
