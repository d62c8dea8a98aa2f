// src/utils/select.rs

//! CSS selection helpers with a fail-fast contract.
//!
//! A page whose structure no longer matches a required selector is a
//! layout change we cannot recover from, so lookups return `TagNotFound`
//! instead of silently continuing.

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

/// Parse a CSS selector string.
pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::selector(css, format!("{e:?}")))
}

/// First descendant matching the selector, or `TagNotFound`.
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    let selector = parse_selector(css)?;
    scope
        .select(&selector)
        .next()
        .ok_or_else(|| AppError::tag_not_found(css))
}

/// All descendants matching the selector. Emptiness is the caller's call.
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = parse_selector(css)?;
    Ok(scope.select(&selector).collect())
}

/// Concatenated text content of an element and its descendants.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
