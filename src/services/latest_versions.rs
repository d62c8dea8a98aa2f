// src/services/latest_versions.rs

//! Version/status roster.
//!
//! Reads the documentation root's sidebar for the list of all Python
//! versions and splits each entry into version number and status.

use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{Config, Report};
use crate::utils::http::PageFetcher;
use crate::utils::select::{select_all, select_first, text_of};

const HEADER: [&str; 3] = ["Link", "Version", "Status"];

/// Marker phrase identifying the sidebar list of documented versions.
const VERSION_LIST_MARKER: &str = "All versions";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
            .expect("version pattern is valid")
    })
}

/// Run the `latest-versions` extraction routine.
pub async fn run(fetcher: &PageFetcher, config: &Config) -> Result<Report> {
    log::info!("Collecting version roster from {}", config.sources.docs_url);
    let text = fetcher.fetch_text(&config.sources.docs_url).await?;
    let document = Html::parse_document(&text);
    build_report(&document)
}

/// Build the roster report from the documentation root page.
fn build_report(document: &Html) -> Result<Report> {
    let mut report = Report::new(HEADER);

    for (href, link_text) in version_links(document)? {
        match version_pattern().captures(&link_text) {
            Some(caps) => {
                report.push_row([href, caps["version"].to_string(), caps["status"].to_string()]);
            }
            // No parenthesized status: the whole text lands in the
            // version column and the status stays empty.
            None => report.push_row([href, link_text, String::new()]),
        }
    }

    Ok(report)
}

/// `(href, text)` of every link in the first sidebar list naming all
/// versions. Fails with `NothingFound` when no list matches.
fn version_links(document: &Html) -> Result<Vec<(String, String)>> {
    let sidebar = select_first(document.root_element(), "div.sphinxsidebarwrapper")?;

    for list in select_all(sidebar, "ul")? {
        if !text_of(list).contains(VERSION_LIST_MARKER) {
            continue;
        }
        let links = select_all(list, "a")?
            .into_iter()
            .map(|a| {
                let href = a.value().attr("href").unwrap_or("").to_string();
                (href, text_of(a))
            })
            .collect();
        return Ok(links);
    }

    Err(AppError::NothingFound(format!(
        "no sidebar list contains '{VERSION_LIST_MARKER}'"
    )))
}
