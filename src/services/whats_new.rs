// src/services/whats_new.rs

//! Release-notes digest.
//!
//! Walks the "What's New" index and extracts, for each Python version's
//! article, its title and the editor/author credit block.

use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Report};
use crate::utils::http::PageFetcher;
use crate::utils::resolve_url;
use crate::utils::select::{select_all, select_first, text_of};

const HEADER: [&str; 3] = ["Link", "Title", "Editor/Author"];

/// Run the `whats-new` extraction routine.
pub async fn run(fetcher: &PageFetcher, config: &Config) -> Result<Report> {
    let docs_base = Url::parse(&config.sources.docs_url)?;
    let index_url = resolve_url(&docs_base, "whatsnew/");

    let article_urls = {
        let text = fetcher.fetch_text(&index_url).await?;
        let document = Html::parse_document(&text);
        collect_articles(&document, &Url::parse(&index_url)?)?
    };

    let mut report = Report::new(HEADER);
    let total = article_urls.len();

    for (i, url) in article_urls.iter().enumerate() {
        log::info!("[{}/{}] {}", i + 1, total, url);

        let text = match fetcher.fetch_text(url).await {
            Ok(text) => text,
            Err(AppError::Http(e)) => {
                log::warn!("Failed to fetch {url}: {e}");
                continue;
            }
            Err(e) => return Err(e),
        };

        let document = Html::parse_document(&text);
        let (title, credit) = parse_article(&document)?;
        report.push_row([url.clone(), title, credit]);
    }

    Ok(report)
}

/// Collect the absolute URL of every per-version article on the index.
fn collect_articles(document: &Html, index_url: &Url) -> Result<Vec<String>> {
    let root = select_first(document.root_element(), "section#what-s-new-in-python")?;
    let listing = select_first(root, "div.toctree-wrapper.compound")?;

    let mut urls = Vec::new();
    for item in select_all(listing, "li.toctree-l1")? {
        let link = select_first(item, "a")?;
        let href = link.value().attr("href").unwrap_or("");
        urls.push(resolve_url(index_url, href));
    }
    Ok(urls)
}

/// Extract an article's heading and its credit block with newlines
/// flattened to spaces.
fn parse_article(document: &Html) -> Result<(String, String)> {
    let heading = select_first(document.root_element(), "h1")?;
    let credit_block = select_first(document.root_element(), "dl")?;

    let title = text_of(heading);
    let credit = text_of(credit_block).replace('\n', " ");
    Ok((title, credit))
}
