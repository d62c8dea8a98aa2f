// src/services/download.rs

//! PDF archive fetch.
//!
//! Locates the zipped A4 PDF archive on the downloads page and writes it
//! verbatim into the downloads directory. Produces no report.

use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::utils::http::PageFetcher;
use crate::utils::select::select_first;
use crate::utils::{final_path_segment, resolve_url};

/// Run the `download` extraction routine.
pub async fn run(fetcher: &PageFetcher, config: &Config) -> Result<()> {
    let docs_base = Url::parse(&config.sources.docs_url)?;
    let downloads_url = resolve_url(&docs_base, "download.html");

    let text = fetcher.fetch_text(&downloads_url).await?;
    let archive_url = {
        let document = Html::parse_document(&text);
        find_archive_url(&document, &Url::parse(&downloads_url)?)?
    };

    let filename = final_path_segment(&archive_url).ok_or_else(|| {
        AppError::validation(format!("archive URL has no filename: {archive_url}"))
    })?;

    tokio::fs::create_dir_all(&config.paths.downloads_dir).await?;
    let archive_path = config.paths.downloads_dir.join(&filename);

    // Binary content: byte fetch, no text decoding, transport errors
    // propagate.
    let bytes = fetcher.fetch_bytes(&archive_url).await?;
    tokio::fs::write(&archive_path, &bytes).await?;

    log::info!("Archive saved to {}", archive_path.display());
    Ok(())
}

/// Absolute URL of the zipped A4 PDF archive on the downloads page.
fn find_archive_url(document: &Html, downloads_url: &Url) -> Result<String> {
    let main = select_first(document.root_element(), r#"div[role="main"]"#)?;
    let table = select_first(main, "table.docutils")?;
    let link = select_first(table, r#"a[href$="pdf-a4.zip"]"#)?;

    let href = link.value().attr("href").unwrap_or("");
    Ok(resolve_url(downloads_url, href))
}
