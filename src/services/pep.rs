// src/services/pep.rs

//! PEP status tally.
//!
//! Walks the numerical PEP index, reads the authoritative status from
//! every PEP's own page, counts statuses in first-seen order, and warns
//! when a page's status falls outside the set its index abbreviation
//! promises.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Report, StatusExpectations};
use crate::utils::http::PageFetcher;
use crate::utils::resolve_url;
use crate::utils::select::{select_all, select_first, text_of};

const HEADER: [&str; 2] = ["Status", "Count"];

/// One index row, collected before any detail fetch.
struct IndexRow {
    preview_code: String,
    detail_url: String,
}

/// Run the `pep` extraction routine.
pub async fn run(
    fetcher: &PageFetcher,
    config: &Config,
    expectations: &StatusExpectations,
) -> Result<Report> {
    let index_url = &config.sources.peps_url;
    let rows = {
        let text = fetcher.fetch_text(index_url).await?;
        let document = Html::parse_document(&text);
        collect_index_rows(&document, &Url::parse(index_url)?)?
    };

    let row_count = rows.len();
    let mut tally: Vec<(String, u32)> = Vec::new();
    let mut total = 0usize;

    for (i, row) in rows.iter().enumerate() {
        // Counted before the fetch: a row that fails later still counted.
        total += 1;
        log::info!("[{}/{}] {}", i + 1, row_count, row.detail_url);

        let text = match fetcher.fetch_text(&row.detail_url).await {
            Ok(text) => text,
            Err(AppError::Http(e)) => {
                log::warn!("Failed to fetch {}: {e}", row.detail_url);
                continue;
            }
            Err(e) => return Err(e),
        };

        let status = {
            let document = Html::parse_document(&text);
            authoritative_status(&document)?
        };

        match tally.iter_mut().find(|(seen, _)| *seen == status) {
            Some((_, count)) => *count += 1,
            None => tally.push((status.clone(), 1)),
        }

        let expected = expectations.expected_for(&row.preview_code).ok_or_else(|| {
            AppError::config(format!(
                "preview status code '{}' is not registered",
                row.preview_code
            ))
        })?;
        if !expected.iter().any(|s| s == &status) {
            log::warn!(
                "Mismatched statuses:\n{}\nPage status: {}\nExpected statuses: {:?}",
                row.detail_url,
                status,
                expected
            );
        }
    }

    let mut report = Report::new(HEADER);
    for (status, count) in &tally {
        report.push_row([status.clone(), count.to_string()]);
    }
    report.push_row(["Total".to_string(), total.to_string()]);
    Ok(report)
}

/// Collect preview code and detail URL from every index row, skipping
/// the header row.
fn collect_index_rows(document: &Html, index_url: &Url) -> Result<Vec<IndexRow>> {
    let section = select_first(document.root_element(), "section#numerical-index")?;

    let mut rows = Vec::new();
    for tr in select_all(section, "tr")?.into_iter().skip(1) {
        let abbr = select_first(tr, "abbr")?;
        // Second character of the abbreviation is the status preview;
        // a single-character abbreviation has none.
        let preview_code = text_of(abbr)
            .chars()
            .nth(1)
            .map(String::from)
            .unwrap_or_default();

        let link = select_first(tr, "a.pep.reference.internal")?;
        let href = link.value().attr("href").unwrap_or("");

        rows.push(IndexRow {
            preview_code,
            detail_url: resolve_url(index_url, href),
        });
    }
    Ok(rows)
}

/// Authoritative status from a PEP page's metadata field list.
fn authoritative_status(document: &Html) -> Result<String> {
    let field_list = select_first(document.root_element(), "dl.rfc2822.field-list.simple")?;

    let label = select_all(field_list, "dt")?
        .into_iter()
        .find(|dt| text_of(*dt).trim() == "Status")
        .ok_or_else(|| AppError::tag_not_found("dt[Status]"))?;

    let value = label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dd")
        .ok_or_else(|| AppError::tag_not_found("dt[Status] + dd"))?;

    Ok(text_of(value).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ResponseCache;
    use tempfile::TempDir;

    const INDEX_PAGE: &str = r#"
        <html><body>
        <section id="numerical-index">
            <table>
                <tr><th>Type</th><th>Number</th><th>Title</th></tr>
                <tr>
                    <td><abbr title="Standards Track, Final">SF</abbr></td>
                    <td><a class="pep reference internal" href="pep-0001/">1</a></td>
                </tr>
                <tr>
                    <td><abbr title="Informational">I</abbr></td>
                    <td><a class="pep reference internal" href="pep-0002/">2</a></td>
                </tr>
                <tr>
                    <td><abbr title="Standards Track, Final">SF</abbr></td>
                    <td><a class="pep reference internal" href="pep-0003/">3</a></td>
                </tr>
            </table>
        </section>
        </body></html>
    "#;

    fn detail_page(status: &str) -> String {
        format!(
            r#"
            <html><body>
            <dl class="rfc2822 field-list simple">
                <dt>Author</dt>
                <dd>Barry Warsaw</dd>
                <dt>Status</dt>
                <dd>{status}</dd>
                <dt>Type</dt>
                <dd>Process</dd>
            </dl>
            </body></html>
            "#
        )
    }

    #[test]
    fn index_rows_skip_header_and_read_preview_codes() {
        let document = Html::parse_document(INDEX_PAGE);
        let index_url = Url::parse("https://peps.example.invalid/").unwrap();
        let rows = collect_index_rows(&document, &index_url).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].preview_code, "F");
        // Single-character abbreviation carries no preview code.
        assert_eq!(rows[1].preview_code, "");
        assert_eq!(rows[0].detail_url, "https://peps.example.invalid/pep-0001/");
    }

    #[test]
    fn status_is_read_from_the_field_after_the_label() {
        let document = Html::parse_document(&detail_page("Final"));
        assert_eq!(authoritative_status(&document).unwrap(), "Final");
    }

    #[test]
    fn missing_status_field_is_tag_not_found() {
        let page = r#"
            <html><body>
            <dl class="rfc2822 field-list simple">
                <dt>Author</dt>
                <dd>Barry Warsaw</dd>
            </dl>
            </body></html>
        "#;
        let document = Html::parse_document(page);
        let err = authoritative_status(&document).unwrap_err();
        assert!(matches!(err, AppError::TagNotFound { .. }));
    }

    fn offline_config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.sources.peps_url = "https://peps.example.invalid/".to_string();
        config.http.timeout_secs = 1;
        config.paths.cache_dir = tmp.path().join("cache");
        config
    }

    async fn prime_index(cache: &ResponseCache) {
        cache
            .put("https://peps.example.invalid/", INDEX_PAGE.as_bytes())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn tally_counts_in_first_seen_order_with_total() {
        let tmp = TempDir::new().unwrap();
        let config = offline_config(&tmp);
        let cache = ResponseCache::new(&config.paths.cache_dir);

        prime_index(&cache).await;
        for (pep, status) in [("pep-0001", "Final"), ("pep-0002", "Active"), ("pep-0003", "Final")]
        {
            cache
                .put(
                    &format!("https://peps.example.invalid/{pep}/"),
                    detail_page(status).as_bytes(),
                )
                .await
                .unwrap();
        }

        let fetcher = PageFetcher::new(&config.http, cache).unwrap();
        let report = run(&fetcher, &config, &config.expected_statuses)
            .await
            .unwrap();

        assert_eq!(report.header(), HEADER);
        assert_eq!(report.rows()[0], vec!["Final", "2"]);
        assert_eq!(report.rows()[1], vec!["Active", "1"]);
        assert_eq!(report.rows().last().unwrap(), &vec!["Total", "3"]);
    }

    #[tokio::test]
    async fn failed_detail_fetch_keeps_total_ahead_of_counts() {
        let tmp = TempDir::new().unwrap();
        let config = offline_config(&tmp);
        let cache = ResponseCache::new(&config.paths.cache_dir);

        // pep-0002 has no cached body and the host does not resolve, so
        // its detail fetch fails while the row stays counted.
        prime_index(&cache).await;
        for pep in ["pep-0001", "pep-0003"] {
            cache
                .put(
                    &format!("https://peps.example.invalid/{pep}/"),
                    detail_page("Final").as_bytes(),
                )
                .await
                .unwrap();
        }

        let fetcher = PageFetcher::new(&config.http, cache).unwrap();
        let report = run(&fetcher, &config, &config.expected_statuses)
            .await
            .unwrap();

        let counted: u32 = report.rows()[..report.row_count() - 1]
            .iter()
            .map(|row| row[1].parse::<u32>().unwrap())
            .sum();
        assert_eq!(counted, 2);
        assert_eq!(report.rows().last().unwrap(), &vec!["Total", "3"]);
    }

    #[tokio::test]
    async fn mismatched_status_does_not_abort() {
        let tmp = TempDir::new().unwrap();
        let config = offline_config(&tmp);
        let cache = ResponseCache::new(&config.paths.cache_dir);

        // Index promises Final ("F") but the pages claim Withdrawn.
        prime_index(&cache).await;
        for pep in ["pep-0001", "pep-0003"] {
            cache
                .put(
                    &format!("https://peps.example.invalid/{pep}/"),
                    detail_page("Withdrawn").as_bytes(),
                )
                .await
                .unwrap();
        }
        cache
            .put(
                "https://peps.example.invalid/pep-0002/",
                detail_page("Active").as_bytes(),
            )
            .await
            .unwrap();

        let fetcher = PageFetcher::new(&config.http, cache).unwrap();
        let report = run(&fetcher, &config, &config.expected_statuses)
            .await
            .unwrap();

        assert_eq!(report.rows()[0], vec!["Withdrawn", "2"]);
        assert_eq!(report.rows().last().unwrap(), &vec!["Total", "3"]);
    }

    #[tokio::test]
    async fn unregistered_preview_code_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let config = offline_config(&tmp);
        let cache = ResponseCache::new(&config.paths.cache_dir);

        let index = r#"
            <html><body>
            <section id="numerical-index">
                <table>
                    <tr><th>Type</th></tr>
                    <tr>
                        <td><abbr title="Standards Track, ?">SX</abbr></td>
                        <td><a class="pep reference internal" href="pep-0001/">1</a></td>
                    </tr>
                </table>
            </section>
            </body></html>
        "#;
        cache
            .put("https://peps.example.invalid/", index.as_bytes())
            .await
            .unwrap();
        cache
            .put(
                "https://peps.example.invalid/pep-0001/",
                detail_page("Final").as_bytes(),
            )
            .await
            .unwrap();

        let fetcher = PageFetcher::new(&config.http, cache).unwrap();
        let err = run(&fetcher, &config, &config.expected_statuses)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
