// src/outputs.rs

//! Report output sinks.
//!
//! A report is rendered as plain rows on stdout, as an aligned console
//! table, or as a timestamped CSV file under the results directory.

use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::models::Report;

/// How a report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Space-joined rows on stdout
    Plain,
    /// Aligned console table
    Pretty,
    /// CSV file under the results directory
    File,
}

/// Render a report with the chosen sink.
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    results_dir: &Path,
    mode: &str,
) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for row in report.emit_rows() {
                println!("{}", row.join(" "));
            }
            Ok(())
        }
        OutputFormat::Pretty => {
            print!("{}", pretty_table(report));
            Ok(())
        }
        OutputFormat::File => write_csv_file(report, results_dir, mode),
    }
}

/// Write the report to `{results_dir}/{mode}_{timestamp}.csv`.
fn write_csv_file(report: &Report, results_dir: &Path, mode: &str) -> Result<()> {
    std::fs::create_dir_all(results_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = results_dir.join(format!("{mode}_{timestamp}.csv"));

    let mut buf: Vec<u8> = Vec::new();
    for row in report.emit_rows() {
        write_csv_row(&mut buf, row)?;
    }
    std::fs::write(&path, buf)?;

    log::info!("Results saved to {}", path.display());
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row with double-quote escaping.
fn write_csv_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Display width of a cell. Grapheme count keeps non-ASCII labels
/// aligned.
fn display_width(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Render the report as a bordered, padded table.
fn pretty_table(report: &Report) -> String {
    let mut widths: Vec<usize> = report.header().iter().map(|h| display_width(h)).collect();
    for row in report.rows() {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(display_width(cell));
            }
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let format_row = |row: &[String]| {
        let mut line = String::from("|");
        for (cell, width) in row.iter().zip(&widths) {
            let padding = width - display_width(cell).min(*width);
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(padding));
            line.push_str(" |");
        }
        line.push('\n');
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&format_row(report.header()));
    out.push_str(&border);
    for row in report.rows() {
        out.push_str(&format_row(row));
    }
    out.push_str(&border);
    out
}
