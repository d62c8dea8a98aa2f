//! Service layer for the scraper application.
//!
//! One extraction routine per CLI mode:
//! - Release-notes digest (`whats_new`)
//! - Version/status roster (`latest_versions`)
//! - PDF archive fetch (`download`)
//! - PEP status tally (`pep`)

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;
