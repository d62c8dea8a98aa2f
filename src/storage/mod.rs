//! On-disk storage for fetched HTTP responses.

pub mod cache;

pub use cache::ResponseCache;
