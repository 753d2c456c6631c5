//! ClinicalTrials.gov v2 API client.
//!
//! Builds paged requests against the studies endpoint, walks `nextPageToken`
//! pagination under the retry policy, and returns studies as raw JSON objects
//! (this tool never interprets study fields).

mod http;
mod pager;
mod request;

pub mod fields;
pub mod page;

pub use pager::{download_all, DownloadBatch, StudyPager};
pub use request::MAXIMUM_PAGE_SIZE;

/// The public studies endpoint.
pub const STUDIES_ENDPOINT_URL: &str = "https://clinicaltrials.gov/api/v2/studies";
