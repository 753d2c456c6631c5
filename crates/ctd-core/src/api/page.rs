//! Serde model of one studies page.

use serde::Deserialize;

/// A study exactly as the API returns it. The downloader stores these
/// verbatim; interpretation is left to consumers of the archive.
pub type RawStudy = serde_json::Map<String, serde_json::Value>;

/// One page of the paged studies response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudiesPage {
    #[serde(default)]
    pub studies: Vec<RawStudy>,
    /// Present only when the request asked for `countTotal=true` (first page).
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Token for the next page; absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}
