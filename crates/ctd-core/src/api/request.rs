//! Page request construction.

use anyhow::{Context, Result};

/// The maximum page size allowed by the API.
pub const MAXIMUM_PAGE_SIZE: usize = 1000;

/// Clamp a configured page size into the range the API accepts.
/// Zero falls back to the maximum (the useful default for bulk download).
pub fn clamp_page_size(requested: usize) -> usize {
    if requested == 0 {
        MAXIMUM_PAGE_SIZE
    } else {
        requested.min(MAXIMUM_PAGE_SIZE)
    }
}

/// Build the URL for one page request.
///
/// The first request (no `page_token`) carries `countTotal=true` so the
/// response reports the registry size for progress; the server wants the
/// string "true" here, not a boolean. Subsequent requests drop it and carry
/// the `pageToken` from the previous response instead.
pub fn page_url(
    endpoint: &str,
    page_size: usize,
    fields: Option<&str>,
    page_token: Option<&str>,
) -> Result<String> {
    let mut u = url::Url::parse(endpoint).context("invalid endpoint URL")?;
    {
        let mut q = u.query_pairs_mut();
        q.append_pair("pageSize", &page_size.to_string());
        if let Some(fields) = fields {
            q.append_pair("fields", fields);
        }
        match page_token {
            None => {
                q.append_pair("countTotal", "true");
            }
            Some(token) => {
                q.append_pair("pageToken", token);
            }
        }
    }
    Ok(u.into())
}
