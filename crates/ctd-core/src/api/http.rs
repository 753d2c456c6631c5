//! One HTTP GET via a curl Easy handle.

use std::time::Duration;

use crate::retry::FetchError;

/// Perform a GET and return the raw response body.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking`
/// if used from async code. Non-2xx statuses become `FetchError::Http` so the
/// retry layer can classify them.
pub(crate) fn get(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    Ok(body)
}
