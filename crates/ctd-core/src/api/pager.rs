//! Token-based pagination over the studies endpoint.

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::CtdConfig;
use crate::progress::ProgressStats;
use crate::retry::{run_with_retry, RetryPolicy};

use super::http;
use super::page::{RawStudy, StudiesPage};
use super::request;

/// Walks the studies endpoint page by page. Each page request runs under the
/// retry policy; the walk ends when the server stops returning a
/// `nextPageToken` (or returns a page with no studies, which guards against a
/// server that keeps handing out tokens).
pub struct StudyPager {
    endpoint: String,
    page_size: usize,
    fields: Option<String>,
    policy: RetryPolicy,
    connect_timeout: Duration,
    request_timeout: Duration,
    next_token: Option<String>,
    total: Option<u64>,
    pages_fetched: u64,
    done: bool,
}

impl StudyPager {
    pub fn new(cfg: &CtdConfig) -> Self {
        Self {
            endpoint: cfg.endpoint_url.clone(),
            page_size: request::clamp_page_size(cfg.page_size),
            fields: cfg.fields.query_value(),
            policy: RetryPolicy::from_config(cfg.retry.as_ref()),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            next_token: None,
            total: None,
            pages_fetched: 0,
            done: false,
        }
    }

    /// Registry size reported by the first page, if the server sent one.
    pub fn total_count(&self) -> Option<u64> {
        self.total
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Fetch the next page of studies, or None when pagination is finished.
    pub fn next_page(&mut self) -> Result<Option<Vec<RawStudy>>> {
        if self.done {
            return Ok(None);
        }

        let url = request::page_url(
            &self.endpoint,
            self.page_size,
            self.fields.as_deref(),
            self.next_token.as_deref(),
        )?;

        let connect_timeout = self.connect_timeout;
        let request_timeout = self.request_timeout;
        let page: StudiesPage = run_with_retry(&self.policy, || {
            let body = http::get(&url, connect_timeout, request_timeout)?;
            Ok(serde_json::from_slice(&body)?)
        })
        .with_context(|| format!("fetching studies page {}", self.pages_fetched + 1))?;

        self.pages_fetched += 1;
        if self.total.is_none() {
            self.total = page.total_count;
        }
        self.next_token = page.next_page_token;
        if self.next_token.is_none() || page.studies.is_empty() {
            self.done = true;
        }

        Ok(Some(page.studies))
    }
}

/// Everything one full walk of the registry produced.
#[derive(Debug)]
pub struct DownloadBatch {
    pub studies: Vec<RawStudy>,
    pub pages: u64,
    /// `totalCount` as reported by the server, when present.
    pub total_reported: Option<u64>,
}

/// Download studies until pagination ends (or `limit` studies are collected),
/// pushing a progress snapshot after every page.
///
/// Blocking; call from `spawn_blocking` in async contexts.
pub fn download_all(
    cfg: &CtdConfig,
    limit: Option<usize>,
    progress: Option<&mpsc::Sender<ProgressStats>>,
) -> Result<DownloadBatch> {
    let started = Instant::now();
    let mut pager = StudyPager::new(cfg);
    let mut studies: Vec<RawStudy> = Vec::new();

    while let Some(batch) = pager.next_page()? {
        studies.extend(batch);

        if let Some(tx) = progress {
            let stats = ProgressStats {
                studies_done: studies.len() as u64,
                total_studies: pager.total_count(),
                pages_done: pager.pages_fetched(),
                elapsed_secs: started.elapsed().as_secs_f64(),
            };
            let _ = tx.try_send(stats);
        }

        if let Some(max) = limit {
            if studies.len() >= max {
                studies.truncate(max);
                break;
            }
        }
    }

    tracing::info!(
        count = studies.len(),
        pages = pager.pages_fetched(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "study download finished"
    );

    Ok(DownloadBatch {
        studies,
        pages: pager.pages_fetched(),
        total_reported: pager.total_count(),
    })
}
