//! Integration tests: local paged studies server, full download, cache
//! round-trip, retry, and edge cases.

mod common;

use common::api_server::{self, ApiServerOptions};
use ctd_core::api;
use ctd_core::cache::{self, CachePaths};
use ctd_core::config::{CtdConfig, RetryConfig};
use tempfile::tempdir;

fn test_config(endpoint: &str, page_size: usize) -> CtdConfig {
    let mut cfg = CtdConfig::default();
    cfg.endpoint_url = endpoint.to_string();
    cfg.page_size = page_size;
    // Keep backoff short so failure-injection tests stay fast.
    cfg.retry = Some(RetryConfig {
        max_attempts: 4,
        base_delay_secs: 0.01,
        max_delay_secs: 1,
    });
    cfg
}

fn nct_id(study: &ctd_core::api::page::RawStudy) -> &str {
    study["protocolSection"]["identificationModule"]["nctId"]
        .as_str()
        .unwrap()
}

#[test]
fn downloads_all_pages() {
    let server = api_server::start(api_server::make_studies(25), 10);
    let cfg = test_config(&server.base_url, 10);

    let batch = api::download_all(&cfg, None, None).unwrap();
    assert_eq!(batch.studies.len(), 25);
    assert_eq!(batch.pages, 3);
    assert_eq!(batch.total_reported, Some(25));
    assert_eq!(server.request_count(), 3);
    assert_eq!(nct_id(&batch.studies[0]), "NCT00000001");
    assert_eq!(nct_id(&batch.studies[24]), "NCT00000025");
}

#[test]
fn get_studies_writes_archive_and_sample_then_hits_cache() {
    let server = api_server::start(api_server::make_studies(25), 10);
    let cfg = test_config(&server.base_url, 10);
    let dir = tempdir().unwrap();
    let paths = CachePaths::in_dir(dir.path());

    let studies = cache::get_studies(&cfg, &paths, false, None).unwrap();
    assert_eq!(studies.len(), 25);
    assert!(paths.archive.exists());
    assert!(paths.sample.exists());
    assert_eq!(server.request_count(), 3);

    let sample: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&paths.sample).unwrap()).unwrap();
    assert_eq!(sample.len(), cache::SAMPLE_STUDIES);

    // Second call must come from the archive, not the network.
    let cached = cache::get_studies(&cfg, &paths, false, None).unwrap();
    assert_eq!(cached, studies);
    assert_eq!(server.request_count(), 3);
}

#[test]
fn force_ignores_cache_and_redownloads() {
    let server = api_server::start(api_server::make_studies(25), 10);
    let cfg = test_config(&server.base_url, 10);
    let dir = tempdir().unwrap();
    let paths = CachePaths::in_dir(dir.path());

    cache::get_studies(&cfg, &paths, false, None).unwrap();
    assert_eq!(server.request_count(), 3);

    let studies = cache::get_studies(&cfg, &paths, true, None).unwrap();
    assert_eq!(studies.len(), 25);
    assert_eq!(server.request_count(), 6);
}

#[test]
fn retries_through_transient_503s() {
    let server = api_server::start_with_options(
        api_server::make_studies(25),
        10,
        ApiServerOptions {
            fail_first: 2,
            ..Default::default()
        },
    );
    let cfg = test_config(&server.base_url, 10);

    let batch = api::download_all(&cfg, None, None).unwrap();
    assert_eq!(batch.studies.len(), 25);
    // 2 failed attempts + 3 successful pages.
    assert_eq!(server.request_count(), 5);
}

#[test]
fn gives_up_when_failures_exceed_attempts() {
    let server = api_server::start_with_options(
        api_server::make_studies(5),
        10,
        ApiServerOptions {
            fail_first: 10,
            ..Default::default()
        },
    );
    let cfg = test_config(&server.base_url, 10);

    assert!(api::download_all(&cfg, None, None).is_err());
    assert_eq!(server.request_count(), 4, "one per configured attempt");
}

#[test]
fn limit_truncates_and_stops_paging() {
    let server = api_server::start(api_server::make_studies(25), 10);
    let cfg = test_config(&server.base_url, 10);

    let batch = api::download_all(&cfg, Some(15), None).unwrap();
    assert_eq!(batch.studies.len(), 15);
    assert_eq!(batch.pages, 2);
    assert_eq!(server.request_count(), 2);
}

#[test]
fn empty_registry_still_archives() {
    let server = api_server::start(Vec::new(), 10);
    let cfg = test_config(&server.base_url, 10);
    let dir = tempdir().unwrap();
    let paths = CachePaths::in_dir(dir.path());

    let studies = cache::get_studies(&cfg, &paths, false, None).unwrap();
    assert!(studies.is_empty());
    assert!(paths.archive.exists());
    assert!(paths.sample.exists());
    assert_eq!(server.request_count(), 1);
}

#[test]
fn trailing_empty_page_terminates_pagination() {
    let server = api_server::start_with_options(
        api_server::make_studies(25),
        10,
        ApiServerOptions {
            extra_empty_page: true,
            ..Default::default()
        },
    );
    let cfg = test_config(&server.base_url, 10);

    let batch = api::download_all(&cfg, None, None).unwrap();
    assert_eq!(batch.studies.len(), 25);
    assert_eq!(batch.pages, 4, "three data pages plus the empty one");
}

#[test]
fn missing_total_count_is_tolerated() {
    let server = api_server::start_with_options(
        api_server::make_studies(25),
        10,
        ApiServerOptions {
            omit_total: true,
            ..Default::default()
        },
    );
    let cfg = test_config(&server.base_url, 10);

    let batch = api::download_all(&cfg, None, None).unwrap();
    assert_eq!(batch.studies.len(), 25);
    assert_eq!(batch.total_reported, None);
}

#[test]
fn corrupt_archive_errors_and_force_recovers() {
    let server = api_server::start(api_server::make_studies(5), 10);
    let cfg = test_config(&server.base_url, 10);
    let dir = tempdir().unwrap();
    let paths = CachePaths::in_dir(dir.path());

    std::fs::write(&paths.archive, b"truncated garbage").unwrap();
    assert!(cache::get_studies(&cfg, &paths, false, None).is_err());

    let studies = cache::get_studies(&cfg, &paths, true, None).unwrap();
    assert_eq!(studies.len(), 5);
}

#[tokio::test]
async fn progress_snapshots_are_emitted_per_page() {
    let server = api_server::start(api_server::make_studies(25), 10);
    let cfg = test_config(&server.base_url, 10);

    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let batch = tokio::task::spawn_blocking(move || api::download_all(&cfg, None, Some(&tx)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.studies.len(), 25);

    let mut snapshots = Vec::new();
    while let Some(s) = rx.recv().await {
        snapshots.push(s);
    }
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].studies_done, 10);
    assert_eq!(snapshots[0].total_studies, Some(25));
    assert_eq!(snapshots[2].studies_done, 25);
    assert_eq!(snapshots[2].fraction(), Some(1.0));
}
