use super::*;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

const ARCHIVE_PATH: &str = "/download/maestro-complete-reports/jars/2.0.10.zip";
const CATALOG_PATH: &str = "/api/maestro-complete-reports/jars";

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for &(name, content) in entries {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn direct_fetcher(server: &mockito::Server, scratch_root: &Path) -> Fetcher {
    Fetcher::new(
        crate::http::agent(None),
        ArchiveSource::Direct {
            base_url: server.url(),
            project: "maestro-complete-reports".to_string(),
        },
        format!("{}{CATALOG_PATH}", server.url()),
    )
    .with_scratch_root(scratch_root.to_path_buf())
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_direct_fetch_extracts_and_cleans_up() {
    let mut server = mockito::Server::new();
    let body = zip_bytes(&[("jars/maestro-cli.jar", b"patched-cli")]);
    let mock = server
        .mock("GET", ARCHIVE_PATH)
        .with_status(200)
        .with_body(body)
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let fetcher = direct_fetcher(&server, scratch_root.path());
    let fetched = fetcher.fetch("2.0.10").unwrap();

    mock.assert();
    assert_eq!(fetched.entries(), 1);
    assert_eq!(
        std::fs::read(fetched.extracted().join("jars/maestro-cli.jar")).unwrap(),
        b"patched-cli"
    );
    assert!(fetched.scratch().join("jars.zip").is_file());

    let scratch = fetched.scratch().to_path_buf();
    drop(fetched);
    assert!(!scratch.exists());
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_not_found_lists_supported_versions() {
    let mut server = mockito::Server::new();
    let _archive = server
        .mock("GET", "/download/maestro-complete-reports/jars/9.9.9.zip")
        .with_status(404)
        .create();
    let catalog = server
        .mock("GET", CATALOG_PATH)
        .with_status(200)
        .with_body(r#"{"project":"maestro-complete-reports","versions":["2.0.9","2.0.10"]}"#)
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = direct_fetcher(&server, scratch_root.path())
        .fetch("9.9.9")
        .unwrap_err();

    catalog.assert();
    match &err {
        Error::UnsupportedVersion { version, supported } => {
            assert_eq!(version, "9.9.9");
            assert_eq!(
                supported.as_deref(),
                Some(&["2.0.9".to_string(), "2.0.10".to_string()][..])
            );
        }
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
    insta::assert_snapshot!(
        err.to_string(),
        @"maestro version 9.9.9 is not supported. Supported versions: 2.0.9, 2.0.10"
    );
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_not_found_without_catalog() {
    let mut server = mockito::Server::new();
    let _archive = server
        .mock("GET", "/download/maestro-complete-reports/jars/9.9.9.zip")
        .with_status(404)
        .create();
    let _catalog = server.mock("GET", CATALOG_PATH).with_status(500).create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = direct_fetcher(&server, scratch_root.path())
        .fetch("9.9.9")
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedVersion { supported: None, .. }));
    insta::assert_snapshot!(err.to_string(), @"maestro version 9.9.9 is not supported");
}

#[test]
fn test_server_error_is_download_error() {
    let mut server = mockito::Server::new();
    let _archive = server.mock("GET", ARCHIVE_PATH).with_status(502).create();
    let catalog = server.mock("GET", CATALOG_PATH).expect(0).create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = direct_fetcher(&server, scratch_root.path())
        .fetch("2.0.10")
        .unwrap_err();

    catalog.assert();
    assert!(matches!(err, Error::Download { status: 502, .. }));
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_corrupt_archive_cleans_up() {
    let mut server = mockito::Server::new();
    let _archive = server
        .mock("GET", ARCHIVE_PATH)
        .with_status(200)
        .with_body("<html>not a zip</html>")
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = direct_fetcher(&server, scratch_root.path())
        .fetch("2.0.10")
        .unwrap_err();

    assert!(matches!(err, Error::Archive(_)));
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_zip_slip_archive_is_rejected() {
    let mut server = mockito::Server::new();
    let body = zip_bytes(&[("../../escaped.jar", b"evil")]);
    let _archive = server
        .mock("GET", ARCHIVE_PATH)
        .with_status(200)
        .with_body(body)
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = direct_fetcher(&server, scratch_root.path())
        .fetch("2.0.10")
        .unwrap_err();

    assert!(matches!(err, Error::PathTraversal(_)));
    assert!(is_empty_dir(scratch_root.path()));
    assert!(!scratch_root.path().join("escaped.jar").exists());
}

#[test]
fn test_indirect_source_follows_returned_url() {
    let mut server = mockito::Server::new();
    let download_url = format!("{}/r2/tmp/abc123.zip", server.url());
    let endpoint = server
        .mock("GET", "/api/download-url/2.0.10")
        .with_status(200)
        .with_body(format!(r#"{{"url":"{download_url}"}}"#))
        .create();
    let archive = server
        .mock("GET", "/r2/tmp/abc123.zip")
        .with_status(200)
        .with_body(zip_bytes(&[("maestro-client.jar", b"client")]))
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let fetched = indirect_fetcher(&server, scratch_root.path())
        .fetch("2.0.10")
        .unwrap();
    endpoint.assert();
    archive.assert();
    assert!(fetched.extracted().join("maestro-client.jar").is_file());
}

#[test]
fn test_indirect_source_empty_url() {
    let mut server = mockito::Server::new();
    let _endpoint = server
        .mock("GET", "/api/download-url")
        .with_status(200)
        .with_body(r#"{"url":""}"#)
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(
        crate::http::agent(None),
        ArchiveSource::Indirect {
            endpoint: format!("{}/api/download-url", server.url()),
        },
        format!("{}{CATALOG_PATH}", server.url()),
    )
    .with_scratch_root(scratch_root.path().to_path_buf());

    let err = fetcher.fetch("2.0.10").unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }));
    assert!(err.to_string().contains("server returned empty URL"));
    assert!(is_empty_dir(scratch_root.path()));
}

fn indirect_fetcher(server: &mockito::Server, scratch_root: &Path) -> Fetcher {
    Fetcher::new(
        crate::http::agent(None),
        ArchiveSource::Indirect {
            endpoint: format!("{}/api/download-url/{{version}}", server.url()),
        },
        format!("{}{CATALOG_PATH}", server.url()),
    )
    .with_scratch_root(scratch_root.to_path_buf())
}

#[test]
fn test_indirect_not_found_lists_supported_versions() {
    let mut server = mockito::Server::new();
    let _endpoint = server
        .mock("GET", "/api/download-url/9.9.9")
        .with_status(404)
        .create();
    let catalog = server
        .mock("GET", CATALOG_PATH)
        .with_status(200)
        .with_body(r#"{"versions":["2.0.10"]}"#)
        .create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = indirect_fetcher(&server, scratch_root.path())
        .fetch("9.9.9")
        .unwrap_err();

    catalog.assert();
    insta::assert_snapshot!(
        err.to_string(),
        @"maestro version 9.9.9 is not supported. Supported versions: 2.0.10"
    );
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_indirect_server_error_is_download_error() {
    let mut server = mockito::Server::new();
    let _endpoint = server
        .mock("GET", "/api/download-url/2.0.10")
        .with_status(500)
        .create();
    let catalog = server.mock("GET", CATALOG_PATH).expect(0).create();

    let scratch_root = tempfile::tempdir().unwrap();
    let err = indirect_fetcher(&server, scratch_root.path())
        .fetch("2.0.10")
        .unwrap_err();

    catalog.assert();
    match &err {
        Error::Download { url, status } => {
            assert_eq!(*status, 500);
            assert!(url.ends_with("/api/download-url/2.0.10"));
        }
        other => panic!("expected Download, got {other:?}"),
    }
    assert!(is_empty_dir(scratch_root.path()));
}

#[test]
fn test_source_from_config() {
    let mut config = Config::default();
    let source = ArchiveSource::from_config(&config);
    assert_eq!(
        source,
        ArchiveSource::Direct {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            project: crate::config::DEFAULT_PROJECT.to_string(),
        }
    );
    assert_eq!(
        source.direct_url("2.0.10").as_deref(),
        Some("https://open.devicelab.dev/download/maestro-complete-reports/jars/2.0.10.zip")
    );

    config.service.download_endpoint = Some("https://example.com/url".to_string());
    let source = ArchiveSource::from_config(&config);
    assert_eq!(
        source,
        ArchiveSource::Indirect {
            endpoint: "https://example.com/url".to_string()
        }
    );
    assert_eq!(source.direct_url("2.0.10"), None);
}
