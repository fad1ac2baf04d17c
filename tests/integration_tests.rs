//! Integration tests for kernup
//!
//! These tests verify:
//! - The full catalog → select → resolve → download → install pipeline
//! - Abort-on-first-error behavior of the downloader
//! - Installer status handling
//! - Staging cleanup

use async_trait::async_trait;
use kernup::catalog::MatchStrategy;
use kernup::config::Settings;
use kernup::domain::HostKernelVersion;
use kernup::download::Fetcher;
use kernup::error::{AppError, CatalogError, HostError, InstallError, SelectionError, TransferError};
use kernup::host::HostProbe;
use kernup::index::PageSource;
use kernup::installer::{InstallResult, InstallRunner};
use kernup::orchestrator::{Components, Mode, Orchestrator, RunOptions, RunOutcome};
use kernup::output::{OutputConfig, OutputFormat};
use kernup::staging::StagingGuard;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const INDEX_URL: &str = "https://kernel.example.org/mainline";

const PACKAGES: [&str; 4] = [
    "linux-headers-6.9.0-060900-generic_6.9.0-060900.202405122134_amd64.deb",
    "linux-headers-6.9.0-060900_6.9.0-060900.202405122134_all.deb",
    "linux-image-unsigned-6.9.0-060900-generic_6.9.0-060900.202405122134_amd64.deb",
    "linux-modules-6.9.0-060900-generic_6.9.0-060900.202405122134_amd64.deb",
];

/// Fixtures shaped like the Apache listings the index serves
mod fixtures {
    fn file_row(name: &str, date: &str) -> String {
        format!(
            r#"<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="{n}">{n}</a></td><td align="right">{d}  </td><td align="right">  - </td></tr>"#,
            n = name,
            d = date
        )
    }

    fn page(rows: Vec<String>) -> String {
        let mut all = vec![
            r#"<tr><th valign="top"><img src="/icons/blank.gif" alt="[ICO]"></th><th><a href="?C=N;O=A">Name</a></th><th><a href="?C=M;O=A">Last modified</a></th><th><a href="?C=S;O=A">Size</a></th></tr>"#.to_string(),
            r#"<tr><th colspan="4"><hr></th></tr>"#.to_string(),
            r#"<tr><td valign="top"><img src="/icons/back.gif" alt="[PARENTDIR]"></td><td><a href="/">Parent Directory</a></td><td>&nbsp;</td><td align="right">  - </td></tr>"#.to_string(),
        ];
        all.extend(rows);
        all.push(r#"<tr><th colspan="4"><hr></th></tr>"#.to_string());
        format!(
            "<html><head><title>Index of /mainline</title></head><body><h1>Index of /mainline</h1><table>{}</table></body></html>",
            all.join("\n")
        )
    }

    /// Catalog with twelve releases, a daily folder and a stray file mixed in
    pub fn catalog() -> String {
        let mut rows = vec![
            file_row("daily/", "2024-06-01 03:10"),
            file_row("v6.10-rc1/", "2024-05-26 23:58"),
        ];
        for minor in (0..=9).rev() {
            rows.push(file_row(&format!("v6.{}/", minor), "2024-05-12 22:27"));
        }
        rows.push(file_row("README", "2020-01-01 00:00"));
        rows.push(file_row("v5.19/", "2022-07-31 22:04"));
        page(rows)
    }

    /// Architecture directory: three metadata files, then the packages
    pub fn detail(packages: &[&str]) -> String {
        let mut rows: Vec<String> = ["CHECKSUMS", "CHECKSUMS.gpg", "status"]
            .iter()
            .map(|n| file_row(n, "2024-05-12 22:27"))
            .collect();
        rows.extend(packages.iter().map(|p| file_row(p, "2024-05-12 22:27")));
        page(rows)
    }
}

/// Serves fixed pages; unknown URLs answer 404
struct StaticPages(HashMap<String, String>);

impl StaticPages {
    fn standard() -> Self {
        Self::with_detail(&PACKAGES)
    }

    fn with_detail(packages: &[&str]) -> Self {
        let mut pages = HashMap::new();
        pages.insert(format!("{}/?C=N;O=D", INDEX_URL), fixtures::catalog());
        pages.insert(
            format!("{}/v6.10-rc1/amd64/", INDEX_URL),
            fixtures::detail(packages),
        );
        pages.insert(format!("{}/v6.9/amd64/", INDEX_URL), fixtures::detail(packages));
        Self(pages)
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch_text(&self, url: &str) -> Result<String, TransferError> {
        self.0.get(url).cloned().ok_or(TransferError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

struct FixedHost(&'static str);

#[async_trait]
impl HostProbe for FixedHost {
    async fn kernel_version(&self) -> Result<HostKernelVersion, HostError> {
        Ok(HostKernelVersion::new(self.0))
    }
}

/// Writes the URL as the file body; records each request
#[derive(Default)]
struct RecordingFetcher {
    requested: Arc<Mutex<Vec<String>>>,
    fail_on: Option<String>,
    empty_on: Option<String>,
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, url: &str, mut destination: File) -> Result<(), TransferError> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.fail_on.as_deref() == Some(url) {
            return Err(TransferError::process_failed(url, Some(22)));
        }
        if self.empty_on.as_deref() != Some(url) {
            destination.write_all(url.as_bytes()).unwrap();
        }
        Ok(())
    }
}

/// Records install calls and answers with a fixed status
struct RecordingInstaller {
    calls: Arc<Mutex<Vec<PathBuf>>>,
    succeed: bool,
}

impl RecordingInstaller {
    fn new(succeed: bool) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            succeed,
        }
    }
}

#[async_trait]
impl InstallRunner for RecordingInstaller {
    async fn install(&self, dir: &Path) -> Result<InstallResult, InstallError> {
        self.calls.lock().unwrap().push(dir.to_path_buf());
        let command = format!("sudo dpkg --install --recursive {}/", dir.display());
        if self.succeed {
            Ok(InstallResult::success(command))
        } else {
            Ok(InstallResult::failure(command, Some(1)))
        }
    }
}

struct Harness {
    temp_dir: TempDir,
    requested: Arc<Mutex<Vec<String>>>,
    installs: Arc<Mutex<Vec<PathBuf>>>,
}

impl Harness {
    fn staging_root(&self) -> PathBuf {
        self.temp_dir.path().join("kernel-updater")
    }
}

fn settings(root: &Path) -> Settings {
    Settings {
        index_url: INDEX_URL.to_string(),
        staging_root: root.to_path_buf(),
        ..Settings::default()
    }
}

fn options(mode: Mode, pick: Option<&str>) -> RunOptions {
    RunOptions {
        mode,
        pick: pick.map(str::to_string),
        output: OutputConfig {
            format: OutputFormat::Text,
            color: false,
        },
        show_progress: false,
    }
}

fn build(
    pages: StaticPages,
    fetcher: RecordingFetcher,
    installer: RecordingInstaller,
    configure: impl FnOnce(&mut Settings),
    options: RunOptions,
) -> (Orchestrator, Harness) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let harness = Harness {
        requested: Arc::clone(&fetcher.requested),
        installs: Arc::clone(&installer.calls),
        temp_dir,
    };
    let mut settings = settings(&harness.staging_root());
    configure(&mut settings);

    let components = Components {
        pages: Box::new(pages),
        host: Box::new(FixedHost("6.8.0-31-generic")),
        fetcher: Box::new(fetcher),
        installer: Box::new(installer),
    };
    (
        Orchestrator::with_components(settings, options, components),
        harness,
    )
}

mod pipeline {
    use super::*;

    /// Test the whole flow with an interactive answer
    #[tokio::test]
    async fn test_prompted_install_downloads_and_installs() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, None),
        );

        let mut input = Cursor::new(b"1\n".to_vec());
        let mut out = Vec::new();
        let outcome = orchestrator.run(&mut input, &mut out).await.unwrap();

        let report = match outcome {
            RunOutcome::Installed(report) => report,
            other => panic!("expected install, got {:?}", other),
        };
        assert_eq!(report.entry.version, "6.9");
        assert_eq!(report.targets.len(), 4);
        assert!(report.install.as_ref().unwrap().success);

        let version_dir = harness.staging_root().join("6.9");
        assert_eq!(report.staging_dir, version_dir);
        for name in PACKAGES {
            let body = fs::read_to_string(version_dir.join(name)).unwrap();
            assert_eq!(body, format!("{}/v6.9/amd64/{}", INDEX_URL, name));
        }

        // Sequential, in row order
        let requested = harness.requested.lock().unwrap().clone();
        let expected: Vec<String> = PACKAGES
            .iter()
            .map(|n| format!("{}/v6.9/amd64/{}", INDEX_URL, n))
            .collect();
        assert_eq!(requested, expected);

        assert_eq!(*harness.installs.lock().unwrap(), vec![version_dir]);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("6.10-rc1"));
        assert!(printed.contains("Your kernel version: 6.8.0-31-generic"));
        assert!(printed.contains("Pick index to install"));
        assert!(!printed.contains("daily"));
        assert!(!printed.contains("5.19"), "only ten versions are offered");
    }

    /// Test that the catalog is capped at the configured count
    #[tokio::test]
    async fn test_list_mode_respects_count() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |s| s.max_versions = 3,
            options(Mode::List, None),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let outcome = orchestrator.run(&mut input, &mut out).await.unwrap();

        match outcome {
            RunOutcome::Listed(entries) => {
                let versions: Vec<_> = entries.iter().map(|e| e.version.as_str()).collect();
                assert_eq!(versions, vec!["6.10-rc1", "6.9", "6.8"]);
            }
            other => panic!("expected listing, got {:?}", other),
        }
        assert!(harness.requested.lock().unwrap().is_empty());
        assert!(!harness.staging_root().exists());
    }

    /// Test that a dry run resolves but never downloads
    #[tokio::test]
    async fn test_dry_run_plans_only() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::DryRun, Some("0")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let outcome = orchestrator.run(&mut input, &mut out).await.unwrap();

        match outcome {
            RunOutcome::Planned(report) => {
                assert_eq!(report.entry.version, "6.10-rc1");
                assert_eq!(report.targets.len(), 4);
                assert!(report.install.is_none());
            }
            other => panic!("expected plan, got {:?}", other),
        }
        assert!(harness.requested.lock().unwrap().is_empty());
        assert!(harness.installs.lock().unwrap().is_empty());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Would download 4 package(s) for 6.10-rc1"));
    }

    /// Test that JSON dry runs print only the plan document
    #[tokio::test]
    async fn test_dry_run_json_is_parseable() {
        let mut run_options = options(Mode::DryRun, Some("1"));
        run_options.output.format = OutputFormat::Json;
        let (orchestrator, _harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            run_options,
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        orchestrator.run(&mut input, &mut out).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["version"], "6.9");
        assert_eq!(json["targets"].as_array().unwrap().len(), 4);
    }

    /// Test content-based matching when the listing order changes
    #[tokio::test]
    async fn test_match_by_role_tolerates_reordering() {
        let reordered = [PACKAGES[3], PACKAGES[2], PACKAGES[1], PACKAGES[0]];
        let (orchestrator, _harness) = build(
            StaticPages::with_detail(&reordered),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |s| s.strategy = MatchStrategy::ByRole,
            options(Mode::DryRun, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let outcome = orchestrator.run(&mut input, &mut out).await.unwrap();

        match outcome {
            RunOutcome::Planned(report) => {
                let names: Vec<_> = report.targets.iter().map(|t| t.file_name.as_str()).collect();
                assert_eq!(names, PACKAGES.to_vec());
            }
            other => panic!("expected plan, got {:?}", other),
        }
    }
}

mod failures {
    use super::*;

    /// Test that the first failed transfer stops the run before install
    #[tokio::test]
    async fn test_transfer_failure_aborts() {
        let failing = format!("{}/v6.9/amd64/{}", INDEX_URL, PACKAGES[1]);
        let fetcher = RecordingFetcher {
            fail_on: Some(failing.clone()),
            ..RecordingFetcher::default()
        };
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            fetcher,
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Transfer(TransferError::ProcessFailed { ref url, .. }) if *url == failing
        ));
        assert_eq!(harness.requested.lock().unwrap().len(), 2);
        assert!(harness.installs.lock().unwrap().is_empty());
    }

    /// Test that a zero-length download is an error
    #[tokio::test]
    async fn test_empty_download_aborts() {
        let empty = format!("{}/v6.9/amd64/{}", INDEX_URL, PACKAGES[0]);
        let fetcher = RecordingFetcher {
            empty_on: Some(empty),
            ..RecordingFetcher::default()
        };
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            fetcher,
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Transfer(TransferError::EmptyFile { .. })
        ));
        assert!(harness.installs.lock().unwrap().is_empty());
    }

    /// Test that an out-of-range answer is rejected before any download
    #[tokio::test]
    async fn test_out_of_range_selection() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, None),
        );

        let mut input = Cursor::new(b"10\n".to_vec());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Selection(SelectionError::OutOfRange { index: 10, max: 9 })
        ));
        assert!(harness.requested.lock().unwrap().is_empty());
    }

    /// Test that a missing detail page surfaces the HTTP status
    #[tokio::test]
    async fn test_missing_detail_page() {
        let (orchestrator, _harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("2")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Transfer(TransferError::HttpStatus { status: 404, .. })
        ));
    }

    /// Test that a detail page with too few rows is a structural error
    #[tokio::test]
    async fn test_short_detail_page() {
        let (orchestrator, _harness) = build(
            StaticPages::with_detail(&PACKAGES[..2]),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(err, AppError::Catalog(_)));
    }

    /// Test that an empty catalog is reported instead of prompting
    #[tokio::test]
    async fn test_empty_catalog() {
        let mut pages = HashMap::new();
        pages.insert(
            format!("{}/?C=N;O=D", INDEX_URL),
            "<table><tr><th>Name</th></tr></table>".to_string(),
        );
        let (orchestrator, _harness) = build(
            StaticPages(pages),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, None),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Catalog(CatalogError::NoVersions { .. })
        ));
    }

    /// Test that a failed install is an error by default
    #[tokio::test]
    async fn test_install_failure_is_reported() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(false),
            |_| {},
            options(Mode::Install, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = orchestrator.run(&mut input, &mut out).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Install(InstallError::Failed { code: Some(1), .. })
        ));
        assert_eq!(harness.installs.lock().unwrap().len(), 1);
    }

    /// Test that the install status can be ignored
    #[tokio::test]
    async fn test_install_failure_ignored() {
        let (orchestrator, _harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(false),
            |s| s.ignore_install_status = true,
            options(Mode::Install, Some("1")),
        );

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let outcome = orchestrator.run(&mut input, &mut out).await.unwrap();

        match outcome {
            RunOutcome::Installed(report) => {
                assert!(!report.install.unwrap().success);
            }
            other => panic!("expected install, got {:?}", other),
        }
    }
}

mod staging_cleanup {
    use super::*;

    /// Test that the guard removes everything a run staged
    #[tokio::test]
    async fn test_guard_removes_staged_packages() {
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            RecordingFetcher::default(),
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("1")),
        );
        let root = harness.staging_root();
        let guard = StagingGuard::acquire(root.clone()).unwrap();

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        orchestrator.run(&mut input, &mut out).await.unwrap();
        assert!(root.join("6.9").join(PACKAGES[0]).exists());

        drop(guard);
        assert!(!root.exists());
    }

    /// Test that cleanup also runs after a failed run
    #[tokio::test]
    async fn test_guard_removes_partial_downloads() {
        let fetcher = RecordingFetcher {
            fail_on: Some(format!("{}/v6.9/amd64/{}", INDEX_URL, PACKAGES[2])),
            ..RecordingFetcher::default()
        };
        let (orchestrator, harness) = build(
            StaticPages::standard(),
            fetcher,
            RecordingInstaller::new(true),
            |_| {},
            options(Mode::Install, Some("1")),
        );
        let root = harness.staging_root();
        let guard = StagingGuard::acquire(root.clone()).unwrap();

        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        assert!(orchestrator.run(&mut input, &mut out).await.is_err());
        assert!(root.join("6.9").join(PACKAGES[0]).exists());

        assert!(guard.release());
        assert!(!root.exists());
        assert!(!guard.release());
    }
}
