//! Pipeline orchestrator
//!
//! This module provides:
//! - Workflow coordination: catalog → host → select → resolve → download → install
//! - Strictly sequential execution; the first error ends the run
//! - List-only and dry-run modes
//! - Injectable collaborators for testing

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::domain::{DownloadTarget, VersionEntry};
use crate::download::{CurlFetcher, Fetcher, StagedDownloader};
use crate::error::{AppError, ConfigError, IoError};
use crate::host::{HostProbe, UnameProbe};
use crate::index::{HttpClient, MainlineIndex, PageSource};
use crate::installer::{InstallResult, InstallRunner, SudoDpkg};
use crate::output::{create_formatter, OutputConfig, OutputFormat, OutputFormatter};
use crate::progress::Progress;
use crate::selector::{parse_selection, prompt_selection};
use crate::staging::StagingArea;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// What a run should do after listing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Download and install the chosen version
    #[default]
    Install,
    /// Resolve and print the packages, then stop
    DryRun,
    /// Print the catalog and the host kernel, then stop
    List,
}

/// Per-run options that are not settings
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub mode: Mode,
    /// Selection given up front instead of prompting
    pub pick: Option<String>,
    pub output: OutputConfig,
    pub show_progress: bool,
}

impl RunOptions {
    /// Derive run options from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        let mode = if args.list {
            Mode::List
        } else if args.dry_run {
            Mode::DryRun
        } else {
            Mode::Install
        };
        Self {
            mode,
            pick: args.pick.clone(),
            output: OutputConfig::from_cli(args.json, args.no_color),
            show_progress: !args.quiet,
        }
    }
}

/// External collaborators of the pipeline
pub struct Components {
    pub pages: Box<dyn PageSource>,
    pub host: Box<dyn HostProbe>,
    pub fetcher: Box<dyn Fetcher>,
    pub installer: Box<dyn InstallRunner>,
}

impl Components {
    /// Real network, uname, curl and sudo/dpkg
    pub fn system(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self {
            pages: Box::new(HttpClient::with_timeout(settings.timeout)?),
            host: Box::new(UnameProbe::new()),
            fetcher: Box::new(CurlFetcher::with_timeout(settings.timeout)),
            installer: Box::new(SudoDpkg::new()),
        })
    }
}

/// Result of a chosen version being resolved, downloaded and installed
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The chosen catalog entry
    pub entry: VersionEntry,
    /// Directory holding (or that would hold) the packages
    pub staging_dir: PathBuf,
    /// Packages in download order
    pub targets: Vec<DownloadTarget>,
    /// Installer result; `None` when nothing was installed
    pub install: Option<InstallResult>,
}

/// How a successful run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Catalog printed
    Listed(Vec<VersionEntry>),
    /// Packages resolved but not downloaded
    Planned(RunReport),
    /// Packages downloaded and handed to the installer
    Installed(RunReport),
}

/// Orchestrator for the download-and-install workflow
pub struct Orchestrator {
    settings: Settings,
    options: RunOptions,
    index: MainlineIndex,
    host: Box<dyn HostProbe>,
    downloader: StagedDownloader,
    installer: Box<dyn InstallRunner>,
    formatter: Box<dyn OutputFormatter>,
}

impl Orchestrator {
    /// Create an orchestrator talking to the real system
    pub fn new(settings: Settings, options: RunOptions) -> Result<Self, ConfigError> {
        let components = Components::system(&settings)?;
        Ok(Self::with_components(settings, options, components))
    }

    /// Create an orchestrator with custom collaborators (for testing)
    pub fn with_components(
        settings: Settings,
        options: RunOptions,
        components: Components,
    ) -> Self {
        let index = MainlineIndex::new(
            components.pages,
            settings.index_url.clone(),
            settings.max_versions,
            settings.strategy,
        );
        let downloader = StagedDownloader::new(
            components.fetcher,
            StagingArea::new(settings.staging_root.clone()),
        );
        let formatter = create_formatter(options.output.clone());

        Self {
            settings,
            options,
            index,
            host: components.host,
            downloader,
            installer: components.installer,
            formatter,
        }
    }

    /// Run the workflow, prompting on `input` and writing to `out`
    pub async fn run(
        &self,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<RunOutcome, AppError> {
        let mut progress = Progress::new(self.options.show_progress);

        // Step 1: Catalog and host kernel
        progress.spinner("Fetching available kernels");
        let entries = self.index.fetch_catalog().await?;
        progress.finish_and_clear();

        let host = self.host.kernel_version().await?;
        info!(host = %host, "host kernel detected");

        let json_plan =
            self.options.mode == Mode::DryRun && self.options.output.format == OutputFormat::Json;
        if !json_plan {
            self.formatter
                .format_catalog(&entries, Some(&host), out)
                .map_err(|e| IoError::generic("<stdout>", e))?;
        }
        if self.options.mode == Mode::List {
            return Ok(RunOutcome::Listed(entries));
        }

        // Step 2: Selection
        let index = match &self.options.pick {
            Some(pick) => parse_selection(pick, entries.len())?,
            None => prompt_selection(input, out, entries.len())?,
        };
        let entry = entries[index].clone();
        info!(version = %entry.version, index, "version selected");

        // Step 3: Resolve packages
        progress.spinner(&format!(
            "Calculating files to fetch for {}",
            entry.version.bold()
        ));
        let targets = self.index.fetch_targets(&entry).await?;
        let staging_dir = self.downloader.staging().version_dir(&entry.version);

        if self.options.mode == Mode::DryRun {
            progress.finish_and_clear();
            self.formatter
                .format_plan(&entry, &staging_dir, &targets, out)
                .map_err(|e| IoError::generic("<stdout>", e))?;
            return Ok(RunOutcome::Planned(RunReport {
                entry,
                staging_dir,
                targets,
                install: None,
            }));
        }

        // Step 4: Download
        let staging_dir = self
            .downloader
            .download_all(&entry.version, &targets, |_, target| {
                progress.set_message(&format!("Downloading {}", target.file_name.bold()));
            })
            .await?;

        // The installer may ask for a password; the status line must be gone
        progress.finish_and_clear();

        // Step 5: Install
        let result = self.installer.install(&staging_dir).await?;
        let result = if self.settings.ignore_install_status && !result.success {
            warn!(command = %result.command, code = ?result.code, "install failed, ignoring");
            result
        } else {
            result.into_result()?
        };

        Ok(RunOutcome::Installed(RunReport {
            entry,
            staging_dir,
            targets,
            install: Some(result),
        }))
    }
}
