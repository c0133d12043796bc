//! End-to-end run: authenticate → list → enrich → render.
//!
//! ```text
//! Start → Authenticating ─┬─ Authenticated → Listing ─┬─ HaveProjects → Enriching → Rendering → Done
//!                         └─ LoginFailed → Done        └─ NoProjects → Done
//! ```
//!
//! Every failure is terminal except a detail page that cannot be fetched;
//! that project gets an empty description and the failure is reported.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};
use url::Url;

use projectbook_render::{RenderOptions, RenderSummary};
use projectbook_scrape::Markup;
use projectbook_session::{LoginCheck, Session, authenticate, login_check_for};
use projectbook_shared::{
    AppConfig, Credentials, HttpConfig, MarkupConfig, PageSize, ProjectBookError,
    ProjectCollection,
};

/// Title metadata written into the PDF.
const DOCUMENT_TITLE: &str = "Project Book";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Everything one run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub login_url: Url,
    pub listing_url: Url,
    pub credentials: Credentials,
    /// Body text required in the login response, if any.
    pub success_marker: Option<String>,
    pub http: HttpConfig,
    pub markup: MarkupConfig,
    pub output_path: PathBuf,
    pub page_size: PageSize,
    /// Also dump the collected records as JSON here.
    pub json_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Derive both endpoints for `year` from the app config.
    pub fn from_app_config(
        app: &AppConfig,
        year: u16,
        credentials: Credentials,
    ) -> projectbook_shared::Result<Self> {
        let listing_url = app.listing_url_for(year)?;
        let login_url = app.login_url_for(&listing_url)?;

        Ok(Self {
            login_url,
            listing_url,
            credentials,
            success_marker: app.sso.success_marker.clone(),
            http: app.http.clone(),
            markup: app.markup.clone(),
            output_path: app.output.path.clone(),
            page_size: app.output.page_size,
            json_path: None,
        })
    }
}

// ---------------------------------------------------------------------------
// States, errors, reports
// ---------------------------------------------------------------------------

/// Run states, reported to [`ProgressReporter::phase`] as they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Authenticating,
    Authenticated,
    LoginFailed,
    Listing,
    HaveProjects,
    NoProjects,
    Enriching,
    Rendering,
    Done,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunState::Start => "Starting",
            RunState::Authenticating => "Logging in",
            RunState::Authenticated => "Logged in",
            RunState::LoginFailed => "Login failed",
            RunState::Listing => "Fetching project listing",
            RunState::HaveProjects => "Projects found",
            RunState::NoProjects => "No projects found",
            RunState::Enriching => "Fetching project descriptions",
            RunState::Rendering => "Rendering document",
            RunState::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Terminal outcome of a failed run, by the state it failed in.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Could not build the session or selectors.
    #[error(transparent)]
    Setup(#[from] ProjectBookError),

    #[error("login failed: {0}")]
    LoginFailed(ProjectBookError),

    #[error("listing failed: {0}")]
    ListingFailed(ProjectBookError),

    /// The listing parsed cleanly but held no projects.
    #[error("no projects found on the listing page")]
    NoProjects,

    #[error("rendering failed: {0}")]
    RenderFailed(ProjectBookError),

    /// The `--json` dump could not be written.
    #[error("writing project data failed: {0}")]
    OutputFailed(ProjectBookError),
}

/// A detail page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    pub project_id: String,
    pub url: Url,
    pub error: String,
}

/// Output of the authenticate/list/enrich steps.
#[derive(Debug, Clone)]
pub struct Collected {
    pub projects: ProjectCollection,
    pub detail_failures: Vec<DetailFailure>,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub project_count: usize,
    /// Projects rendered with an empty description (not found or failed).
    pub missing_descriptions: usize,
    pub detail_failures: Vec<DetailFailure>,
    pub output: RenderSummary,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new state.
    fn phase(&self, state: RunState);
    /// Called after each detail page.
    fn project_enriched(&self, title: &str, current: usize, total: usize);
    /// Called when the run completes successfully.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _state: RunState) {}
    fn project_enriched(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// One run against the project site. The session lives as long as the pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    session: Session,
    markup: Markup,
    login_check: Box<dyn LoginCheck>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let session = Session::new(&config.http)?;
        let markup = Markup::new(&config.markup)?;
        let login_check = login_check_for(config.success_marker.as_deref());

        Ok(Self {
            config,
            session,
            markup,
            login_check,
        })
    }

    /// Replace the login success predicate.
    pub fn with_login_check(mut self, check: Box<dyn LoginCheck>) -> Self {
        self.login_check = check;
        self
    }

    /// Run every step, writing the PDF.
    #[instrument(skip_all, fields(listing_url = %self.config.listing_url))]
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<RunReport, PipelineError> {
        let start = Instant::now();

        let collected = self.collect(progress).await?;
        if let Some(path) = &self.config.json_path {
            write_collection(&collected.projects, path)
                .map_err(|e| finish(progress, PipelineError::OutputFailed(e)))?;
        }
        let output = self
            .render(&collected.projects, progress)
            .map_err(|e| finish(progress, e))?;

        let report = RunReport {
            project_count: collected.projects.len(),
            missing_descriptions: collected.projects.missing_descriptions(),
            detail_failures: collected.detail_failures,
            output,
            elapsed: start.elapsed(),
        };

        progress.phase(RunState::Done);
        progress.done(&report);

        info!(
            projects = report.project_count,
            missing_descriptions = report.missing_descriptions,
            detail_failures = report.detail_failures.len(),
            pages = report.output.page_count,
            elapsed_ms = report.elapsed.as_millis(),
            "run complete"
        );

        Ok(report)
    }

    /// Authenticate, list, and enrich. Nothing is written.
    pub async fn collect(&self, progress: &dyn ProgressReporter) -> Result<Collected, PipelineError> {
        progress.phase(RunState::Start);

        // --- Authenticating ---
        progress.phase(RunState::Authenticating);
        if let Err(e) = authenticate(
            &self.session,
            &self.config.login_url,
            &self.config.credentials,
            self.login_check.as_ref(),
        )
        .await
        {
            progress.phase(RunState::LoginFailed);
            return Err(finish(progress, PipelineError::LoginFailed(e)));
        }
        progress.phase(RunState::Authenticated);

        // --- Listing ---
        progress.phase(RunState::Listing);
        let items = projectbook_scrape::list_projects(
            &self.session,
            &self.config.listing_url,
            &self.markup,
        )
        .await
        .map_err(|e| finish(progress, PipelineError::ListingFailed(e)))?;

        if items.is_empty() {
            progress.phase(RunState::NoProjects);
            return Err(finish(progress, PipelineError::NoProjects));
        }
        progress.phase(RunState::HaveProjects);

        // --- Enriching ---
        progress.phase(RunState::Enriching);
        let total = items.len();
        let mut projects = ProjectCollection::new();
        let mut detail_failures = Vec::new();

        for (i, item) in items.into_iter().enumerate() {
            let description = match projectbook_scrape::fetch_description(
                &self.session,
                &item.detail_url,
                &self.markup,
            )
            .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!(id = %item.id, url = %item.detail_url, error = %e, "detail fetch failed, using empty description");
                    detail_failures.push(DetailFailure {
                        project_id: item.id.clone(),
                        url: item.detail_url.clone(),
                        error: e.to_string(),
                    });
                    String::new()
                }
            };

            progress.project_enriched(&item.title, i + 1, total);
            projects.push(item.complete(description));
        }

        Ok(Collected {
            projects,
            detail_failures,
        })
    }

    /// Render a collection to the configured output path.
    pub fn render(
        &self,
        projects: &ProjectCollection,
        progress: &dyn ProgressReporter,
    ) -> Result<RenderSummary, PipelineError> {
        progress.phase(RunState::Rendering);
        let opts = RenderOptions {
            output_path: self.config.output_path.clone(),
            page_size: self.config.page_size,
            title: DOCUMENT_TITLE.to_string(),
        };
        projectbook_render::render(projects.records(), &opts).map_err(PipelineError::RenderFailed)
    }
}

/// Report the terminal `Done` state for a failed run.
fn finish(progress: &dyn ProgressReporter, err: PipelineError) -> PipelineError {
    progress.phase(RunState::Done);
    err
}

/// Write the collection as pretty JSON.
pub fn write_collection(projects: &ProjectCollection, path: &Path) -> projectbook_shared::Result<()> {
    let json = projects
        .to_json()
        .map_err(|e| ProjectBookError::validation(format!("failed to serialize projects: {e}")))?;
    std::fs::write(path, json).map_err(|e| ProjectBookError::io(path, e))?;
    info!(path = %path.display(), projects = projects.len(), "project data written");
    Ok(())
}
