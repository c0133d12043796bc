//! Project book rendering: records → styled blocks → pages → PDF.
//!
//! This crate provides:
//! - [`document`] — block model and text sanitizing
//! - [`layout`] — word wrap and pagination
//! - [`pdf`] — PDF serialization via `printpdf`

pub mod document;
pub mod layout;
pub mod pdf;

use std::path::PathBuf;

use tracing::{info, instrument};

use projectbook_shared::{PageSize, ProjectBookError, ProjectRecord, Result};

pub use document::{Block, Document, Font, TextStyle, sanitize};
pub use layout::{LaidOutPage, MARGIN_PT, PlacedLine, layout};

/// Where and how to render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output_path: PathBuf,
    pub page_size: PageSize,
    /// PDF document title metadata.
    pub title: String,
}

/// What was written.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub page_count: usize,
    pub record_count: usize,
    /// The pages as laid out and drawn into the file.
    pub pages: Vec<LaidOutPage>,
}

impl RenderSummary {
    /// Text of every drawn line, in page order.
    pub fn line_texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .map(|line| line.text.as_str())
    }
}

/// Render records into a single PDF at `opts.output_path`.
///
/// Refuses an empty record list rather than writing an empty document.
#[instrument(skip_all, fields(path = %opts.output_path.display(), records = records.len()))]
pub fn render(records: &[ProjectRecord], opts: &RenderOptions) -> Result<RenderSummary> {
    if records.is_empty() {
        return Err(ProjectBookError::validation("no projects to render"));
    }

    if let Some(parent) = opts.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ProjectBookError::io(parent, e))?;
        }
    }

    let doc = Document::from_records(records);
    let pages = layout(&doc, opts.page_size);
    pdf::write_pdf(&pages, opts.page_size, &opts.title, &opts.output_path)?;

    let summary = RenderSummary {
        path: opts.output_path.clone(),
        page_count: pages.len(),
        record_count: records.len(),
        pages,
    };

    info!(pages = summary.page_count, "document rendered");
    Ok(summary)
}
