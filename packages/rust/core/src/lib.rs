//! Run orchestration for ProjectBook.
//!
//! This crate ties together authentication, listing extraction, detail
//! enrichment, and rendering into one run (see [`pipeline`]).

pub mod pipeline;

pub use pipeline::{
    Collected, DetailFailure, Pipeline, PipelineConfig, PipelineError, ProgressReporter,
    RunReport, RunState, SilentProgress,
};
