//! Core library for the teraco-reports command line application.
//!
//! The library normalises a batch of downloaded facility reports into the
//! canonical file and worksheet layout consumed by reporting dashboards.
//! Storage and filesystem adapters live under [`teraco::reports::io`], the
//! rename rules in [`teraco::reports::rules`], the per-report workbook edits
//! in [`teraco::reports::tabs`], [`teraco::reports::energy`] and
//! [`teraco::reports::water`], and the orchestration in
//! [`teraco::reports::rename`] and [`teraco::reports::pipeline`].

pub mod teraco;

pub use teraco::reports::{
    Result, ReportError, config, energy, error, io, logging, model, months, names, pipeline,
    rename, rules, tabs, water,
};
