pub mod config;
pub mod energy;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod months;
pub mod names;
pub mod pipeline;
pub mod rename;
pub mod rules;
pub mod tabs;
pub mod water;

pub use error::{Result, ReportError};
