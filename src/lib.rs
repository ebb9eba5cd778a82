//! Resume gap library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{Result, ResumeGapError};
pub use config::Config;
pub use processing::analyzer::{AnalysisReport, Pipeline};
pub use processing::catalog::SkillCatalog;
