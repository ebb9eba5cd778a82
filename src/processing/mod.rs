//! Text processing and analysis module

pub mod text_processor;
pub mod catalog;
pub mod document;
pub mod skill_extractor;
pub mod similarity;
pub mod gap_analyzer;
pub mod analyzer;
