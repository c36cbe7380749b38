//! Skill extraction, gap detection, bullet synthesis and document rewriting

pub mod catalog;
pub mod classifier;
pub mod document;
pub mod gap_detector;
pub mod mutator;
pub mod pipeline;
pub mod skill;
pub mod skill_extractor;
pub mod synthesizer;
pub mod text_processor;
pub mod vocabulary;
