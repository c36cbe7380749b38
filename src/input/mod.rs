//! Input processing module
//! Handles file detection, text extraction, and loading editable documents

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::FileType;
pub use manager::InputManager;
