//! Report structures and formatters

pub mod formatter;
pub mod report;

pub use formatter::{ReportGenerator, save_report_to_file, tailored_output_path};
pub use report::{ReportMetadata, TailoringReport};
