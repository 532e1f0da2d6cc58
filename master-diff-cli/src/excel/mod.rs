//! Workbook I/O
//!
//! - `reader`: open input workbooks with calamine and load configured sheets
//! - `writer`: produce the side-by-side output workbook with rust_xlsxwriter

pub mod reader;
pub mod writer;

pub use reader::WorkbookSource;
pub use writer::write_comparison_workbook;
