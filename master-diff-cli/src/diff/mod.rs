//! Two-file reconciliation engine
//!
//! Pure functions over in-memory tables: header detection, key building,
//! row alignment, side-by-side rendering and per-sheet findings. Workbook
//! I/O lives in `crate::excel`.

pub mod align;
pub mod analysis;
pub mod compare;
pub mod header;
pub mod key;
pub mod render;
pub mod table;
pub mod value;

pub use align::{Side, Status};
pub use compare::{SheetComparison, SheetOutcome, SkipReason, compare_sheet};
pub use render::CellClass;
pub use table::SheetTable;
pub use value::CellValue;
