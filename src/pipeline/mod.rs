// src/pipeline/mod.rs

//! Record list transformations behind the dashboard views:
//! search and filter, per-examinee grouping, page slicing and CSV export.

pub mod export;
pub mod filter;
pub mod group;
pub mod paginate;

pub use export::{CSV_HEADER, export_filename, to_csv};
pub use filter::apply_filter;
pub use group::{ExamineeGroup, ExamineeRow, group_by_examinee};
pub use paginate::{Page, paginate};
